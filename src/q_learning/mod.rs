//! Tabular Q-learning
//!
//! Q-learning is off-policy temporal difference control: each transition
//! moves the estimate for the action taken toward the immediate reward plus
//! the discounted value of the best action from the successor state.
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α · (r + γ · max_a' Q(s',a') − Q(s,a))
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use qmaze::maze::{Action, Position};
//! use qmaze::q_learning::QLearningAgent;
//!
//! let mut agent = QLearningAgent::new(
//!     7,   // grid size
//!     0.2, // learning_rate
//!     0.9, // discount_rate
//!     0.3, // exploration_rate
//! )
//! .with_seed(42);
//!
//! agent.update(Position::new(1, 0), Action::Up, 200.0, Position::new(0, 0));
//! assert_eq!(agent.best_action(Position::new(1, 0)), Action::Up);
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use q_table::QTable;
pub use serialization::{SavedAgent, TrainingMetadata};
