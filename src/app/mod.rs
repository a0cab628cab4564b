//! Application layer with dependency injection container.
//!
//! The container owns infrastructure dependencies (the agent repository and a
//! default seed) and provides factory methods for mazes, agents and
//! controllers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │          App (DI Container)          │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ owns                       │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Infrastructure (adapters)           │   │
//! │  │  - MsgPackRepository                 │   │
//! │  │  - InMemoryRepository (testing)      │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implements                 │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Ports (ports)                │   │
//! │  │  - AgentRepository trait             │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ used by                    │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - Maze, QLearningAgent              │   │
//! │  │  - GameController                    │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use qmaze::app::{App, GameConfig};
//!
//! let app = App::new();
//! let mut controller = app.create_controller(&GameConfig::default().with_seed(42))?;
//! controller.auto_move();
//! # Ok::<(), qmaze::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{DEFAULT_GRID_SIZE, GameConfig};
pub use container::{App, AppBuilder};
