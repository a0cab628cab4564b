//! Configuration types for game creation.

use crate::{
    Error, Result,
    maze::{MAX_GRID_SIZE, MIN_GRID_SIZE},
};

/// Default side length of a generated maze
pub const DEFAULT_GRID_SIZE: usize = 7;

/// Configuration for creating a maze game and its learning agent.
///
/// Hyperparameters are fixed once a controller is built from the config.
///
/// # Examples
///
/// ```
/// use qmaze::app::GameConfig;
///
/// let config = GameConfig::new(9)
///     .with_seed(42)
///     .with_learning_rate(0.5)
///     .with_exploration_rate(0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Side length of the square grid (5 to 12)
    pub grid_size: usize,
    /// α, step size of the Q-learning update
    pub learning_rate: f64,
    /// γ, weight of the successor state's value
    pub discount_rate: f64,
    /// ε, probability of a uniformly random action
    pub exploration_rate: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Create a configuration for the given grid size.
    ///
    /// Uses α = 0.2, γ = 0.9, ε = 0.3 and no seed.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            learning_rate: 0.2,
            discount_rate: 0.9,
            exploration_rate: 0.3,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_rate(mut self, discount_rate: f64) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    pub fn with_exploration_rate(mut self, exploration_rate: f64) -> Self {
        self.exploration_rate = exploration_rate;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the grid size and that every rate lies in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSize`] for a grid outside 5..=12 and
    /// [`Error::InvalidConfiguration`] for a NaN or out-of-range rate.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(Error::InvalidSize {
                size: self.grid_size,
            });
        }

        for (name, value) in [
            ("learning rate", self.learning_rate),
            ("discount rate", self.discount_rate),
            ("exploration rate", self.exploration_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be within [0, 1], got {value}"),
                });
            }
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}
