//! Dependency injection container for the qmaze application.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for mazes, agents and controllers.

use std::{path::Path, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};

use super::config::GameConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    game::GameController,
    maze::{self, Maze},
    ports::AgentRepository,
    q_learning::{QLearningAgent, SavedAgent, TrainingMetadata},
};

/// Offsets deriving independent streams from one user seed
const AGENT_SEED_OFFSET: u64 = 1;
const RESET_SEED_OFFSET: u64 = 2;

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use qmaze::app::{App, GameConfig};
///
/// let app = App::new();
/// let controller = app.create_controller(&GameConfig::new(7).with_seed(42))?;
/// assert_eq!(controller.maze().size(), 7);
/// # Ok::<(), qmaze::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use qmaze::app::App;
/// use qmaze::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for agent persistence
    agent_repository: Arc<dyn AgentRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses `MsgPackRepository` and no default seed.
    pub fn new() -> Self {
        Self {
            agent_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn agent_repository(&self) -> Arc<dyn AgentRepository + Send + Sync> {
        Arc::clone(&self.agent_repository)
    }

    /// Seed taken from the config, falling back to the container default
    pub fn effective_seed(&self, config: &GameConfig) -> Option<u64> {
        config.seed.or(self.default_seed)
    }

    /// Generate a fresh maze for the configured grid size.
    pub fn create_maze(&self, config: &GameConfig) -> Result<Maze> {
        config.validate()?;
        let mut rng = match self.effective_seed(config) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        maze::generate(config.grid_size, &mut rng)
    }

    /// Create an untrained agent with the configured hyperparameters.
    pub fn create_agent(&self, config: &GameConfig) -> Result<QLearningAgent> {
        config.validate()?;
        let agent = QLearningAgent::new(
            config.grid_size,
            config.learning_rate,
            config.discount_rate,
            config.exploration_rate,
        );

        Ok(match self.effective_seed(config) {
            Some(seed) => agent.with_seed(seed.wrapping_add(AGENT_SEED_OFFSET)),
            None => agent,
        })
    }

    /// Create a controller with a fresh maze and an untrained agent.
    pub fn create_controller(&self, config: &GameConfig) -> Result<GameController> {
        let agent = self.create_agent(config)?;
        self.create_controller_with_agent(config, agent)
    }

    /// Create a controller on a fresh maze for an existing agent.
    ///
    /// # Errors
    ///
    /// Fails when the agent's Q-table does not match `config.grid_size`.
    pub fn create_controller_with_agent(
        &self,
        config: &GameConfig,
        agent: QLearningAgent,
    ) -> Result<GameController> {
        let maze = self.create_maze(config)?;
        self.create_controller_for_maze(config, maze, agent)
    }

    /// Create a controller on a given maze, e.g. one parsed from a layout.
    pub fn create_controller_for_maze(
        &self,
        config: &GameConfig,
        maze: Maze,
        agent: QLearningAgent,
    ) -> Result<GameController> {
        let controller = GameController::new(maze, agent)?;
        Ok(match self.effective_seed(config) {
            Some(seed) => controller.with_maze_seed(seed.wrapping_add(RESET_SEED_OFFSET)),
            None => controller,
        })
    }

    /// Load a saved agent with its metadata.
    pub fn load_saved_agent(&self, path: &Path) -> Result<SavedAgent> {
        self.agent_repository.load(path)
    }

    /// Load an agent from persistent storage.
    ///
    /// The saved hyperparameters are kept. The container's default seed, if
    /// any, reseeds the exploration stream.
    ///
    /// ```no_run
    /// use qmaze::app::App;
    /// use std::path::Path;
    ///
    /// let app = App::new();
    /// let agent = app.load_agent(Path::new("trained_agent.msgpack"))?;
    /// # Ok::<(), qmaze::Error>(())
    /// ```
    pub fn load_agent(&self, path: &Path) -> Result<QLearningAgent> {
        let agent = self.load_saved_agent(path)?.to_agent()?;
        Ok(match self.default_seed {
            Some(seed) => agent.with_seed(seed.wrapping_add(AGENT_SEED_OFFSET)),
            None => agent,
        })
    }

    /// Save an agent together with its training metadata.
    pub fn save_agent(
        &self,
        agent: &QLearningAgent,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        let saved = SavedAgent::from_agent(agent, metadata);
        self.agent_repository.save(&saved, path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    agent_repository: Option<Arc<dyn AgentRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            agent_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom agent repository.
    pub fn with_repository<R: AgentRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.agent_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for everything created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            agent_repository: self
                .agent_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
