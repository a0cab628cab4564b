//! Repository port for agent persistence.
//!
//! This module defines the trait boundary between the domain and
//! infrastructure layers for storing and retrieving trained agents.

use std::path::Path;

use crate::{Result, q_learning::SavedAgent};

/// Port for persisting and loading trained agents.
///
/// # Examples
///
/// ```no_run
/// use qmaze::ports::AgentRepository;
/// use qmaze::q_learning::SavedAgent;
/// use std::path::Path;
///
/// fn save_agent<R: AgentRepository>(
///     repo: &R,
///     agent: &SavedAgent,
///     path: &Path,
/// ) -> qmaze::Result<()> {
///     repo.save(agent, path)
/// }
/// ```
pub trait AgentRepository {
    /// Save an agent to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization
    /// fails.
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()>;

    /// Load an agent from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or does
    /// not decode as a saved agent.
    fn load(&self, path: &Path) -> Result<SavedAgent>;
}
