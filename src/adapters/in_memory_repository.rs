//! In-memory agent repository for testing.
//!
//! This adapter keeps saved agents in memory, enabling fast tests without any
//! file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::AgentRepository, q_learning::SavedAgent};

/// In-memory repository for testing.
///
/// Agents are stored as MessagePack bytes keyed by path, so a save/load cycle
/// exercises the same encoding as the file adapter.
///
/// # Examples
///
/// ```
/// use qmaze::adapters::InMemoryRepository;
/// use qmaze::ports::AgentRepository;
/// use qmaze::q_learning::{QLearningAgent, SavedAgent, TrainingMetadata};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let agent = QLearningAgent::new(7, 0.2, 0.9, 0.3);
/// let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("agent"))?;
/// let loaded = repo.load(Path::new("agent"))?;
/// assert_eq!(loaded.grid_size(), 7);
/// # Ok::<(), qmaze::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of agents currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Check if an agent exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl AgentRepository for InMemoryRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(agent).map_err(|e| Error::SerializationContext {
            operation: "serialize agent for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let storage = self.storage();

        let bytes = storage.get(&key(path)).ok_or_else(|| Error::Io {
            operation: format!("load agent from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize agent from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        maze::{Action, Position},
        q_learning::{QLearningAgent, TrainingMetadata},
    };

    fn saved_agent() -> SavedAgent {
        let mut agent = QLearningAgent::new(5, 0.2, 0.9, 0.3);
        agent.update(Position::new(0, 1), Action::Left, 200.0, Position::new(0, 0));
        SavedAgent::from_agent(&agent, TrainingMetadata::default())
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let saved = saved_agent();
        let path = Path::new("test_agent");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&saved, path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        let loaded = repo.load(path).unwrap().to_agent().unwrap();
        assert_eq!(
            loaded.q_value(Position::new(0, 1), Action::Left),
            saved.to_agent().unwrap().q_value(Position::new(0, 1), Action::Left)
        );
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        let result = repo.load(Path::new("nonexistent"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();

        repo1.save(&saved_agent(), Path::new("shared")).unwrap();

        assert!(repo2.load(Path::new("shared")).is_ok());
        assert_eq!(repo2.count(), 1);
    }
}
