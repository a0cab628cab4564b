//! MessagePack implementation of the agent repository.
//!
//! This adapter implements the AgentRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::AgentRepository, q_learning::SavedAgent};

/// MessagePack-based agent repository.
///
/// # Examples
///
/// ```no_run
/// use qmaze::adapters::MsgPackRepository;
/// use qmaze::ports::AgentRepository;
/// use qmaze::q_learning::{QLearningAgent, SavedAgent, TrainingMetadata};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let agent = QLearningAgent::new(7, 0.2, 0.9, 0.3);
/// let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("trained.msgpack"))?;
/// let loaded = repo.load(Path::new("trained.msgpack"))?;
/// # Ok::<(), qmaze::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl AgentRepository for MsgPackRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, agent).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize agent to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        writer.flush().map_err(|source| Error::Io {
            operation: format!("write file {path:?}"),
            source,
        })
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize agent from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }
}
