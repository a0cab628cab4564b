//! Serialization support for trained agents.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::agent::{AgentState, QLearningAgent},
};

/// Bookkeeping stored alongside a saved Q-table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Side of the mazes the agent was trained on
    pub grid_size: Option<usize>,
    /// Agent moves taken during training
    pub steps_trained: Option<usize>,
    /// Completed training episodes
    pub episodes_trained: Option<usize>,
    /// Episodes that ended on a danger cell
    pub deaths: Option<usize>,
    /// Episodes that ended on the reward cell
    pub successes: Option<usize>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    state: AgentState,
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            state: agent.export_state(),
            metadata,
        }
    }

    pub fn to_agent(&self) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let table = &self.state.q_table;
        if !table.is_consistent() {
            return Err(Error::SerializationContext {
                operation: "restore agent".to_string(),
                message: format!(
                    "Q-table rows do not match a {0}x{0} grid",
                    table.grid_size()
                ),
            });
        }

        Ok(QLearningAgent::from_state(self.state.clone()))
    }

    /// Grid side covered by the saved Q-table
    pub fn grid_size(&self) -> usize {
        self.state.q_table.grid_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Action, Position};

    #[test]
    fn test_msgpack_roundtrip_preserves_table() {
        let mut agent = QLearningAgent::new(6, 0.2, 0.9, 0.3).with_seed(7);
        agent.update(Position::new(5, 4), Action::Right, 200.0, Position::new(5, 5));
        agent.update(Position::new(4, 5), Action::Up, -20.0, Position::new(3, 5));

        let metadata = TrainingMetadata {
            grid_size: Some(6),
            steps_trained: Some(42),
            ..TrainingMetadata::default()
        };
        let saved = SavedAgent::from_agent(&agent, metadata.clone());
        let bytes = rmp_serde::to_vec(&saved).unwrap();
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes).unwrap();

        assert_eq!(loaded.metadata, metadata);
        assert_eq!(loaded.grid_size(), 6);
        let restored = loaded.to_agent().unwrap();
        assert_eq!(restored.q_table(), agent.q_table());
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let agent = QLearningAgent::new(5, 0.2, 0.9, 0.3);
        let mut saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        saved.version = 99;

        assert!(matches!(
            saved.to_agent(),
            Err(Error::UnsupportedVersion {
                found: 99,
                expected: 1
            })
        ));
    }

    #[test]
    fn test_table_with_wrong_row_count_is_rejected() {
        let agent = QLearningAgent::new(5, 0.2, 0.9, 0.3);
        let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());

        let mut value = serde_json::to_value(&saved).unwrap();
        value["state"]["q_table"]["grid_size"] = serde_json::json!(7);
        let corrupted: SavedAgent = serde_json::from_value(value).unwrap();

        assert!(matches!(
            corrupted.to_agent(),
            Err(Error::SerializationContext { .. })
        ));
    }
}
