//! ε-greedy Q-learning agent
//!
//! The agent owns its Q-table and a seedable random source used for the
//! exploration roll.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    maze::{Action, Position},
    q_learning::q_table::QTable,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentState {
    pub q_table: QTable,
    pub exploration_rate: f64,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns Q* by updating toward the maximum next-state value. The learning
/// and discount rates live in the Q-table; the exploration rate is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    exploration_rate: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `grid_size` - Side of the grids the agent will walk
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_rate` - γ parameter (0.0 to 1.0)
    /// * `exploration_rate` - ε, probability of a uniformly random action
    pub fn new(
        grid_size: usize,
        learning_rate: f64,
        discount_rate: f64,
        exploration_rate: f64,
    ) -> Self {
        Self {
            q_table: QTable::new(grid_size, learning_rate, discount_rate),
            exploration_rate,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    /// Copy of this agent sharing its learned values but exploring with a
    /// different rate. `0.0` yields a purely greedy policy.
    pub fn with_exploration_rate(mut self, exploration_rate: f64) -> Self {
        self.exploration_rate = exploration_rate;
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// ε-greedy action selection
    pub fn select_action(&mut self, state: Position) -> Action {
        if self.rng.random::<f64>() < self.exploration_rate {
            // Explore: uniformly random action
            Action::ALL[self.rng.random_range(0..Action::COUNT)]
        } else {
            // Exploit: greedy action based on Q-values
            self.best_action(state)
        }
    }

    /// Greedy action with no exploration roll
    pub fn best_action(&self, state: Position) -> Action {
        self.q_table.greedy_action(state)
    }

    /// Apply one Q-learning update for the transition `state --action--> next_state`
    pub fn update(&mut self, state: Position, action: Action, reward: f64, next_state: Position) {
        self.q_table.q_learning_update(state, action, reward, next_state);
    }

    pub fn q_value(&self, state: Position, action: Action) -> f64 {
        self.q_table.get(state, action)
    }

    pub fn max_q(&self, state: Position) -> f64 {
        self.q_table.max_q(state)
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn grid_size(&self) -> usize {
        self.q_table.grid_size()
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub(crate) fn export_state(&self) -> AgentState {
        AgentState {
            q_table: self.q_table.clone(),
            exploration_rate: self.exploration_rate,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: AgentState) -> Self {
        Self {
            q_table: state.q_table,
            exploration_rate: state.exploration_rate,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_agent_matches_best_action() {
        let mut agent = QLearningAgent::new(5, 0.2, 0.9, 0.0).with_seed(3);
        let state = Position::new(2, 2);
        agent.update(state, Action::Down, 10.0, Position::new(3, 2));

        for _ in 0..50 {
            assert_eq!(agent.select_action(state), Action::Down);
        }
        assert_eq!(agent.best_action(state), Action::Down);
    }

    #[test]
    fn test_seeded_agents_explore_identically() {
        let mut a = QLearningAgent::new(6, 0.2, 0.9, 0.5).with_seed(21);
        let mut b = QLearningAgent::new(6, 0.2, 0.9, 0.5).with_seed(21);
        let state = Position::new(1, 1);

        let first: Vec<Action> = (0..100).map(|_| a.select_action(state)).collect();
        let second: Vec<Action> = (0..100).map(|_| b.select_action(state)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_state_roundtrip_keeps_values() {
        let mut agent = QLearningAgent::new(5, 0.2, 0.9, 0.3).with_seed(5);
        agent.update(Position::new(0, 1), Action::Left, 200.0, Position::new(0, 0));

        let restored = QLearningAgent::from_state(agent.export_state());
        assert_eq!(restored.q_table(), agent.q_table());
        assert_eq!(restored.exploration_rate(), 0.3);
        assert_eq!(restored.rng_seed(), Some(5));
    }
}
