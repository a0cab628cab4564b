//! Dense Q-table over grid positions

use serde::{Deserialize, Serialize};

use crate::maze::{Action, Position};

/// Q-table mapping (position, action) pairs to Q-values
///
/// Backed by a dense `size × size × 4` array, zero-initialised. Positions are
/// not bounds-checked: callers must pass coordinates inside the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Side of the grid the table covers
    grid_size: usize,
    /// Row-major action values, one entry per cell
    q_values: Vec<[f64; Action::COUNT]>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount rate γ
    discount_rate: f64,
}

impl QTable {
    /// Create a zeroed Q-table for a `grid_size × grid_size` grid
    pub fn new(grid_size: usize, learning_rate: f64, discount_rate: f64) -> Self {
        Self {
            grid_size,
            q_values: vec![[0.0; Action::COUNT]; grid_size * grid_size],
            learning_rate,
            discount_rate,
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: Position, action: Action) -> f64 {
        self.row(state)[action.index()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: Position, action: Action, value: f64) {
        let idx = self.idx(state);
        self.q_values[idx][action.index()] = value;
    }

    /// All four action values for a state, in ordinal order
    pub fn row(&self, state: Position) -> &[f64; Action::COUNT] {
        &self.q_values[self.idx(state)]
    }

    /// Maximum Q-value over all actions in a state
    pub fn max_q(&self, state: Position) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value); ties go to the lowest ordinal
    pub fn greedy_action(&self, state: Position) -> Action {
        let values = self.row(state);
        let mut best = 0;
        for (index, &value) in values.iter().enumerate().skip(1) {
            if value > values[best] {
                best = index;
            }
        }
        Action::ALL[best]
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn q_learning_update(
        &mut self,
        state: Position,
        action: Action,
        reward: f64,
        next_state: Position,
    ) {
        let current_q = self.get(state, action);
        let max_next_q = self.max_q(next_state);
        let td_target = reward + self.discount_rate * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
    }

    /// Whether the stored rows cover exactly `grid_size²` cells
    pub fn is_consistent(&self) -> bool {
        self.grid_size
            .checked_mul(self.grid_size)
            .is_some_and(|cells| cells == self.q_values.len())
    }

    /// Number of (state, action) entries holding a non-zero value
    pub fn visited_entries(&self) -> usize {
        self.q_values
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&value| value != 0.0)
            .count()
    }

    fn idx(&self, state: Position) -> usize {
        state.row * self.grid_size + state.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(5, 0.2, 0.9);
        for action in Action::ALL {
            assert_eq!(qtable.get(Position::new(2, 3), action), 0.0);
        }
        assert_eq!(qtable.visited_entries(), 0);
        assert!(qtable.is_consistent());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new(5, 0.2, 0.9);
        let state = Position::new(1, 4);
        qtable.set(state, Action::Down, 1.5);
        assert_eq!(qtable.get(state, Action::Down), 1.5);
        assert_eq!(qtable.get(Position::new(4, 1), Action::Down), 0.0);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new(5, 0.2, 0.9);
        let state = Position::new(0, 0);
        qtable.set(state, Action::Up, -0.5);
        qtable.set(state, Action::Left, 1.5);
        qtable.set(state, Action::Right, 0.8);
        qtable.set(state, Action::Down, -3.0);
        assert_eq!(qtable.max_q(state), 1.5);
    }

    #[test]
    fn test_greedy_action() {
        let mut qtable = QTable::new(5, 0.2, 0.9);
        let state = Position::new(3, 3);
        qtable.set(state, Action::Right, 2.0);
        qtable.set(state, Action::Down, 1.0);
        assert_eq!(qtable.greedy_action(state), Action::Right);
    }

    #[test]
    fn test_greedy_action_breaks_ties_by_lowest_ordinal() {
        let mut qtable = QTable::new(5, 0.2, 0.9);
        let state = Position::new(3, 3);
        assert_eq!(qtable.greedy_action(state), Action::Up);

        qtable.set(state, Action::Up, -1.0);
        qtable.set(state, Action::Right, 4.0);
        qtable.set(state, Action::Down, 4.0);
        assert_eq!(qtable.greedy_action(state), Action::Right);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(5, 0.5, 0.9);
        let state = Position::new(2, 2);
        let next_state = Position::new(1, 2);

        qtable.set(next_state, Action::Left, 1.0);
        qtable.set(next_state, Action::Up, 2.0);

        qtable.q_learning_update(state, Action::Up, -2.0, next_state);

        // Q(s,Up) = 0.0 + 0.5 * (-2.0 + 0.9 * 2.0 - 0.0) = -0.1
        let updated_q = qtable.get(state, Action::Up);
        assert!((updated_q + 0.1).abs() < 1e-9);
    }
}
