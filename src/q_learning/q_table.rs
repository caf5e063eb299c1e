//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::featurize::StateKey;

/// Q-table mapping (state, action) pairs to value estimates.
///
/// Materialized lazily: an unseen pair reads as 0.0 without being inserted,
/// so no state needs pre-registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values: (state_key, action_index) -> estimate
    q_values: HashMap<(StateKey, usize), f64>,
    /// Action-space size (grid cell count)
    n_actions: usize,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new Q-table over a fixed action space.
    pub fn new(n_actions: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            n_actions,
            learning_rate,
            discount_factor,
        }
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Get the estimate for a state-action pair (0.0 when unseen).
    pub fn get(&self, state: &StateKey, action: usize) -> f64 {
        self.q_values
            .get(&(state.clone(), action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set the estimate for a state-action pair.
    pub fn set(&mut self, state: StateKey, action: usize, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Maximum estimate over every indexable action for a state.
    ///
    /// Deliberately not masked to the legal actions: the bootstrap target
    /// ranges over the full action space.
    pub fn max_q(&self, state: &StateKey) -> f64 {
        (0..self.n_actions)
            .map(|action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Highest-valued legal action, ties broken by the first-encountered
    /// action under the fixed enumeration order.
    ///
    /// Callers guarantee `legal_actions` is non-empty.
    pub fn greedy_action(&self, state: &StateKey, legal_actions: &[usize]) -> usize {
        let mut best = legal_actions[0];
        let mut best_q = self.get(state, best);
        for &action in &legal_actions[1..] {
            let q = self.get(state, action);
            if q > best_q {
                best = action;
                best_q = q;
            }
        }
        best
    }

    /// One-step Q-learning update:
    ///
    /// `Q(s,a) ← (1−α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))`
    pub fn update(&mut self, state: StateKey, action: usize, reward: f64, next_state: &StateKey) {
        let current_q = self.get(&state, action);
        let best_next_q = self.max_q(next_state);
        let new_q = (1.0 - self.learning_rate) * current_q
            + self.learning_rate * (reward + self.discount_factor * best_next_q);
        self.set(state, action, new_q);
    }

    /// Number of stored estimates.
    pub fn size(&self) -> usize {
        self.q_values.len()
    }
}
