//! Tabular Q-learning agent with ε-greedy action selection.
//!
//! Each player owns one agent; the two tables never share entries and each
//! is updated only by its owner's experienced transitions. Exploration decay
//! is owned by the training loop, not the agent.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    featurize::StateKey,
    q_learning::q_table::QTable,
};

/// Serializable agent state (table plus RNG seed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentState {
    pub q_table: QTable,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// One player's tabular Q-learner.
#[derive(Debug, Clone)]
pub struct QLearner {
    q_table: QTable,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearner {
    /// Create an agent over a fixed action space.
    ///
    /// # Arguments
    ///
    /// * `n_actions` - Grid cell count
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    pub fn new(n_actions: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_table: QTable::new(n_actions, learning_rate, discount_factor),
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Seed the exploration RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// ε-greedy action selection over the legal actions.
    ///
    /// With probability `epsilon` a uniformly random legal action is chosen;
    /// otherwise the greedy action with deterministic first-encountered
    /// tie-breaking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] when called with an empty legal set;
    /// the training loop is expected to treat that state as terminal instead.
    pub fn select_action(
        &mut self,
        state: &StateKey,
        legal_actions: &[usize],
        epsilon: f64,
    ) -> Result<usize> {
        if legal_actions.is_empty() {
            return Err(Error::NoLegalActions);
        }
        if self.rng.random::<f64>() < epsilon {
            // Explore: random legal action
            legal_actions
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoLegalActions)
        } else {
            Ok(self.q_table.greedy_action(state, legal_actions))
        }
    }

    /// Greedy action without exploration (used for evaluation playback).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] when the legal set is empty.
    pub fn greedy_action(&self, state: &StateKey, legal_actions: &[usize]) -> Result<usize> {
        if legal_actions.is_empty() {
            return Err(Error::NoLegalActions);
        }
        Ok(self.q_table.greedy_action(state, legal_actions))
    }

    /// Apply the one-step temporal-difference update for an experienced
    /// transition.
    pub fn update(&mut self, state: StateKey, action: usize, reward: f64, next_state: &StateKey) {
        self.q_table.update(state, action, reward, next_state);
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Number of stored estimates.
    pub fn table_size(&self) -> usize {
        self.q_table.size()
    }

    pub(crate) fn export_state(&self) -> AgentState {
        AgentState {
            q_table: self.q_table.clone(),
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: AgentState) -> Self {
        Self {
            q_table: state.q_table,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::raw(s)
    }

    #[test]
    fn test_select_action_rejects_empty_legal_set() {
        let mut agent = QLearner::new(9, 0.1, 0.9);
        assert!(matches!(
            agent.select_action(&key("s"), &[], 0.5),
            Err(Error::NoLegalActions)
        ));
    }

    #[test]
    fn test_zero_epsilon_is_greedy_and_deterministic() {
        let mut agent = QLearner::new(9, 0.1, 0.9);
        agent.q_table.set(key("s"), 5, 2.0);
        for _ in 0..10 {
            assert_eq!(agent.select_action(&key("s"), &[1, 5, 7], 0.0).unwrap(), 5);
        }
    }

    #[test]
    fn test_full_epsilon_stays_legal() {
        let mut agent = QLearner::new(9, 0.1, 0.9).with_seed(3);
        let legal = [2, 4, 6];
        for _ in 0..50 {
            let action = agent.select_action(&key("s"), &legal, 1.0).unwrap();
            assert!(legal.contains(&action));
        }
    }

    #[test]
    fn test_seeded_exploration_is_reproducible() {
        let legal = [0, 1, 2, 3, 4, 5, 6, 7, 8];
        let mut a = QLearner::new(9, 0.1, 0.9).with_seed(42);
        let mut b = QLearner::new(9, 0.1, 0.9).with_seed(42);
        for _ in 0..100 {
            assert_eq!(
                a.select_action(&key("s"), &legal, 0.7).unwrap(),
                b.select_action(&key("s"), &legal, 0.7).unwrap()
            );
        }
    }

    #[test]
    fn test_update_feeds_table() {
        let mut agent = QLearner::new(9, 0.5, 0.9);
        agent.update(key("s0"), 3, 1.0, &key("s1"));
        // Q = 0.5*0 + 0.5*(1 + 0.9*0) = 0.5
        assert!((agent.q_table().get(&key("s0"), 3) - 0.5).abs() < 1e-12);
        assert_eq!(agent.table_size(), 1);
    }

    #[test]
    fn test_export_import_preserves_table() {
        let mut agent = QLearner::new(9, 0.5, 0.9).with_seed(7);
        agent.update(key("s0"), 3, 1.0, &key("s1"));
        let restored = QLearner::from_state(agent.export_state());
        assert_eq!(restored.table_size(), agent.table_size());
        assert_eq!(
            restored.q_table().get(&key("s0"), 3),
            agent.q_table().get(&key("s0"), 3)
        );
    }
}
