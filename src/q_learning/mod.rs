//! Tabular Q-learning: value table, per-player agent, and persistence.

pub mod agent;
pub mod q_table;
pub mod serialization;

pub use agent::QLearner;
pub use q_table::QTable;
pub use serialization::{SavedAgents, TrainingMetadata};
