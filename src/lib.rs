//! Tic-tac-toe with expiring pieces, played by tabular Q-learners
//!
//! This crate provides:
//! - A transition model where every piece ages each turn and is removed
//!   when it reaches its owner's lifespan
//! - Exact state featurization into hashable table keys
//! - Two independent tabular Q-learning agents trained through self-play
//! - A training pipeline with pluggable observers and greedy evaluation
//! - A flat-action environment adapter with dense observations

pub mod cli;
pub mod env;
pub mod error;
pub mod featurize;
pub mod game;
pub mod pipeline;
pub mod q_learning;
pub mod types;

pub use env::{GridEnv, Observation};
pub use error::{Error, Result};
pub use featurize::StateKey;
pub use game::{Board, Cell, EphemeralGame, Player, Snapshot};
pub use pipeline::{SelfPlayTrainer, TrainingConfig, TrainingResult};
pub use q_learning::{QLearner, QTable, SavedAgents, TrainingMetadata};
pub use types::{DEFAULT_GRID_SIZE, DEFAULT_LIFESPAN, Lifespans};
