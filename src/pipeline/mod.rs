//! Self-play training pipeline: episode loop, observers, and evaluation.

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{EvaluationResult, GameTranscript, MoveRecord, evaluate, play_game};
pub use observers::{
    EpisodeOutcome, EpisodeSummary, JsonlObserver, MetricsObserver, Observer, ProgressObserver,
};
pub use training::{SelfPlayTrainer, TrainingConfig, TrainingResult};
