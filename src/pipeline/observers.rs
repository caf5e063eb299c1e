//! Observer pattern for the training loop
//!
//! Observers allow composable reporting during self-play without coupling
//! the episode loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{Result, game::Player};

/// Final outcome of a single self-play episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    /// A player completed a line.
    Win(Player),
    /// The player to move had no empty cell.
    Draw,
    /// The step ceiling cut the episode off.
    StepLimit,
}

/// Per-episode record handed to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    pub starting_player: Player,
    pub steps: usize,
    pub reward_x: f64,
    pub reward_o: f64,
    pub epsilon: f64,
}

/// Hook points around the training loop. All methods default to no-ops so
/// observers implement only what they need.
pub trait Observer {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    fn tally_message(&self) -> String {
        format!("{} O:{} D:{}", self.x_wins, self.o_wins, self.draws)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (X:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            EpisodeOutcome::Win(Player::X) => self.x_wins += 1,
            EpisodeOutcome::Win(Player::O) => self.o_wins += 1,
            EpisodeOutcome::Draw | EpisodeOutcome::StepLimit => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.tally_message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally_message());
        }
        Ok(())
    }
}

/// Metrics observer - Accumulates outcome counts and episode lengths
pub struct MetricsObserver {
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    step_limit_hits: usize,
    episodes: usize,
    step_counts: Vec<usize>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            step_limit_hits: 0,
            episodes: 0,
            step_counts: Vec::new(),
        }
    }

    pub fn avg_episode_length(&self) -> f64 {
        if self.step_counts.is_empty() {
            0.0
        } else {
            self.step_counts.iter().sum::<usize>() as f64 / self.step_counts.len() as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
            step_limit_hits: self.step_limit_hits,
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulated training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub step_limit_hits: usize,
    pub avg_episode_length: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        self.step_counts.push(summary.steps);
        match summary.outcome {
            EpisodeOutcome::Win(Player::X) => self.x_wins += 1,
            EpisodeOutcome::Win(Player::O) => self.o_wins += 1,
            EpisodeOutcome::Draw => self.draws += 1,
            EpisodeOutcome::StepLimit => self.step_limit_hits += 1,
        }
        Ok(())
    }
}

/// JSONL observer - Writes one episode summary per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        serde_json::to_writer(&mut self.writer, summary)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
