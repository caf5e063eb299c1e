//! Train command - Self-play training of the two tabular agents

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    pipeline::{
        EvaluationResult, JsonlObserver, ProgressObserver, SelfPlayTrainer, TrainingConfig,
        TrainingResult, evaluate,
    },
    q_learning::{SavedAgents, TrainingMetadata},
    types::Lifespans,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    config: TrainingConfig,
    training: TrainingResult,
    evaluation: Option<EvaluationResult>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train two agents through self-play")]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 100_000)]
    pub episodes: usize,

    /// Board edge length (N for an NxN grid)
    #[arg(long, default_value_t = 3)]
    pub grid_size: usize,

    /// Piece lifespan in turns for X
    #[arg(long, default_value_t = 6)]
    pub lifespan_x: u32,

    /// Piece lifespan in turns for O
    #[arg(long, default_value_t = 6)]
    pub lifespan_o: u32,

    /// Learning rate α (0.0-1.0)
    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 0.9)]
    pub discount: f64,

    /// Initial epsilon (exploration rate)
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// Epsilon decay per episode
    #[arg(long, default_value_t = 0.99995)]
    pub epsilon_decay: f64,

    /// Minimum epsilon
    #[arg(long, default_value_t = 0.0)]
    pub min_epsilon: f64,

    /// Step ceiling per episode
    #[arg(long, default_value_t = 20)]
    pub max_steps: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained agent pair
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true)]
    pub progress: bool,

    /// Number of post-training greedy evaluation games
    #[arg(long, short = 'v', default_value_t = 0)]
    pub eval_games: usize,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let lifespans = Lifespans::new(args.lifespan_x, args.lifespan_o)?;
    let config = TrainingConfig {
        episodes: args.episodes,
        grid_size: args.grid_size,
        lifespans,
        learning_rate: args.learning_rate,
        discount_factor: args.discount,
        epsilon: args.epsilon,
        epsilon_decay: args.epsilon_decay,
        min_epsilon: args.min_epsilon,
        max_steps: args.max_steps,
        seed: args.seed,
    };
    config.validate()?;

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    println!("=== Self-Play Training ===");
    println!("Grid: {0}x{0}, lifespans {1}", config.grid_size, lifespans);
    println!("Episodes: {}", config.episodes);
    println!(
        "α={}, γ={}, ε={} (decay {}, floor {})",
        config.learning_rate,
        config.discount_factor,
        config.epsilon,
        config.epsilon_decay,
        config.min_epsilon
    );
    if let Some(seed) = config.seed {
        println!("Seed: {seed}");
    }
    println!();

    let mut game = config.build_game()?;
    let (mut agent_x, mut agent_o) = config.build_agents();

    let mut trainer = SelfPlayTrainer::new(config.clone());
    if args.progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(ref path) = args.observations {
        trainer = trainer.with_observer(Box::new(JsonlObserver::new(path)?));
    }

    let result = trainer.run(&mut game, &mut agent_x, &mut agent_o)?;

    println!("\n=== Training Complete ===");
    println!("Episodes: {}", result.episodes);
    println!(
        "X wins: {} ({:.1}%)",
        result.x_wins,
        100.0 * result.x_wins as f64 / result.episodes as f64
    );
    println!(
        "O wins: {} ({:.1}%)",
        result.o_wins,
        100.0 * result.o_wins as f64 / result.episodes as f64
    );
    println!("Draws: {}", result.draws);
    println!("Step-limit cutoffs: {}", result.step_limit_hits);
    println!(
        "Avg reward: X {:.4}, O {:.4}",
        result.avg_reward_x(),
        result.avg_reward_o()
    );
    println!("Final epsilon: {:.5}", result.final_epsilon);
    println!(
        "Table sizes: X {} states-actions, O {} states-actions",
        result.x_table_size, result.o_table_size
    );

    let evaluation = if args.eval_games > 0 {
        let eval = evaluate(
            &mut game,
            &agent_x,
            &agent_o,
            args.eval_games,
            config.max_steps,
        )?;
        println!("\n=== Greedy Evaluation ===");
        println!("Games: {}", eval.games);
        println!(
            "X wins: {} ({:.1}%), O wins: {} ({:.1}%), draws: {}, cutoffs: {}",
            eval.x_wins,
            100.0 * eval.x_win_rate(),
            eval.o_wins,
            100.0 * eval.o_win_rate(),
            eval.draws,
            eval.step_limit_hits
        );
        println!("Avg game length: {:.1} moves", eval.avg_game_length());
        Some(eval)
    } else {
        None
    };

    if let Some(ref path) = args.output {
        let metadata = TrainingMetadata {
            episodes_trained: Some(config.episodes),
            grid_size: config.grid_size,
            lifespan_x: lifespans.x,
            lifespan_o: lifespans.o,
            seed: config.seed,
        };
        let saved = SavedAgents::from_agents(&agent_x, &agent_o, metadata);
        saved.save_to_file(path)?;
        println!("\nAgents saved to {}", path.display());
    }

    if let Some((path, normalized)) = summary_spec {
        if normalized {
            println!("Summary path normalized to {}", path.display());
        }
        let file = File::create(&path)
            .map_err(|e| anyhow!("Failed to create summary file {}: {e}", path.display()))?;
        to_writer_pretty(
            file,
            &TrainingSummaryFile {
                config,
                training: result,
                evaluation,
            },
        )?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path_adds_extension() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary")),
            PathBuf::from("out/summary.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary.txt")),
            PathBuf::from("out/summary.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary.json")),
            PathBuf::from("out/summary.json")
        );
    }

    #[test]
    fn test_sanitize_summary_path_directory_target() {
        let path = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&path)),
            PathBuf::from("out").join("training_summary.json")
        );
    }
}
