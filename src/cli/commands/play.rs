//! Play command - Replay greedy games between saved agents

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    game::{EphemeralGame, Player},
    pipeline::{EpisodeOutcome, play_game},
    q_learning::SavedAgents,
};

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" => Ok(Player::X),
        "o" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Replay greedy games between saved agents")]
pub struct PlayArgs {
    /// Saved agent pair produced by `train --output`
    pub agents: PathBuf,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Starting player (`x` or `o`); alternates when omitted
    #[arg(long)]
    pub starting_player: Option<String>,

    /// Step ceiling per game
    #[arg(long, default_value_t = 20)]
    pub max_steps: usize,

    /// Print the board after every move
    #[arg(long, default_value_t = true)]
    pub show_boards: bool,
}

fn outcome_line(outcome: EpisodeOutcome) -> String {
    match outcome {
        EpisodeOutcome::Win(player) => format!("{player} wins"),
        EpisodeOutcome::Draw => "draw".to_string(),
        EpisodeOutcome::StepLimit => "step limit reached".to_string(),
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let saved = SavedAgents::load_from_file(&args.agents)?;
    let lifespans = saved.lifespans()?;
    let (agent_x, agent_o) = saved.to_agents()?;

    println!(
        "Loaded agents from {} ({} episodes trained)",
        args.agents.display(),
        saved
            .metadata
            .episodes_trained
            .map_or_else(|| "unknown".to_string(), |n| n.to_string())
    );
    println!(
        "Grid: {0}x{0}, lifespans {1}",
        saved.metadata.grid_size, lifespans
    );
    println!(
        "Table sizes: X {}, O {}",
        saved.table_size(Player::X),
        saved.table_size(Player::O)
    );

    let forced_start = args
        .starting_player
        .as_deref()
        .map(|token| parse_player_token(token, "--starting-player"))
        .transpose()?;

    let mut game = EphemeralGame::new(saved.metadata.grid_size, lifespans)?;
    let mut x_wins = 0;
    let mut o_wins = 0;
    let mut draws = 0;
    let mut cutoffs = 0;

    for index in 0..args.games {
        let starting = forced_start.unwrap_or(if index % 2 == 0 { Player::X } else { Player::O });
        let transcript = play_game(&mut game, &agent_x, &agent_o, starting, args.max_steps)?;

        println!("\n=== Game {} ({starting} starts) ===", index + 1);
        for (turn, record) in transcript.moves.iter().enumerate() {
            println!(
                "Move {}: {} -> ({}, {}){}",
                turn + 1,
                record.player,
                record.row,
                record.col,
                if record.reward != 0.0 {
                    format!(" [reward {}]", record.reward)
                } else {
                    String::new()
                }
            );
            if args.show_boards {
                println!("{}", transcript.snapshots[turn]);
            }
        }
        println!("Result: {}", outcome_line(transcript.outcome));

        match transcript.outcome {
            EpisodeOutcome::Win(Player::X) => x_wins += 1,
            EpisodeOutcome::Win(Player::O) => o_wins += 1,
            EpisodeOutcome::Draw => draws += 1,
            EpisodeOutcome::StepLimit => cutoffs += 1,
        }
    }

    if args.games > 1 {
        println!("\n=== Totals ===");
        println!("X wins: {x_wins}, O wins: {o_wins}, draws: {draws}, cutoffs: {cutoffs}");
    }

    Ok(())
}
