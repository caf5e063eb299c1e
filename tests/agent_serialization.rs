//! Tests for saving and reloading trained agent pairs

use ephemeral_ttt::{
    EphemeralGame, Player, SavedAgents, TrainingConfig, TrainingMetadata,
    pipeline::{SelfPlayTrainer, play_game},
};
use tempfile::TempDir;

fn trained_pair() -> (
    TrainingConfig,
    EphemeralGame,
    ephemeral_ttt::QLearner,
    ephemeral_ttt::QLearner,
) {
    let config = TrainingConfig {
        episodes: 500,
        epsilon_decay: 0.99,
        seed: Some(13),
        ..TrainingConfig::default()
    };
    let mut game = config.build_game().expect("Failed to build game");
    let (mut agent_x, mut agent_o) = config.build_agents();
    SelfPlayTrainer::new(config.clone())
        .run(&mut game, &mut agent_x, &mut agent_o)
        .expect("Training failed");
    (config, game, agent_x, agent_o)
}

fn metadata_for(config: &TrainingConfig) -> TrainingMetadata {
    TrainingMetadata {
        episodes_trained: Some(config.episodes),
        grid_size: config.grid_size,
        lifespan_x: config.lifespans.x,
        lifespan_o: config.lifespans.o,
        seed: config.seed,
    }
}

#[test]
fn test_save_load_roundtrip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("agents.msgpack");

    let (config, _, agent_x, agent_o) = trained_pair();
    let saved = SavedAgents::from_agents(&agent_x, &agent_o, metadata_for(&config));
    saved.save_to_file(&file_path).expect("Failed to save");
    assert!(file_path.exists(), "Saved file should exist");

    let loaded = SavedAgents::load_from_file(&file_path).expect("Failed to load");
    assert_eq!(loaded.metadata.grid_size, 3);
    assert_eq!(loaded.metadata.episodes_trained, Some(500));
    assert_eq!(loaded.table_size(Player::X), agent_x.table_size());
    assert_eq!(loaded.table_size(Player::O), agent_o.table_size());
}

#[test]
fn test_reloaded_agents_play_identically() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("agents.msgpack");

    let (config, mut game, agent_x, agent_o) = trained_pair();
    SavedAgents::from_agents(&agent_x, &agent_o, metadata_for(&config))
        .save_to_file(&file_path)
        .expect("Failed to save");

    let loaded = SavedAgents::load_from_file(&file_path).expect("Failed to load");
    let (loaded_x, loaded_o) = loaded.to_agents().expect("Failed to rebuild agents");

    // Greedy play is a pure function of the tables, so the reloaded pair
    // must reproduce the original transcripts move for move.
    for starting in [Player::X, Player::O] {
        let original =
            play_game(&mut game, &agent_x, &agent_o, starting, 20).expect("Playback failed");
        let reloaded =
            play_game(&mut game, &loaded_x, &loaded_o, starting, 20).expect("Playback failed");

        assert_eq!(original.outcome, reloaded.outcome);
        assert_eq!(original.moves.len(), reloaded.moves.len());
        for (a, b) in original.moves.iter().zip(&reloaded.moves) {
            assert_eq!((a.row, a.col), (b.row, b.col));
            assert_eq!(a.player, b.player);
        }
    }
}

#[test]
fn test_lifespans_recovered_from_metadata() {
    let (config, _, agent_x, agent_o) = trained_pair();
    let saved = SavedAgents::from_agents(&agent_x, &agent_o, metadata_for(&config));
    let lifespans = saved.lifespans().expect("Valid lifespans");
    assert_eq!(lifespans, config.lifespans);
}
