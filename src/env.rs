//! Flat-action environment adapter over the transition model.
//!
//! Exposes the game through integer actions in `0..N*N` and dense numeric
//! observations, the shape expected by function-approximation agents. The
//! tabular pipeline does not go through this layer.

use crate::{
    error::{Error, Result},
    game::{Cell, EphemeralGame, Player, Snapshot},
    types::Lifespans,
};

/// Dense observation: three channels per cell, channel-last, row-major.
///
/// Channel 0 is occupancy (X = +1, O = -1, empty = 0), channel 1 the raw
/// age in turns, channel 2 the owner with the same sign convention.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    grid_size: usize,
    values: Vec<f32>,
}

impl Observation {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        let grid_size = snapshot.grid_size;
        let mut values = vec![0.0; grid_size * grid_size * 3];
        for (index, cell) in snapshot.cells.iter().enumerate() {
            let base = index * 3;
            values[base] = match cell {
                Cell::X => 1.0,
                Cell::O => -1.0,
                Cell::Empty => 0.0,
            };
            values[base + 1] = snapshot.ages[index] as f32;
            values[base + 2] = match snapshot.owners[index] {
                Some(Player::X) => 1.0,
                Some(Player::O) => -1.0,
                None => 0.0,
            };
        }
        Observation { grid_size, values }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Channel value at a cell (`channel` in `0..3`).
    pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.values[(row * self.grid_size + col) * 3 + channel]
    }

    /// The flat channel-last buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// Environment over flat action indices.
pub struct GridEnv {
    game: EphemeralGame,
    n_actions: usize,
}

impl GridEnv {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an invalid grid size.
    pub fn new(grid_size: usize, lifespans: Lifespans) -> Result<Self> {
        let game = EphemeralGame::new(grid_size, lifespans)?;
        let n_actions = game.n_actions();
        Ok(GridEnv { game, n_actions })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game = self.game.with_seed(seed);
        self
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    pub fn current_player(&self) -> Player {
        self.game.current_player()
    }

    /// Reset to an empty board with a randomly drawn starting player.
    pub fn reset(&mut self) -> Observation {
        let snapshot = self.game.reset(None);
        Observation::from_snapshot(&snapshot)
    }

    /// Apply one flat action for the current player.
    ///
    /// Probing an occupied surviving cell is a penalized no-op, as in the
    /// underlying model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionIndexOutOfRange`] for `action >= N*N`; an
    /// out-of-range index is a caller defect, not an in-game event.
    pub fn step(&mut self, action: usize) -> Result<(Observation, f64, bool)> {
        if action >= self.n_actions {
            return Err(Error::ActionIndexOutOfRange {
                index: action,
                n_actions: self.n_actions,
            });
        }
        let coord = self.game.coord_of(action);
        let (snapshot, step_reward, done) = self.game.step(coord)?;
        Ok((Observation::from_snapshot(&snapshot), step_reward, done))
    }

    /// Currently legal flat actions, in row-major order.
    pub fn legal_actions(&self) -> Vec<usize> {
        self.game.legal_action_indices()
    }

    /// Borrow the underlying transition model.
    pub fn game(&self) -> &EphemeralGame {
        &self.game
    }
}
