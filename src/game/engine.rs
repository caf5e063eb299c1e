//! Transition model for tic-tac-toe with expiring pieces.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{Board, LineScanner, Player, Snapshot};
use crate::{
    error::{Error, Result},
    types::{Lifespans, reward},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// The ephemeral-board transition model.
///
/// Owns the mutable [`Board`] and implements the per-turn dynamics: aging,
/// expiration, placement, win and stalemate detection. The board is replaced
/// wholesale on every [`reset`](EphemeralGame::reset); callers only ever see
/// immutable [`Snapshot`]s.
#[derive(Debug)]
pub struct EphemeralGame {
    grid_size: usize,
    lifespans: Lifespans,
    board: Board,
    rng: StdRng,
}

impl EphemeralGame {
    /// Create a game over an N x N grid with the given lifespans.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the grid is smaller than 2x2.
    pub fn new(grid_size: usize, lifespans: Lifespans) -> Result<Self> {
        if grid_size < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid size must be at least 2 (got {grid_size})"),
            });
        }
        Ok(EphemeralGame {
            grid_size,
            lifespans,
            board: Board::new(grid_size, Player::X),
            rng: build_rng(None),
        })
    }

    /// Seed the RNG used for random starting-player draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn lifespans(&self) -> Lifespans {
        self.lifespans
    }

    /// Number of distinct actions (cells).
    pub fn n_actions(&self) -> usize {
        self.board.cell_count()
    }

    /// The player to move in the current state.
    pub fn current_player(&self) -> Player {
        self.board.to_move
    }

    /// Row-major cell index of a coordinate.
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        self.board.index_of(row, col)
    }

    /// Coordinate of a row-major cell index.
    pub fn coord_of(&self, index: usize) -> (usize, usize) {
        self.board.coord_of(index)
    }

    /// Reinitialize to an all-empty board with zero ages and move count.
    ///
    /// When no starting player is given, one is drawn uniformly from the
    /// game's seedable RNG.
    pub fn reset(&mut self, starting_player: Option<Player>) -> Snapshot {
        let starting = starting_player.unwrap_or_else(|| {
            if self.rng.random::<bool>() {
                Player::X
            } else {
                Player::O
            }
        });
        self.board = Board::new(self.grid_size, starting);
        self.board.snapshot()
    }

    /// Apply one move attempt for the current player.
    ///
    /// Returns `(snapshot, reward, done)`. Probing an occupied cell whose
    /// piece survives this turn's aging is a penalized no-op: the state is
    /// unchanged, no aging occurs, and the turn does not pass. A cell whose
    /// occupant expires this very turn accepts the move, because expiration
    /// is applied before placement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] for a coordinate off the grid; that is
    /// a caller defect, not a game event.
    pub fn step(&mut self, coord: (usize, usize)) -> Result<(Snapshot, f64, bool)> {
        let (row, col) = coord;
        if row >= self.grid_size || col >= self.grid_size {
            return Err(Error::OutOfBounds {
                row,
                col,
                grid_size: self.grid_size,
            });
        }

        let index = self.board.index_of(row, col);
        if !self.board.is_empty(index) && self.board.survives_aging(index, &self.lifespans) {
            return Ok((self.board.snapshot(), reward::ILLEGAL_MOVE, false));
        }

        self.board.move_count += 1;
        self.board.age_pieces();
        self.board.expire_pieces(&self.lifespans);

        let mover = self.board.to_move;
        self.board.place(index, mover);

        if self.check_win(mover) {
            // The mover stays current in the terminal snapshot
            return Ok((self.board.snapshot(), reward::WIN, true));
        }

        self.board.to_move = mover.opponent();

        if self.board.empty_indices().is_empty() {
            return Ok((self.board.snapshot(), reward::NEUTRAL, true));
        }

        Ok((self.board.snapshot(), reward::NEUTRAL, false))
    }

    /// All currently empty cells as coordinates, in row-major order.
    ///
    /// Membership can change between consecutive snapshots purely through
    /// aging and expiration: a cell may become legal again without any
    /// player choosing to vacate it.
    pub fn legal_actions(&self) -> Vec<(usize, usize)> {
        self.board
            .empty_indices()
            .into_iter()
            .map(|idx| self.board.coord_of(idx))
            .collect()
    }

    /// All currently empty cells as row-major indices.
    pub fn legal_action_indices(&self) -> Vec<usize> {
        self.board.empty_indices()
    }

    /// Pure win predicate over the current grid.
    pub fn check_win(&self, player: Player) -> bool {
        LineScanner::has_won(&self.board.cells, self.grid_size, player)
    }

    /// Snapshot of the current state without stepping.
    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }
}
