//! Shared domain types and default constants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Player;

/// Per-player piece lifespans, in turns.
///
/// A piece whose age reaches its owner's lifespan is removed from the board
/// during the aging phase of the turn. Asymmetric values are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifespans {
    pub x: u32,
    pub o: u32,
}

impl Lifespans {
    /// Create a lifespan pair, validating both values are positive.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if either lifespan is zero.
    pub fn new(x: u32, o: u32) -> Result<Self, crate::Error> {
        if x == 0 || o == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("lifespans must be positive (got X={x}, O={o})"),
            });
        }
        Ok(Lifespans { x, o })
    }

    /// Create equal lifespans for both players.
    pub fn symmetric(turns: u32) -> Result<Self, crate::Error> {
        Self::new(turns, turns)
    }

    /// Lifespan of the given player's pieces.
    pub fn for_player(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }
}

impl Default for Lifespans {
    fn default() -> Self {
        Lifespans {
            x: DEFAULT_LIFESPAN,
            o: DEFAULT_LIFESPAN,
        }
    }
}

impl fmt::Display for Lifespans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X={}, O={}", self.x, self.o)
    }
}

/// Default grid edge length.
pub const DEFAULT_GRID_SIZE: usize = 3;

/// Default piece lifespan in turns.
pub const DEFAULT_LIFESPAN: u32 = 6;

/// Step rewards returned by the transition model.
pub mod reward {
    /// Reward for completing a line.
    pub const WIN: f64 = 1.0;

    /// Penalty for probing an occupied cell.
    pub const ILLEGAL_MOVE: f64 = -0.1;

    /// Reward for any other transition, including stalemate.
    pub const NEUTRAL: f64 = 0.0;
}
