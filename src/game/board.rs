//! Board representation with per-cell ages and owners.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Lifespans;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Mutable board state: occupancy, per-cell age, per-cell owner, and turn.
///
/// `owners` mirrors `cells` by construction: a cell is owned iff it is
/// occupied, and the owner matches the displayed piece. The two are tracked
/// separately so placement and expiration reason about ownership without
/// going through the display symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid_size: usize,
    pub(crate) cells: Vec<Cell>,
    pub(crate) ages: Vec<u32>,
    pub(crate) owners: Vec<Option<Player>>,
    pub(crate) to_move: Player,
    pub(crate) move_count: usize,
}

impl Board {
    /// Create an empty board with the given starting player.
    pub fn new(grid_size: usize, starting_player: Player) -> Self {
        let n = grid_size * grid_size;
        Board {
            grid_size,
            cells: vec![Cell::Empty; n],
            ages: vec![0; n],
            owners: vec![None; n],
            to_move: starting_player,
            move_count: 0,
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Total number of cells (the action-space size).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Row-major index of a coordinate. Callers validate bounds first.
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.grid_size + col
    }

    /// Coordinate of a row-major index.
    pub fn coord_of(&self, index: usize) -> (usize, usize) {
        (index / self.grid_size, index % self.grid_size)
    }

    pub fn is_empty(&self, index: usize) -> bool {
        self.cells[index] == Cell::Empty
    }

    /// Indices of all empty cells, in row-major order.
    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Whether the piece at `index` would still be on the board after one
    /// more aging tick. Empty cells trivially do not survive.
    pub fn survives_aging(&self, index: usize, lifespans: &Lifespans) -> bool {
        match self.owners[index] {
            Some(owner) => self.ages[index] + 1 < lifespans.for_player(owner),
            None => false,
        }
    }

    /// Aging phase: every occupied cell's age increases by one.
    pub(crate) fn age_pieces(&mut self) {
        for (i, cell) in self.cells.iter().enumerate() {
            if *cell != Cell::Empty {
                self.ages[i] += 1;
            }
        }
    }

    /// Expiration phase: clear every cell whose age reached its owner's
    /// lifespan. Applied for all qualifying cells at once, before placement.
    pub(crate) fn expire_pieces(&mut self, lifespans: &Lifespans) {
        for i in 0..self.cells.len() {
            if let Some(owner) = self.owners[i]
                && self.ages[i] >= lifespans.for_player(owner)
            {
                self.cells[i] = Cell::Empty;
                self.ages[i] = 0;
                self.owners[i] = None;
            }
        }
    }

    /// Placement phase: set the cell to the player's piece with age zero.
    pub(crate) fn place(&mut self, index: usize, player: Player) {
        self.cells[index] = player.to_cell();
        self.ages[index] = 0;
        self.owners[index] = Some(player);
    }

    /// Immutable snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.grid_size,
            cells: self.cells.clone(),
            ages: self.ages.clone(),
            owners: self.owners.clone(),
            to_move: self.to_move,
            move_count: self.move_count,
        }
    }
}

/// Read-only view of a board state, as returned by the transition model.
///
/// Snapshots compare by value, so "no mutation occurred" is testable as
/// exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid_size: usize,
    pub cells: Vec<Cell>,
    pub ages: Vec<u32>,
    pub owners: Vec<Option<Player>>,
    pub to_move: Player,
    pub move_count: usize,
}

impl Snapshot {
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.grid_size {
            for col in 0..self.grid_size {
                write!(f, "{}", self.cells[row * self.grid_size + col].to_char())?;
            }
            if row + 1 < self.grid_size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
