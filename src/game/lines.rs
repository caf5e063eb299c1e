//! Winning line analysis for the N x N grid.

use super::{Cell, Player};

/// Utility for scanning the 2N + 2 winning lines of an N x N board.
pub struct LineScanner;

impl LineScanner {
    /// Check if a player holds a full row, column, or diagonal.
    ///
    /// A line counts only when every cell in it is occupied by the player;
    /// an empty (possibly just-expired) cell breaks the line.
    pub fn has_won(cells: &[Cell], grid_size: usize, player: Player) -> bool {
        let target = player.to_cell();
        Self::line_indices(grid_size).any(|line| line.into_iter().all(|idx| cells[idx] == target))
    }

    /// Iterate over every winning line as row-major cell indices:
    /// N rows, then N columns, then the two diagonals.
    pub fn line_indices(grid_size: usize) -> impl Iterator<Item = Vec<usize>> {
        let n = grid_size;
        let rows = (0..n).map(move |r| (0..n).map(|c| r * n + c).collect::<Vec<_>>());
        let cols = (0..n).map(move |c| (0..n).map(|r| r * n + c).collect::<Vec<_>>());
        let main_diag = (0..n).map(|i| i * n + i).collect::<Vec<_>>();
        let anti_diag = (0..n).map(|i| i * n + (n - 1 - i)).collect::<Vec<_>>();
        rows.chain(cols).chain([main_diag, anti_diag])
    }
}
