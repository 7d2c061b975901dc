//! Core domain types for connect-four.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Number of rows on the board. Row 0 is the top.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// Number of same-owner stones in a line needed to win.
pub const WIN_LENGTH: usize = 4;

/// Participant placing stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Player {
    /// The human player (player one, moves first).
    Human,
    /// The computer opponent (player two).
    Computer,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Computer,
            Player::Computer => Player::Human,
        }
    }
}

/// A cell on the connect-four board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell holding a player's stone.
    Occupied(Player),
}

impl Cell {
    /// Wire code for this cell: `0` empty, `1` human, `2` computer.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(Player::Human) => 1,
            Cell::Occupied(Player::Computer) => 2,
        }
    }
}

/// Where a stone came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Row the stone landed in.
    pub row: usize,
    /// Column the stone was dropped into.
    pub column: usize,
    /// Owner of the stone.
    pub player: Player,
}

/// Error that can occur when dropping a stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Column index is outside the board.
    #[display("Column {} is out of range (must be 0-{})", _0, COLS - 1)]
    ColumnOutOfRange(i64),

    /// Column has no empty cell left.
    #[display("Column {} is already full", _0)]
    ColumnFull(usize),
}

impl std::error::Error for MoveError {}

/// 6x7 connect-four grid.
///
/// Stones obey gravity: within a column the occupied cells always form a
/// contiguous run ending at the bottom row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order, row 0 at the top.
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Gets the cell at the given coordinates, `None` when off the board.
    pub fn get(&self, row: usize, column: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Returns all rows, top first.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// True iff the column exists and its top cell is empty.
    #[instrument(skip(self))]
    pub fn is_valid_move(&self, column: usize) -> bool {
        matches!(self.get(0, column), Some(Cell::Empty))
    }

    /// Lists every column that can still take a stone, ascending.
    #[instrument(skip(self))]
    pub fn list_valid_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&c| self.is_valid_move(c)).collect()
    }

    /// True when no column can take another stone.
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|c| !self.is_valid_move(c))
    }

    /// Drops a stone into `column`, letting it fall to the lowest empty row.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] if the column is out of range or full. The board
    /// is left untouched in both cases.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, column: usize, player: Player) -> Result<Placement, MoveError> {
        if column >= COLS {
            return Err(MoveError::ColumnOutOfRange(column as i64));
        }

        let row = (0..ROWS)
            .rev()
            .find(|&r| self.cells[r][column] == Cell::Empty)
            .ok_or(MoveError::ColumnFull(column))?;

        self.cells[row][column] = Cell::Occupied(player);
        debug!(row, column, %player, "Stone placed");

        Ok(Placement {
            row,
            column,
            player,
        })
    }

    /// Renders the board as wire codes (`0`/`1`/`2`), row 0 first.
    pub fn to_grid(&self) -> [[u8; COLS]; ROWS] {
        self.cells.map(|row| row.map(Cell::code))
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in &self.cells {
            for cell in row {
                result.push(match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::Human) => 'X',
                    Cell::Occupied(Player::Computer) => 'O',
                });
            }
            result.push('\n');
        }
        result.push_str("0123456");
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
