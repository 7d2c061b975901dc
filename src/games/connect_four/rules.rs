//! Win detection for connect-four.
//!
//! Rules are pure functions over a [`Board`], kept apart from board storage.

use super::types::{Board, COLS, Cell, Placement, Player, ROWS, WIN_LENGTH};
use tracing::instrument;

/// Line orientations as (row step, column step): horizontal, vertical and
/// both diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Checks whether the stone at `placement` completes four in a row.
///
/// Only lines through the placed stone are inspected. A new run of four can
/// only appear through the newest stone, so this agrees with
/// [`has_four_in_a_row`] when called right after every placement.
#[instrument(skip(board))]
pub fn check_win(board: &Board, placement: Placement) -> bool {
    let target = Cell::Occupied(placement.player);
    if board.get(placement.row, placement.column) != Some(target) {
        return false;
    }

    DIRECTIONS.iter().any(|&(dr, dc)| {
        let run = 1
            + count_from(board, placement, dr, dc, target)
            + count_from(board, placement, -dr, -dc, target);
        run >= WIN_LENGTH
    })
}

/// Counts consecutive `target` cells stepping away from `placement`.
fn count_from(board: &Board, placement: Placement, dr: isize, dc: isize, target: Cell) -> usize {
    let mut count = 0;
    let mut row = placement.row as isize + dr;
    let mut col = placement.column as isize + dc;
    while row >= 0 && col >= 0 && board.get(row as usize, col as usize) == Some(target) {
        count += 1;
        row += dr;
        col += dc;
    }
    count
}

/// Scans the whole board for any run of four `player` stones.
#[instrument(skip(board))]
pub fn has_four_in_a_row(board: &Board, player: Player) -> bool {
    let target = Cell::Occupied(player);
    (0..ROWS).any(|row| {
        (0..COLS).any(|col| {
            DIRECTIONS.iter().any(|&(dr, dc)| {
                (0..WIN_LENGTH as isize).all(|i| {
                    let r = row as isize + dr * i;
                    let c = col as isize + dc * i;
                    r >= 0 && c >= 0 && board.get(r as usize, c as usize) == Some(target)
                })
            })
        })
    })
}

/// Returns the player owning a run of four, if any.
pub fn winner(board: &Board) -> Option<Player> {
    [Player::Human, Player::Computer]
        .into_iter()
        .find(|&p| has_four_in_a_row(board, p))
}

/// A full board with no run of four.
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && winner(board).is_none()
}

impl Board {
    /// Checks whether the stone `player` just placed at (`row`, `column`)
    /// completes four in a row.
    pub fn check_win(&self, row: usize, column: usize, player: Player) -> bool {
        check_win(
            self,
            Placement {
                row,
                column,
                player,
            },
        )
    }
}
