//! Connect-four rules engine.

mod random;
mod rules;
mod types;

pub use random::{ColumnPicker, RandomPicker, ScriptedPicker};
pub use rules::{check_win, has_four_in_a_row, is_draw, winner};
pub use types::{Board, COLS, Cell, MoveError, Placement, Player, ROWS, WIN_LENGTH};
