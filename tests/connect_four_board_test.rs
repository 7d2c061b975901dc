//! Tests for the connect-four board engine.

use vier_gewinnt::{
    Board, COLS, Cell, ColumnPicker, MoveError, Player, ROWS, RandomPicker, check_win,
    has_four_in_a_row, is_draw, winner,
};

/// Plays random stones until someone wins or the board fills, checking the
/// engine's properties after every placement.
fn play_random_game(seed: u64) -> Board {
    let mut picker = RandomPicker::seeded(seed);
    let mut board = Board::new();
    let mut player = Player::Human;

    while let Some(column) = board.pick_random_move(&mut picker) {
        let valid = board.list_valid_moves();
        for c in 0..COLS {
            assert_eq!(board.is_valid_move(c), valid.contains(&c));
        }

        let before = board.clone();
        let placement = board.apply_move(column, player).expect("valid column");

        // Gravity: the stone lands on the lowest empty cell.
        assert_eq!(before.get(placement.row, column), Some(Cell::Empty));
        assert!(
            (placement.row + 1..ROWS).all(|r| board.get(r, column) != Some(Cell::Empty)),
            "stone at row {} is floating",
            placement.row
        );

        // The local check agrees with a full scan right after each placement.
        let local = check_win(&board, placement);
        assert_eq!(local, has_four_in_a_row(&board, player));
        if local {
            return board;
        }
        player = player.opponent();
    }

    board
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..200 {
        let board = play_random_game(seed);
        assert!(winner(&board).is_some() || is_draw(&board));
    }
}

#[test]
fn test_no_gaps_in_columns() {
    for seed in 0..50 {
        let board = play_random_game(seed);
        for col in 0..COLS {
            let mut seen_stone = false;
            for row in 0..ROWS {
                let occupied = board.get(row, col) != Some(Cell::Empty);
                assert!(!seen_stone || occupied, "gap below a stone in column {}", col);
                seen_stone |= occupied;
            }
        }
    }
}

#[test]
fn test_full_column_is_a_noop() {
    let mut board = Board::new();
    for i in 0..ROWS {
        let player = if i % 2 == 0 {
            Player::Human
        } else {
            Player::Computer
        };
        board.apply_move(4, player).unwrap();
    }
    assert!(!board.list_valid_moves().contains(&4));

    let before = board.clone();
    assert_eq!(
        board.apply_move(4, Player::Human),
        Err(MoveError::ColumnFull(4))
    );
    assert_eq!(board, before);
}

#[test]
fn test_board_check_win_method() {
    let mut board = Board::new();
    for col in 0..3 {
        board.apply_move(col, Player::Human).unwrap();
    }
    let last = board.apply_move(3, Player::Human).unwrap();
    assert!(board.check_win(last.row, last.column, Player::Human));
    assert!(!board.check_win(last.row, last.column, Player::Computer));
}

#[test]
fn test_win_needs_same_owner() {
    let mut board = Board::new();
    for (col, player) in [
        (0, Player::Human),
        (1, Player::Human),
        (2, Player::Human),
        (3, Player::Computer),
    ] {
        board.apply_move(col, player).unwrap();
    }
    assert_eq!(winner(&board), None);
}

#[derive(Debug)]
struct Always(usize);

impl ColumnPicker for Always {
    fn pick_column(&mut self, valid: &[usize]) -> usize {
        if valid.contains(&self.0) {
            self.0
        } else {
            valid[0]
        }
    }
}

#[test]
fn test_custom_picker() {
    let mut board = Board::new();
    let mut picker = Always(5);
    assert_eq!(board.pick_random_move(&mut picker), Some(5));
    for _ in 0..ROWS {
        board.apply_move(5, Player::Computer).unwrap();
    }
    assert_eq!(board.pick_random_move(&mut picker), Some(0));
}

#[test]
fn test_display_marks_stones() {
    let mut board = Board::new();
    board.apply_move(0, Player::Human).unwrap();
    board.apply_move(6, Player::Computer).unwrap();
    let text = board.display();
    let bottom = text.lines().nth(ROWS - 1).unwrap();
    assert_eq!(bottom, "X.....O");
}
