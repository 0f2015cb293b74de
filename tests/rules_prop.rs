//! Property tests for the rule engine: legality, gravity and win detection
//! over generated move sequences.
use connect_four::error::MoveError;
use connect_four::game::{Board, Cell, GameState, Player, COLS, ROWS};
use proptest::prelude::*;

/// Exhaustive four-in-a-row scan from every cell in every direction.
fn brute_force_winner(board: &Board) -> Option<Player> {
    let dirs: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    for row in 0..ROWS as isize {
        for col in 0..COLS as isize {
            let Some(owner) = board.get(row as usize, col as usize).owner() else {
                continue;
            };
            for (dr, dc) in dirs {
                let line = (0..4).all(|k| {
                    let (r, c) = (row + dr * k, col + dc * k);
                    (0..ROWS as isize).contains(&r)
                        && (0..COLS as isize).contains(&c)
                        && board.get(r as usize, c as usize) == Cell::Taken(owner)
                });
                if line {
                    return Some(owner);
                }
            }
        }
    }
    None
}

fn column_height(board: &Board, col: usize) -> usize {
    (0..ROWS)
        .take_while(|&row| board.get(row, col) != Cell::Empty)
        .count()
}

#[test]
fn lowest_empty_row_is_filled_first() {
    let mut state = GameState::initial();
    for (expected_row, player) in [Player::One, Player::Two, Player::One].into_iter().enumerate() {
        assert_eq!(state.apply_move(player, 4), Ok(expected_row));
    }
    assert_eq!(state.board().get(0, 4), Cell::Taken(Player::One));
    assert_eq!(state.board().get(2, 4), Cell::Taken(Player::One));
}

proptest! {
    #[test]
    fn generated_games_respect_rules(columns in prop::collection::vec(0usize..COLS + 1, 0..80)) {
        let mut state = GameState::initial();
        let mut placed = 0usize;

        for col in columns {
            if state.is_terminal() {
                break;
            }
            let mover = state.to_move();
            let before = state.clone();

            if col >= COLS {
                prop_assert_eq!(state.apply_move(mover, col), Err(MoveError::OutOfRange(col)));
                prop_assert_eq!(&state, &before);
                continue;
            }

            let height = column_height(state.board(), col);
            if height == ROWS {
                prop_assert!(!state.legal_columns().contains(&col));
                prop_assert_eq!(state.apply_move(mover, col), Err(MoveError::ColumnFull(col)));
                prop_assert_eq!(&state, &before);
                continue;
            }

            let wrong = state.clone().apply_move(mover.other(), col);
            let is_wrong_turn = matches!(wrong, Err(MoveError::WrongTurn { .. }));
            prop_assert!(is_wrong_turn);

            prop_assert_eq!(state.apply_move(mover, col), Ok(height));
            placed += 1;
            prop_assert_eq!(state.board().get(height, col), Cell::Taken(mover));
            prop_assert_eq!(state.board().piece_count(), placed);
            prop_assert_eq!(state.to_move(), mover.other());
            prop_assert_eq!(state.winner(), brute_force_winner(state.board()));
            if let Some(winner) = state.winner() {
                prop_assert_eq!(winner, mover);
            }
        }

        let expected: Vec<usize> = (0..COLS)
            .filter(|&c| column_height(state.board(), c) < ROWS)
            .collect();
        if !state.is_terminal() {
            prop_assert_eq!(state.legal_columns(), expected);
        }
    }
}
