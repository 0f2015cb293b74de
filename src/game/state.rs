use std::fmt;

use super::board::{Board, COLS};
use super::player::Player;
use crate::error::MoveError;

/// Result of a finished game, or the assessed result of a searched position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Draw,
    Win(Player),
}

impl Outcome {
    /// Outcome code: 0 for a draw, otherwise the winning player's number.
    pub fn code(self) -> u8 {
        match self {
            Outcome::Draw => 0,
            Outcome::Win(player) => player.number(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Board plus the player to move. Plain value: `clone()` gives an
/// independent copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    to_move: Player,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            to_move: Player::One,
        }
    }

    /// Assemble a state from parts, e.g. a decoded snapshot.
    pub fn from_parts(board: Board, to_move: Player) -> Self {
        GameState { board, to_move }
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reject a move without touching the state.
    pub fn check_legal_move(&self, player: Player, column: usize) -> Result<(), MoveError> {
        if player != self.to_move {
            return Err(MoveError::WrongTurn {
                player,
                to_move: self.to_move,
            });
        }
        if column >= COLS {
            return Err(MoveError::OutOfRange(column));
        }
        if self.board.is_column_full(column) {
            return Err(MoveError::ColumnFull(column));
        }
        Ok(())
    }

    /// Drop `player`'s piece in `column` and pass the turn. Returns the row
    /// the piece landed in.
    pub fn apply_move(&mut self, player: Player, column: usize) -> Result<usize, MoveError> {
        self.check_legal_move(player, column)?;
        let row = self.board.drop_piece(column, player)?;
        self.to_move = self.to_move.other();
        Ok(row)
    }

    /// Columns the player to move could drop into.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLS)
            .filter(|&col| self.check_legal_move(self.to_move, col).is_ok())
            .collect()
    }

    pub fn winner(&self) -> Option<Player> {
        self.board.winner()
    }

    pub fn is_draw(&self) -> bool {
        self.board.is_full() && self.winner().is_none()
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_draw()
    }

    /// Outcome of a finished game; `None` while the game is still running.
    pub fn outcome(&self) -> Option<Outcome> {
        if let Some(player) = self.winner() {
            Some(Outcome::Win(player))
        } else if self.board.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = GameState::initial();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, ROWS};

    /// Full board with no four in a row: two-row bands, alternating by column.
    fn drawn_board() -> Board {
        let mut board = Board::new();
        let band_a = [Player::One, Player::One, Player::Two, Player::Two, Player::One, Player::One];
        let band_b = [Player::Two, Player::Two, Player::One, Player::One, Player::Two, Player::Two];
        for col in 0..COLS {
            let band = if col % 2 == 0 { band_a } else { band_b };
            for player in band {
                board.drop_piece(col, player).unwrap();
            }
        }
        board
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::initial();
        assert_eq!(state.to_move(), Player::One);
        assert!(!state.is_terminal());
        assert_eq!(state.legal_columns().len(), 7);
    }

    #[test]
    fn test_apply_move() {
        let mut state = GameState::initial();
        let row = state.apply_move(Player::One, 3).unwrap();

        assert_eq!(row, 0);
        assert_eq!(state.to_move(), Player::Two);
        assert_eq!(state.board().get(0, 3), Cell::Taken(Player::One));
    }

    #[test]
    fn test_wrong_turn_rejected() {
        let mut state = GameState::initial();
        let before = state.clone();
        let err = state.apply_move(Player::Two, 3).unwrap_err();
        assert_eq!(
            err,
            MoveError::WrongTurn {
                player: Player::Two,
                to_move: Player::One
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut state = GameState::initial();
        assert_eq!(state.apply_move(Player::One, 7), Err(MoveError::OutOfRange(7)));
        assert_eq!(state, GameState::initial());
    }

    #[test]
    fn test_column_full_leaves_board_unchanged() {
        let mut state = GameState::initial();
        for _ in 0..ROWS {
            let player = state.to_move();
            state.apply_move(player, 0).unwrap();
        }
        let before = state.clone();
        let player = state.to_move();
        assert_eq!(state.apply_move(player, 0), Err(MoveError::ColumnFull(0)));
        assert_eq!(state, before);
        assert!(!state.legal_columns().contains(&0));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = GameState::initial();
        let mut copy = original.clone();
        copy.apply_move(Player::One, 2).unwrap();
        assert_eq!(original.board().get(0, 2), Cell::Empty);
        assert_eq!(original.to_move(), Player::One);
    }

    #[test]
    fn test_win_detection() {
        let mut state = GameState::initial();
        // One plays 0..4 on the bottom row, Two stacks on top of 0..3
        for col in 0..4 {
            state.apply_move(Player::One, col).unwrap();
            if col < 3 {
                state.apply_move(Player::Two, col).unwrap();
            }
        }

        assert!(state.is_terminal());
        assert!(!state.is_draw());
        assert_eq!(state.winner(), Some(Player::One));
        assert_eq!(state.outcome(), Some(Outcome::Win(Player::One)));
    }

    #[test]
    fn test_full_board_without_run_is_draw() {
        let state = GameState::from_parts(drawn_board(), Player::One);
        assert_eq!(state.winner(), None);
        assert!(state.is_draw());
        assert!(state.is_terminal());
        assert_eq!(state.outcome(), Some(Outcome::Draw));
        assert!(state.legal_columns().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut state = GameState::initial();
        state.apply_move(Player::One, 4).unwrap();
        state.reset();
        assert_eq!(state, GameState::initial());
    }

    #[test]
    fn test_outcome_codes() {
        assert_eq!(Outcome::Draw.code(), 0);
        assert_eq!(Outcome::Win(Player::One).code(), 1);
        assert_eq!(Outcome::Win(Player::Two).code(), 2);
    }
}
