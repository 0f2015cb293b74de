use super::player::Player;
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Length of the run needed to win.
const RUN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Taken(Player),
}

impl Cell {
    /// Wire code: 0 for empty, otherwise the owner's player number.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Taken(player) => player.number(),
        }
    }

    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            other => Player::from_number(other).map(Cell::Taken),
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Taken(player) => Some(player),
        }
    }
}

/// A 6x7 grid. Row 0 is the bottom row, row 5 the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Overwrite a single cell. Used when decoding snapshots; regular play
    /// goes through [`Board::drop_piece`].
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    /// Check if a column is full (its top cell is occupied)
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[ROWS - 1][col] != Cell::Empty
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::OutOfRange(col));
        }
        let row = (0..ROWS)
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = Cell::Taken(player);
        Ok(row)
    }

    /// Check if every column is full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != Cell::Empty)
            .count()
    }

    /// Scan every run of four and return the player owning one, if any.
    pub fn winner(&self) -> Option<Player> {
        // (row step, col step): horizontal, vertical, rising and falling diagonals
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

        for row in 0..ROWS {
            for col in 0..COLS {
                let Some(player) = self.cells[row][col].owner() else {
                    continue;
                };
                for (dr, dc) in DIRECTIONS {
                    if self.run_owned_by(row, col, dr, dc, player) {
                        return Some(player);
                    }
                }
            }
        }
        None
    }

    fn run_owned_by(&self, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> bool {
        (1..RUN as isize).all(|i| {
            let r = row as isize + dr * i;
            let c = col as isize + dc * i;
            (0..ROWS as isize).contains(&r)
                && (0..COLS as isize).contains(&c)
                && self.cells[r as usize][c as usize] == Cell::Taken(player)
        })
    }

    /// Pack the layout into 84 bits, two per cell. Distinct layouts give
    /// distinct fingerprints.
    pub fn fingerprint(&self) -> u128 {
        self.cells
            .iter()
            .flatten()
            .fold(0u128, |acc, cell| (acc << 2) | cell.code() as u128)
    }
}
