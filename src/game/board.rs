pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// Small-integer id used on the wire: 0 = empty, 1 = red, 2 = yellow.
    pub fn id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Red => 1,
            Cell::Yellow => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Cell> {
        match id {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Red),
            2 => Some(Cell::Yellow),
            _ => None,
        }
    }
}

/// A (row, col) coordinate. Row 0 is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropError {
    ColumnFull,
    InvalidColumn,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Build a board from rows received from elsewhere (row 0 first).
    ///
    /// No gravity check is made: remote states are adopted as they are.
    pub fn from_rows(cells: [[Cell; COLS]; ROWS]) -> Self {
        Board { cells }
    }

    /// Rows in bottom-up order.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Get the cell at a specific position
    /// Row 0 is the bottom, row 5 is the top
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Check if a column is full (its top row is occupied)
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[ROWS - 1][col] != Cell::Empty
    }

    /// Number of pieces stacked in a column.
    pub fn column_height(&self, col: usize) -> usize {
        if col >= COLS {
            return 0;
        }
        (0..ROWS)
            .take_while(|&row| self.cells[row][col] != Cell::Empty)
            .count()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, DropError> {
        if col >= COLS {
            return Err(DropError::InvalidColumn);
        }

        if self.is_column_full(col) {
            return Err(DropError::ColumnFull);
        }

        // Lowest empty row, scanning up from the bottom
        for row in 0..ROWS {
            if self.cells[row][col] == Cell::Empty {
                self.cells[row][col] = cell;
                return Ok(row);
            }
        }

        unreachable!("Column should not be full if is_column_full returned false");
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell != Cell::Empty))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
