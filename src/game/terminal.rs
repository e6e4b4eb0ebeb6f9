//! Terminal-condition detection: four-in-a-row scan and draw check.

use super::board::{Board, Cell, Position, COLS, ROWS};
use super::player::Player;

/// The four cells of a winning run, in scan order from the run's first cell.
pub type WinningLine = [Position; 4];

/// Step vectors in scan priority order: horizontal, vertical, diagonal up,
/// diagonal down.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Result of scanning a board for a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalReport {
    pub winner: Option<Player>,
    pub winning_line: Option<WinningLine>,
    pub is_draw: bool,
}

impl TerminalReport {
    pub fn is_win(&self) -> bool {
        self.winning_line.is_some()
    }
}

/// Scan every occupied cell as the start of a run of four, stepping only in
/// the positive direction of each vector.
///
/// The first run found (row ascending, then column, then direction order) is
/// reported. Draw means every cell is occupied and no run exists.
pub fn evaluate_terminal(board: &Board) -> TerminalReport {
    for row in 0..ROWS {
        for col in 0..COLS {
            let cell = board.get(row, col);
            if cell == Cell::Empty {
                continue;
            }
            for &(dr, dc) in &DIRECTIONS {
                if let Some(line) = run_from(board, row, col, dr, dc, cell) {
                    return TerminalReport {
                        winner: Player::from_cell(cell),
                        winning_line: Some(line),
                        is_draw: false,
                    };
                }
            }
        }
    }

    TerminalReport {
        winner: None,
        winning_line: None,
        is_draw: board.is_full(),
    }
}

fn run_from(
    board: &Board,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    cell: Cell,
) -> Option<WinningLine> {
    let mut line = [Position::new(row, col); 4];
    for (i, slot) in line.iter_mut().enumerate().skip(1) {
        let r = row as isize + dr * i as isize;
        let c = col as isize + dc * i as isize;
        if r < 0 || r >= ROWS as isize || c < 0 || c >= COLS as isize {
            return None;
        }
        let (r, c) = (r as usize, c as usize);
        if board.get(r, c) != cell {
            return None;
        }
        *slot = Position::new(r, c);
    }
    Some(line)
}

/// Full board with no run of four in any direction.
#[cfg(test)]
pub(crate) fn draw_board() -> Board {
    use Cell::{Red as R, Yellow as Y};
    let a = [R, R, Y, Y, R, R, Y];
    let b = [Y, Y, R, R, Y, Y, R];
    Board::from_rows([a, a, a, b, a, a])
}
