//! Core Connect Four rules: board with gravity, turn alternation, and
//! win/draw detection. Pure functions of the state they are given; no I/O.

mod board;
mod player;
mod state;
pub(crate) mod terminal;

pub use board::{Board, Cell, Position, COLS, ROWS};
pub use player::Player;
pub use state::{now_millis, GameOutcome, GameState, MoveError};
pub use terminal::{evaluate_terminal, TerminalReport, WinningLine};
