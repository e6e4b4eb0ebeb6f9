use std::time::{SystemTime, UNIX_EPOCH};

use super::board::{DropError, Position, COLS};
use super::terminal::{evaluate_terminal, WinningLine};
use super::{Board, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Why a drop was refused. Rejections are no-ops: nothing changes and
/// nothing is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    ColumnFull,
    InvalidColumn,
    GameOver,
}

impl From<DropError> for MoveError {
    fn from(e: DropError) -> Self {
        match e {
            DropError::ColumnFull => MoveError::ColumnFull,
            DropError::InvalidColumn => MoveError::InvalidColumn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_turn: Player,
    outcome: Option<GameOutcome>,
    winning_line: Option<WinningLine>,
    last_modified: u64,
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_turn: Player::Red, // Red starts
            outcome: None,
            winning_line: None,
            last_modified: 0,
        }
    }

    /// Initial state stamped with the current time, as published on reset.
    pub fn new_game() -> Self {
        GameState {
            last_modified: now_millis(),
            ..Self::initial()
        }
    }

    /// Assemble a state from transmitted fields. The winning line is left
    /// empty; call [`GameState::reconstruct_derived`] to fill it in.
    pub fn from_parts(
        board: Board,
        current_turn: Player,
        outcome: Option<GameOutcome>,
        last_modified: u64,
    ) -> Self {
        GameState {
            board,
            current_turn,
            outcome,
            winning_line: None,
            last_modified,
        }
    }

    /// Get current player
    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Cells of the winning run, empty unless the game was won.
    pub fn winning_line(&self) -> &[Position] {
        match &self.winning_line {
            Some(line) => line,
            None => &[],
        }
    }

    pub fn last_modified(&self) -> u64 {
        self.last_modified
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Evaluate a drop without touching `self` and return the candidate state.
    pub fn drop_column(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = *self;
        next.apply_drop(column)?;
        Ok(next)
    }

    /// Apply a drop in place. Returns the row the piece landed on.
    pub fn apply_drop(&mut self, column: usize) -> Result<usize, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let mover = self.current_turn;
        let row = self.board.drop_piece(column, mover.to_cell())?;

        let report = evaluate_terminal(&self.board);
        if let Some(line) = report.winning_line {
            // Turn stays with the winner
            self.outcome = Some(GameOutcome::Winner(mover));
            self.winning_line = Some(line);
        } else if report.is_draw {
            self.outcome = Some(GameOutcome::Draw);
        } else {
            self.current_turn = mover.other();
        }
        self.last_modified = now_millis();

        Ok(row)
    }

    /// Recompute the winning line, which is never transmitted.
    ///
    /// The transmitted outcome stays authoritative: a `Winner` whose board
    /// holds no run keeps its outcome with an empty line.
    pub fn reconstruct_derived(mut self) -> GameState {
        self.winning_line = match self.outcome {
            Some(GameOutcome::Winner(_)) => evaluate_terminal(&self.board).winning_line,
            Some(GameOutcome::Draw) | None => None,
        };
        self
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
