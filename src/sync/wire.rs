//! JSON payload stored under the game key.
//!
//! ```json
//! {"board":[[0,0,0,0,0,0,0], ...6 rows, row 0 first],
//!  "currentTurn":1, "winner":null, "lastModified":1700000000000}
//! ```
//!
//! `winner` is `null`, `1`, `2` or `"draw"`. The winning line is not part of
//! the payload; receivers rebuild it with [`GameState::reconstruct_derived`].

use serde::{Deserialize, Serialize};

use crate::error::PayloadError;
use crate::game::{Board, Cell, GameOutcome, GameState, Player, COLS, ROWS};

const DRAW: &str = "draw";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePayload {
    board: Vec<Vec<u8>>,
    #[serde(alias = "currentPlayer")]
    current_turn: u8,
    #[serde(default)]
    winner: Option<WireWinner>,
    #[serde(default)]
    last_modified: Option<serde_json::Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum WireWinner {
    Player(u8),
    Label(String),
}

/// Serialize a state for publishing.
pub fn encode(state: &GameState) -> String {
    let board = state
        .board()
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.id()).collect::<Vec<u8>>())
        .collect();

    let winner = state.outcome().map(|outcome| match outcome {
        GameOutcome::Winner(player) => WireWinner::Player(player.id()),
        GameOutcome::Draw => WireWinner::Label(DRAW.to_string()),
    });

    let payload = WirePayload {
        board,
        current_turn: state.current_turn().id(),
        winner,
        last_modified: Some(state.last_modified().into()),
    };
    // Plain numbers, strings and sequences: serialization cannot fail
    serde_json::to_string(&payload).expect("wire payload serializes")
}

/// Parse and validate a received payload.
///
/// Only the shape and value ranges are checked; the board is not required to
/// be reachable by legal play. The returned state has no winning line yet.
pub fn decode(text: &str) -> Result<GameState, PayloadError> {
    let payload: WirePayload = serde_json::from_str(text)?;

    if payload.board.len() != ROWS {
        return Err(PayloadError::RowCount {
            expected: ROWS,
            actual: payload.board.len(),
        });
    }

    let mut cells = [[Cell::Empty; COLS]; ROWS];
    for (row, values) in payload.board.iter().enumerate() {
        if values.len() != COLS {
            return Err(PayloadError::ColumnCount {
                row,
                expected: COLS,
                actual: values.len(),
            });
        }
        for (col, &value) in values.iter().enumerate() {
            cells[row][col] =
                Cell::from_id(value).ok_or(PayloadError::CellValue { row, col, value })?;
        }
    }

    let current_turn =
        Player::from_id(payload.current_turn).ok_or(PayloadError::Turn(payload.current_turn))?;

    let outcome = match payload.winner {
        None => None,
        Some(WireWinner::Player(id)) => match Player::from_id(id) {
            Some(player) => Some(GameOutcome::Winner(player)),
            None => return Err(PayloadError::Winner(id.to_string())),
        },
        Some(WireWinner::Label(label)) if label == DRAW => Some(GameOutcome::Draw),
        Some(WireWinner::Label(label)) => {
            return Err(PayloadError::Winner(format!("{label:?}")));
        }
    };

    let last_modified = payload
        .last_modified
        .as_ref()
        .map(timestamp_from_number)
        .unwrap_or(0);

    Ok(GameState::from_parts(
        Board::from_rows(cells),
        current_turn,
        outcome,
        last_modified,
    ))
}

fn timestamp_from_number(n: &serde_json::Number) -> u64 {
    n.as_u64()
        .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
        .unwrap_or(0)
}
