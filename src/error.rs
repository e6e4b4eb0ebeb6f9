use std::path::PathBuf;

/// Errors decoding a game payload read from the shared space.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("board must have {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },

    #[error("board row {row} must have {expected} cells, got {actual}")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid cell value {value} at row {row}, column {col}")]
    CellValue { row: usize, col: usize, value: u8 },

    #[error("invalid current turn {0} (expected 1 or 2)")]
    Turn(u8),

    #[error("invalid winner {0} (expected null, 1, 2 or \"draw\")")]
    Winner(String),
}

/// Errors reported by the shared space when writing a property.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("space state service unavailable")]
    Unavailable,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
