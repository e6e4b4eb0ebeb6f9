//! # Synced Connect Four
//!
//! A two-player Connect Four whose authoritative state lives in a shared,
//! eventually consistent key/value space. Clients never apply their own
//! moves: a move is evaluated, published, and only adopted once the space
//! echoes the change back.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, player, win/draw detection
//! - [`sync`]: Wire payload, space store interface, lock-step coordinator
//! - [`ui`]: Terminal UI with two local clients on one in-process space
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod sync;
pub mod ui;
