//! Terminal UI: two clients side by side, each with its own view of the
//! replicated game.

mod app;
mod board_widget;
mod game_view;

pub use app::{App, Seat};
