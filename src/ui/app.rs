use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::config::AppConfig;
use crate::game::{GameOutcome, MoveError, COLS};
use crate::sync::{
    Adoption, Coordinator, EventOutcome, LocalSpace, RequestOutcome, SpaceClient,
};

/// One client of the shared space, with its own coordinator.
pub struct Seat {
    pub name: &'static str,
    pub coordinator: Coordinator<SpaceClient>,
    pub last_event: Option<String>,
}

impl Seat {
    fn new(name: &'static str, space: &LocalSpace, config: &AppConfig) -> Self {
        Seat {
            name,
            coordinator: Coordinator::new(space.connect(), config.sync.store_key()),
            last_event: None,
        }
    }

    fn note(&mut self, outcome: &EventOutcome) {
        self.last_event = Some(match outcome {
            EventOutcome::Adopted(Adoption::Snapshot) => "loaded snapshot".to_string(),
            EventOutcome::Adopted(Adoption::Remote) => "remote move".to_string(),
            EventOutcome::Adopted(Adoption::OwnEcho) => "own echo".to_string(),
            EventOutcome::Adopted(Adoption::Superseded) => "superseded".to_string(),
            EventOutcome::Ignored => return,
            EventOutcome::Malformed(e) => format!("bad payload: {e}"),
        });
    }
}

/// Two local clients playing through one in-process space.
pub struct App {
    space: LocalSpace,
    seats: [Seat; 2],
    active: usize,
    selected_column: usize,
    hold_echoes: bool,
    tick: Duration,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let space = LocalSpace::new();
        let seats = [
            Seat::new("Left", &space, config),
            Seat::new("Right", &space, config),
        ];
        let mut app = App {
            space,
            seats,
            active: 0,
            selected_column: 3, // Start in middle
            hold_echoes: config.ui.hold_echoes,
            tick: Duration::from_millis(config.ui.tick_ms),
            should_quit: false,
            message: None,
        };
        // Ready events are queued on connect; take the initial snapshot now.
        app.deliver_all();
        app
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal.draw(|f| self.render(f)).map_err(Into::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            if !self.hold_echoes {
                self.deliver_all();
            }
        }
        Ok(())
    }

    pub fn seats(&self) -> &[Seat; 2] {
        &self.seats
    }

    pub fn space(&self) -> &LocalSpace {
        &self.space
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Tab => {
                self.active = 1 - self.active;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                let outcome = self.seats[self.active].coordinator.request_reset();
                self.report(outcome, "New game proposed");
            }
            KeyCode::Char('h') => {
                self.hold_echoes = !self.hold_echoes;
                self.message = Some(if self.hold_echoes {
                    "Holding echoes".to_string()
                } else {
                    "Delivering echoes".to_string()
                });
            }
            KeyCode::Char('n') => {
                self.deliver_one();
            }
            _ => {}
        }
    }

    /// Drop piece in selected column for the active seat
    fn drop_piece(&mut self) {
        let outcome = self.seats[self.active]
            .coordinator
            .request_drop(self.selected_column);
        self.report(outcome, "Move sent, waiting for echo");
    }

    fn report(&mut self, outcome: RequestOutcome, published: &str) {
        self.message = Some(match outcome {
            RequestOutcome::Published => published.to_string(),
            RequestOutcome::PublishFailed(e) => format!("Publish failed: {e}"),
            RequestOutcome::Locked => "Syncing, input locked".to_string(),
            RequestOutcome::Rejected(MoveError::ColumnFull) => "Column is full!".to_string(),
            RequestOutcome::Rejected(MoveError::InvalidColumn) => "Invalid column!".to_string(),
            RequestOutcome::Rejected(MoveError::GameOver) => {
                "Game over! Press 'r' to restart.".to_string()
            }
        });
    }

    /// Deliver one queued event to each seat.
    fn deliver_one(&mut self) {
        for seat in &mut self.seats {
            if let Some(outcome) = seat.coordinator.pump_one() {
                seat.note(&outcome);
            }
        }
        self.announce_outcome();
    }

    /// Deliver every queued event to each seat.
    fn deliver_all(&mut self) {
        let mut delivered = false;
        for seat in &mut self.seats {
            for outcome in seat.coordinator.pump() {
                seat.note(&outcome);
                delivered = true;
            }
        }
        if delivered {
            self.announce_outcome();
        }
    }

    fn announce_outcome(&mut self) {
        let state = self.seats[self.active].coordinator.state();
        if let Some(outcome) = state.outcome() {
            self.message = Some(match outcome {
                GameOutcome::Winner(player) => format!("{} wins!", player.name()),
                GameOutcome::Draw => "It's a draw!".to_string(),
            });
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            &self.seats,
            self.active,
            self.selected_column,
            self.hold_echoes,
            &self.message,
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Player};
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_new_app_is_idle() {
        let app = App::default();
        assert_eq!(app.space().client_count(), 2);
        for seat in app.seats() {
            assert!(!seat.coordinator.is_input_locked());
        }
    }

    #[test]
    fn test_drop_waits_for_echo() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);

        assert!(app.seats()[0].coordinator.is_input_locked());
        assert_eq!(app.seats()[0].coordinator.state().board().get(0, 3), Cell::Empty);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.message.as_deref(), Some("Syncing, input locked"));

        app.deliver_all();
        for seat in app.seats() {
            assert!(!seat.coordinator.is_input_locked());
            assert_eq!(seat.coordinator.state().board().get(0, 3), Cell::Red);
            assert_eq!(seat.coordinator.state().current_turn(), Player::Yellow);
        }
        assert_eq!(app.seats()[0].last_event.as_deref(), Some("own echo"));
        assert_eq!(app.seats()[1].last_event.as_deref(), Some("remote move"));
    }

    #[test]
    fn test_tab_switches_seat() {
        let mut app = App::default();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);

        assert!(!app.seats()[0].coordinator.is_input_locked());
        assert!(app.seats()[1].coordinator.is_input_locked());
        assert_eq!(app.seats()[1].coordinator.pending_proposal().unwrap().column, Some(2));
    }

    #[test]
    fn test_column_selection_is_clamped() {
        let mut app = App::default();
        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.selected_column, COLS - 1);
        for _ in 0..10 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn test_deliver_one_steps_each_seat() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('h'));
        assert!(app.hold_echoes);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.seats()[0].coordinator.is_input_locked());
        assert_eq!(app.seats()[1].coordinator.state().board().get(0, 3), Cell::Red);
    }

    #[test]
    fn test_quit() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
