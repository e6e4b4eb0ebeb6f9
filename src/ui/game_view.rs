use super::app::Seat;
use super::board_widget::board_lines;
use crate::game::{GameOutcome, Player};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    seats: &[Seat; 2],
    active: usize,
    selected_column: usize,
    hold_echoes: bool,
    message: &Option<String>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(14),   // Boards
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    render_header(frame, seats, hold_echoes, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    for (i, seat) in seats.iter().enumerate() {
        let selected = (i == active).then_some(selected_column);
        render_seat(frame, seat, i == active, selected, columns[i]);
    }

    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, seats: &[Seat; 2], hold_echoes: bool, area: Rect) {
    let key = seats[0].coordinator.key();
    let delivery = if hold_echoes { "echoes held" } else { "echoes live" };
    let header = Paragraph::new(format!("{key}  |  {delivery}"))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_seat(
    frame: &mut Frame,
    seat: &Seat,
    active: bool,
    selected_column: Option<usize>,
    area: Rect,
) {
    let coordinator = &seat.coordinator;
    let state = coordinator.state();

    let (status, color) = match state.outcome() {
        Some(GameOutcome::Winner(player)) => (format!("{} wins", player.name()), color_of(player)),
        Some(GameOutcome::Draw) => ("Draw".to_string(), Color::White),
        None => {
            let player = state.current_turn();
            (format!("{} to move", player.name()), color_of(player))
        }
    };

    let mut lines = vec![Line::styled(
        status,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    lines.extend(board_lines(state, selected_column));
    lines.push(if coordinator.is_input_locked() {
        Line::styled("syncing...", Style::default().fg(Color::Magenta))
    } else {
        Line::raw("ready")
    });
    if let Some(event) = &seat.last_event {
        lines.push(Line::styled(
            format!("last: {event}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let border_style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(seat.name),
    );
    frame.render_widget(widget, area);
}

fn color_of(player: Player) -> Color {
    match player {
        Player::Red => Color::Red,
        Player::Yellow => Color::Yellow,
    }
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  Tab: Switch client  |  R: Reset  |  Q: Quit");
    let line2 = Line::from("H: Hold/release echoes  |  N: Deliver next echo");

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
