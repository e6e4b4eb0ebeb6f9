use crate::game::{Cell, GameState, Position, COLS, ROWS};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Board lines, top row first, with winning cells highlighted.
pub fn board_lines(state: &GameState, selected_column: Option<usize>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..COLS {
        let label = format!(" {} ", col + 1);
        if Some(col) == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔═════════════════════╗"));

    // Row 0 is the bottom, so draw from the top down
    for row in (0..ROWS).rev() {
        let mut spans = vec![Span::raw("  ║")];
        for col in 0..COLS {
            let winning = state.winning_line().contains(&Position::new(row, col));
            let (symbol, color) = match state.board().get(row, col) {
                Cell::Empty => (" . ", Color::DarkGray),
                Cell::Red => (" \u{25cf} ", Color::Red),
                Cell::Yellow => (" \u{25cf} ", Color::Yellow),
            };
            let style = if winning {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            spans.push(Span::styled(symbol, style));
        }
        spans.push(Span::raw("║"));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from("  ╚═════════════════════╝"));
    lines
}
