use crate::game::{Board, Cell, GameState, Outcome, Player, COLS, ROWS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    game_state: Option<&GameState>,
    player: Player,
    selected_column: usize,
    message: &Option<String>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, game_state, player, chunks[0]);
    match game_state {
        Some(state) => render_board(frame, state.board(), selected_column, chunks[1]),
        None => frame.render_widget(
            Paragraph::new("Waiting for the server...").alignment(Alignment::Center),
            chunks[1],
        ),
    }
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

/// Headline for the local player.
pub fn status_line(game_state: Option<&GameState>, player: Player) -> String {
    let Some(state) = game_state else {
        return "Connecting...".to_string();
    };
    match state.outcome() {
        Some(Outcome::Win(winner)) if winner == player => "You won!".to_string(),
        Some(Outcome::Win(_)) => "You lost!".to_string(),
        Some(Outcome::Draw) => "Draw!".to_string(),
        None if state.to_move() == player => "Your turn".to_string(),
        None => "Opponent's turn".to_string(),
    }
}

fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
    }
}

fn render_header(
    frame: &mut Frame,
    game_state: Option<&GameState>,
    player: Player,
    area: ratatui::layout::Rect,
) {
    let status = format!(
        "{}  |  You are {} ({})",
        status_line(game_state, player),
        player,
        player.symbol()
    );

    let header = Paragraph::new(status)
        .style(
            Style::default()
                .fg(player_color(player))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    board: &Board,
    selected_column: usize,
    area: ratatui::layout::Rect,
) {
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..COLS {
        if col == selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    // Row 0 is the bottom of the board, so draw from the top row down.
    for row in (0..ROWS).rev() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..COLS {
            let (symbol, color) = match board.get(row, col) {
                Cell::Empty => (" . ".to_string(), Color::DarkGray),
                Cell::Taken(p) => (format!(" {} ", p.symbol()), player_color(p)),
            };
            row_spans.push(Span::styled(symbol, Style::default().fg(color)));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: ratatui::layout::Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let controls = Paragraph::new("←/→: Select  |  1-7: Drop in column  |  Enter/Space: Drop  |  Q: Quit")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_turn_and_outcome() {
        let mut state = GameState::initial();
        assert_eq!(status_line(None, Player::One), "Connecting...");
        assert_eq!(status_line(Some(&state), Player::One), "Your turn");
        assert_eq!(status_line(Some(&state), Player::Two), "Opponent's turn");

        for col in [0, 1, 0, 1, 0, 1, 0] {
            let mover = state.to_move();
            state.apply_move(mover, col).unwrap();
        }
        assert_eq!(status_line(Some(&state), Player::One), "You won!");
        assert_eq!(status_line(Some(&state), Player::Two), "You lost!");
    }
}
