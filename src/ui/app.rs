use crate::error::ClientError;
use crate::game::{GameState, Player, COLS};
use crate::net::{Connection, StatusCode};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::{info, warn};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};

/// Interactive client: mirrors the server's game and submits the local
/// player's moves.
pub struct App {
    connection: Connection,
    player: Player,
    poll_interval: Duration,
    game_state: Option<GameState>,
    last_poll: Option<Instant>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(connection: Connection, player: Player, poll_interval: Duration) -> Self {
        App {
            connection,
            player,
            poll_interval,
            game_state: None,
            last_poll: None,
            selected_column: COLS / 2,
            should_quit: false,
            message: None,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        info!("Playing as {} against {}", self.player, self.connection.addr());
        loop {
            if self.poll_due() {
                self.refresh();
            }

            terminal.draw(|f| self.render(f)).map_err(|e| io::Error::other(e.to_string()))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    fn poll_due(&self) -> bool {
        self.last_poll
            .is_none_or(|at| at.elapsed() >= self.poll_interval)
    }

    /// Fetch the server's game state.
    fn refresh(&mut self) {
        self.last_poll = Some(Instant::now());
        match self.connection.fetch_state() {
            Ok(state) => self.apply_state(state),
            Err(e) => {
                warn!("Polling failed: {e}");
                self.message = Some(format!("Server unavailable: {e}"));
            }
        }
    }

    fn apply_state(&mut self, state: GameState) {
        let restarted = self
            .game_state
            .as_ref()
            .is_some_and(|old| old.is_terminal() && !state.is_terminal());
        if restarted {
            info!("Server started a new game");
            self.message = Some("New game started!".to_string());
        }
        self.game_state = Some(state);
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.selected_column = (c as usize) - ('1' as usize);
                self.drop_piece();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            _ => {}
        }
    }

    /// Submit the selected column to the server.
    fn drop_piece(&mut self) {
        let Some(state) = &self.game_state else {
            self.message = Some("Not connected to a game yet.".to_string());
            return;
        };
        if state.is_terminal() {
            self.message = Some("Game over! Waiting for a new game.".to_string());
            return;
        }
        if state.to_move() != self.player {
            self.message = Some("Not your turn!".to_string());
            return;
        }

        match self.connection.play(self.player, self.selected_column) {
            Ok(state) => {
                self.message = None;
                self.apply_state(state);
            }
            Err(ClientError::Rejected(status)) => {
                self.message = Some(rejection_message(status).to_string());
            }
            Err(e) => {
                warn!("Move failed: {e}");
                self.message = Some(format!("Move failed: {e}"));
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            self.game_state.as_ref(),
            self.player,
            self.selected_column,
            &self.message,
        );
    }
}

fn rejection_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::InvalidPlayer => "Not your turn!",
        StatusCode::InvalidColumn => "Invalid column!",
        StatusCode::IllegalMove => "Column is full!",
        StatusCode::Success | StatusCode::Error => "The server rejected the move.",
    }
}
