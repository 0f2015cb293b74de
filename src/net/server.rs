use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use log::{debug, info, warn};

use super::protocol::{Request, Response, StatusCode};
use crate::config::ServerConfig;
use crate::error::ProtocolError;
use crate::game::{GameState, Player};

/// Holds the authoritative game and answers one request per connection.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    game: Arc<Mutex<GameState>>,
    reset_pending: Arc<AtomicBool>,
}

impl Server {
    pub fn bind(config: ServerConfig) -> io::Result<Self> {
        info!("Connect four server v{}", env!("CARGO_PKG_VERSION"));
        info!("Starting server {}...", config.addr());
        let listener = TcpListener::bind(config.addr())?;
        Ok(Server {
            listener,
            config,
            game: Arc::new(Mutex::new(GameState::initial())),
            reset_pending: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Snapshot of the current game.
    pub fn game(&self) -> GameState {
        lock_game(&self.game).clone()
    }

    /// Accept connections until the listener fails. Errors on a single
    /// connection are logged and do not stop the server.
    pub fn run(&self) -> io::Result<()> {
        info!("Server started on {}", self.local_addr()?);
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = self.handle_connection(stream) {
                        warn!("Connection failed: {e}");
                    }
                }
                Err(e) => warn!("Accept failed: {e}"),
            }

            if lock_game(&self.game).is_terminal() {
                self.schedule_reset();
            }
        }
        Ok(())
    }

    fn handle_connection(&self, mut stream: TcpStream) -> Result<(), ProtocolError> {
        stream.set_read_timeout(Some(self.config.io_timeout()))?;
        stream.set_write_timeout(Some(self.config.io_timeout()))?;
        debug!("Connection from {}", stream.peer_addr()?);

        let response = match Request::read_from(&mut stream) {
            Ok(request) => self.respond(request),
            Err(ProtocolError::UnknownRequestType(kind)) => {
                warn!("Invalid request type: {kind:#04x}");
                Response::Error(StatusCode::Error)
            }
            Err(e) => return Err(e),
        };
        debug!("Sending bytes: {:?}", response.encode());
        response.write_to(&mut stream)
    }

    /// Apply one request to the shared game.
    pub fn respond(&self, request: Request) -> Response {
        debug!("Request type: {:?}", request.kind());
        let mut game = lock_game(&self.game);
        match request {
            Request::GetGameState => Response::GameState(game.clone()),
            Request::UpdateGameState { player, column } => {
                info!("Player {player} is moving to column {column}");
                let Some(player) = Player::from_number(player) else {
                    info!("Move failed: unknown player {player}");
                    return Response::Error(StatusCode::InvalidPlayer);
                };
                if game.is_terminal() {
                    info!("Move failed: game is over");
                    return Response::Error(StatusCode::IllegalMove);
                }
                match game.apply_move(player, column as usize) {
                    Ok(_) => {
                        info!("Move successful.");
                        if let Some(outcome) = game.outcome() {
                            info!("Game is over (outcome {outcome}).");
                        }
                        Response::GameState(game.clone())
                    }
                    Err(e) => {
                        info!("Move failed: {e}");
                        Response::Error(StatusCode::from(&e))
                    }
                }
            }
        }
    }

    fn schedule_reset(&self) {
        if self.reset_pending.swap(true, Ordering::SeqCst) {
            return;
        }
        let game = Arc::clone(&self.game);
        let pending = Arc::clone(&self.reset_pending);
        let delay = self.config.reset_delay();
        let spawned = thread::Builder::new()
            .name("game-reset".into())
            .spawn(move || {
                thread::sleep(delay);
                info!("Restarting game.");
                lock_game(&game).reset();
                pending.store(false, Ordering::SeqCst);
            });
        if let Err(e) = spawned {
            warn!("Could not schedule game reset: {e}");
            self.reset_pending.store(false, Ordering::SeqCst);
        }
    }
}

fn lock_game(game: &Mutex<GameState>) -> MutexGuard<'_, GameState> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}
