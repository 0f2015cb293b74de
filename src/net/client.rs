use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use log::debug;

use super::protocol::{Request, Response};
use crate::error::ClientError;
use crate::game::{GameState, Player};

/// Client side of the protocol. Every call opens a fresh connection.
#[derive(Debug, Clone)]
pub struct Connection {
    addr: SocketAddr,
    timeout: Duration,
}

impl Connection {
    pub fn new(addr: SocketAddr, timeout: Duration) -> Self {
        Connection { addr, timeout }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Fetch the authoritative game state.
    pub fn fetch_state(&self) -> Result<GameState, ClientError> {
        self.exchange(Request::GetGameState)
    }

    /// Submit a move and return the updated game state.
    pub fn play(&self, player: Player, column: usize) -> Result<GameState, ClientError> {
        let column = u8::try_from(column).unwrap_or(u8::MAX);
        self.exchange(Request::UpdateGameState {
            player: player.number(),
            column,
        })
    }

    fn exchange(&self, request: Request) -> Result<GameState, ClientError> {
        let mut stream = TcpStream::connect_timeout(&self.addr, self.timeout)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        debug!("Sending {:?} to {}", request, self.addr);
        request.write_to(&mut stream)?;
        match Response::read_from(&mut stream)? {
            Response::GameState(state) => Ok(state),
            Response::Error(status) => Err(ClientError::Rejected(status)),
        }
    }
}
