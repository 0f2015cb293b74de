use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::ai::Agent;
use crate::error::ClientError;
use crate::game::{Outcome, Player};
use crate::net::Connection;

/// Polls the server and plays whenever it is this bot's turn.
pub struct BotClient {
    connection: Connection,
    player: Player,
    agent: Box<dyn Agent>,
    poll_interval: Duration,
}

impl BotClient {
    pub fn new(connection: Connection, player: Player, agent: Box<dyn Agent>, poll_interval: Duration) -> Self {
        BotClient {
            connection,
            player,
            agent,
            poll_interval,
        }
    }

    /// Fetch the game once and move if it is our turn. Returns the outcome
    /// once the game is over. A rejected move is logged and retried on the
    /// next poll.
    pub fn step(&mut self) -> Result<Option<Outcome>, ClientError> {
        let state = self.connection.fetch_state()?;
        if let Some(outcome) = state.outcome() {
            return Ok(Some(outcome));
        }
        if state.to_move() != self.player {
            debug!("Waiting for {}", state.to_move());
            return Ok(None);
        }

        let column = self.agent.select_action(&state);
        info!("{} ({}) plays column {}", self.player, self.agent.name(), column);
        match self.connection.play(self.player, column) {
            Ok(next) => Ok(next.outcome()),
            Err(ClientError::Rejected(status)) => {
                warn!("Move to column {column} rejected: {status:?}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Play until the current game ends.
    pub fn run(&mut self) -> Result<Outcome, ClientError> {
        info!(
            "Bot {} ({}) connecting to {}",
            self.player,
            self.agent.name(),
            self.connection.addr()
        );
        loop {
            if let Some(outcome) = self.step()? {
                match outcome {
                    Outcome::Win(p) if p == self.player => info!("Game over: we won."),
                    Outcome::Win(_) => info!("Game over: we lost."),
                    Outcome::Draw => info!("Game over: draw."),
                }
                return Ok(outcome);
            }
            thread::sleep(self.poll_interval);
        }
    }
}
