//! TCP transport: the binary protocol, the game server and a client
//! connection.

pub mod client;
pub mod protocol;
mod server;

pub use client::Connection;
pub use protocol::{Request, Response, StatusCode};
pub use server::Server;
