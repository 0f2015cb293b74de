//! # Connect Four
//!
//! A networked Connect Four game with a depth-limited tree-search bot.
//! A TCP server owns the authoritative game; a terminal client and an
//! automated client play against it.
//!
//! ## Modules
//!
//! - [`game`] — Rules: board, player, game state and outcomes
//! - [`ai`] — Agent trait, memoized tree search and move selection
//! - [`net`] — Binary wire protocol, game server and client connection
//! - [`client`] — Bot client driving an agent over the network
//! - [`ui`] — Terminal UI for the interactive client
//! - [`config`] — TOML configuration loading and validation
//! - [`logging`] — flexi_logger setup
//! - [`error`] — Structured error types

pub mod ai;
pub mod client;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod net;
pub mod ui;
