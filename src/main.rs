use std::io;
use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use connect_four::client::BotClient;
use connect_four::config::{AppConfig, Strategy};
use connect_four::game::Player;
use connect_four::logging::init_logger;
use connect_four::net::{Connection, Server};
use connect_four::ui::App;

/// Networked Connect Four: a game server, a terminal client and a bot.
#[derive(Parser)]
#[command(name = "connect-four", version, about = "Networked Connect Four")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Host the authoritative game
    Server(Endpoint),
    /// Play from the terminal
    ClientPlayer(PlayerArgs),
    /// Let the tree search play
    ClientBot(BotArgs),
}

#[derive(Args)]
struct Endpoint {
    /// Override the host address
    #[arg(long)]
    host: Option<IpAddr>,

    /// Override the port
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args)]
struct PlayerArgs {
    #[command(flatten)]
    endpoint: Endpoint,

    /// Player number to play as (1 or 2)
    #[arg(long, value_parser = parse_player)]
    player: Option<Player>,
}

#[derive(Args)]
struct BotArgs {
    #[command(flatten)]
    client: PlayerArgs,

    /// Override the search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Override the move strategy
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Seed for reproducible tie-breaking
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_player(s: &str) -> Result<Player, String> {
    let number: u8 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    Player::from_number(number).ok_or_else(|| format!("player must be 1 or 2, got {number}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Command::Server(endpoint) => {
            if let Some(host) = endpoint.host {
                config.server.host = host;
            }
            if let Some(port) = endpoint.port {
                config.server.port = port;
            }
            let _logger = init_logger("server", &config.log_level, true)?;
            run_server(config)
        }
        Command::ClientPlayer(args) => {
            apply_client_overrides(&mut config, &args);
            let _logger = init_logger("client", &config.log_level, false)?;
            run_player(config)
        }
        Command::ClientBot(args) => {
            apply_client_overrides(&mut config, &args.client);
            if let Some(depth) = args.depth {
                config.bot.search_depth = depth;
            }
            if let Some(strategy) = args.strategy {
                config.bot.strategy = strategy;
            }
            if args.seed.is_some() {
                config.bot.seed = args.seed;
            }
            let _logger = init_logger("bot", &config.log_level, true)?;
            run_bot(config)
        }
    }
}

fn apply_client_overrides(config: &mut AppConfig, args: &PlayerArgs) {
    if let Some(host) = args.endpoint.host {
        config.client.host = host;
    }
    if let Some(port) = args.endpoint.port {
        config.client.port = port;
    }
    if let Some(player) = args.player {
        config.client.player = player;
    }
}

fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;
    let addr = config.server.addr();
    let server = Server::bind(config.server).with_context(|| format!("binding {addr}"))?;
    server.run().context("server stopped")
}

fn run_bot(config: AppConfig) -> Result<()> {
    config.validate()?;
    let connection = Connection::new(config.client.addr(), config.client.io_timeout());
    let mut bot = BotClient::new(
        connection,
        config.client.player,
        config.bot.build_agent(),
        config.client.poll_interval(),
    );
    let outcome = bot.run().context("bot client failed")?;
    info!("Final outcome: {outcome}");
    Ok(())
}

fn run_player(config: AppConfig) -> Result<()> {
    config.validate()?;
    let connection = Connection::new(config.client.addr(), config.client.io_timeout());
    let mut app = App::new(connection, config.client.player, config.client.poll_interval());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even when the app failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("terminal client failed")
}
