//! Terminal UI for the interactive client: polls the server and renders the
//! board with crossterm and ratatui.

mod app;
mod game_view;

pub use app::App;
