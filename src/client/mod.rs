//! Automated client that plays over the network with an [`Agent`](crate::ai::Agent).
//! The interactive client lives in [`crate::ui`].

mod bot;

pub use bot::BotClient;
