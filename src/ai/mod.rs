//! Move selection: the [`Agent`] trait, the depth-limited tree search behind
//! the bot, and a random baseline.

mod agent;
pub mod cache;
pub mod node;
mod random;
pub mod search;
pub mod selector;
mod tree_search;

pub use agent::Agent;
pub use cache::{CacheKey, TranspositionCache};
pub use node::{Evaluation, SearchNode};
pub use random::RandomAgent;
pub use search::{find_best_move, SearchOutcome, SearchStats, DEFAULT_DEPTH};
pub use selector::{Choice, Disposition};
pub use tree_search::TreeSearchAgent;
