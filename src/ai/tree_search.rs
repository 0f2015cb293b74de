use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use log::{error, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::agent::Agent;
use super::cache::TranspositionCache;
use super::search::{self, SearchOutcome, DEFAULT_DEPTH};
use crate::error::SearchError;
use crate::game::GameState;

/// Bot that runs a full depth-limited search for every move.
///
/// Each search runs on its own worker thread while the caller waits for the
/// result. The transposition cache outlives individual searches; at most one
/// search uses it at a time.
pub struct TreeSearchAgent {
    depth: u32,
    cache: Arc<Mutex<TranspositionCache>>,
    rng: StdRng,
}

impl TreeSearchAgent {
    pub fn new(depth: u32) -> Self {
        TreeSearchAgent {
            depth,
            cache: Arc::new(Mutex::new(TranspositionCache::new())),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic tie-breaking, for reproducible games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Share a cache with other agents instead of owning a private one.
    pub fn with_cache(mut self, cache: Arc<Mutex<TranspositionCache>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn cache(&self) -> &Arc<Mutex<TranspositionCache>> {
        &self.cache
    }

    /// Search `state` and return the chosen column with its assessed outcome.
    /// Never fails: any search failure is logged and answered with column 0.
    pub fn search(&mut self, state: &GameState) -> SearchOutcome {
        match self.dispatch(state) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Move search failed: {e}; falling back to column 0");
                SearchOutcome::fallback()
            }
        }
    }

    fn dispatch(&mut self, state: &GameState) -> Result<SearchOutcome, SearchError> {
        let (result_tx, result_rx) = mpsc::channel();
        let cache = Arc::clone(&self.cache);
        let state = state.clone();
        let depth = self.depth;
        let mut rng = StdRng::from_rng(&mut self.rng);

        let handle = thread::Builder::new()
            .name("move-search".into())
            .spawn(move || {
                let mut cache = match cache.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => {
                        warn!("Transposition cache was poisoned by a failed search; clearing it");
                        cache.clear_poison();
                        let mut guard = poisoned.into_inner();
                        guard.clear();
                        guard
                    }
                };
                let result = search::find_best_move(&state, depth, &mut cache, &mut rng);
                let _ = result_tx.send(result);
            })
            .map_err(|e| {
                error!("Could not start search worker: {e}");
                SearchError::WorkerLost
            })?;

        // A worker that panics drops its sender without sending.
        let result = result_rx.recv().map_err(|_| SearchError::WorkerLost);
        let _ = handle.join();
        result?
    }
}

impl Default for TreeSearchAgent {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl Agent for TreeSearchAgent {
    fn select_action(&mut self, state: &GameState) -> usize {
        self.search(state).column
    }

    fn name(&self) -> &str {
        "TreeSearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::game::{Outcome, Player};

    fn play(moves: &[usize]) -> GameState {
        let mut state = GameState::initial();
        for &col in moves {
            let player = state.to_move();
            state.apply_move(player, col).unwrap();
        }
        state
    }

    #[test]
    fn takes_winning_move() {
        let mut agent = TreeSearchAgent::new(4).with_seed(3);
        let state = play(&[1, 0, 2, 1, 3, 2]);
        let result = agent.search(&state);
        assert_eq!(result.column, 4);
        assert_eq!(result.outcome, Outcome::Win(Player::One));
        assert_eq!(agent.select_action(&state), 4);
    }

    #[test]
    fn finished_game_falls_back() {
        let mut agent = TreeSearchAgent::new(3);
        let state = play(&[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(agent.search(&state), SearchOutcome::fallback());
    }

    #[test]
    fn cache_persists_between_searches() {
        let mut agent = TreeSearchAgent::new(3).with_seed(9);
        agent.search(&GameState::initial());
        let cached = agent.cache().lock().unwrap().len();
        assert!(cached > 0);

        let second = agent.search(&GameState::initial());
        assert!(second.stats.cache_hits > 0);
    }

    #[test]
    fn cache_stays_bounded_over_a_game() {
        let depth = 4;
        let mut agent = TreeSearchAgent::new(depth).with_seed(21);
        let mut state = GameState::initial();

        for _ in 0..10 {
            let mut fresh = TranspositionCache::new();
            let mut rng = StdRng::seed_from_u64(0);
            search::find_best_move(&state, depth, &mut fresh, &mut rng).unwrap();

            let column = agent.select_action(&state);
            // Only entries reachable from the current root are kept.
            assert_eq!(agent.cache().lock().unwrap().len(), fresh.len());

            let player = state.to_move();
            state.apply_move(player, column).unwrap();
            if state.is_terminal() {
                break;
            }
        }
    }

    #[test]
    fn recovers_from_poisoned_cache() {
        let cache = Arc::new(Mutex::new(TranspositionCache::new()));
        let poisoner = Arc::clone(&cache);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the cache");
        })
        .join();
        assert!(cache.is_poisoned());

        let mut agent = TreeSearchAgent::new(2).with_cache(Arc::clone(&cache));
        let result = agent.search(&GameState::initial());
        assert!(result.column < 7);
        assert!(!cache.is_poisoned());
    }

    #[test]
    fn beats_random_agent() {
        let games_per_side = 4;
        let mut wins = 0;

        for game in 0..games_per_side * 2 {
            let bot_player = if game % 2 == 0 { Player::One } else { Player::Two };
            let mut bot = TreeSearchAgent::new(4).with_seed(game as u64);
            let mut random = RandomAgent::with_seed(100 + game as u64);
            let mut state = GameState::initial();

            while !state.is_terminal() {
                let player = state.to_move();
                let action = if player == bot_player {
                    bot.select_action(&state)
                } else {
                    random.select_action(&state)
                };
                state.apply_move(player, action).unwrap();
            }

            if state.winner() == Some(bot_player) {
                wins += 1;
            }
        }

        assert!(
            wins >= games_per_side * 2 - 2,
            "tree search should beat random almost always, won {wins}/{}",
            games_per_side * 2
        );
    }

    #[test]
    fn name_is_tree_search() {
        assert_eq!(TreeSearchAgent::default().name(), "TreeSearch");
        assert_eq!(TreeSearchAgent::default().depth(), DEFAULT_DEPTH);
    }
}
