use std::collections::HashMap;

use super::node::Evaluation;
use crate::game::{GameState, Player};

/// Transposition-table key.
///
/// Besides the cell layout the key carries the player to move, the depth
/// budget left below the position and the search horizon. Horizon leaves
/// report the horizon as their distance, so an entry is only reused under
/// the exact budget it was computed with. `root_pieces` is the piece count
/// of the search root the entry was produced under; it follows from the
/// other fields and is kept for eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub fingerprint: u128,
    pub to_move: Player,
    pub remaining: u32,
    pub horizon: u32,
    pub root_pieces: u32,
}

impl CacheKey {
    pub fn new(state: &GameState, remaining: u32, horizon: u32) -> Self {
        let depth = horizon.saturating_sub(remaining);
        CacheKey {
            fingerprint: state.board().fingerprint(),
            to_move: state.to_move(),
            remaining,
            horizon,
            root_pieces: (state.board().piece_count() as u32).saturating_sub(depth),
        }
    }
}

/// Evaluations of completed interior nodes, shared across searches.
#[derive(Debug, Default)]
pub struct TranspositionCache {
    entries: HashMap<CacheKey, Evaluation>,
}

impl TranspositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Evaluation> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: CacheKey, evaluation: Evaluation) {
        self.entries.insert(key, evaluation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every entry that a search from a root with `root_pieces` pieces
    /// and the given horizon can never look up. Returns how many were removed.
    pub fn retain_root(&mut self, root_pieces: u32, horizon: u32) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|key, _| key.root_pieces == root_pieces && key.horizon == horizon);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Outcome;

    #[test]
    fn key_separates_mover_and_budgets() {
        let state = GameState::initial();
        let other_mover = GameState::from_parts(*state.board(), Player::Two);

        let base = CacheKey::new(&state, 3, 7);
        assert_ne!(base, CacheKey::new(&other_mover, 3, 7));
        assert_ne!(base, CacheKey::new(&state, 4, 7));
        assert_ne!(base, CacheKey::new(&state, 3, 6));
        assert_eq!(base, CacheKey::new(&state.clone(), 3, 7));
    }

    #[test]
    fn insert_and_get() {
        let mut cache = TranspositionCache::new();
        let key = CacheKey::new(&GameState::initial(), 2, 7);
        assert!(cache.get(&key).is_none());

        let eval = Evaluation {
            outcome: Outcome::Draw,
            distance: 2,
        };
        cache.insert(key, eval);
        assert_eq!(cache.get(&key), Some(eval));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn key_records_root_piece_count() {
        let mut state = GameState::initial();
        for col in [3, 3, 2] {
            let mover = state.to_move();
            state.apply_move(mover, col).unwrap();
        }
        // Three pieces, two plies below a root searched with horizon 5.
        assert_eq!(CacheKey::new(&state, 3, 5).root_pieces, 1);
        assert_eq!(CacheKey::new(&state, 5, 5).root_pieces, 3);
    }

    #[test]
    fn retain_root_evicts_other_roots_and_horizons() {
        let eval = Evaluation {
            outcome: Outcome::Draw,
            distance: 1,
        };
        let mut state = GameState::initial();
        let mut cache = TranspositionCache::new();
        for col in [0, 1, 2, 3] {
            let mover = state.to_move();
            state.apply_move(mover, col).unwrap();
            // One entry per ply for a root at 0 pieces, plus one for a root
            // at 1 piece and one under a different horizon.
            let pieces = state.board().piece_count() as u32;
            cache.insert(CacheKey::new(&state, 6 - pieces, 6), eval);
            cache.insert(CacheKey::new(&state, 7 - pieces, 6), eval);
            cache.insert(CacheKey::new(&state, 4 - pieces, 4), eval);
        }
        assert_eq!(cache.len(), 12);

        assert_eq!(cache.retain_root(0, 6), 8);
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.retain_root(0, 6), 0);
        assert_eq!(cache.retain_root(2, 6), 4);
        assert!(cache.is_empty());
    }
}
