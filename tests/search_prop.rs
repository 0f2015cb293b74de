//! Properties of the move finder over generated mid-game positions.
use connect_four::ai::{find_best_move, TranspositionCache};
use connect_four::game::{GameState, Outcome};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Play `columns` in order, skipping illegal ones, stopping before the game
/// ends.
fn position_from(columns: &[usize]) -> GameState {
    let mut state = GameState::initial();
    for &col in columns {
        let mut next = state.clone();
        let mover = next.to_move();
        if next.apply_move(mover, col).is_ok() && !next.is_terminal() {
            state = next;
        }
    }
    state
}

fn has_immediate_win(state: &GameState) -> bool {
    state.legal_columns().into_iter().any(|col| {
        let mut next = state.clone();
        let mover = next.to_move();
        next.apply_move(mover, col).is_ok() && next.winner() == Some(mover)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn chosen_column_is_always_legal(
        columns in prop::collection::vec(0usize..7, 0..30),
        depth in 0u32..3,
        seed in any::<u64>(),
    ) {
        let state = position_from(&columns);
        let mut cache = TranspositionCache::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let found = find_best_move(&state, depth, &mut cache, &mut rng).unwrap();
        prop_assert!(state.legal_columns().contains(&found.column));
    }

    #[test]
    fn immediate_wins_are_taken(
        columns in prop::collection::vec(0usize..7, 0..30),
        seed in any::<u64>(),
    ) {
        let state = position_from(&columns);
        prop_assume!(has_immediate_win(&state));

        let mover = state.to_move();
        let mut cache = TranspositionCache::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let found = find_best_move(&state, 1, &mut cache, &mut rng).unwrap();
        prop_assert_eq!(found.outcome, Outcome::Win(mover));

        let mut next = state.clone();
        next.apply_move(mover, found.column).unwrap();
        prop_assert_eq!(next.winner(), Some(mover));
    }
}
