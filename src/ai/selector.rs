use rand::seq::IndexedRandom;
use rand::Rng;

use super::node::SearchNode;
use crate::game::Outcome;

/// How the evaluated root looks from the mover's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Winning,
    Drawing,
    Losing,
}

impl Disposition {
    pub fn of(root: &SearchNode) -> Option<Disposition> {
        let outcome = root.outcome()?;
        Some(match outcome {
            Outcome::Draw => Disposition::Drawing,
            Outcome::Win(player) if player == root.state.to_move() => Disposition::Winning,
            Outcome::Win(_) => Disposition::Losing,
        })
    }

    pub fn describe(self) -> &'static str {
        match self {
            Disposition::Winning => "winning",
            Disposition::Drawing => "draw/undecided",
            Disposition::Losing => "losing",
        }
    }
}

/// The column picked for the root, with its assessed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub column: Option<usize>,
    pub outcome: Outcome,
}

/// Children of an evaluated root that reach the root's outcome at the best
/// distance: the shortest one when winning or drawing, the longest one when
/// losing.
pub fn candidates(root: &SearchNode) -> Vec<&SearchNode> {
    let (Some(target), Some(disposition)) = (root.outcome(), Disposition::of(root)) else {
        return Vec::new();
    };

    let matching = root
        .children
        .iter()
        .filter(|child| child.outcome() == Some(target));
    let distances = matching.clone().filter_map(SearchNode::distance);
    let best = match disposition {
        Disposition::Losing => distances.max(),
        Disposition::Winning | Disposition::Drawing => distances.min(),
    };

    match best {
        Some(best) => matching.filter(|child| child.distance() == Some(best)).collect(),
        None => Vec::new(),
    }
}

/// Pick uniformly among [`candidates`]. With no children the root itself is
/// returned as the degenerate choice.
pub fn choose<R: Rng + ?Sized>(root: &SearchNode, rng: &mut R) -> Choice {
    let fallback = Choice {
        column: root.mv,
        outcome: root.outcome().unwrap_or(Outcome::Draw),
    };
    if root.children.is_empty() {
        return fallback;
    }

    let pool = candidates(root);
    match pool.choose(rng) {
        Some(child) => Choice {
            column: child.mv,
            outcome: child.outcome().unwrap_or(Outcome::Draw),
        },
        None => fallback,
    }
}
