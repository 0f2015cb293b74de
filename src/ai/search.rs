//! Depth-limited, memoized game-tree search.
//!
//! The tree is walked depth first without recursion: the active path is kept
//! as a stack of child indices from the root, and every loop iteration looks
//! at the node on top of it. A node is finished as soon as it can be given an
//! [`Evaluation`], either from the transposition cache, as an artificial draw
//! beyond the horizon, as a finished game, or from its fully evaluated
//! children.

use log::{debug, info, log_enabled, trace, warn, Level};
use rand::Rng;

use super::cache::{CacheKey, TranspositionCache};
use super::node::{Evaluation, SearchNode};
use super::selector::{self, Disposition};
use crate::error::SearchError;
use crate::game::{GameState, Outcome, COLS};

/// Default search horizon in plies.
pub const DEFAULT_DEPTH: u32 = 7;

/// Counters collected while walking the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Interior nodes evaluated from their children.
    pub interior: usize,
    /// Finished games reached.
    pub terminal: usize,
    /// Nodes cut off at the horizon.
    pub horizon: usize,
    /// Nodes answered by the transposition cache.
    pub cache_hits: usize,
}

impl SearchStats {
    pub fn positions(&self) -> usize {
        self.interior + self.terminal + self.horizon + self.cache_hits
    }
}

/// Column chosen for a position, plus what the search believes will happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub column: usize,
    pub outcome: Outcome,
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Answer given when a search cannot produce a move.
    pub fn fallback() -> Self {
        SearchOutcome {
            column: 0,
            outcome: Outcome::Draw,
            stats: SearchStats::default(),
        }
    }
}

/// Search `state` to `depth_limit` plies and pick a column for the player to
/// move. A finished game has no move to make and is answered with column 0
/// and a draw.
pub fn find_best_move<R: Rng + ?Sized>(
    state: &GameState,
    depth_limit: u32,
    cache: &mut TranspositionCache,
    rng: &mut R,
) -> Result<SearchOutcome, SearchError> {
    if state.is_terminal() {
        warn!("Asked to move in a finished game; answering column 0");
        return Ok(SearchOutcome::fallback());
    }

    info!("Starting move finder with depth {depth_limit}...");
    let mut root = SearchNode::root(state.clone());
    let stats = evaluate(&mut root, depth_limit, cache)?;
    info!(
        "Move finder done. {} positions explored ({} cache hits, {} cached total).",
        stats.positions(),
        stats.cache_hits,
        cache.len()
    );

    if let (Some(eval), Some(disposition)) = (root.evaluation, Disposition::of(&root)) {
        info!(
            "Current outcome is {} in {} (I think {})",
            eval.outcome,
            eval.distance,
            disposition.describe()
        );
    }
    if log_enabled!(Level::Debug) {
        let summary: Vec<String> = root
            .children
            .iter()
            .filter_map(|child| {
                let eval = child.evaluation?;
                Some(format!("[{} -> {} in {}]", child.mv? + 1, eval.outcome, eval.distance))
            })
            .collect();
        debug!("Outcomes for each move: {}", summary.join(" "));
        debug!("Found {} candidate moves.", selector::candidates(&root).len());
    }

    let choice = selector::choose(&root, rng);
    let column = match choice.column {
        Some(column) => column,
        None => {
            warn!("Root has no playable children; defaulting to column 0");
            0
        }
    };
    info!("Chose move {} with outcome {}", column + 1, choice.outcome);

    Ok(SearchOutcome {
        column,
        outcome: choice.outcome,
        stats,
    })
}

/// Fill in the evaluation of `root` and of every node the walk touches.
/// On return the root's children are kept; deeper subtrees are dropped once
/// their parent is evaluated.
///
/// Cache entries left by searches from roots with another piece count or
/// horizon are evicted first, since this walk can never look them up.
pub fn evaluate(
    root: &mut SearchNode,
    depth_limit: u32,
    cache: &mut TranspositionCache,
) -> Result<SearchStats, SearchError> {
    let evicted = cache.retain_root(root.state.board().piece_count() as u32, depth_limit);
    if evicted > 0 {
        debug!("Evicted {evicted} unreachable cache entries ({} kept).", cache.len());
    }

    let mut stats = SearchStats::default();
    let mut path: Vec<usize> = Vec::new();

    loop {
        let is_root = path.is_empty();
        let node = node_at(root, &path);
        let key = (node.depth <= depth_limit)
            .then(|| CacheKey::new(&node.state, depth_limit - node.depth, depth_limit));

        if !is_root {
            if let Some(eval) = key.and_then(|key| cache.get(&key)) {
                node.evaluation = Some(eval);
                stats.cache_hits += 1;
                path.pop();
                continue;
            }

            if node.depth > depth_limit {
                node.evaluation = Some(Evaluation {
                    outcome: Outcome::Draw,
                    distance: depth_limit,
                });
                stats.horizon += 1;
                path.pop();
                continue;
            }
        }

        if let Some(outcome) = node.state.outcome() {
            node.evaluation = Some(Evaluation {
                outcome,
                distance: 0,
            });
            stats.terminal += 1;
            if log_enabled!(Level::Trace) {
                trace!(
                    "End state {} found after {} moves. Path: {}",
                    outcome,
                    path.len(),
                    describe_path(root, &path)
                );
            }
            if is_root {
                break;
            }
            path.pop();
            continue;
        }

        if node.children.is_empty() {
            expand(node);
        }
        if let Some(next) = node.children.iter().position(|child| !child.is_evaluated()) {
            path.push(next);
            continue;
        }

        let eval = evaluate_interior(node).ok_or(SearchError::NoChildren { depth: node.depth })?;
        node.evaluation = Some(eval);
        stats.interior += 1;
        if is_root {
            break;
        }
        node.children.clear();
        if let Some(key) = key {
            cache.insert(key, eval);
        }
        path.pop();
    }

    Ok(stats)
}

fn node_at<'n>(root: &'n mut SearchNode, path: &[usize]) -> &'n mut SearchNode {
    let mut node = root;
    for &index in path {
        node = &mut node.children[index];
    }
    node
}

fn expand(node: &mut SearchNode) {
    node.children = legal_children(node);
}

/// One child per legal column, left to right.
fn legal_children(parent: &SearchNode) -> Vec<SearchNode> {
    let mover = parent.state.to_move();
    (0..COLS)
        .filter_map(|column| {
            let mut next = parent.state.clone();
            // Illegal columns simply produce no child.
            next.apply_move(mover, column).ok()?;
            Some(SearchNode::child(parent, column, next))
        })
        .collect()
}

/// Evaluation of a node whose children are all evaluated.
///
/// The mover takes a win if one exists, else a draw, else concedes. The
/// distance is one more than the smallest child distance over all children,
/// not only those reaching the chosen outcome.
fn evaluate_interior(node: &SearchNode) -> Option<Evaluation> {
    let mover = node.state.to_move();
    let outcomes: Vec<Outcome> = node.children.iter().filter_map(SearchNode::outcome).collect();
    let closest = node.children.iter().filter_map(SearchNode::distance).min()?;

    let outcome = if outcomes.contains(&Outcome::Win(mover)) {
        Outcome::Win(mover)
    } else if outcomes.contains(&Outcome::Draw) {
        Outcome::Draw
    } else {
        Outcome::Win(mover.other())
    };

    Some(Evaluation {
        outcome,
        distance: closest + 1,
    })
}

fn describe_path(root: &SearchNode, path: &[usize]) -> String {
    let mut parts = Vec::with_capacity(path.len());
    let mut node = root;
    for &index in path {
        let child = &node.children[index];
        if let Some(column) = child.mv {
            parts.push(format!("{} -> {}", node.state.to_move(), column + 1));
        }
        node = child;
    }
    parts.join(" ")
}
