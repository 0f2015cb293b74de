use crate::game::{GameState, Outcome};

/// Assessed result of a searched position and how many plies away it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub distance: u32,
}

/// One position in the search tree. Children are owned; there are no parent
/// links, the search keeps the active path itself.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: GameState,
    /// Column played to reach this node from its parent. `None` at the root.
    pub mv: Option<usize>,
    pub depth: u32,
    pub children: Vec<SearchNode>,
    pub evaluation: Option<Evaluation>,
}

impl SearchNode {
    pub fn root(state: GameState) -> Self {
        SearchNode {
            state,
            mv: None,
            depth: 0,
            children: Vec::new(),
            evaluation: None,
        }
    }

    pub fn child(parent: &SearchNode, column: usize, state: GameState) -> Self {
        SearchNode {
            state,
            mv: Some(column),
            depth: parent.depth + 1,
            children: Vec::new(),
            evaluation: None,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.evaluation.map(|e| e.outcome)
    }

    pub fn distance(&self) -> Option<u32> {
        self.evaluation.map(|e| e.distance)
    }
}
