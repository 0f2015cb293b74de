use crate::game::GameState;

/// Anything that can pick a column for the player to move.
pub trait Agent: Send {
    /// Select a column given the current game state.
    fn select_action(&mut self, state: &GameState) -> usize;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
