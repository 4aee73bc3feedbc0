/// Action (or chance-outcome) identifier supplied by the game.
pub type Action = i32;

/// The game surface the search engines run against.
///
/// Implementations hold a mutable game state and expose it through this
/// narrow capability set; the engines assume nothing else about the
/// representation. `apply` and `revert` must form a perfect stack: every
/// `apply` on a traversal path is paired with a `revert` on the reverse path,
/// restoring the state bit-for-bit.
///
/// `info_set_key` must be deterministic and collision-free across
/// semantically distinct information sets of the current player.
pub trait Game {
    fn is_terminal(&self) -> bool;

    /// True at nodes where chance, not a player, moves. Only the CFR solver
    /// visits chance nodes; MCTS games may return `false` unconditionally.
    fn is_chance_node(&self) -> bool;

    /// The player to act, 0 or 1. Undefined at terminal and chance nodes.
    fn current_player(&self) -> usize;

    fn legal_actions(&self) -> Vec<Action>;

    /// Payoff to `player`. Called at terminal states, and by MCTS as a state
    /// evaluation when a playout hits its depth cap.
    fn payoff(&self, player: usize) -> f64;

    /// Chance outcomes and their probabilities, summing to 1. Undefined
    /// outside chance nodes.
    fn chance_outcomes(&self) -> Vec<(Action, f64)>;

    fn apply(&mut self, action: Action);

    fn revert(&mut self, action: Action);

    fn info_set_key(&self) -> String;
}
