//! UCT tree search over the abstract [`Game`] interface.
//!
//! Nodes live in an arena owned by the search handle; parent links are plain
//! indices, never owning, so dropping the handle frees the whole tree. The
//! game state is driven through `apply`/`revert` while descending and is
//! restored to the root state after every iteration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{Action, Game};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MctsConfig {
    /// UCT exploration constant.
    pub exploration: f64,
    /// Random playouts stop after this many moves and evaluate in place.
    pub max_playout_depth: usize,
    /// 0 draws a nondeterministic seed.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> MctsConfig {
        MctsConfig {
            exploration: std::f64::consts::SQRT_2,
            max_playout_depth: 100,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct MctsNode {
    visits: u64,
    total_value: f64,
    /// Action that led here from the parent; `None` only at the root.
    action: Option<Action>,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Action>,
    terminal: bool,
}

impl MctsNode {
    fn average_value(&self) -> f64 {
        if self.visits > 0 {
            self.total_value / self.visits as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub simulations: u64,
    pub tree_depth: usize,
    pub node_count: usize,
    pub best_value: f64,
}

const ROOT: usize = 0;

pub struct MctsSearch {
    nodes: Vec<MctsNode>,
    config: MctsConfig,
    rng: StdRng,
    simulations: u64,
}

impl MctsSearch {
    pub fn new(legal_actions: Vec<Action>) -> MctsSearch {
        MctsSearch::with_config(legal_actions, MctsConfig::default())
    }

    pub fn with_config(legal_actions: Vec<Action>, config: MctsConfig) -> MctsSearch {
        let root = MctsNode {
            visits: 0,
            total_value: 0.0,
            action: None,
            parent: None,
            children: Vec::new(),
            untried: legal_actions,
            terminal: false,
        };
        let rng = if config.seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(config.seed)
        };
        MctsSearch {
            nodes: vec![root],
            config,
            rng,
            simulations: 0,
        }
    }

    /// Runs `iterations` select/expand/simulate/backpropagate cycles.
    ///
    /// `game` must be positioned at the state the root actions were taken
    /// from; it is returned to that state before this call returns.
    pub fn search<G: Game>(&mut self, game: &mut G, iterations: usize) {
        for _ in 0..iterations {
            self.run_iteration(game);
            self.simulations += 1;
        }
    }

    fn run_iteration<G: Game>(&mut self, game: &mut G) {
        let mut node = ROOT;
        let mut path = vec![ROOT];
        // Playout values are taken from the perspective of the player who
        // acted into the evaluated node. Nobody has acted into the root, so
        // start from the opponent of the player to move there.
        let mut actor = if game.is_terminal() {
            0
        } else {
            1 - game.current_player()
        };

        // Selection: follow UCT while fully expanded.
        while self.nodes[node].untried.is_empty() && !self.nodes[node].children.is_empty() {
            let next = self.select_child(node);
            if !game.is_terminal() {
                actor = game.current_player();
            }
            game.apply(self.nodes[next].action.expect("non-root node has an action"));
            node = next;
            path.push(node);
        }

        // Expansion: try one untried action uniformly at random.
        if !self.nodes[node].untried.is_empty() && !self.nodes[node].terminal {
            let pick = self.rng.gen_range(0..self.nodes[node].untried.len());
            let action = self.nodes[node].untried.remove(pick);
            if !game.is_terminal() {
                actor = game.current_player();
            }
            game.apply(action);

            let terminal = game.is_terminal();
            let child = MctsNode {
                visits: 0,
                total_value: 0.0,
                action: Some(action),
                parent: Some(node),
                children: Vec::new(),
                untried: if terminal { Vec::new() } else { game.legal_actions() },
                terminal,
            };
            self.nodes.push(child);
            let child_index = self.nodes.len() - 1;
            self.nodes[node].children.push(child_index);
            node = child_index;
            path.push(node);
        }

        let value = self.playout(game, self.nodes[node].terminal, actor);

        // Backpropagation: negate while ascending (two-player zero-sum).
        let mut v = value;
        let mut current = Some(node);
        while let Some(i) = current {
            self.nodes[i].visits += 1;
            self.nodes[i].total_value += v;
            v = -v;
            current = self.nodes[i].parent;
        }

        // Unwind the game state.
        for &i in path.iter().skip(1).rev() {
            game.revert(self.nodes[i].action.expect("non-root node has an action"));
        }
    }

    /// Random playout from the current game state, evaluated for `actor`.
    fn playout<G: Game>(&mut self, game: &mut G, terminal: bool, actor: usize) -> f64 {
        if terminal {
            return game.payoff(actor);
        }

        let mut applied = Vec::new();
        let mut dead_end = false;
        for _ in 0..self.config.max_playout_depth {
            if game.is_terminal() {
                break;
            }
            let actions = game.legal_actions();
            if actions.is_empty() {
                // Game contract violation: score it as a drawn dead end.
                dead_end = true;
                break;
            }
            let action = actions[self.rng.gen_range(0..actions.len())];
            game.apply(action);
            applied.push(action);
        }

        let value = if dead_end { 0.0 } else { game.payoff(actor) };
        for &action in applied.iter().rev() {
            game.revert(action);
        }
        value
    }

    fn select_child(&self, parent: usize) -> usize {
        let parent_visits = self.nodes[parent].visits.max(1) as f64;
        let mut best = self.nodes[parent].children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child in &self.nodes[parent].children {
            let n = &self.nodes[child];
            let score = if n.visits == 0 {
                f64::INFINITY
            } else {
                n.average_value()
                    + self.config.exploration * (parent_visits.ln() / n.visits as f64).sqrt()
            };
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        best
    }

    /// The most-visited root action, or `None` if the root was never
    /// expanded. Ties go to the first-expanded child.
    pub fn best_action(&self) -> Option<Action> {
        let mut best: Option<(Action, u64)> = None;
        for &child in &self.nodes[ROOT].children {
            let n = &self.nodes[child];
            if best.map_or(true, |(_, v)| n.visits > v) {
                best = Some((n.action.expect("child has an action"), n.visits));
            }
        }
        best.map(|(a, _)| a)
    }

    /// Visit-count distribution over the root actions. Empty before the
    /// first expansion; otherwise sums to 1.
    pub fn policy(&self) -> Vec<(Action, f64)> {
        let total: u64 = self.nodes[ROOT]
            .children
            .iter()
            .map(|&c| self.nodes[c].visits)
            .sum();
        if total == 0 {
            return Vec::new();
        }
        self.nodes[ROOT]
            .children
            .iter()
            .map(|&c| {
                let n = &self.nodes[c];
                (
                    n.action.expect("child has an action"),
                    n.visits as f64 / total as f64,
                )
            })
            .collect()
    }

    pub fn stats(&self) -> SearchStats {
        // Children are pushed after their parents, so one forward pass
        // resolves every depth.
        let mut depths = vec![0usize; self.nodes.len()];
        let mut tree_depth = 0;
        for i in 1..self.nodes.len() {
            let parent = self.nodes[i].parent.expect("non-root node has a parent");
            depths[i] = depths[parent] + 1;
            tree_depth = tree_depth.max(depths[i]);
        }

        let best_value = self.nodes[ROOT]
            .children
            .iter()
            .map(|&c| self.nodes[c].average_value())
            .fold(f64::NEG_INFINITY, f64::max);

        SearchStats {
            simulations: self.simulations,
            tree_depth,
            node_count: self.nodes.len(),
            best_value: if self.nodes[ROOT].children.is_empty() {
                0.0
            } else {
                best_value
            },
        }
    }
}
