//! Tabular Counterfactual Regret Minimization over the abstract [`Game`].
//!
//! Each information set tracks cumulative regret and strategy weight per
//! action; regret matching on the positive regrets gives the current
//! strategy, and the normalized strategy weights converge toward a Nash
//! equilibrium. Regrets are clipped at zero after every update (CFR+), and
//! both accumulators are periodically discounted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::{Action, Game};

/// Discounting applied to the accumulated regrets and strategy weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DiscountMode {
    /// Every `discount_interval` iterations, scale every regret by
    /// `alpha^-1` and every strategy weight by `beta^-1`.
    Constant { alpha: f64, beta: f64 },
    /// The published Discounted CFR schedule, applied every iteration:
    /// positive regrets scale by `t^alpha / (t^alpha + 1)`, negative by
    /// `t^beta / (t^beta + 1)`, strategy weights by `(t / (t + 1))^gamma`.
    Dcfr { alpha: f64, beta: f64, gamma: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CfrConfig {
    pub discount: DiscountMode,
    /// Outer-iteration period for `DiscountMode::Constant`.
    pub discount_interval: u64,
}

impl Default for CfrConfig {
    fn default() -> CfrConfig {
        CfrConfig {
            discount: DiscountMode::Constant {
                alpha: 1.5,
                beta: 0.5,
            },
            discount_interval: 100,
        }
    }
}

/// Accumulated data for one information set, in the canonical order of the
/// action list seen on first visit.
#[derive(Debug, Clone)]
pub struct InfoSet {
    actions: Vec<Action>,
    regret_sum: Vec<f64>,
    strategy_sum: Vec<f64>,
    visit_count: u64,
}

impl InfoSet {
    fn new(actions: Vec<Action>) -> InfoSet {
        let n = actions.len();
        InfoSet {
            actions,
            regret_sum: vec![0.0; n],
            strategy_sum: vec![0.0; n],
            visit_count: 0,
        }
    }

    /// Current strategy via regret matching: proportional to positive
    /// regrets, uniform when none are positive.
    pub fn current_strategy(&self) -> Vec<f64> {
        let positive_sum: f64 = self.regret_sum.iter().map(|&r| r.max(0.0)).sum();
        if positive_sum > 0.0 {
            self.regret_sum
                .iter()
                .map(|&r| r.max(0.0) / positive_sum)
                .collect()
        } else {
            vec![1.0 / self.actions.len() as f64; self.actions.len()]
        }
    }

    /// Average strategy over all iterations, the Nash approximation.
    pub fn average_strategy(&self) -> Vec<f64> {
        let total: f64 = self.strategy_sum.iter().sum();
        if total > 0.0 {
            self.strategy_sum.iter().map(|&s| s / total).collect()
        } else {
            vec![1.0 / self.actions.len() as f64; self.actions.len()]
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn regret_sum(&self) -> &[f64] {
        &self.regret_sum
    }

    pub fn strategy_sum(&self) -> &[f64] {
        &self.strategy_sum
    }

    pub fn visit_count(&self) -> u64 {
        self.visit_count
    }
}

pub struct CfrSolver {
    info_sets: HashMap<String, InfoSet>,
    iteration: u64,
    config: CfrConfig,
}

impl Default for CfrSolver {
    fn default() -> CfrSolver {
        CfrSolver::new()
    }
}

impl CfrSolver {
    pub fn new() -> CfrSolver {
        CfrSolver::with_config(CfrConfig::default())
    }

    pub fn with_config(config: CfrConfig) -> CfrSolver {
        CfrSolver {
            info_sets: HashMap::new(),
            iteration: 0,
            config,
        }
    }

    /// Runs `iterations` outer iterations, each traversing the full tree
    /// once per player. `game` must be positioned at the root; the
    /// apply/revert discipline returns it there after every traversal.
    pub fn train<G: Game>(&mut self, game: &mut G, iterations: u64) {
        for _ in 0..iterations {
            self.iteration += 1;
            for player in 0..2 {
                self.cfr(game, player, 1.0, 1.0);
            }
            self.apply_discount();
        }
    }

    fn cfr<G: Game>(
        &mut self,
        game: &mut G,
        player: usize,
        pi_self: f64,
        pi_opp: f64,
    ) -> f64 {
        if game.is_terminal() {
            return game.payoff(player);
        }

        if game.is_chance_node() {
            let mut expected = 0.0;
            for (outcome, probability) in game.chance_outcomes() {
                game.apply(outcome);
                expected += probability * self.cfr(game, player, pi_self, pi_opp);
                game.revert(outcome);
            }
            return expected;
        }

        let actions = game.legal_actions();
        if actions.is_empty() {
            // Game contract violation: score the dead end as a draw.
            return 0.0;
        }

        let key = game.info_set_key();
        let strategy = self
            .info_sets
            .entry(key.clone())
            .or_insert_with(|| InfoSet::new(actions.clone()))
            .current_strategy();

        if game.current_player() == player {
            let mut utilities = vec![0.0; actions.len()];
            let mut node_utility = 0.0;
            for (i, &action) in actions.iter().enumerate() {
                game.apply(action);
                let utility = self.cfr(game, player, pi_self * strategy[i], pi_opp);
                game.revert(action);
                utilities[i] = utility;
                node_utility += strategy[i] * utility;
            }

            let weight = self.iteration as f64 / (self.iteration as f64 + 1.0);
            let info = self
                .info_sets
                .get_mut(&key)
                .expect("info set created above");
            for i in 0..utilities.len() {
                let regret = utilities[i] - node_utility;
                // CFR+: clip the accumulated regret at zero.
                info.regret_sum[i] = (info.regret_sum[i] + pi_opp * regret).max(0.0);
                info.strategy_sum[i] += strategy[i] * weight;
            }
            info.visit_count += 1;

            node_utility
        } else {
            let mut node_utility = 0.0;
            for (i, &action) in actions.iter().enumerate() {
                game.apply(action);
                let utility = self.cfr(game, player, pi_self, pi_opp * strategy[i]);
                game.revert(action);
                node_utility += strategy[i] * utility;
            }
            node_utility
        }
    }

    fn apply_discount(&mut self) {
        match self.config.discount {
            DiscountMode::Constant { alpha, beta } => {
                if self.config.discount_interval == 0
                    || self.iteration % self.config.discount_interval != 0
                {
                    return;
                }
                let regret_scale = alpha.powi(-1);
                let strategy_scale = beta.powi(-1);
                for info in self.info_sets.values_mut() {
                    for r in &mut info.regret_sum {
                        *r *= regret_scale;
                    }
                    for s in &mut info.strategy_sum {
                        *s *= strategy_scale;
                    }
                }
            }
            DiscountMode::Dcfr { alpha, beta, gamma } => {
                let t = self.iteration as f64;
                let positive = t.powf(alpha) / (t.powf(alpha) + 1.0);
                let negative = t.powf(beta) / (t.powf(beta) + 1.0);
                let strategy = (t / (t + 1.0)).powf(gamma);
                for info in self.info_sets.values_mut() {
                    for r in &mut info.regret_sum {
                        *r *= if *r > 0.0 { positive } else { negative };
                    }
                    for s in &mut info.strategy_sum {
                        *s *= strategy;
                    }
                }
            }
        }
    }

    /// Average strategy at an information set, normalized over `actions`.
    /// Unseen info sets and zero-mass accumulators yield uniform.
    pub fn strategy(&self, key: &str, actions: &[Action]) -> Vec<f64> {
        let uniform = vec![1.0 / actions.len().max(1) as f64; actions.len()];
        let info = match self.info_sets.get(key) {
            Some(info) => info,
            None => return uniform,
        };

        let mut out = vec![0.0; actions.len()];
        let mut total = 0.0;
        for (i, action) in actions.iter().enumerate() {
            if let Some(pos) = info.actions.iter().position(|a| a == action) {
                out[i] = info.strategy_sum[pos];
                total += out[i];
            }
        }
        if total > 0.0 {
            for v in &mut out {
                *v /= total;
            }
            out
        } else {
            uniform
        }
    }

    /// Positive regret mass per info set, averaged over all info sets.
    ///
    /// A cheap convergence signal that trends toward zero as the strategy
    /// stops regretting its choices. It is not a best-response computation
    /// and does not bound exploitability.
    pub fn regret_convergence_proxy(&self) -> f64 {
        if self.info_sets.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .info_sets
            .values()
            .filter(|info| info.visit_count > 0)
            .map(|info| info.regret_sum.iter().map(|&r| r.max(0.0)).sum::<f64>())
            .sum();
        total / self.info_sets.len() as f64
    }

    pub fn iterations(&self) -> u64 {
        self.iteration
    }

    pub fn info_set_count(&self) -> usize {
        self.info_sets.len()
    }

    pub fn info_set(&self, key: &str) -> Option<&InfoSet> {
        self.info_sets.get(key)
    }

    /// Iterates all info sets with their keys.
    pub fn info_sets(&self) -> impl Iterator<Item = (&str, &InfoSet)> {
        self.info_sets.iter().map(|(k, v)| (k.as_str(), v))
    }
}
