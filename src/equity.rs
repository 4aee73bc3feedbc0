//! Monte Carlo equity estimation.
//!
//! Iterations are split statically across rayon workers; each worker owns a
//! seeded xorshift generator and a deck scratch buffer, so the hot loop takes
//! no locks and the counters are summed only after the join. Results are
//! bit-exact reproducible for a fixed seed and thread count (a different
//! thread count re-partitions the iterations and may land on different
//! counters).

use std::fmt;

use rand::{Rng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardMask, Deck};
use crate::error::{GtoError, GtoResult};
use crate::hand_evaluator::evaluate_seven;

/// XorShift64 generator for the simulation hot path.
///
/// Deliberately minimal: one u64 of state, three shifts per draw. Workers are
/// seeded `base_seed + worker_index` so runs are reproducible without any
/// shared state.
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    pub fn new(seed: u64) -> XorShiftRng {
        XorShiftRng {
            // Xorshift has a single fixed point at zero.
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }
}

impl RngCore for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    pub wins: u64,
    pub ties: u64,
    pub losses: u64,
    pub iterations: u64,
    /// `(wins + ties/2) / iterations`, or 0.0 when no iterations ran.
    pub equity: f32,
}

impl EquityResult {
    fn from_counts(wins: u64, ties: u64, losses: u64) -> EquityResult {
        let iterations = wins + ties + losses;
        let equity = if iterations == 0 {
            0.0
        } else {
            (wins as f32 + ties as f32 * 0.5) / iterations as f32
        };
        EquityResult {
            wins,
            ties,
            losses,
            iterations,
            equity,
        }
    }
}

impl fmt::Display for EquityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.iterations.max(1) as f32;
        write!(
            f,
            "Win {:.1}% | Tie {:.1}% | Lose {:.1}% (equity: {:.1}%)",
            self.wins as f32 / total * 100.0,
            self.ties as f32 / total * 100.0,
            self.losses as f32 / total * 100.0,
            self.equity * 100.0,
        )
    }
}

fn check_request(dead: &[Card], board_len: usize, opponents: usize) -> GtoResult<()> {
    if board_len > 5 {
        return Err(GtoError::InvalidValue(format!(
            "Board has {} cards, at most 5 allowed",
            board_len
        )));
    }
    if opponents == 0 {
        return Err(GtoError::InvalidValue(
            "Need at least one opponent".to_string(),
        ));
    }
    let required = 2 + board_len + 2 * opponents;
    if required > 52 {
        return Err(GtoError::InsufficientDeck {
            required,
            opponents,
        });
    }
    debug_assert_eq!(
        CardMask::from_cards(dead).count() as usize,
        dead.len(),
        "hero and board cards must be distinct"
    );
    Ok(())
}

/// Splits `iterations` across the rayon pool and sums the worker counters.
fn run_parallel<F>(iterations: u64, seed: u64, worker: F) -> EquityResult
where
    F: Fn(u64, u64) -> (u64, u64, u64) + Sync,
{
    let base_seed = if seed == 0 {
        rand::thread_rng().gen()
    } else {
        seed
    };

    let threads = rayon::current_num_threads().max(1) as u64;
    let per_worker = iterations / threads;
    let extra = iterations % threads;

    let counts: Vec<(u64, u64, u64)> = (0..threads)
        .into_par_iter()
        .map(|t| {
            let iters = per_worker + u64::from(t < extra);
            worker(iters, base_seed.wrapping_add(t))
        })
        .collect();

    let (wins, ties, losses) = counts
        .iter()
        .fold((0, 0, 0), |acc, &(w, t, l)| (acc.0 + w, acc.1 + t, acc.2 + l));
    EquityResult::from_counts(wins, ties, losses)
}

/// Equity of a hero hand against `opponents` uniformly random holdings.
///
/// The board may hold 0-5 known cards; each iteration completes it from a
/// freshly shuffled deck, then deals every opponent two cards. An opponent
/// that strictly beats the hero ends the iteration as a loss immediately;
/// ties only count when no opponent won. Seed 0 draws a nondeterministic
/// base seed.
pub fn equity_vs_random(
    hero: [Card; 2],
    board: &[Card],
    opponents: usize,
    iterations: u64,
    seed: u64,
) -> GtoResult<EquityResult> {
    let mut dead_cards = hero.to_vec();
    dead_cards.extend_from_slice(board);
    check_request(&dead_cards, board.len(), opponents)?;
    if iterations == 0 {
        return Ok(EquityResult::from_counts(0, 0, 0));
    }

    let dead = CardMask::from_cards(&dead_cards);
    let board: Vec<Card> = board.to_vec();

    Ok(run_parallel(iterations, seed, |iters, worker_seed| {
        simulate_random(hero, &board, dead, opponents, iters, worker_seed)
    }))
}

fn simulate_random(
    hero: [Card; 2],
    board: &[Card],
    dead: CardMask,
    opponents: usize,
    iterations: u64,
    seed: u64,
) -> (u64, u64, u64) {
    let mut rng = XorShiftRng::new(seed);
    let mut deck = Deck::without(dead);
    let known = board.len();

    let mut hero_hand = [hero[0]; 7];
    hero_hand[1] = hero[1];
    hero_hand[2..2 + known].copy_from_slice(board);

    let (mut wins, mut ties, mut losses) = (0u64, 0u64, 0u64);

    for _ in 0..iterations {
        deck.shuffle(&mut rng);
        let live = deck.live();
        let mut pos = 0;

        for slot in hero_hand[2 + known..7].iter_mut() {
            *slot = live[pos];
            pos += 1;
        }
        let hero_score = evaluate_seven(&hero_hand);

        let mut won = true;
        let mut tied = false;
        for _ in 0..opponents {
            let mut opp_hand = hero_hand;
            opp_hand[0] = live[pos];
            opp_hand[1] = live[pos + 1];
            pos += 2;

            let opp_score = evaluate_seven(&opp_hand);
            if opp_score > hero_score {
                won = false;
                break;
            } else if opp_score == hero_score {
                tied = true;
            }
        }

        if won {
            if tied {
                ties += 1;
            } else {
                wins += 1;
            }
        } else {
            losses += 1;
        }
    }

    (wins, ties, losses)
}

/// Equity of a hero hand against one known villain hand.
pub fn equity_vs_hand(
    hero: [Card; 2],
    villain: [Card; 2],
    board: &[Card],
    iterations: u64,
    seed: u64,
) -> GtoResult<EquityResult> {
    let mut dead_cards = hero.to_vec();
    dead_cards.extend_from_slice(&villain);
    dead_cards.extend_from_slice(board);
    check_request(&dead_cards, board.len(), 1)?;
    if iterations == 0 {
        return Ok(EquityResult::from_counts(0, 0, 0));
    }

    let dead = CardMask::from_cards(&dead_cards);
    let board: Vec<Card> = board.to_vec();

    Ok(run_parallel(iterations, seed, |iters, worker_seed| {
        simulate_vs_hand(hero, villain, &board, dead, iters, worker_seed)
    }))
}

fn simulate_vs_hand(
    hero: [Card; 2],
    villain: [Card; 2],
    board: &[Card],
    dead: CardMask,
    iterations: u64,
    seed: u64,
) -> (u64, u64, u64) {
    let mut rng = XorShiftRng::new(seed);
    let mut deck = Deck::without(dead);
    let known = board.len();

    let mut hero_hand = [hero[0]; 7];
    hero_hand[1] = hero[1];
    hero_hand[2..2 + known].copy_from_slice(board);
    let mut villain_hand = hero_hand;
    villain_hand[0] = villain[0];
    villain_hand[1] = villain[1];

    let (mut wins, mut ties, mut losses) = (0u64, 0u64, 0u64);

    for _ in 0..iterations {
        deck.shuffle(&mut rng);
        let live = deck.live();

        for i in 0..5 - known {
            hero_hand[2 + known + i] = live[i];
            villain_hand[2 + known + i] = live[i];
        }

        let hero_score = evaluate_seven(&hero_hand);
        let villain_score = evaluate_seven(&villain_hand);

        match hero_score.cmp(&villain_score) {
            std::cmp::Ordering::Greater => wins += 1,
            std::cmp::Ordering::Equal => ties += 1,
            std::cmp::Ordering::Less => losses += 1,
        }
    }

    (wins, ties, losses)
}
