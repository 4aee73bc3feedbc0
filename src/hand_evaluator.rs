//! Constant-time 7-card hand evaluation.
//!
//! Every 7-card holding maps to a 32-bit `HandScore` whose numeric order is
//! exactly the poker hand-strength order. Flush and no-pair hands are scored
//! through two 8192-entry lookup tables over 13-bit rank masks, built once at
//! first use; everything else is resolved from per-rank counts.

use std::fmt;

use once_cell::sync::Lazy;

use crate::cards::{Card, CardMask};
use crate::error::{GtoError, GtoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    fn from_bits(bits: u32) -> HandCategory {
        match bits {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            _ => HandCategory::StraightFlush,
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
        }
    }
}

/// Totally ordered 7-card hand strength.
///
/// Bits 31..28 hold the category; the tie-breakers below it are 4-bit rank
/// nibbles packed big-endian by importance (primary, secondary, kickers), so
/// comparing the raw `u32` compares hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandScore(u32);

impl HandScore {
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn category(self) -> HandCategory {
        HandCategory::from_bits(self.0 >> CATEGORY_SHIFT)
    }
}

impl fmt::Display for HandScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())
    }
}

const CATEGORY_SHIFT: u32 = 28;
const RANK_MASK_SIZE: usize = 1 << 13;

/// Packs a category and up to five rank nibbles, most significant first.
fn pack(category: HandCategory, ranks: &[u8]) -> u32 {
    let mut score = (category as u32) << CATEGORY_SHIFT;
    for (i, &r) in ranks.iter().enumerate() {
        score |= (r as u32) << (24 - 4 * i as u32);
    }
    score
}

/// Highest straight in a 13-bit rank mask: the top rank of any 5-consecutive
/// run, or the five (index 3) for the wheel.
fn straight_high(mask: u16) -> Option<u8> {
    for i in (0..=8u8).rev() {
        if (mask >> i) & 0x1F == 0x1F {
            return Some(i + 4);
        }
    }
    if mask & 0x100F == 0x100F {
        return Some(3);
    }
    None
}

/// The `n` highest set ranks of a mask, descending.
fn top_ranks(mask: u16, n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n);
    for r in (0..13u8).rev() {
        if mask & (1 << r) != 0 {
            out.push(r);
            if out.len() == n {
                break;
            }
        }
    }
    out
}

struct EvaluatorTables {
    /// Score of the best 5-card hand within a suit carrying this rank mask.
    /// Meaningful only for masks with at least 5 bits set.
    flush: Vec<u32>,
    /// Score of the best no-flush hand for a rank mask with no repeated
    /// ranks: a straight if one exists, else the top-5 high card.
    unique5: Vec<u32>,
}

impl EvaluatorTables {
    fn build() -> EvaluatorTables {
        let mut flush = vec![0u32; RANK_MASK_SIZE];
        let mut unique5 = vec![0u32; RANK_MASK_SIZE];

        for mask in 0..RANK_MASK_SIZE {
            let m = mask as u16;
            if m.count_ones() < 5 {
                continue;
            }
            flush[mask] = match straight_high(m) {
                Some(high) => pack(HandCategory::StraightFlush, &[high]),
                None => pack(HandCategory::Flush, &top_ranks(m, 5)),
            };
            unique5[mask] = match straight_high(m) {
                Some(high) => pack(HandCategory::Straight, &[high]),
                None => pack(HandCategory::HighCard, &top_ranks(m, 5)),
            };
        }

        EvaluatorTables { flush, unique5 }
    }
}

static TABLES: Lazy<EvaluatorTables> = Lazy::new(EvaluatorTables::build);

/// Scores any 7 distinct cards. Duplicate or out-of-range cards are a
/// programming error.
pub fn evaluate_seven(cards: &[Card; 7]) -> HandScore {
    debug_assert_eq!(CardMask::from_cards(cards).count(), 7, "cards must be distinct");

    let mut suit_masks = [0u16; 4];
    let mut counts = [0u8; 13];
    let mut rank_mask = 0u16;

    for &card in cards {
        let r = card.rank_index();
        suit_masks[card.suit_index()] |= 1 << r;
        counts[r] += 1;
        rank_mask |= 1 << r;
    }

    // A 7-card hand holds at most one 5-card suit, and any straight flush in
    // it outranks whatever the rank counts would say.
    for &sm in &suit_masks {
        if sm.count_ones() >= 5 {
            return HandScore(TABLES.flush[sm as usize]);
        }
    }

    evaluate_non_flush(&counts, rank_mask)
}

fn evaluate_non_flush(counts: &[u8; 13], rank_mask: u16) -> HandScore {
    let mut quads: Option<u8> = None;
    let mut trips: [Option<u8>; 2] = [None, None];
    let mut pairs: [Option<u8>; 2] = [None, None];

    for r in (0..13u8).rev() {
        match counts[r as usize] {
            4 => quads = quads.or(Some(r)),
            3 => {
                if trips[0].is_none() {
                    trips[0] = Some(r);
                } else if trips[1].is_none() {
                    trips[1] = Some(r);
                }
            }
            2 => {
                if pairs[0].is_none() {
                    pairs[0] = Some(r);
                } else if pairs[1].is_none() {
                    pairs[1] = Some(r);
                }
            }
            _ => {}
        }
    }

    if let Some(quad) = quads {
        let kicker = highest_except(counts, &[quad]);
        return HandScore(pack(HandCategory::FourOfAKind, &[quad, kicker]));
    }

    if let Some(trip) = trips[0] {
        // Two trips make a full house with the lower trip as the pair.
        if let Some(second) = trips[1].or(pairs[0]) {
            return HandScore(pack(HandCategory::FullHouse, &[trip, second]));
        }
    }

    if let Some(high) = straight_high(rank_mask) {
        return HandScore(pack(HandCategory::Straight, &[high]));
    }

    if let Some(trip) = trips[0] {
        let ks = top_except(counts, &[trip], 2);
        return HandScore(pack(HandCategory::ThreeOfAKind, &[trip, ks[0], ks[1]]));
    }

    if let (Some(hi), Some(lo)) = (pairs[0], pairs[1]) {
        let kicker = highest_except(counts, &[hi, lo]);
        return HandScore(pack(HandCategory::TwoPair, &[hi, lo, kicker]));
    }

    if let Some(pair) = pairs[0] {
        let ks = top_except(counts, &[pair], 3);
        return HandScore(pack(HandCategory::OnePair, &[pair, ks[0], ks[1], ks[2]]));
    }

    HandScore(TABLES.unique5[rank_mask as usize])
}

fn highest_except(counts: &[u8; 13], exclude: &[u8]) -> u8 {
    for r in (0..13u8).rev() {
        if counts[r as usize] > 0 && !exclude.contains(&r) {
            return r;
        }
    }
    0
}

fn top_except(counts: &[u8; 13], exclude: &[u8], n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n);
    for r in (0..13u8).rev() {
        if counts[r as usize] > 0 && !exclude.contains(&r) {
            out.push(r);
            if out.len() == n {
                break;
            }
        }
    }
    out
}

/// Scores hole cards plus a board; the two together must be 7 distinct cards.
pub fn evaluate_hand(hole_cards: &[Card], board: &[Card]) -> GtoResult<HandScore> {
    let total = hole_cards.len() + board.len();
    if total != 7 {
        return Err(GtoError::NotEnoughCards { need: 7, got: total });
    }

    let mut cards = [Card::from_index(0)?; 7];
    let mut seen = CardMask::EMPTY;
    for (slot, &card) in cards.iter_mut().zip(hole_cards.iter().chain(board.iter())) {
        if seen.contains(card) {
            return Err(GtoError::DuplicateCard(card.to_string()));
        }
        seen = seen.with(card);
        *slot = card;
    }

    Ok(evaluate_seven(&cards))
}

/// Compares two hands on a shared board: 1 if the first wins, -1 if the
/// second, 0 on a chop.
pub fn compare_hands(hand1: &[Card], hand2: &[Card], board: &[Card]) -> GtoResult<i32> {
    let s1 = evaluate_hand(hand1, board)?;
    let s2 = evaluate_hand(hand2, board)?;
    Ok(match s1.cmp(&s2) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    })
}
