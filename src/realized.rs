//! Realized-equity adjustments.
//!
//! Raw showdown equity overstates what a hand actually wins once position,
//! stack depth, board texture, field size, and opponent quality come into
//! play. This module multiplies a raw equity through fixed coefficient
//! tables to produce a realized estimate.

use serde::{Deserialize, Serialize};

/// Seats from UTG (0) around to BB (8).
const POSITION_FACTORS: [f64; 9] = [0.75, 0.78, 0.82, 0.86, 0.92, 0.98, 1.18, 0.70, 0.68];

/// Preflop through river.
const STREET_FACTORS: [f64; 4] = [0.95, 1.00, 1.03, 1.05];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardTexture {
    Dry,
    SemiWet,
    Wet,
}

pub fn position_factor(position: usize) -> f64 {
    POSITION_FACTORS[position.min(POSITION_FACTORS.len() - 1)]
}

/// Stack-depth factor from the stack-to-pot ratio. Shallow stacks realize
/// more of their equity; deep stacks realize less.
pub fn stack_depth_factor(spr: f64) -> f64 {
    if spr < 1.0 {
        1.25
    } else if spr < 3.0 {
        1.15
    } else if spr < 7.0 {
        1.05
    } else if spr < 13.0 {
        1.00
    } else if spr < 25.0 {
        0.95
    } else {
        0.90
    }
}

pub fn board_texture_factor(texture: BoardTexture, in_position: bool) -> f64 {
    match (texture, in_position) {
        (BoardTexture::Dry, true) => 1.08,
        (BoardTexture::Dry, false) => 0.95,
        (BoardTexture::SemiWet, true) => 1.02,
        (BoardTexture::SemiWet, false) => 0.98,
        (BoardTexture::Wet, true) => 0.95,
        (BoardTexture::Wet, false) => 0.92,
    }
}

/// Every extra opponent cuts into realization.
pub fn multiway_factor(opponents: usize) -> f64 {
    1.0 / (1.0 + 0.18 * (opponents.saturating_sub(1)) as f64)
}

/// `skill` runs 0.0 (weak opposition) to 1.0 (strong).
pub fn skill_factor(skill: f64) -> f64 {
    1.05 - skill * 0.15
}

/// Street 0 (preflop) through 3 (river).
pub fn street_factor(street: usize) -> f64 {
    STREET_FACTORS[street.min(STREET_FACTORS.len() - 1)]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealizedEquity {
    pub raw_equity: f64,
    pub realized: f64,
    pub position_factor: f64,
    pub stack_factor: f64,
    pub board_factor: f64,
    pub multiway_factor: f64,
    pub skill_factor: f64,
}

/// Multiplies a raw equity through all adjustment tables, clamping the
/// result into `[0, 1]`. A zero pot counts as maximally deep.
pub fn realized_equity(
    raw_equity: f64,
    position: usize,
    stack: f64,
    pot: f64,
    texture: BoardTexture,
    opponents: usize,
    in_position: bool,
    opponent_skill: f64,
) -> RealizedEquity {
    let spr = if pot > 0.0 { stack / pot } else { 100.0 };

    let position_factor = position_factor(position);
    let stack_factor = stack_depth_factor(spr);
    let board_factor = board_texture_factor(texture, in_position);
    let multiway_factor = multiway_factor(opponents);
    let skill_factor = skill_factor(opponent_skill);

    let realized = (raw_equity
        * position_factor
        * stack_factor
        * board_factor
        * multiway_factor
        * skill_factor)
        .clamp(0.0, 1.0);

    RealizedEquity {
        raw_equity,
        realized,
        position_factor,
        stack_factor,
        board_factor,
        multiway_factor,
        skill_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_realizes_most() {
        let best = (0..9).map(position_factor).fold(f64::MIN, f64::max);
        assert_eq!(position_factor(6), best);
    }

    #[test]
    fn blinds_realize_least() {
        assert!(position_factor(7) < 0.75);
        assert!(position_factor(8) < 0.75);
    }

    #[test]
    fn multiway_damps_equity() {
        assert_eq!(multiway_factor(1), 1.0);
        assert!(multiway_factor(3) < multiway_factor(2));
    }

    #[test]
    fn realized_clamped_to_unit_interval() {
        let r = realized_equity(0.95, 6, 5.0, 10.0, BoardTexture::Dry, 1, true, 0.0);
        assert!(r.realized <= 1.0);
        let r = realized_equity(0.0, 0, 100.0, 1.0, BoardTexture::Wet, 8, false, 1.0);
        assert_eq!(r.realized, 0.0);
    }

    #[test]
    fn heads_up_in_position_beats_oop() {
        let ip = realized_equity(0.5, 6, 100.0, 10.0, BoardTexture::Dry, 1, true, 0.5);
        let oop = realized_equity(0.5, 8, 100.0, 10.0, BoardTexture::Dry, 1, false, 0.5);
        assert!(ip.realized > oop.realized);
    }
}
