use gto_core::cards::*;
use gto_core::equity::*;

fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

#[test]
fn test_counters_always_balance() {
    for opponents in [1, 2, 5, 9] {
        let result =
            equity_vs_random([c("Js"), c("Jd")], &[], opponents, 20_000, 11).unwrap();
        assert_eq!(result.wins + result.ties + result.losses, result.iterations);
        assert_eq!(result.iterations, 20_000);
    }
}

#[test]
fn test_aces_heads_up_preflop() {
    let result = equity_vs_random([c("As"), c("Ah")], &[], 1, 100_000, 42).unwrap();
    assert!(
        result.equity > 0.84 && result.equity < 0.86,
        "AA equity {} outside [0.84, 0.86]",
        result.equity
    );
}

#[test]
fn test_trash_on_paired_board() {
    // 72o on KKK never holds the best kicker, but chopped run-outs where the
    // board plays keep its tie-adjusted equity well below half and well
    // above zero.
    let board = parse_board("KsKhKd").unwrap();
    let result = equity_vs_random([c("7c"), c("2d")], &board, 1, 100_000, 7).unwrap();
    assert!(
        result.equity > 0.05 && result.equity < 0.5,
        "72o on KKK equity {} out of range",
        result.equity
    );
    assert!(result.losses > result.wins);
}

#[test]
fn test_seventy_two_vs_aces() {
    let result =
        equity_vs_hand([c("2c"), c("7d")], [c("Ac"), c("Ad")], &[], 100_000, 3).unwrap();
    assert!(
        result.equity > 0.11 && result.equity < 0.13,
        "72o vs AA equity {} outside [0.11, 0.13]",
        result.equity
    );
}

#[test]
fn test_aa_vs_kk() {
    let result =
        equity_vs_hand([c("As"), c("Ah")], [c("Ks"), c("Kh")], &[], 50_000, 5).unwrap();
    assert!(result.equity > 0.78 && result.equity < 0.86);
}

#[test]
fn test_locked_hand_on_river() {
    // Board plays: both sides hold the board straight, every run-out chops.
    let board = parse_board("AsKdQhJsTs").unwrap();
    let result =
        equity_vs_hand([c("2h"), c("3d")], [c("4h"), c("5d")], &board, 1_000, 1).unwrap();
    assert_eq!(result.ties, 1_000);
    assert!((result.equity - 0.5).abs() < 1e-6);
}

#[test]
fn test_seed_reproducibility() {
    let a = equity_vs_random([c("Th"), c("9h")], &[], 3, 50_000, 1234).unwrap();
    let b = equity_vs_random([c("Th"), c("9h")], &[], 3, 50_000, 1234).unwrap();
    assert_eq!(a.wins, b.wins);
    assert_eq!(a.ties, b.ties);
    assert_eq!(a.losses, b.losses);
    assert_eq!(a.equity, b.equity);
}

#[test]
fn test_different_seeds_differ() {
    // Not a hard guarantee, but 50k iterations landing on identical counters
    // for two seeds would point at a broken RNG.
    let a = equity_vs_random([c("Th"), c("9h")], &[], 2, 50_000, 1).unwrap();
    let b = equity_vs_random([c("Th"), c("9h")], &[], 2, 50_000, 2).unwrap();
    assert!(a.wins != b.wins || a.ties != b.ties || a.losses != b.losses);
}

#[test]
fn test_more_opponents_less_equity() {
    let one = equity_vs_random([c("As"), c("Ks")], &[], 1, 50_000, 9).unwrap();
    let five = equity_vs_random([c("As"), c("Ks")], &[], 5, 50_000, 9).unwrap();
    assert!(five.equity < one.equity);
}

#[test]
fn test_full_board_leaves_nothing_to_deal() {
    let board = parse_board("2s5d8cThQd").unwrap();
    let result = equity_vs_random([c("As"), c("Ah")], &board, 1, 10_000, 4).unwrap();
    assert_eq!(result.iterations, 10_000);
    // Overpair on a dry river is a favorite against a random hand.
    assert!(result.equity > 0.7);
}

#[test]
fn test_equity_result_serializes() {
    let result = equity_vs_random([c("As"), c("Ah")], &[], 1, 1_000, 2).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: EquityResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, back);
}
