use gto_core::cards::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_card_creation() {
    let c = Card::new(Rank::Ace, Suit::Spades);
    assert_eq!(c.rank(), Rank::Ace);
    assert_eq!(c.suit(), Suit::Spades);
    assert_eq!(c.index(), 12);
}

#[test]
fn test_card_index_encoding() {
    // suit * 13 + rank
    let c = Card::new(Rank::Two, Suit::Clubs);
    assert_eq!(c.index(), 39);
    let back = Card::from_index(39).unwrap();
    assert_eq!(back, c);
}

#[test]
fn test_index_roundtrip_all_cards() {
    for i in 0..52u8 {
        let c = Card::from_index(i).unwrap();
        assert_eq!(c.index(), i);
        assert_eq!(Card::new(c.rank(), c.suit()), c);
    }
}

#[test]
fn test_invalid_index() {
    assert!(Card::from_index(52).is_err());
}

#[test]
fn test_invalid_rank() {
    assert!(Rank::from_char('X').is_err());
}

#[test]
fn test_invalid_suit() {
    assert!(Suit::from_char('x').is_err());
}

#[test]
fn test_card_str() {
    let c = Card::new(Rank::King, Suit::Diamonds);
    assert_eq!(format!("{}", c), "Kd");
}

#[test]
fn test_parse_card_basic() {
    assert_eq!(parse_card("As").unwrap(), Card::new(Rank::Ace, Suit::Spades));
    assert_eq!(parse_card("Td").unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
}

#[test]
fn test_parse_card_case_insensitive_suit() {
    assert_eq!(parse_card("AH").unwrap(), Card::new(Rank::Ace, Suit::Hearts));
}

#[test]
fn test_parse_card_invalid() {
    assert!(parse_card("ABC").is_err());
}

#[test]
fn test_parse_board_flop() {
    let board = parse_board("AsKdQh").unwrap();
    assert_eq!(board.len(), 3);
    assert_eq!(board[0], Card::new(Rank::Ace, Suit::Spades));
}

#[test]
fn test_parse_board_with_spaces() {
    let board = parse_board("As Kd Qh").unwrap();
    assert_eq!(board.len(), 3);
}

#[test]
fn test_parse_board_river() {
    let board = parse_board("As Kd Qh 5c 2s").unwrap();
    assert_eq!(board.len(), 5);
}

#[test]
fn test_parse_board_rejects_duplicates() {
    assert!(parse_board("AsKdAs").is_err());
}

#[test]
fn test_mask_membership() {
    let a = parse_card("As").unwrap();
    let k = parse_card("Kh").unwrap();
    let mask = CardMask::EMPTY.with(a);
    assert!(mask.contains(a));
    assert!(!mask.contains(k));
    assert_eq!(mask.count(), 1);
    assert_eq!((mask | k.mask()).count(), 2);
}

#[test]
fn test_mask_complement_stays_in_deck() {
    let mask = !CardMask::EMPTY;
    assert_eq!(mask.count(), 52);
    assert_eq!(mask.bits() >> 52, 0);
}

#[test]
fn test_deck_full() {
    let d = Deck::new();
    assert_eq!(d.len(), 52);
}

#[test]
fn test_deck_exclude_compacts() {
    let dead = CardMask::from_cards(&[
        parse_card("As").unwrap(),
        parse_card("Kh").unwrap(),
    ]);
    let d = Deck::without(dead);
    assert_eq!(d.len(), 50);
    for &c in d.live() {
        assert!(!dead.contains(c));
    }
}

#[test]
fn test_deck_deal_advances_cursor() {
    let mut d = Deck::new();
    let first = d.deal().unwrap();
    let second = d.deal().unwrap();
    assert_ne!(first, second);
    d.reset();
    assert_eq!(d.deal().unwrap(), first);
}

#[test]
fn test_deck_deal_exhausted() {
    let mut d = Deck::new();
    for _ in 0..52 {
        d.deal().unwrap();
    }
    assert!(d.deal().is_err());
}

#[test]
fn test_deck_shuffle_is_a_permutation() {
    let mut d = Deck::new();
    let original: std::collections::HashSet<Card> = d.live().iter().copied().collect();
    let mut rng = StdRng::seed_from_u64(1);
    d.shuffle(&mut rng);
    assert_eq!(d.len(), 52);
    let shuffled: std::collections::HashSet<Card> = d.live().iter().copied().collect();
    assert_eq!(original, shuffled);
}

#[test]
fn test_excluded_deck_shuffle_stays_live() {
    let dead = CardMask::from_cards(&parse_board("AsAhKdKc2s").unwrap());
    let mut d = Deck::without(dead);
    let mut rng = StdRng::seed_from_u64(2);
    d.shuffle(&mut rng);
    assert_eq!(d.len(), 47);
    for &c in d.live() {
        assert!(!dead.contains(c));
    }
}
