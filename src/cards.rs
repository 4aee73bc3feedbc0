use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{GtoError, GtoResult};

pub const RANK_COUNT: usize = 13;
pub const SUIT_COUNT: usize = 4;
pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Rank {
    pub fn from_char(c: char) -> GtoResult<Rank> {
        match c {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(GtoError::InvalidRank(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// Rank index, 0 for a deuce through 12 for an ace.
    pub fn value(self) -> u8 {
        self as u8
    }
}

pub const ALL_RANKS: [Rank; RANK_COUNT] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades = 0,
    Hearts = 1,
    Diamonds = 2,
    Clubs = 3,
}

impl Suit {
    pub fn from_char(c: char) -> GtoResult<Suit> {
        match c.to_ascii_lowercase() {
            's' => Ok(Suit::Spades),
            'h' => Ok(Suit::Hearts),
            'd' => Ok(Suit::Diamonds),
            'c' => Ok(Suit::Clubs),
            _ => Err(GtoError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

pub const ALL_SUITS: [Suit; SUIT_COUNT] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

/// A card as a deck index in `[0, 52)`: `suit * 13 + rank`.
///
/// Indices 0-12 are the spades from deuce to ace, 13-25 the hearts, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card(suit.value() * RANK_COUNT as u8 + rank.value())
    }

    pub fn from_index(index: u8) -> GtoResult<Card> {
        if index >= DECK_SIZE as u8 {
            return Err(GtoError::InvalidCardIndex(index));
        }
        Ok(Card(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> Rank {
        ALL_RANKS[(self.0 % RANK_COUNT as u8) as usize]
    }

    pub fn suit(self) -> Suit {
        ALL_SUITS[(self.0 / RANK_COUNT as u8) as usize]
    }

    /// Rank index 0-12, avoiding the enum round-trip on hot paths.
    #[inline]
    pub fn rank_index(self) -> usize {
        (self.0 % RANK_COUNT as u8) as usize
    }

    #[inline]
    pub fn suit_index(self) -> usize {
        (self.0 / RANK_COUNT as u8) as usize
    }

    pub fn mask(self) -> CardMask {
        CardMask(1u64 << self.0)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().to_char(), self.suit().to_char())
    }
}

/// A set of cards as a 52-bit mask. Bit `c` is set iff card `c` is present;
/// the top 12 bits are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardMask(u64);

impl CardMask {
    pub const EMPTY: CardMask = CardMask(0);

    pub fn from_cards(cards: &[Card]) -> CardMask {
        cards.iter().fold(CardMask::EMPTY, |m, &c| m.with(c))
    }

    #[inline]
    pub fn contains(self, card: Card) -> bool {
        self.0 & (1u64 << card.index()) != 0
    }

    #[inline]
    pub fn with(self, card: Card) -> CardMask {
        CardMask(self.0 | (1u64 << card.index()))
    }

    #[inline]
    pub fn without(self, card: Card) -> CardMask {
        CardMask(self.0 & !(1u64 << card.index()))
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }
}

impl BitOr for CardMask {
    type Output = CardMask;

    fn bitor(self, rhs: CardMask) -> CardMask {
        CardMask(self.0 | rhs.0)
    }
}

impl BitAnd for CardMask {
    type Output = CardMask;

    fn bitand(self, rhs: CardMask) -> CardMask {
        CardMask(self.0 & rhs.0)
    }
}

impl Not for CardMask {
    type Output = CardMask;

    fn not(self) -> CardMask {
        CardMask(!self.0 & ((1u64 << DECK_SIZE) - 1))
    }
}

/// An ordered deck with a deal cursor. `exclude` compacts the live cards into
/// a prefix; only the live prefix is ever shuffled or dealt.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
    live: usize,
    cursor: usize,
}

impl Deck {
    pub fn new() -> Deck {
        let mut cards = [Card(0); DECK_SIZE];
        for (i, slot) in cards.iter_mut().enumerate() {
            *slot = Card(i as u8);
        }
        Deck {
            cards,
            live: DECK_SIZE,
            cursor: 0,
        }
    }

    /// A deck with every card in `dead` removed.
    pub fn without(dead: CardMask) -> Deck {
        let mut deck = Deck::new();
        deck.exclude(dead);
        deck
    }

    /// Removes dead cards, compacting the remainder to the front. Resets the
    /// cursor.
    pub fn exclude(&mut self, dead: CardMask) {
        let mut write = 0;
        for read in 0..self.live {
            let card = self.cards[read];
            if !dead.contains(card) {
                self.cards[write] = card;
                write += 1;
            }
        }
        self.live = write;
        self.cursor = 0;
    }

    /// Fisher-Yates shuffle of the live prefix. Resets the cursor.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards[..self.live].shuffle(rng);
        self.cursor = 0;
    }

    pub fn deal(&mut self) -> GtoResult<Card> {
        if self.cursor >= self.live {
            return Err(GtoError::NotEnoughDeck {
                requested: 1,
                available: 0,
            });
        }
        let card = self.cards[self.cursor];
        self.cursor += 1;
        Ok(card)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// The live cards, in current order.
    pub fn live(&self) -> &[Card] {
        &self.cards[..self.live]
    }
}

impl Default for Deck {
    fn default() -> Deck {
        Deck::new()
    }
}

pub fn parse_card(notation: &str) -> GtoResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(GtoError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0].to_ascii_uppercase())?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

pub fn parse_board(notation: &str) -> GtoResult<Vec<Card>> {
    let notation = notation.trim().replace(' ', "").replace(',', "");
    if notation.len() % 2 != 0 {
        return Err(GtoError::InvalidBoardNotation(notation.to_string()));
    }
    let mut cards = Vec::new();
    let mut seen = CardMask::EMPTY;
    let chars: Vec<char> = notation.chars().collect();
    for i in (0..chars.len()).step_by(2) {
        let s: String = chars[i..i + 2].iter().collect();
        let card = parse_card(&s)?;
        if seen.contains(card) {
            return Err(GtoError::DuplicateCard(card.to_string()));
        }
        seen = seen.with(card);
        cards.push(card);
    }
    Ok(cards)
}
