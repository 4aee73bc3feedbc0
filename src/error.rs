use thiserror::Error;

#[derive(Error, Debug)]
pub enum GtoError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Invalid card index: {0}")]
    InvalidCardIndex(u8),

    #[error("Duplicate card: {0}")]
    DuplicateCard(String),

    #[error("Need at least {need} cards, got {got}")]
    NotEnoughCards { need: usize, got: usize },

    #[error("Cannot deal {requested} cards, only {available} remaining")]
    NotEnoughDeck { requested: usize, available: usize },

    #[error("Equity request needs {required} cards for {opponents} opponents, deck has 52")]
    InsufficientDeck { required: usize, opponents: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type GtoResult<T> = Result<T, GtoError>;
