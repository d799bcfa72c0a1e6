use crate::{Card, MAX_CARD, MIN_CARD};

/// The error type for [`Card::new()`](crate::Card::new).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidCardNumber(pub u8);

impl std::error::Error for InvalidCardNumber {}

impl std::fmt::Display for InvalidCardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Card number must be between {} and {}, got {}",
            MIN_CARD, MAX_CARD, self.0
        )
    }
}

/// The error type for [`deal()`](crate::deal).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckError {
    InvalidPlayerCount,
    InvalidHandSize,
    InsufficientCards { needed: usize, available: usize },
}

impl std::error::Error for DeckError {}

impl std::fmt::Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckError::InvalidPlayerCount => write!(f, "Cannot deal to zero players"),
            DeckError::InvalidHandSize => write!(f, "Cannot deal hands of zero cards"),
            DeckError::InsufficientCards { needed, available } => write!(
                f,
                "Not enough cards in deck: {} needed, {} available",
                needed, available
            ),
        }
    }
}

/// The error type for placing cards on the [board](crate::Board).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardError {
    InvalidRowIndex(usize),
    /// A row passed to [`Board::from_rows()`](crate::Board::from_rows) is
    /// empty, too long or not strictly increasing.
    InvalidRow { row_idx: usize },
    RowNotPlaceable { row_idx: usize, card: Card },
    RowChoiceRequired { player_idx: usize, card: Card },
}

impl std::error::Error for BoardError {}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::InvalidRowIndex(row_idx) => {
                write!(f, "Row index {} is out of range", row_idx)
            }
            BoardError::InvalidRow { row_idx } => {
                write!(f, "Row {} is empty, too long or not ascending", row_idx)
            }
            BoardError::RowNotPlaceable { row_idx, card } => {
                write!(f, "Card {} cannot be placed on row {}", card, row_idx)
            }
            BoardError::RowChoiceRequired { player_idx, card } => write!(
                f,
                "Card {} of player {} is lower than every row, but no row was chosen",
                card, player_idx
            ),
        }
    }
}

/// The error type for changing a [player](crate::Player)'s hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerError {
    CardNotInHand(Card),
    /// Holds the card that is already selected.
    AlreadySelected(Card),
}

impl std::error::Error for PlayerError {}

impl std::fmt::Display for PlayerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerError::CardNotInHand(card) => {
                write!(f, "Cannot select card {}, it is not in the hand", card)
            }
            PlayerError::AlreadySelected(card) => {
                write!(f, "Card {} is already selected", card)
            }
        }
    }
}

/// The error type for operations on a [game](crate::Game).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameError {
    InvalidPlayerCount(usize),
    InvalidPlayerIndex(usize),
    InvalidRowIndex(usize),
    NoSelection { player_idx: usize },
    NotAllReady,
    Player { player_idx: usize, err: PlayerError },
    Board(BoardError),
    Deck(DeckError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Player { err, .. } => Some(err),
            GameError::Board(err) => Some(err),
            GameError::Deck(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidPlayerCount(count) => write!(
                f,
                "Must have {}-{} players, got {}",
                crate::MIN_PLAYERS,
                crate::MAX_PLAYERS,
                count
            ),
            GameError::InvalidPlayerIndex(player_idx) => {
                write!(f, "There is no player with index {}", player_idx)
            }
            GameError::InvalidRowIndex(row_idx) => {
                write!(f, "Row index {} is out of range", row_idx)
            }
            GameError::NoSelection { player_idx } => {
                write!(f, "Player {} has not selected a card", player_idx)
            }
            GameError::NotAllReady => write!(f, "Not all players have selected cards"),
            GameError::Player { player_idx, .. } => {
                write!(f, "Player {} made an invalid selection", player_idx)
            }
            GameError::Board(_) => write!(f, "Could not resolve the selected cards"),
            GameError::Deck(_) => write!(f, "Could not deal a new round"),
        }
    }
}

impl From<BoardError> for GameError {
    fn from(err: BoardError) -> Self {
        GameError::Board(err)
    }
}

impl From<DeckError> for GameError {
    fn from(err: DeckError) -> Self {
        GameError::Deck(err)
    }
}
