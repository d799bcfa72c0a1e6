use serde::{Deserialize, Serialize};

use crate::InvalidCardNumber;

pub const MIN_CARD: u8 = 1;
pub const MAX_CARD: u8 = 104;

/// A numbered card with a fixed penalty ("bull heads").
///
/// Cards are ordered by their number, and since every number exists only
/// once in a deck, two cards are equal iff their numbers are equal.
/// The penalty is computed once on construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card {
    // Keep `number` first, the derived ordering relies on it.
    number: u8,
    penalty: u8,
}

/// The penalty of the card with the given number.
///
/// The first matching rule wins, so 55 is worth 7 and not 5, and 66 is worth
/// 5 and not 3.
pub fn penalty_for(number: u8) -> u8 {
    match number {
        55 => 7,
        n if n % 11 == 0 => 5,
        n if n % 10 == 0 => 3,
        n if n % 5 == 0 => 2,
        _ => 1,
    }
}

impl Card {
    pub fn new(number: u8) -> Result<Self, InvalidCardNumber> {
        if !(MIN_CARD..=MAX_CARD).contains(&number) {
            return Err(InvalidCardNumber(number));
        }
        Ok(Self {
            number,
            penalty: penalty_for(number),
        })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// The number of bull heads on this card.
    pub fn penalty(&self) -> u8 {
        self.penalty
    }

    /// Can this card be placed after `other` in a row?
    pub fn can_follow(&self, other: Card) -> bool {
        self.number > other.number
    }
}

impl TryFrom<u8> for Card {
    type Error = InvalidCardNumber;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Card::new(number)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.number
    }
}

/// Writes just the number, e.g. `55`.
///
/// The alternate form (`{:#}`) spells out the penalty: `Card 55 (7 bull heads)`.
impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            let head_text = if self.penalty == 1 {
                "bull head"
            } else {
                "bull heads"
            };
            write!(f, "Card {} ({} {})", self.number, self.penalty, head_text)
        } else {
            write!(f, "{}", self.number)
        }
    }
}

/// Shorthand for creating a card from its number.
///
/// This macro is just calling [`Card::new()`] and panics on an invalid number,
/// so it is intended for literals.
/// ```
/// # use take6::card;
/// assert_eq!(card!(55).penalty(), 7);
/// ```
#[macro_export]
macro_rules! card {
    ($n:expr) => {
        $crate::Card::new($n).expect("Invalid card number given to card! macro")
    };
}
// Lets the other modules of this crate refer to the macro by path
#[allow(unused_imports)]
pub(crate) use card;
