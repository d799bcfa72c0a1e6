mod easy;
mod smart;
pub use easy::*;
pub use smart::*;

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use take6::{Board, Card, Player};

/// The card a bot wants to play this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotDecision {
    pub card: Card,
    /// The row to take if the card is too low. This is only a hint: whether
    /// the card really is too low is decided when the turn is resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub chosen_row: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotError {
    EmptyHand,
}

impl std::error::Error for BotError {}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotError::EmptyHand => write!(f, "No cards in hand"),
        }
    }
}

/// A policy that picks a card for a player.
///
/// Bots only look at the player and the board; they never resolve anything
/// themselves. Their decision is fed to
/// [`Game::select_card_for_player()`](take6::Game::select_card_for_player)
/// just like a human's.
pub trait Bot {
    fn select_card(&mut self, player: &Player, board: &Board) -> Result<BotDecision, BotError>;
}

/// The available bot policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    Easy,
    Smart,
}

impl BotKind {
    /// Builds a bot of this kind. `row_hint` only affects the easy bot.
    pub fn build(self, seed: u64, row_hint: bool) -> Box<dyn Bot> {
        match self {
            BotKind::Easy => {
                let bot = EasyBot::new(StdRng::seed_from_u64(seed));
                Box::new(if row_hint { bot.with_row_hint() } else { bot })
            }
            BotKind::Smart => Box::new(SmartBot),
        }
    }
}

/// The error type for the [`FromStr`] instance of [`BotKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownBotKind(pub String);

impl std::error::Error for UnknownBotKind {}

impl std::fmt::Display for UnknownBotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown bot kind '{}', expected 'easy' or 'smart'",
            self.0
        )
    }
}

impl FromStr for BotKind {
    type Err = UnknownBotKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" | "random" => Ok(BotKind::Easy),
            "smart" | "greedy" => Ok(BotKind::Smart),
            _ => Err(UnknownBotKind(String::from(s))),
        }
    }
}

impl std::fmt::Display for BotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotKind::Easy => write!(f, "easy"),
            BotKind::Smart => write!(f, "smart"),
        }
    }
}
