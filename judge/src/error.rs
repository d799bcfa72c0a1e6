use take6::{Card, GameError};
use take6_bots::BotError;

#[derive(Debug)]
/// Error type for one bot decision.
pub enum IllegalMove {
    /// The bot could not come up with a card.
    NoDecision(BotError),
    /// The game did not accept the card the bot chose.
    RejectedCard { card: Card, err: GameError },
}

impl std::error::Error for IllegalMove {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalMove::NoDecision(err) => Some(err),
            IllegalMove::RejectedCard { err, .. } => Some(err),
        }
    }
}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::NoDecision(_) => write!(f, "The bot did not select a card"),
            IllegalMove::RejectedCard { card, .. } => {
                write!(f, "The bot selected card {}, which was rejected", card)
            }
        }
    }
}
