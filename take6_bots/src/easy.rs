use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use take6::{Board, Player, NUM_ROWS};
use tracing::trace;

use crate::{Bot, BotDecision, BotError};

/// Plays a uniformly random card from the hand.
pub struct EasyBot {
    rng: StdRng,
    row_hint: bool,
}

impl EasyBot {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            row_hint: false,
        }
    }

    /// Also attach a random row when the card is too low for the current board.
    ///
    /// The board can still change before the card is resolved, so the hint may
    /// be unused or, when a lower card takes a row first, missing.
    pub fn with_row_hint(self) -> Self {
        Self {
            row_hint: true,
            ..self
        }
    }
}

impl Bot for EasyBot {
    fn select_card(&mut self, player: &Player, board: &Board) -> Result<BotDecision, BotError> {
        let card = *player
            .hand()
            .choose(&mut self.rng)
            .ok_or(BotError::EmptyHand)?;
        let chosen_row = (self.row_hint && board.row_target(card).is_none())
            .then(|| self.rng.gen_range(0..NUM_ROWS));
        trace!(
            player = player.name(),
            card = card.number(),
            ?chosen_row,
            "Easy bot decision"
        );
        Ok(BotDecision { card, chosen_row })
    }
}
