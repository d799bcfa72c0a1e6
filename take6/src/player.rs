use serde::Serialize;

use crate::{Card, PlayerError};

/// The state of a single participant.
///
/// A card is never both in the hand and in the penalty pile. A selected card
/// is taken out of the hand and held until the turn is resolved.
///
/// All mutators return an updated copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Player {
    name: String,
    index: usize,
    hand: Vec<Card>,
    penalty_pile: Vec<Card>,
    selected_card: Option<Card>,
}

impl Player {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            hand: Vec::new(),
            penalty_pile: Vec::new(),
            selected_card: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the player in the game, stable for the whole game.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The hand in the order the cards were dealt.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// The hand in ascending order, for display.
    pub fn sorted_hand(&self) -> Vec<Card> {
        let mut hand = self.hand.clone();
        hand.sort();
        hand
    }

    pub fn penalty_pile(&self) -> &[Card] {
        &self.penalty_pile
    }

    pub fn selected_card(&self) -> Option<Card> {
        self.selected_card
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    pub fn can_select(&self, card: Card) -> bool {
        self.selected_card.is_none() && self.has_card(card)
    }

    pub fn add_to_hand(&self, cards: impl IntoIterator<Item = Card>) -> Self {
        let mut player = self.clone();
        player.hand.extend(cards);
        player
    }

    /// Replaces the hand with a freshly dealt one, dropping any selection.
    pub fn deal_hand(&self, hand: Vec<Card>) -> Self {
        Self {
            hand,
            selected_card: None,
            ..self.clone()
        }
    }

    pub fn remove_from_hand(&self, card: Card) -> Result<Self, PlayerError> {
        let pos = self
            .hand
            .iter()
            .position(|&c| c == card)
            .ok_or(PlayerError::CardNotInHand(card))?;
        let mut player = self.clone();
        player.hand.remove(pos);
        Ok(player)
    }

    /// Moves the card from the hand to the pending selection.
    ///
    /// At most one selection can be pending at a time.
    pub fn select_card(&self, card: Card) -> Result<Self, PlayerError> {
        if let Some(selected) = self.selected_card {
            return Err(PlayerError::AlreadySelected(selected));
        }
        let mut player = self.remove_from_hand(card)?;
        player.selected_card = Some(card);
        Ok(player)
    }

    /// Forgets the pending selection after it has been resolved.
    pub fn clear_selection(&self) -> Self {
        Self {
            selected_card: None,
            ..self.clone()
        }
    }

    pub fn add_penalty_cards(&self, cards: &[Card]) -> Self {
        let mut player = self.clone();
        player.penalty_pile.extend_from_slice(cards);
        player
    }

    /// Total bull heads in the penalty pile. Lower is better.
    pub fn score(&self) -> u32 {
        self.penalty_pile
            .iter()
            .map(|card| card.penalty() as u32)
            .sum()
    }
}
