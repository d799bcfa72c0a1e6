use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Card, DeckError, MAX_CARD, MIN_CARD};

pub const DECK_SIZE: usize = 104;

/// All cards from 1 to 104, in ascending order.
pub fn full_deck() -> Vec<Card> {
    (MIN_CARD..=MAX_CARD)
        .filter_map(|number| Card::new(number).ok())
        .collect()
}

/// Does the deck contain every card exactly once?
pub fn is_valid_deck(deck: &[Card]) -> bool {
    // Cards can only hold valid numbers, so 104 distinct ones are all of them.
    deck.len() == DECK_SIZE && deck.iter().collect::<BTreeSet<_>>().len() == DECK_SIZE
}

/// Returns a shuffled copy of the deck.
pub fn shuffled<R: Rng + ?Sized>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut cards = deck.to_vec();
    cards.shuffle(rng);
    cards
}

/// Deals `per_player` cards to each of `num_players` players from the front of the deck.
///
/// Cards are dealt round-robin: player 0 gets `deck[0]`, player 1 gets `deck[1]`,
/// and so on, wrapping around after the last player. Cards beyond
/// `num_players * per_player` are not touched.
pub fn deal(
    deck: &[Card],
    num_players: usize,
    per_player: usize,
) -> Result<Vec<Vec<Card>>, DeckError> {
    if num_players == 0 {
        return Err(DeckError::InvalidPlayerCount);
    }
    if per_player == 0 {
        return Err(DeckError::InvalidHandSize);
    }
    // A product that does not fit in usize can never be covered by a deck
    let needed = num_players.checked_mul(per_player).unwrap_or(usize::MAX);
    if deck.len() < needed {
        return Err(DeckError::InsufficientCards {
            needed,
            available: deck.len(),
        });
    }

    let mut hands = vec![Vec::with_capacity(per_player); num_players];
    for (card_idx, &card) in deck[..needed].iter().enumerate() {
        hands[card_idx % num_players].push(card);
    }
    Ok(hands)
}
