use quickcheck::{Arbitrary, Gen};

use crate::{full_deck, Board, Card, Selection, MAX_CARD, MAX_ROW_LEN, NUM_ROWS};

/// A valid board together with one turn's worth of selections.
///
/// All cards are distinct, and every selection carries a row choice so that
/// resolution cannot fail.
#[derive(Clone, Debug)]
pub struct BoardInput {
    pub board: Board,
    // Nonempty
    pub selections: Vec<Selection>,
}

impl Arbitrary for BoardInput {
    fn arbitrary(g: &mut Gen) -> Self {
        // Fisher-Yates with the generator's randomness
        let mut deck = full_deck();
        for i in (1..deck.len()).rev() {
            let j = usize::arbitrary(g) % (i + 1);
            deck.swap(i, j);
        }
        let mut remaining = deck.into_iter();

        let rows: [Vec<Card>; NUM_ROWS] = std::array::from_fn(|_| {
            let len = usize::arbitrary(g) % MAX_ROW_LEN + 1;
            let mut row: Vec<Card> = remaining.by_ref().take(len).collect();
            row.sort();
            row
        });
        let board = Board::from_rows(rows).expect("Generated rows are valid");

        let num_selections = usize::arbitrary(g) % 10 + 1;
        let selections = (0..num_selections)
            .zip(remaining)
            .map(|(player_idx, card)| Selection {
                player_idx,
                card,
                chosen_row: Some(usize::arbitrary(g) % NUM_ROWS),
            })
            .collect();

        BoardInput { board, selections }
    }
}

impl Arbitrary for Card {
    fn arbitrary(g: &mut Gen) -> Self {
        Card::new(u8::arbitrary(g) % MAX_CARD + 1).expect("Generated number is in range")
    }
}
