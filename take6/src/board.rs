use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{BoardError, Card};

pub const NUM_ROWS: usize = 4;
pub const MAX_ROW_LEN: usize = 5;

/// One of the four rows on the board.
///
/// Cards in a row are strictly increasing in the order they were placed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cards: Vec<Card>,
}

impl Row {
    /// A row holds at most five cards; the next card placed takes the row.
    pub fn is_full(&self) -> bool {
        self.cards.len() >= MAX_ROW_LEN
    }

    /// Sum of the bull heads in this row.
    pub fn penalty(&self) -> u32 {
        self.cards.iter().map(|card| card.penalty() as u32).sum()
    }
}

impl Deref for Row {
    type Target = [Card];

    fn deref(&self) -> &Self::Target {
        &self.cards
    }
}

/// The four rows on the table.
///
/// After a round has been dealt, no row is ever empty: taking a row
/// immediately reseeds it with the card that took it. Only the
/// [`Default`] board, used before the first deal, has empty rows.
///
/// All operations leave `self` untouched and return a new board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    rows: [Row; NUM_ROWS],
}

/// A card that a player committed to play this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub player_idx: usize,
    pub card: Card,
    /// The row to take if the card turns out to be lower than every row.
    /// When not needed, this can be omitted from the JSON serialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub chosen_row: Option<usize>,
}

/// The result of [`Board::place()`] and [`Board::take_row()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub board: Board,
    /// The cards that were removed from the board, possibly none.
    pub taken: Vec<Card>,
}

/// How a resolved card ended up on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayKind {
    /// Appended to a row without penalty.
    Placed,
    /// Placed onto a full row, taking its five cards.
    SixthCard,
    /// Lower than every row, so the chosen row was taken.
    TookRow,
}

/// The outcome of resolving a single [`Selection`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedPlay {
    pub player_idx: usize,
    pub card: Card,
    pub row_idx: usize,
    pub kind: PlayKind,
    pub taken: Vec<Card>,
}

impl ResolvedPlay {
    pub fn penalty(&self) -> u32 {
        self.taken.iter().map(|card| card.penalty() as u32).sum()
    }
}

/// The outcome of [`Board::resolve_many()`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub board: Board,
    /// One entry per selection, in resolution order.
    pub plays: Vec<ResolvedPlay>,
}

impl Resolution {
    /// All cards taken by the player during this resolution.
    pub fn taken_by(&self, player_idx: usize) -> Vec<Card> {
        self.plays
            .iter()
            .filter(|play| play.player_idx == player_idx)
            .flat_map(|play| play.taken.iter().copied())
            .collect()
    }
}

impl Board {
    /// Creates the board for a new round, one starting card per row.
    pub fn new(starting_cards: [Card; NUM_ROWS]) -> Self {
        Self {
            rows: starting_cards.map(|card| Row { cards: vec![card] }),
        }
    }

    /// Creates a board from explicit rows, e.g. a snapshot taken mid-round.
    pub fn from_rows(rows: [Vec<Card>; NUM_ROWS]) -> Result<Self, BoardError> {
        for (row_idx, cards) in rows.iter().enumerate() {
            let ascending = cards.windows(2).all(|pair| pair[1].can_follow(pair[0]));
            if cards.is_empty() || cards.len() > MAX_ROW_LEN || !ascending {
                return Err(BoardError::InvalidRow { row_idx });
            }
        }
        Ok(Self {
            rows: rows.map(|cards| Row { cards }),
        })
    }

    pub fn rows(&self) -> &[Row; NUM_ROWS] {
        &self.rows
    }

    pub fn row(&self, row_idx: usize) -> Result<&Row, BoardError> {
        self.rows
            .get(row_idx)
            .ok_or(BoardError::InvalidRowIndex(row_idx))
    }

    /// True only before the first round has been dealt.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    pub fn is_row_full(&self, row_idx: usize) -> bool {
        self.rows.get(row_idx).is_some_and(Row::is_full)
    }

    /// The row this card goes to: the one whose last card is the highest
    /// card still lower than `card`.
    ///
    /// Returns `None` if the card is lower than the last card of every row.
    pub fn row_target(&self, card: Card) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(row_idx, row)| row.last().map(|&last| (row_idx, last)))
            .filter(|&(_, last)| card.can_follow(last))
            .max_by_key(|&(_, last)| last)
            .map(|(row_idx, _)| row_idx)
    }

    /// Can the card be appended to the row without taking it?
    pub fn can_place(&self, row_idx: usize, card: Card) -> bool {
        match self.rows.get(row_idx) {
            Some(row) => !row.is_full() && row.last().is_some_and(|&last| card.can_follow(last)),
            None => false,
        }
    }

    /// Places the card at the end of the row.
    ///
    /// If the row is full, the card is the sixth card: the five cards in the
    /// row are taken and the row restarts with just this card.
    pub fn place(&self, row_idx: usize, card: Card) -> Result<Placement, BoardError> {
        let row = self.row(row_idx)?;
        if !row.last().is_some_and(|&last| card.can_follow(last)) {
            return Err(BoardError::RowNotPlaceable { row_idx, card });
        }

        let mut board = self.clone();
        let cards = &mut board.rows[row_idx].cards;
        let taken = if cards.len() >= MAX_ROW_LEN {
            std::mem::replace(cards, vec![card])
        } else {
            cards.push(card);
            Vec::new()
        };
        Ok(Placement { board, taken })
    }

    /// Takes all cards of the row and restarts it with `card`.
    pub fn take_row(&self, row_idx: usize, card: Card) -> Result<Placement, BoardError> {
        self.row(row_idx)?;
        let mut board = self.clone();
        let taken = std::mem::replace(&mut board.rows[row_idx].cards, vec![card]);
        Ok(Placement { board, taken })
    }

    /// The row with the fewest bull heads, preferring the lowest index on ties.
    pub fn cheapest_row(&self) -> usize {
        let mut best_row = 0;
        for (row_idx, row) in self.rows.iter().enumerate() {
            if row.penalty() < self.rows[best_row].penalty() {
                best_row = row_idx;
            }
        }
        best_row
    }

    /// The selections in the order they are resolved: lowest card first.
    pub fn resolution_order(selections: &[Selection]) -> Vec<Selection> {
        let mut ordered = selections.to_vec();
        ordered.sort_by_key(|selection| selection.card);
        ordered
    }

    /// Resolves a single selection against this board.
    ///
    /// [`Self::resolve_many()`] is exactly this, applied to each selection in
    /// [resolution order](Self::resolution_order), so calling this step by
    /// step yields the same result.
    pub fn resolve_one(&self, selection: &Selection) -> Result<(Board, ResolvedPlay), BoardError> {
        let Selection {
            player_idx,
            card,
            chosen_row,
        } = *selection;

        let (row_idx, kind, Placement { board, taken }) = match self.row_target(card) {
            Some(row_idx) => {
                let kind = if self.rows[row_idx].is_full() {
                    PlayKind::SixthCard
                } else {
                    PlayKind::Placed
                };
                (row_idx, kind, self.place(row_idx, card)?)
            }
            None => {
                let row_idx =
                    chosen_row.ok_or(BoardError::RowChoiceRequired { player_idx, card })?;
                (row_idx, PlayKind::TookRow, self.take_row(row_idx, card)?)
            }
        };

        trace!(
            player_idx,
            card = card.number(),
            row_idx,
            ?kind,
            num_taken = taken.len(),
            "Resolved card"
        );
        let play = ResolvedPlay {
            player_idx,
            card,
            row_idx,
            kind,
            taken,
        };
        Ok((board, play))
    }

    /// Resolves all selections of one turn, lowest card first.
    ///
    /// Each card sees the board as left by the cards before it, so a row
    /// filled up by a lower card in the same batch makes a later card the
    /// sixth card.
    ///
    /// Fails with [`BoardError::RowChoiceRequired`] when a card turns out to
    /// be too low and its selection carries no row. On failure, nothing is
    /// returned and `self` is unchanged.
    pub fn resolve_many(&self, selections: &[Selection]) -> Result<Resolution, BoardError> {
        let mut board = self.clone();
        let mut plays = Vec::with_capacity(selections.len());
        for selection in Self::resolution_order(selections) {
            let (next_board, play) = board.resolve_one(&selection)?;
            board = next_board;
            plays.push(play);
        }
        Ok(Resolution { board, plays })
    }
}
