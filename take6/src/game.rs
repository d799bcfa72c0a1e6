use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::{
    deal, full_deck, shuffled, Board, Card, DeckError, GameError, Player, Resolution, Selection,
    NUM_ROWS,
};

pub const CARDS_PER_PLAYER: usize = 10;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;
/// The game ends once somebody has this many bull heads.
pub const GAME_OVER_SCORE: u32 = 66;

/// Where a [`Game`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// No round has been dealt yet.
    Created,
    /// Players still have cards to play.
    RoundInProgress,
    /// All hands are empty; the next round can be dealt.
    RoundResolved,
    GameOver,
}

/// The state of a whole game, across rounds.
///
/// Like everything else in this crate, a `Game` is never modified in place:
/// every operation returns the next state, and a failed operation leaves
/// nothing half-applied.
#[derive(Clone, Debug, Serialize)]
pub struct Game {
    players: Vec<Player>,
    board: Board,
    round: u32,
    /// Selections waiting for the turn to be resolved, at most one per player.
    selections: Vec<Selection>,
    /// Cards not dealt this round. They play no part in the game.
    leftover: Vec<Card>,
}

impl Game {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Result<Self, GameError> {
        let players: Vec<Player> = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Player::new(name, index))
            .collect();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(GameError::InvalidPlayerCount(players.len()));
        }
        Ok(Self {
            players,
            board: Board::default(),
            round: 0,
            selections: Vec::new(),
            leftover: Vec::new(),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_idx: usize) -> Result<&Player, GameError> {
        self.players
            .get(player_idx)
            .ok_or(GameError::InvalidPlayerIndex(player_idx))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The number of rounds dealt so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn leftover(&self) -> &[Card] {
        &self.leftover
    }

    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(Player::score).collect()
    }

    pub fn phase(&self) -> GamePhase {
        if self.round == 0 {
            GamePhase::Created
        } else if self.is_game_over() {
            GamePhase::GameOver
        } else if self.is_round_complete() {
            GamePhase::RoundResolved
        } else {
            GamePhase::RoundInProgress
        }
    }

    /// Shuffles a fresh deck, lays out the four starting cards and deals ten
    /// cards to every player. Penalty piles carry over from earlier rounds.
    pub fn initialize_round<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self, GameError> {
        let deck = shuffled(&full_deck(), rng);
        let starting_cards: [Card; NUM_ROWS] = deck
            .get(..NUM_ROWS)
            .and_then(|cards| cards.try_into().ok())
            .ok_or(DeckError::InsufficientCards {
                needed: NUM_ROWS,
                available: deck.len(),
            })?;
        let remaining = &deck[NUM_ROWS..];
        let hands = deal(remaining, self.players.len(), CARDS_PER_PLAYER)?;

        let players = self
            .players
            .iter()
            .zip(hands)
            .map(|(player, hand)| player.deal_hand(hand))
            .collect();
        let game = Self {
            players,
            board: Board::new(starting_cards),
            round: self.round + 1,
            selections: Vec::new(),
            leftover: remaining[self.players.len() * CARDS_PER_PLAYER..].to_vec(),
        };
        debug!(
            round = game.round,
            num_players = game.players.len(),
            "Dealt new round"
        );
        Ok(game)
    }

    /// Commits a card for a player, optionally with the row to take should the
    /// card turn out to be too low.
    ///
    /// Reselecting before the turn is resolved is allowed: the previously
    /// selected card goes back to the hand and the stored selection is replaced.
    pub fn select_card_for_player(
        &self,
        player_idx: usize,
        card: Card,
        chosen_row: Option<usize>,
    ) -> Result<Self, GameError> {
        let player = self.player(player_idx)?;
        if let Some(row_idx) = chosen_row.filter(|&row_idx| row_idx >= NUM_ROWS) {
            return Err(GameError::InvalidRowIndex(row_idx));
        }
        let player = match player.selected_card() {
            Some(previous) => player.clear_selection().add_to_hand([previous]),
            None => player.clone(),
        };
        let player = player
            .select_card(card)
            .map_err(|err| GameError::Player { player_idx, err })?;

        let mut game = self.clone();
        game.players[player_idx] = player;
        game.selections.retain(|s| s.player_idx != player_idx);
        game.selections.push(Selection {
            player_idx,
            card,
            chosen_row,
        });
        Ok(game)
    }

    /// Sets or replaces the row choice of a player's pending selection.
    pub fn set_chosen_row(&self, player_idx: usize, row_idx: usize) -> Result<Self, GameError> {
        let player = self.player(player_idx)?;
        if row_idx >= NUM_ROWS {
            return Err(GameError::InvalidRowIndex(row_idx));
        }
        let pos = self
            .selections
            .iter()
            .position(|s| s.player_idx == player_idx)
            .filter(|_| player.selected_card().is_some())
            .ok_or(GameError::NoSelection { player_idx })?;

        let mut game = self.clone();
        game.selections[pos].chosen_row = Some(row_idx);
        Ok(game)
    }

    /// Has every player selected a card?
    pub fn all_players_ready(&self) -> bool {
        self.players.iter().all(|player| {
            player.selected_card().is_some()
                && self.selections.iter().any(|s| s.player_idx == player.index())
        })
    }

    /// Gives every too-low selection without a row choice the cheapest row.
    ///
    /// Whether a card is too low is only known once the lower cards of the
    /// turn have been placed, so this replays the resolution on a scratch
    /// board and picks [`Board::cheapest_row()`] as it stands when the card's
    /// turn comes. Selections with an explicit row are left alone.
    pub fn assign_fallback_rows(&self) -> Result<Self, GameError> {
        let mut game = self.clone();
        let mut board = self.board.clone();
        for mut selection in Board::resolution_order(&self.selections) {
            if selection.chosen_row.is_none() && board.row_target(selection.card).is_none() {
                let row_idx = board.cheapest_row();
                debug!(
                    player_idx = selection.player_idx,
                    card = selection.card.number(),
                    row_idx,
                    "Choosing cheapest row for too-low card"
                );
                game = game.set_chosen_row(selection.player_idx, row_idx)?;
                selection.chosen_row = Some(row_idx);
            }
            board = board.resolve_one(&selection)?.0;
        }
        Ok(game)
    }

    /// Resolves the turn: places every selected card, lowest first, and moves
    /// taken cards into the penalty piles.
    ///
    /// Returns the next game state and the details of every play.
    pub fn resolve_round(&self) -> Result<(Self, Resolution), GameError> {
        if !self.all_players_ready() {
            return Err(GameError::NotAllReady);
        }
        let resolution = self.board.resolve_many(&self.selections)?;

        let players = self
            .players
            .iter()
            .map(|player| {
                player
                    .add_penalty_cards(&resolution.taken_by(player.index()))
                    .clear_selection()
            })
            .collect();
        let game = Self {
            players,
            board: resolution.board.clone(),
            round: self.round,
            selections: Vec::new(),
            leftover: self.leftover.clone(),
        };
        if game.is_game_over() {
            debug!(scores = ?game.scores(), "Game over");
        }
        Ok((game, resolution))
    }

    /// Have all cards of this round been played?
    pub fn is_round_complete(&self) -> bool {
        self.players.iter().all(|player| player.hand().is_empty())
    }

    pub fn is_game_over(&self) -> bool {
        self.players
            .iter()
            .any(|player| player.score() >= GAME_OVER_SCORE)
    }

    /// The player with the fewest bull heads. On a tie, the lowest index wins.
    pub fn winner(&self) -> Option<&Player> {
        // min_by_key returns the first of several equal minimums
        self.players.iter().min_by_key(|player| player.score())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{card, is_valid_deck, BoardError, PlayerError};

    const NAMES: [&str; 4] = ["Alice", "Bob", "Charlie", "Diana"];

    fn dealt_game(seed: u64) -> Game {
        let mut rng = StdRng::seed_from_u64(seed);
        Game::new(NAMES).unwrap().initialize_round(&mut rng).unwrap()
    }

    /// Every player plays the lowest card in hand.
    fn select_lowest(game: &Game) -> Game {
        let mut game = game.clone();
        for player_idx in 0..game.players().len() {
            let card = game.players()[player_idx].sorted_hand()[0];
            game = game.select_card_for_player(player_idx, card, None).unwrap();
        }
        game
    }

    /// A mid-round game with the given board and hands.
    fn game_with(board: Board, hands: &[&[u8]]) -> Game {
        let names: Vec<String> = (0..hands.len()).map(|i| format!("P{}", i)).collect();
        let mut game = Game::new(names).unwrap();
        game.round = 1;
        game.board = board;
        game.players = game
            .players
            .iter()
            .zip(hands)
            .map(|(player, hand)| player.deal_hand(hand.iter().map(|&n| card!(n)).collect()))
            .collect();
        game
    }

    #[test]
    fn player_count_bounds() {
        assert_eq!(
            Game::new(["Alice"]).unwrap_err(),
            GameError::InvalidPlayerCount(1)
        );
        assert_eq!(
            Game::new(vec!["Player"; 11]).unwrap_err(),
            GameError::InvalidPlayerCount(11)
        );
        let game = Game::new(vec!["Player"; 10]).unwrap();
        assert_eq!(game.phase(), GamePhase::Created);
        assert!(game.board().is_empty());
        assert_eq!(game.round(), 0);
    }

    #[test]
    fn initialize_round_deals_all_cards_once() {
        let game = dealt_game(1);
        assert_eq!(game.round(), 1);
        assert_eq!(game.phase(), GamePhase::RoundInProgress);
        assert!(game.players().iter().all(|p| p.hand().len() == CARDS_PER_PLAYER));
        assert!(game.board().rows().iter().all(|row| row.len() == 1));
        assert_eq!(game.leftover().len(), 104 - 4 - 40);

        let mut all_cards: Vec<Card> = game
            .board()
            .rows()
            .iter()
            .flat_map(|row| row.iter().copied())
            .chain(game.players().iter().flat_map(|p| p.hand().iter().copied()))
            .chain(game.leftover().iter().copied())
            .collect();
        all_cards.sort();
        assert!(is_valid_deck(&all_cards));
    }

    #[test]
    fn ten_players_fit_in_the_deck() {
        let mut rng = StdRng::seed_from_u64(3);
        let game = Game::new(vec!["Player"; 10])
            .unwrap()
            .initialize_round(&mut rng)
            .unwrap();
        assert!(game.leftover().is_empty());
    }

    #[test]
    fn readiness_gates_resolution() {
        let game = dealt_game(2);
        assert!(!game.all_players_ready());
        assert_eq!(game.resolve_round().unwrap_err(), GameError::NotAllReady);

        let card = game.players()[0].hand()[0];
        let partial = game.select_card_for_player(0, card, None).unwrap();
        assert!(!partial.all_players_ready());
        assert_eq!(partial.resolve_round().unwrap_err(), GameError::NotAllReady);
        assert_eq!(partial.players()[0].selected_card(), Some(card));

        assert!(select_lowest(&game).all_players_ready());
    }

    #[test]
    fn selection_errors() {
        let game = dealt_game(4);
        let card = game.players()[1].hand()[0];
        assert_eq!(
            game.select_card_for_player(9, card, None).unwrap_err(),
            GameError::InvalidPlayerIndex(9)
        );
        assert_eq!(
            game.select_card_for_player(0, card, None).unwrap_err(),
            GameError::Player {
                player_idx: 0,
                err: PlayerError::CardNotInHand(card)
            }
        );
        assert_eq!(
            game.select_card_for_player(1, card, Some(4)).unwrap_err(),
            GameError::InvalidRowIndex(4)
        );
        let selected = game.select_card_for_player(1, card, None).unwrap();
        assert_eq!(
            selected.select_card_for_player(1, card, Some(9)).unwrap_err(),
            GameError::InvalidRowIndex(9)
        );
        assert_eq!(
            selected.set_chosen_row(0, 1).unwrap_err(),
            GameError::NoSelection { player_idx: 0 }
        );
        assert_eq!(
            selected.set_chosen_row(1, 4).unwrap_err(),
            GameError::InvalidRowIndex(4)
        );
        assert_eq!(
            selected.set_chosen_row(5, 0).unwrap_err(),
            GameError::InvalidPlayerIndex(5)
        );
        let with_row = selected.set_chosen_row(1, 3).unwrap();
        assert_eq!(with_row.selections()[0].chosen_row, Some(3));
    }

    #[test]
    fn reselection_returns_previous_card() {
        let game = dealt_game(8);
        let hand = game.players()[2].sorted_hand();
        let (first, second) = (hand[0], hand[1]);

        let game = game
            .select_card_for_player(2, first, None)
            .unwrap()
            .select_card_for_player(2, second, Some(1))
            .unwrap();
        let player = &game.players()[2];
        assert_eq!(player.selected_card(), Some(second));
        assert!(player.has_card(first));
        assert!(!player.has_card(second));
        assert_eq!(player.hand().len(), CARDS_PER_PLAYER - 1);
        assert_eq!(
            game.selections(),
            &[Selection {
                player_idx: 2,
                card: second,
                chosen_row: Some(1)
            }]
        );

        // Selecting the same card again is fine as well
        let again = game.select_card_for_player(2, second, None).unwrap();
        assert_eq!(again.players()[2].selected_card(), Some(second));
        assert_eq!(again.selections()[0].chosen_row, None);
    }

    #[test]
    fn full_round_empties_hands() {
        let mut game = dealt_game(5);
        for turn in 0..CARDS_PER_PLAYER {
            assert!(!game.is_round_complete(), "turn {}", turn);
            let (next, resolution) = select_lowest(&game)
                .assign_fallback_rows()
                .unwrap()
                .resolve_round()
                .unwrap();
            assert_eq!(resolution.plays.len(), NAMES.len());
            assert!(next.selections().is_empty());
            assert!(next.players().iter().all(|p| p.selected_card().is_none()));
            game = next;
        }
        assert!(game.is_round_complete());
        assert_eq!(game.round(), 1);

        // No card got lost: 104 = board + penalty piles + leftover
        let num_cards: usize = game.board().rows().iter().map(|row| row.len()).sum::<usize>()
            + game.players().iter().map(|p| p.penalty_pile().len()).sum::<usize>()
            + game.leftover().len();
        assert_eq!(num_cards, 104);

        // The next round keeps the scores
        let scores = game.scores();
        let mut rng = StdRng::seed_from_u64(6);
        let next_round = game.initialize_round(&mut rng).unwrap();
        assert_eq!(next_round.round(), 2);
        assert_eq!(next_round.scores(), scores);
    }

    #[test]
    fn resolution_applies_penalties() {
        let board = Board::from_rows([
            vec![card!(10), card!(11), card!(12), card!(13)],
            vec![card!(20)],
            vec![card!(30)],
            vec![card!(40)],
        ])
        .unwrap();
        let game = game_with(board, &[&[15, 90], &[14, 91], &[5, 92]]);
        let game = game
            .select_card_for_player(0, card!(15), None)
            .unwrap()
            .select_card_for_player(1, card!(14), None)
            .unwrap()
            .select_card_for_player(2, card!(5), Some(2))
            .unwrap();
        let (next, resolution) = game.resolve_round().unwrap();

        // 5 takes row 2 (30), 14 fills row 0, 15 takes row 0 as the sixth card
        assert_eq!(resolution.plays.len(), 3);
        assert_eq!(next.players()[2].penalty_pile(), &[card!(30)]);
        assert!(next.players()[1].penalty_pile().is_empty());
        assert_eq!(next.players()[0].score(), 3 + 5 + 1 + 1 + 1);
        assert_eq!(next.board().rows()[0].len(), 1);
        assert_eq!(next.phase(), GamePhase::RoundInProgress);
    }

    #[test]
    fn missing_row_choice_fails_atomically() {
        let board = Board::new([card!(10), card!(20), card!(30), card!(40)]);
        let game = game_with(board, &[&[5], &[25]])
            .select_card_for_player(0, card!(5), None)
            .unwrap()
            .select_card_for_player(1, card!(25), None)
            .unwrap();
        assert_eq!(
            game.resolve_round().unwrap_err(),
            GameError::Board(BoardError::RowChoiceRequired {
                player_idx: 0,
                card: card!(5)
            })
        );
        // Nothing changed
        assert_eq!(game.selections().len(), 2);
        assert_eq!(game.players()[0].selected_card(), Some(card!(5)));
    }

    #[test]
    fn fallback_rows_use_board_at_resolution_time() {
        // Row 3 is the cheapest at the start, but 3 takes it before 4 resolves.
        let board = Board::from_rows([
            vec![card!(10), card!(55)],
            vec![card!(20), card!(22)],
            vec![card!(30), card!(33)],
            vec![card!(40)],
        ])
        .unwrap();
        let game = game_with(board, &[&[4], &[3], &[99]])
            .select_card_for_player(0, card!(4), None)
            .unwrap()
            .select_card_for_player(1, card!(3), None)
            .unwrap()
            .select_card_for_player(2, card!(99), None)
            .unwrap()
            .assign_fallback_rows()
            .unwrap();

        let chosen: Vec<Option<usize>> = (0..3)
            .map(|idx| {
                game.selections()
                    .iter()
                    .find(|s| s.player_idx == idx)
                    .unwrap()
                    .chosen_row
            })
            .collect();
        // Penalties: row 0 = 10, row 1 = 8, row 2 = 8, row 3 = 3.
        // Card 3 takes row 3, after which card 4 fits behind it and needs no row.
        assert_eq!(chosen, vec![None, Some(3), None]);
        let (next, _) = game.resolve_round().unwrap();
        assert_eq!(next.players()[1].score(), 3);
        assert_eq!(next.players()[0].score(), 0);
    }

    #[test]
    fn game_over_and_winner() {
        let board = Board::new([card!(10), card!(20), card!(30), card!(40)]);
        let mut game = game_with(board, &[&[], &[], &[]]);
        assert_eq!(game.phase(), GamePhase::RoundResolved);

        let heavy: Vec<Card> = [11, 22, 33, 44, 66, 77, 88, 99, 55, 10, 20, 30, 40, 60, 70]
            .iter()
            .map(|&n| card!(n))
            .collect();
        let heavy_score: u32 = heavy.iter().map(|c| c.penalty() as u32).sum();
        assert_eq!(heavy_score, 65);
        game.players[0] = game.players[0].add_penalty_cards(&heavy);
        assert!(!game.is_game_over());

        game.players[0] = game.players[0].add_penalty_cards(&[card!(1)]);
        assert!(game.is_game_over());
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.players[1] = game.players[1].add_penalty_cards(&[card!(2), card!(3)]);
        game.players[2] = game.players[2].add_penalty_cards(&[card!(80)]);
        assert_eq!(game.winner().unwrap().index(), 1);
        game.players[1] = game.players[1].add_penalty_cards(&[card!(4)]);
        assert_eq!(game.scores(), vec![66, 3, 3]);
        assert_eq!(game.winner().unwrap().index(), 1);
    }
}
