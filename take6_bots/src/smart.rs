use take6::{Board, Card, Player};
use tracing::trace;

use crate::{Bot, BotDecision, BotError};

/// Greedily avoids penalties.
///
/// The bot sorts its hand into cards that can be placed safely, cards that
/// would be the sixth card of a row, and cards that are too low, all judged
/// against the board as it is now. It plays:
///
/// 1. the lowest safe card, if there is one;
/// 2. otherwise the sixth card whose row has the fewest bull heads, unless the
///    cheapest row on the board is strictly cheaper, in which case it plays
///    its lowest too-low card and picks that row;
/// 3. otherwise its lowest card, picking the cheapest row.
///
/// Cards played by others in the same turn are not taken into account, so
/// a "safe" card can still end up taking a row.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmartBot;

impl SmartBot {
    pub fn decide(&self, player: &Player, board: &Board) -> Result<BotDecision, BotError> {
        let hand = player.sorted_hand();
        let &lowest = hand.first().ok_or(BotError::EmptyHand)?;
        if board.is_empty() {
            return Ok(BotDecision {
                card: lowest,
                chosen_row: None,
            });
        }

        let mut safe: Vec<Card> = Vec::new();
        // Together with the bull heads of the row that would be taken
        let mut sixth: Vec<(Card, u32)> = Vec::new();
        let mut too_low: Vec<Card> = Vec::new();
        for card in hand {
            match board.row_target(card) {
                None => too_low.push(card),
                Some(row_idx) => {
                    let row = &board.rows()[row_idx];
                    if row.is_full() {
                        sixth.push((card, row.penalty()));
                    } else {
                        safe.push(card);
                    }
                }
            }
        }

        if let Some(&card) = safe.first() {
            return Ok(BotDecision {
                card,
                chosen_row: None,
            });
        }

        let cheapest_row = board.cheapest_row();
        let cheapest_penalty = board.rows()[cheapest_row].penalty();

        // min_by_key keeps the lowest card among equally cheap ones
        if let Some(&(card, penalty)) = sixth.iter().min_by_key(|&&(_, penalty)| penalty) {
            return Ok(match too_low.first() {
                Some(&low_card) if cheapest_penalty < penalty => {
                    trace!(
                        card = low_card.number(),
                        cheapest_row,
                        "Taking a cheap row instead of a sixth card"
                    );
                    BotDecision {
                        card: low_card,
                        chosen_row: Some(cheapest_row),
                    }
                }
                _ => BotDecision {
                    card,
                    chosen_row: None,
                },
            });
        }

        // Only too-low cards are left, and `lowest` is the first of them.
        Ok(BotDecision {
            card: lowest,
            chosen_row: Some(cheapest_row),
        })
    }
}

impl Bot for SmartBot {
    fn select_card(&mut self, player: &Player, board: &Board) -> Result<BotDecision, BotError> {
        let decision = self.decide(player, board)?;
        trace!(
            player = player.name(),
            card = decision.card.number(),
            chosen_row = ?decision.chosen_row,
            "Smart bot decision"
        );
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use take6::card;

    use super::*;

    fn cards(numbers: &[u8]) -> Vec<Card> {
        numbers.iter().map(|&n| card!(n)).collect()
    }

    fn player_with_hand(numbers: &[u8]) -> Player {
        Player::new("Smart", 0).add_to_hand(cards(numbers))
    }

    fn board_from(rows: [&[u8]; 4]) -> Board {
        Board::from_rows(rows.map(cards)).unwrap()
    }

    fn decide(hand: &[u8], board: &Board) -> (u8, Option<usize>) {
        let decision = SmartBot.decide(&player_with_hand(hand), board).unwrap();
        (decision.card.number(), decision.chosen_row)
    }

    #[test]
    fn lowest_safe_card() {
        let board = board_from([&[10], &[20], &[30], &[40]]);
        assert_eq!(decide(&[45, 25, 15, 35], &board), (15, None));
    }

    #[test]
    fn skips_sixth_card() {
        let board = board_from([&[10, 11, 12, 13, 14], &[20], &[30], &[40]]);
        assert_eq!(decide(&[15, 25, 35], &board), (25, None));
    }

    #[test]
    fn cheapest_sixth_card() {
        let board = board_from([
            &[10, 11, 12, 13, 14], // 11 bull heads
            &[20, 21, 22, 23, 24], // 11 bull heads
            &[30, 31, 32, 34, 36], // 7 bull heads
            &[40, 41, 42, 43, 44], // 11 bull heads
        ]);
        assert_eq!(decide(&[45, 25, 37, 15], &board), (37, None));
        // Equally expensive rows: the lower card wins
        assert_eq!(decide(&[45, 25, 15], &board), (15, None));
    }

    #[test]
    fn too_low_card_when_a_row_is_cheaper() {
        let board = board_from([
            &[10, 11, 12, 13, 14], // 11 bull heads
            &[20],                 // 3 bull heads
            &[30, 31, 32, 34, 36], // 7 bull heads
            &[40, 41, 42, 43, 44], // 11 bull heads
        ]);
        // 15 would cost 11, while 3 can take row 1 for 3
        assert_eq!(decide(&[15, 3, 8], &board), (3, Some(1)));
    }

    #[test]
    fn sixth_card_when_no_row_is_cheaper() {
        let board = board_from([
            &[60, 61, 62, 63, 64], // 7 bull heads
            &[20, 55],             // 10 bull heads
            &[70, 71, 72, 73, 74], // 7 bull heads
            &[80, 81, 82, 83, 84], // 7 bull heads
        ]);
        // 65 costs 7, which ties with the cheapest row: no reason to switch
        assert_eq!(decide(&[65, 3], &board), (65, None));
    }

    #[test]
    fn only_too_low_cards() {
        let board = board_from([&[50, 51, 52], &[60, 61], &[70, 71, 72, 73], &[80]]);
        assert_eq!(decide(&[5], &board), (5, Some(3)));

        let board = board_of_singletons();
        assert_eq!(decide(&[3, 1, 2], &board), (1, Some(0)));
    }

    fn board_of_singletons() -> Board {
        board_from([&[50], &[60], &[70], &[80]])
    }

    #[test]
    fn empty_board_plays_lowest_card() {
        assert_eq!(decide(&[30, 7, 12], &Board::default()), (7, None));
    }

    #[test]
    fn empty_hand() {
        assert_eq!(
            SmartBot.decide(&Player::new("Smart", 0), &board_of_singletons()),
            Err(BotError::EmptyHand)
        );
    }

    #[test]
    fn does_not_modify_inputs() {
        let player = player_with_hand(&[1, 2]);
        let board = board_of_singletons();
        let (player_before, board_before) = (player.clone(), board.clone());
        let _ = SmartBot.select_card(&player, &board);
        assert_eq!(player, player_before);
        assert_eq!(board, board_before);
    }
}
