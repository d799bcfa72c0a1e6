use rand::rngs::StdRng;
use take6::Game;
use tracing::{debug, trace};

use crate::error::IllegalMove;
use crate::player::Contestant;
use crate::recording::{Recorder, TurnRecording};

pub enum GameResult {
    Finished {
        winner_idx: usize,
        scores: Vec<u32>,
        rounds: u32,
    },
    IllegalMoveByPlayer {
        player_idx: usize,
        err: IllegalMove,
    },
}

/// Plays rounds until somebody reaches the game-over score.
///
/// Returns an error only when the engine itself fails, not when a bot
/// makes an illegal move.
pub fn play_game(
    rng: &mut StdRng,
    players: &mut [Contestant],
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameResult> {
    let names: Vec<String> = players.iter().map(|p| p.name.clone()).collect();
    let mut game = Game::new(names.clone())?;
    if let Some(rec) = recorder {
        rec.start_game(names);
    }

    'rounds: loop {
        game = game.initialize_round(rng)?;

        while !game.is_round_complete() {
            for (player_idx, contestant) in players.iter_mut().enumerate() {
                let state = game.player(player_idx)?;
                let decision = match contestant.decide(state, game.board()) {
                    Ok(decision) => decision,
                    Err(err) => {
                        return Ok(GameResult::IllegalMoveByPlayer {
                            player_idx,
                            err: IllegalMove::NoDecision(err),
                        })
                    }
                };
                game = match game.select_card_for_player(
                    player_idx,
                    decision.card,
                    decision.chosen_row,
                ) {
                    Ok(game) => game,
                    Err(err) => {
                        return Ok(GameResult::IllegalMoveByPlayer {
                            player_idx,
                            err: IllegalMove::RejectedCard {
                                card: decision.card,
                                err,
                            },
                        })
                    }
                };
            }

            let board_before = game.board().clone();
            let ready = game.assign_fallback_rows()?;
            let selections = ready.selections().to_vec();
            let (next, resolution) = ready.resolve_round()?;
            for play in &resolution.plays {
                trace!(
                    player = %players[play.player_idx].name,
                    card = play.card.number(),
                    row_idx = play.row_idx,
                    kind = ?play.kind,
                    penalty = play.penalty(),
                    "Card resolved"
                );
            }
            if let Some(rec) = recorder {
                rec.store_turn(TurnRecording {
                    round: next.round(),
                    board_before,
                    selections,
                    plays: resolution.plays,
                    board_after: resolution.board,
                });
            }
            game = next;

            if game.is_game_over() {
                break 'rounds;
            }
        }
        debug!(round = game.round(), scores = ?game.scores(), "Round finished");
    }

    let scores = game.scores();
    if let Some(rec) = recorder {
        rec.write_game_recording(scores.clone())?;
    }

    let winner_idx = game
        .winner()
        .map(|player| player.index())
        .ok_or_else(|| anyhow::anyhow!("Game without players"))?;
    Ok(GameResult::Finished {
        winner_idx,
        scores,
        rounds: game.round(),
    })
}
