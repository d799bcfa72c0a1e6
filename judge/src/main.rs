use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use judge::{play_game, Contestant, GameResult, PlayerConfig, Recorder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Players as "kind[:nick]" (kind is "easy" or "smart") or paths to
    /// player config files in JSON format
    #[clap(num_args(2..=10), required = true)]
    players: Vec<String>,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the tournament as soon as one player makes an illegal move
    #[arg(short, long, default_value_t = false)]
    stop_on_illegal_move: bool,

    /// Record every turn as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,

    /// Let the easy bot pick a random row when its card is too low
    #[arg(long, default_value_t = false)]
    row_hint: bool,
}

#[derive(Default, Clone)]
struct Tally {
    wins: usize,
    illegal_moves: usize,
    total_score: u64,
}

fn play_tournament(
    players: &mut [Contestant],
    num_games: usize,
    rng: &mut StdRng,
    stop_on_illegal_move: bool,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<(Vec<Tally>, usize)> {
    let mut tallies = vec![Tally::default(); players.len()];
    let mut games_finished = 0;

    for game_idx in 0..num_games {
        match play_game(rng, players, recorder)? {
            GameResult::Finished {
                winner_idx,
                scores,
                rounds,
            } => {
                debug!(winner = %players[winner_idx].name, game_idx, rounds, ?scores);
                tallies[winner_idx].wins += 1;
                for (tally, score) in tallies.iter_mut().zip(scores) {
                    tally.total_score += u64::from(score);
                }
                games_finished += 1;
            }
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                info!(
                    player = %players[player_idx].name,
                    game_idx, "Illegal move by player"
                );
                let mut err_dyn = &err as &dyn std::error::Error;
                while let Some(src_err) = err_dyn.source() {
                    info!("{}", err_dyn);
                    err_dyn = src_err;
                }
                info!("{}", err_dyn);
                tallies[player_idx].illegal_moves += 1;
                if stop_on_illegal_move {
                    break;
                }
            }
        }
    }

    Ok((tallies, games_finished))
}

fn print_results(players: &[Contestant], tallies: &[Tally], games_finished: usize) {
    println!("\nResults after {} finished games:\n", games_finished);
    println!(
        " {:19} | {:>6} | {:>6} | {:>9} | {:>7}",
        "player", "wins", "win %", "avg score", "illegal"
    );
    let separator = [21, 8, 8, 11, 9]
        .iter()
        .map(|&width| "-".repeat(width))
        .join("|");
    println!("{}", separator);
    let ranking = players
        .iter()
        .zip(tallies)
        .sorted_by(|(_, a), (_, b)| {
            b.wins
                .cmp(&a.wins)
                .then(a.total_score.cmp(&b.total_score))
        });
    for (player, tally) in ranking {
        let (win_percentage, avg_score) = if games_finished > 0 {
            (
                tally.wins as f32 / games_finished as f32 * 100.0,
                tally.total_score as f32 / games_finished as f32,
            )
        } else {
            (0.0, 0.0)
        };
        println!(
            " {:19} | {:>6} | {:>5.1}% | {:>9.1} | {:>7}",
            player.name, tally.wins, win_percentage, avg_score, tally.illegal_moves
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let player_configs = args
        .players
        .iter()
        .map(|arg| PlayerConfig::from_arg(arg))
        .collect::<Result<Vec<PlayerConfig>, anyhow::Error>>()?;
    let lineup = player_configs
        .iter()
        .map(|config| format!("{} ({})", config.nick, config.kind))
        .join(", ");
    info!(
        players = %lineup,
        num_games = args.num_games,
        "Starting tournament"
    );

    let mut players: Vec<Contestant> = player_configs
        .iter()
        .map(|config| Contestant::from_config(config, &mut rng, args.row_hint))
        .collect();

    let (tallies, games_finished) = play_tournament(
        &mut players,
        args.num_games,
        &mut rng,
        args.stop_on_illegal_move,
        &mut recorder,
    )?;

    print_results(&players, &tallies, games_finished);

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
