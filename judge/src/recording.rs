use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde::Serialize;
use take6::{Board, ResolvedPlay, Selection};

/// Writes one JSON file per game into a directory.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    recording: GameRecording,
}

#[derive(Default, Serialize)]
pub struct GameRecording {
    players: Vec<String>,
    turns: Vec<TurnRecording>,
    final_scores: Vec<u32>,
}

/// Everything that happened in one turn.
#[derive(Serialize)]
pub struct TurnRecording {
    pub round: u32,
    pub board_before: Board,
    pub selections: Vec<Selection>,
    /// In resolution order
    pub plays: Vec<ResolvedPlay>,
    pub board_after: Board,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            recording: GameRecording::default(),
        })
    }

    pub fn start_game(&mut self, players: Vec<String>) {
        self.recording = GameRecording {
            players,
            ..GameRecording::default()
        };
    }

    pub fn store_turn(&mut self, turn: TurnRecording) {
        self.recording.turns.push(turn);
    }

    /// Writes the current game to `game_NNNNNN.json` and returns its path.
    pub fn write_game_recording(&mut self, final_scores: Vec<u32>) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let mut recording = std::mem::take(&mut self.recording);
        recording.final_scores = final_scores;
        let writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(writer, &recording)?;
        self.num += 1;
        Ok(filepath)
    }
}
