use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use take6::{Board, Player};
use take6_bots::{Bot, BotDecision, BotError, BotKind};
use tracing::trace;

/// Describes one seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub nick: String,
    pub kind: BotKind,
}

impl PlayerConfig {
    /// Reads a JSON config file like `{ "nick": "Alice", "kind": "smart" }`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read player config '{}'", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid player config '{}'", path.display()))?;
        Ok(config)
    }

    /// Accepts either a path to a JSON config file or an inline
    /// `kind[:nick]` string, see the [`FromStr`] instance.
    ///
    /// Existing files are always read as config files. A missing path ending
    /// in `.json` is reported as such instead of as an unknown bot kind.
    pub fn from_arg(arg: &str) -> anyhow::Result<Self> {
        let path = Path::new(arg);
        if path.is_file() || path.extension().is_some_and(|ext| ext == "json") {
            Self::load(path)
        } else {
            Ok(arg.parse()?)
        }
    }
}

/// Parses `smart` or `easy:Bob`. Without a nick, the kind is used as the nick.
impl FromStr for PlayerConfig {
    type Err = take6_bots::UnknownBotKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, nick) = match s.split_once(':') {
            Some((kind, nick)) => (kind.parse::<BotKind>()?, String::from(nick)),
            None => {
                let kind = s.parse::<BotKind>()?;
                (kind, kind.to_string())
            }
        };
        Ok(Self { nick, kind })
    }
}

/// A named bot taking part in games.
pub struct Contestant {
    pub name: String,
    bot: Box<dyn Bot>,
}

impl Contestant {
    pub fn new(name: &str, bot: Box<dyn Bot>) -> Self {
        Self {
            name: String::from(name),
            bot,
        }
    }

    /// The bot's own randomness is seeded from `rng`.
    pub fn from_config(config: &PlayerConfig, rng: &mut StdRng, row_hint: bool) -> Self {
        Self::new(&config.nick, config.kind.build(rng.gen(), row_hint))
    }

    pub fn decide(&mut self, state: &Player, board: &Board) -> Result<BotDecision, BotError> {
        let decision = self.bot.select_card(state, board)?;
        trace!(
            player = %self.name,
            card = decision.card.number(),
            chosen_row = ?decision.chosen_row,
            "Bot decided"
        );
        Ok(decision)
    }
}
