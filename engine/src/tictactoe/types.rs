use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseModeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Option<Mark> {
        match self {
            Mark::X => Some(Mark::O),
            Mark::O => Some(Mark::X),
            Mark::Empty => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
            Mark::Empty => '_',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Outcome of a board. Always recomputed from the board it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Win(Mark),
    Draw,
}

impl GameResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine {
    pub mark: Mark,
    pub cells: [usize; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GameMode {
    #[default]
    LocalTwoPlayer,
    VersusBot(Difficulty),
}

impl GameMode {
    /// The bot always answers the human's opening move.
    pub const BOT_MARK: Mark = Mark::O;

    pub fn bot_mark(&self) -> Option<Mark> {
        match self {
            GameMode::LocalTwoPlayer => None,
            GameMode::VersusBot(_) => Some(Self::BOT_MARK),
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            GameMode::LocalTwoPlayer => None,
            GameMode::VersusBot(difficulty) => Some(*difficulty),
        }
    }

    pub fn key(&self) -> String {
        match self {
            GameMode::LocalTwoPlayer => "local".to_string(),
            GameMode::VersusBot(difficulty) => format!("bot-{}", difficulty.key()),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(GameMode::LocalTwoPlayer),
            "bot-easy" => Ok(GameMode::VersusBot(Difficulty::Easy)),
            "bot-medium" => Ok(GameMode::VersusBot(Difficulty::Medium)),
            "bot-hard" => Ok(GameMode::VersusBot(Difficulty::Hard)),
            _ => Err(ParseModeError(value.to_string())),
        }
    }
}

impl TryFrom<String> for GameMode {
    type Error = ParseModeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GameMode> for String {
    fn from(mode: GameMode) -> Self {
        mode.key()
    }
}

/// Cumulative results. Survives new games, cleared only by an explicit reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Scores {
    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win(Mark::X) => self.x_wins += 1,
            GameResult::Win(Mark::O) => self.o_wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Win(Mark::Empty) | GameResult::InProgress => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Scores::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_swaps_players() {
        assert_eq!(Mark::X.opponent(), Some(Mark::O));
        assert_eq!(Mark::O.opponent(), Some(Mark::X));
        assert_eq!(Mark::Empty.opponent(), None);
    }

    #[test]
    fn test_mode_keys_parse() {
        assert_eq!("local".parse::<GameMode>(), Ok(GameMode::LocalTwoPlayer));
        assert_eq!(
            "bot-medium".parse::<GameMode>(),
            Ok(GameMode::VersusBot(Difficulty::Medium))
        );
        assert_eq!(
            " Bot-Hard ".parse::<GameMode>(),
            Ok(GameMode::VersusBot(Difficulty::Hard))
        );
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result = "bot-impossible".parse::<GameMode>();

        assert_eq!(result, Err(ParseModeError("bot-impossible".to_string())));
    }

    #[test]
    fn test_mode_key_matches_parser() {
        for mode in [
            GameMode::LocalTwoPlayer,
            GameMode::VersusBot(Difficulty::Easy),
            GameMode::VersusBot(Difficulty::Medium),
            GameMode::VersusBot(Difficulty::Hard),
        ] {
            assert_eq!(mode.key().parse::<GameMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_scores_record_each_category() {
        let mut scores = Scores::default();

        scores.record(GameResult::Win(Mark::X));
        scores.record(GameResult::Win(Mark::O));
        scores.record(GameResult::Win(Mark::O));
        scores.record(GameResult::Draw);
        scores.record(GameResult::InProgress);

        assert_eq!(
            scores,
            Scores {
                x_wins: 1,
                o_wins: 2,
                draws: 1
            }
        );

        scores.reset();
        assert_eq!(scores, Scores::default());
    }
}
