use thiserror::Error;
use tictactoe_engine::{GameMode, ParseModeError};

pub const HELP: &str = "\
Commands:
  1-9            place your mark (cells numbered left to right, top to bottom)
  new [mode]     start a new game, optionally switching mode
  mode <mode>    switch mode (starts a new game)
  reset          reset the scores
  help           show this help
  quit           leave
Modes: local, bot-easy, bot-medium, bot-hard";

#[derive(Debug, PartialEq, Eq)]
pub enum InputCommand {
    Place(usize),
    NewGame(Option<GameMode>),
    ResetScores,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),
    #[error("cell must be between 1 and 9, got '{0}'")]
    CellOutOfRange(String),
    #[error("'mode' needs a mode name")]
    MissingMode,
    #[error(transparent)]
    Mode(#[from] ParseModeError),
}

pub fn parse_input(line: &str) -> Result<InputCommand, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(InputError::Empty);
    };
    let argument = words.next();

    match command.to_ascii_lowercase().as_str() {
        "new" | "n" => Ok(InputCommand::NewGame(argument.map(str::parse::<GameMode>).transpose()?)),
        "mode" | "m" => {
            let mode = argument.ok_or(InputError::MissingMode)?.parse::<GameMode>()?;
            Ok(InputCommand::NewGame(Some(mode)))
        }
        "reset" => Ok(InputCommand::ResetScores),
        "help" | "h" | "?" => Ok(InputCommand::Help),
        "quit" | "q" | "exit" => Ok(InputCommand::Quit),
        cell if cell.chars().all(|c| c.is_ascii_digit()) => match cell.parse::<usize>() {
            Ok(n @ 1..=9) => Ok(InputCommand::Place(n - 1)),
            _ => Err(InputError::CellOutOfRange(cell.to_string())),
        },
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}
