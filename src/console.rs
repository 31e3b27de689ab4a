//! Operator console
//!
//! Parses one line of operator input into a session event or a console
//! command. The console stands in for the window: every control of the
//! panel has a command.

use photoslicer_settings::{ControlChange, LanguageId, ThemeId};
use photoslicer_ui::{OperatorInput, SessionEvent};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  start                  press the action button (start, pause or resume)
  browse                 pick the source folder
  source <path>          type the source folder
  tab <process|single>   switch workflow tab
  lang <en|fa>           switch language
  theme <name>           switch theme (blue, purple, green, orange, red)
  width <px>             output width
  height <px>            slice height limit
  quality <1-100>        save quality
  format <jpg|png|webp>  save format
  custom-width <on|off>  use the custom width
  zip <on|off>           archive as zip
  pdf <on|off>           archive as pdf
  enhance <on|off>       AI enhance
  no-stitch <on|off>     slice without stitching
  open                   open the result folder
  minimize               minimize the window
  resize <w> <h>         report a new window size
  view                   print the current view as JSON
  help                   show this help
  quit                   close the window";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },

    #[error("Invalid argument for '{command}': {reason}")]
    InvalidArgument { command: String, reason: String },
}

/// A parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(SessionEvent),
    ShowView,
    Help,
}

impl From<OperatorInput> for Command {
    fn from(input: OperatorInput) -> Self {
        Command::Event(SessionEvent::Operator(input))
    }
}

/// Parse one console line; blank lines parse to `None`
pub fn parse(line: &str) -> Result<Option<Command>, ConsoleError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let name = name.to_ascii_lowercase();

    let command = match name.as_str() {
        "" => return Ok(None),
        "start" => OperatorInput::Trigger.into(),
        "browse" => OperatorInput::Browse.into(),
        "open" => OperatorInput::OpenResult.into(),
        "minimize" => OperatorInput::Minimize.into(),
        "quit" | "exit" | "close" => OperatorInput::Close.into(),
        "source" => OperatorInput::SetSource(rest.to_string()).into(),
        "tab" => OperatorInput::SwitchTab(required(&name, rest, "a tab name")?.to_string()).into(),
        "lang" => {
            let language = required(&name, rest, "a language")?
                .parse::<LanguageId>()
                .map_err(|reason| invalid(&name, reason))?;
            OperatorInput::SetLanguage(language).into()
        }
        "theme" => {
            let theme = required(&name, rest, "a theme name")?
                .parse::<ThemeId>()
                .map_err(|reason| invalid(&name, reason))?;
            OperatorInput::SetTheme(theme).into()
        }
        "width" => control(ControlChange::Width(required(&name, rest, "a width")?.to_string())),
        "height" => control(ControlChange::HeightLimit(
            required(&name, rest, "a height")?.to_string(),
        )),
        "quality" => control(ControlChange::Quality(
            required(&name, rest, "a quality")?.to_string(),
        )),
        "format" => control(ControlChange::Format(
            required(&name, rest, "a format")?.to_string(),
        )),
        "custom-width" => control(ControlChange::CustomWidth(switch(&name, rest)?)),
        "zip" => control(ControlChange::Zip(switch(&name, rest)?)),
        "pdf" => control(ControlChange::Pdf(switch(&name, rest)?)),
        "enhance" => control(ControlChange::Enhance(switch(&name, rest)?)),
        "no-stitch" => control(ControlChange::NoStitch(switch(&name, rest)?)),
        "resize" => {
            let mut parts = rest.split_whitespace();
            let (Some(width), Some(height), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(ConsoleError::MissingArgument {
                    command: name.clone(),
                    expected: "a width and a height",
                });
            };
            Command::Event(SessionEvent::Resize {
                width: dimension(&name, width)?,
                height: dimension(&name, height)?,
            })
        }
        "view" => Command::ShowView,
        "help" | "?" => Command::Help,
        _ => return Err(ConsoleError::UnknownCommand(name.clone())),
    };
    Ok(Some(command))
}

fn control(change: ControlChange) -> Command {
    OperatorInput::Control(change).into()
}

fn required<'a>(
    command: &str,
    rest: &'a str,
    expected: &'static str,
) -> Result<&'a str, ConsoleError> {
    if rest.is_empty() {
        Err(ConsoleError::MissingArgument {
            command: command.to_string(),
            expected,
        })
    } else {
        Ok(rest)
    }
}

fn switch(command: &str, rest: &str) -> Result<bool, ConsoleError> {
    match required(command, rest, "on or off")?.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(invalid(command, format!("expected on or off, got '{}'", other))),
    }
}

fn dimension(command: &str, value: &str) -> Result<f64, ConsoleError> {
    value
        .parse::<f64>()
        .map_err(|e| invalid(command, format!("'{}': {}", value, e)))
}

fn invalid(command: &str, reason: impl Into<String>) -> ConsoleError {
    ConsoleError::InvalidArgument {
        command: command.to_string(),
        reason: reason.into(),
    }
}
