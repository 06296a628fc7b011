//! Slash commands typed into the chat input.
//!
//! ```text
//! /checkin <mood> [intensity] [note...]
//! /stats
//! /avatar [field value]
//! /clear
//! /help
//! ```
//!
//! Anything not starting with `/` is a chat message and never reaches here.

use std::fmt;

use crate::core::avatar::AvatarField;
use crate::core::mood::{Mood, UnknownMood};

pub const DEFAULT_INTENSITY: u8 = 5;

pub const HELP_TEXT: &str = "Commands:\n\
    /checkin <mood> [1-10] [note]  log how you feel today\n\
    /stats                         mood summary and streaks\n\
    /avatar [field value]          open the avatar editor, or set one field\n\
    /clear                         clear the conversation\n\
    /help                          show this list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CheckIn {
        mood: Mood,
        intensity: u8,
        note: Option<String>,
    },
    Stats,
    /// `None` opens the editor.
    Avatar(Option<(AvatarField, String)>),
    Clear,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    Usage(&'static str),
    Mood(UnknownMood),
    Intensity(String),
    Field(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(name) => write!(f, "unknown command /{name} (try /help)"),
            CommandError::Usage(usage) => write!(f, "usage: {usage}"),
            CommandError::Mood(e) => write!(f, "{e}"),
            CommandError::Intensity(raw) => write!(f, "intensity must be a number 1-10, got {raw}"),
            CommandError::Field(raw) => write!(f, "unknown avatar field: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Parses `input` as a slash command. Returns `None` for ordinary chat text.
pub fn parse(input: &str) -> Option<Result<Command, CommandError>> {
    let body = input.trim().strip_prefix('/')?;
    let mut words = body.split_whitespace();
    let name = words.next().unwrap_or("").to_lowercase();
    let rest: Vec<&str> = words.collect();

    Some(match name.as_str() {
        "checkin" | "check-in" => parse_checkin(&rest),
        "stats" | "progress" => Ok(Command::Stats),
        "avatar" => parse_avatar(&rest),
        "clear" => Ok(Command::Clear),
        "help" => Ok(Command::Help),
        _ => Err(CommandError::Unknown(name)),
    })
}

fn parse_checkin(args: &[&str]) -> Result<Command, CommandError> {
    let Some((mood, rest)) = args.split_first() else {
        return Err(CommandError::Usage("/checkin <mood> [1-10] [note]"));
    };
    let mood: Mood = mood.parse().map_err(CommandError::Mood)?;

    let (intensity, note_words) = match rest.split_first() {
        Some((raw, tail)) if raw.chars().all(|c| c.is_ascii_digit()) => {
            let value = raw
                .parse::<u8>()
                .map_err(|_| CommandError::Intensity(raw.to_string()))?;
            (value, tail)
        }
        _ => (DEFAULT_INTENSITY, rest),
    };

    let note = note_words.join(" ");
    Ok(Command::CheckIn {
        mood,
        intensity,
        note: (!note.is_empty()).then_some(note),
    })
}

fn parse_avatar(args: &[&str]) -> Result<Command, CommandError> {
    match args {
        [] => Ok(Command::Avatar(None)),
        [field, value @ ..] if !value.is_empty() => {
            let field =
                AvatarField::from_key(field).ok_or_else(|| CommandError::Field(field.to_string()))?;
            Ok(Command::Avatar(Some((field, value.join(" ")))))
        }
        _ => Err(CommandError::Usage("/avatar [field value]")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse("hello"), None);
        assert_eq!(parse("what if / when"), None);
    }

    #[test]
    fn test_checkin_full() {
        assert_eq!(
            parse("/checkin happy 8 great run this morning"),
            Some(Ok(Command::CheckIn {
                mood: Mood::Happy,
                intensity: 8,
                note: Some("great run this morning".into()),
            }))
        );
    }

    #[test]
    fn test_checkin_defaults() {
        assert_eq!(
            parse("/checkin Tired"),
            Some(Ok(Command::CheckIn {
                mood: Mood::Tired,
                intensity: DEFAULT_INTENSITY,
                note: None,
            }))
        );
    }

    #[test]
    fn test_checkin_note_without_intensity() {
        let Some(Ok(Command::CheckIn { intensity, note, .. })) = parse("/checkin sad long week")
        else {
            panic!("expected check-in");
        };
        assert_eq!(intensity, DEFAULT_INTENSITY);
        assert_eq!(note.as_deref(), Some("long week"));
    }

    #[test]
    fn test_checkin_errors() {
        assert!(matches!(parse("/checkin"), Some(Err(CommandError::Usage(_)))));
        assert!(matches!(parse("/checkin ecstatic"), Some(Err(CommandError::Mood(_)))));
        assert_eq!(
            parse("/checkin happy 300"),
            Some(Err(CommandError::Intensity("300".into())))
        );
    }

    #[test]
    fn test_avatar_forms() {
        assert_eq!(parse("/avatar"), Some(Ok(Command::Avatar(None))));
        assert_eq!(
            parse("/avatar hair_color red"),
            Some(Ok(Command::Avatar(Some((AvatarField::HairColor, "red".into())))))
        );
        assert!(matches!(parse("/avatar shoes red"), Some(Err(CommandError::Field(_)))));
        assert!(matches!(parse("/avatar outfit"), Some(Err(CommandError::Usage(_)))));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse(" /STATS "), Some(Ok(Command::Stats)));
        assert_eq!(parse("/clear"), Some(Ok(Command::Clear)));
        assert_eq!(parse("/help"), Some(Ok(Command::Help)));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("/dance").unwrap().unwrap_err();
        assert_eq!(err.to_string(), "unknown command /dance (try /help)");
    }
}
