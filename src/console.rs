use crate::shadow::{Channel, ControlEvent, DELTA_STEPS, DeltaStep, ShadowError};
use crate::shadow::controller::PanelDisplay;
use crate::voice::controller::DialogDisplay;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error(transparent)]
    Shadow(#[from] ShadowError),
    #[error("'{0}' is not a number")]
    BadStep(String),
    #[error("unrecognized command '{0}', try 'help'")]
    Unrecognized(String),
}

/// One console action, the panel's counterpart to a widget callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Control(ControlEvent),
    Say(String),
    Help,
    Quit,
}

/// Map one console line to a command.
///
/// Grammar: `<channel> on|off`, `<channel> delta <step>`, `say <text>`,
/// `help`, `quit`.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let first = words.next().ok_or(ParseError::Empty)?;

    match first {
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "say" => {
            let utterance = line["say".len()..].trim();
            if utterance.is_empty() {
                Err(ParseError::Unrecognized(line.to_string()))
            } else {
                Ok(Command::Say(utterance.to_string()))
            }
        }
        channel => {
            let channel: Channel = channel.parse()?;
            match (words.next(), words.next()) {
                (Some("on"), None) => Ok(Command::Control(ControlEvent::Toggle {
                    channel,
                    on: true,
                })),
                (Some("off"), None) => Ok(Command::Control(ControlEvent::Toggle {
                    channel,
                    on: false,
                })),
                (Some("delta"), Some(step)) => {
                    let value: u8 = step
                        .parse()
                        .map_err(|_| ParseError::BadStep(step.to_string()))?;
                    Ok(Command::Control(ControlEvent::Delta {
                        channel,
                        step: DeltaStep::new(value)?,
                    }))
                }
                _ => Err(ParseError::Unrecognized(line.to_string())),
            }
        }
    }
}

pub fn help_text() -> String {
    format!(
        "Commands:\n  \
         <channel> on|off        toggle a channel (light, sound, ultra, rotary)\n  \
         <channel> delta <step>  request a step change, step in {DELTA_STEPS:?}\n  \
         say <text>              talk to the bot\n  \
         help                    show this message\n  \
         quit                    exit"
    )
}

/// Prints panel updates to stdout.
#[derive(Default)]
pub struct ConsolePanel;

impl PanelDisplay for ConsolePanel {
    fn set_channel_text(&mut self, channel: Channel, text: &str) {
        println!("[{channel}] {text}");
    }

    fn set_last_message(&mut self, raw: &str) {
        println!("[last message] {raw}");
    }

    fn set_status(&mut self, status: &str) {
        println!("[status] {status}");
    }
}

impl DialogDisplay for ConsolePanel {
    fn set_response(&mut self, text: &str) {
        println!("[bot] {text}");
    }

    fn set_transcript(&mut self, text: &str) {
        println!("[heard] {text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toggles_and_deltas() {
        assert_eq!(
            parse_line("light on").unwrap(),
            Command::Control(ControlEvent::Toggle {
                channel: Channel::Light,
                on: true,
            })
        );
        assert_eq!(
            parse_line("  ultra off ").unwrap(),
            Command::Control(ControlEvent::Toggle {
                channel: Channel::Ultra,
                on: false,
            })
        );
        assert_eq!(
            parse_line("sound delta 20").unwrap(),
            Command::Control(ControlEvent::Delta {
                channel: Channel::Sound,
                step: DeltaStep::new(20).unwrap(),
            })
        );
    }

    #[test]
    fn parses_say_with_full_utterance() {
        assert_eq!(
            parse_line("say turn the light on").unwrap(),
            Command::Say("turn the light on".to_string())
        );
    }

    #[test]
    fn rejects_bad_input_without_panicking() {
        assert!(parse_line("").is_err());
        assert!(parse_line("laser on").is_err());
        assert!(parse_line("light blink").is_err());
        assert!(parse_line("light delta nine").is_err());
        assert!(parse_line("light delta 12").is_err());
        assert!(parse_line("say").is_err());
        assert!(parse_line("light on please").is_err());
    }
}
