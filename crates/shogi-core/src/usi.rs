//! USI `position` command parsing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsiError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// A parsed `position [sfen <sfen> | startpos] [moves <m1> ... <mn>]` command.
///
/// Move tokens are kept as text; the position that replays them decides
/// whether each one is well-formed and legal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionCommand {
    /// The SFEN to start from, or `None` for the initial position.
    pub sfen: Option<String>,
    pub moves: Vec<String>,
}

impl PositionCommand {
    /// Parses a position command. The leading `position` keyword is optional.
    pub fn parse(input: &str) -> Result<Self, UsiError> {
        let mut parts = input.split_whitespace().peekable();
        if parts.peek() == Some(&"position") {
            parts.next();
        }

        let sfen = match parts.next() {
            Some("startpos") => None,
            Some("sfen") => {
                let mut sfen_parts = Vec::new();
                while let Some(&part) = parts.peek() {
                    if part == "moves" {
                        break;
                    }
                    sfen_parts.push(part);
                    parts.next();
                }
                if sfen_parts.is_empty() {
                    return Err(UsiError::ParseError("missing SFEN after 'sfen'".to_string()));
                }
                Some(sfen_parts.join(" "))
            }
            Some(other) => {
                return Err(UsiError::ParseError(format!(
                    "Expected 'startpos' or 'sfen', got '{}'",
                    other
                )));
            }
            None => {
                return Err(UsiError::InvalidCommand(input.trim().to_string()));
            }
        };

        let moves = match parts.next() {
            Some("moves") => parts.map(str::to_string).collect(),
            Some(other) => {
                return Err(UsiError::ParseError(format!(
                    "Expected 'moves', got '{}'",
                    other
                )));
            }
            None => Vec::new(),
        };

        Ok(PositionCommand { sfen, moves })
    }

    /// Formats the command back into USI text.
    pub fn to_usi(&self) -> String {
        let mut out = match &self.sfen {
            Some(sfen) => format!("position sfen {sfen}"),
            None => "position startpos".to_string(),
        };
        if !self.moves.is_empty() {
            out.push_str(" moves ");
            out.push_str(&self.moves.join(" "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_position_startpos() {
        let cmd = PositionCommand::parse("position startpos").unwrap();
        assert_eq!(
            cmd,
            PositionCommand {
                sfen: None,
                moves: vec![]
            }
        );
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        let cmd = PositionCommand::parse("position startpos moves 7g7f 3c3d").unwrap();
        assert_eq!(cmd.sfen, None);
        assert_eq!(cmd.moves, vec!["7g7f".to_string(), "3c3d".to_string()]);
    }

    #[test]
    fn parse_position_sfen() {
        let cmd = PositionCommand::parse(
            "position sfen lnsgkgsnl/1r5b1/ppppppppp/9/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL w - 2 moves 3c3d",
        )
        .unwrap();
        assert_eq!(
            cmd.sfen.as_deref(),
            Some("lnsgkgsnl/1r5b1/ppppppppp/9/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL w - 2")
        );
        assert_eq!(cmd.moves, vec!["3c3d".to_string()]);
    }

    #[test]
    fn keyword_is_optional() {
        let cmd = PositionCommand::parse("startpos moves P*5e").unwrap();
        assert_eq!(cmd.moves, vec!["P*5e".to_string()]);
    }

    #[test]
    fn to_usi_round_trip() {
        let text = "position sfen 4k4/9/9/9/9/9/9/9/4K4 b G 1 moves G*5b";
        assert_eq!(PositionCommand::parse(text).unwrap().to_usi(), text);
        assert_eq!(
            PositionCommand::default().to_usi(),
            "position startpos"
        );
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            PositionCommand::parse("position"),
            Err(UsiError::InvalidCommand(_))
        ));
        assert!(matches!(
            PositionCommand::parse("position fen 8/8"),
            Err(UsiError::ParseError(_))
        ));
        assert!(matches!(
            PositionCommand::parse("position sfen moves 7g7f"),
            Err(UsiError::ParseError(_))
        ));
        assert!(matches!(
            PositionCommand::parse("position startpos 7g7f"),
            Err(UsiError::ParseError(_))
        ));
    }
}
