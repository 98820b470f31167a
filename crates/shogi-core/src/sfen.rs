//! SFEN (Shogi Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, Hand, Piece, PieceType, Square};
use thiserror::Error;

/// Errors that can occur when parsing SFEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SfenError {
    #[error("invalid SFEN: expected 3 or 4 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid board: expected 9 ranks, got {0}")]
    InvalidRankCount(usize),

    #[error("rank {rank} has {files} files, expected 9")]
    InvalidFileCount { rank: char, files: usize },

    #[error("invalid piece: {0}")]
    InvalidPiece(String),

    #[error("invalid side to move: expected 'b' or 'w', got '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid hand: {0}")]
    InvalidHand(String),

    #[error("too many {piece} pieces: {count} (max {max})")]
    TooManyPieces {
        piece: PieceType,
        count: u32,
        max: u32,
    },

    #[error("{0} has more than one king")]
    DuplicateKing(Color),
}

/// A parsed SFEN position.
///
/// Only the notation is validated here: piece counts and letters. Rule
/// checks such as two pawns on a file are left to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sfen {
    /// Pieces indexed by [`Square::index`].
    pub board: [Piece; 81],
    pub side_to_move: Color,
    /// Hands of Black and White.
    pub hands: [Hand; 2],
    /// Move number; 0 when the field is missing or unreadable.
    pub ply: u32,
}

impl Sfen {
    /// The standard starting position.
    pub const STARTPOS: &'static str =
        "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

    /// Parses an SFEN string.
    pub fn parse(sfen: &str) -> Result<Self, SfenError> {
        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(SfenError::InvalidFieldCount(parts.len()));
        }

        let board = Self::parse_board(parts[0])?;

        let side_to_move = match parts[1] {
            "b" => Color::Black,
            "w" => Color::White,
            other => return Err(SfenError::InvalidSideToMove(other.to_string())),
        };

        let hands = Self::parse_hands(parts[2])?;

        // A malformed move number is tolerated.
        let ply = parts.get(3).and_then(|s| s.parse::<u32>().ok()).unwrap_or(0);

        let sfen = Sfen {
            board,
            side_to_move,
            hands,
            ply,
        };
        sfen.validate_counts()?;
        Ok(sfen)
    }

    fn parse_board(placement: &str) -> Result<[Piece; 81], SfenError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 9 {
            return Err(SfenError::InvalidRankCount(rows.len()));
        }

        let mut board = [Piece::NONE; 81];
        for (rank, row) in rows.iter().enumerate() {
            let rank_char = (b'a' + rank as u8) as char;
            // Files run from 9 down to 1 within a row.
            let mut file = 9usize;
            let mut chars = row.chars();
            while let Some(c) = chars.next() {
                if let Some(n) = c.to_digit(10).filter(|&n| n > 0) {
                    if n as usize > file {
                        return Err(SfenError::InvalidFileCount {
                            rank: rank_char,
                            files: 9 - file + n as usize,
                        });
                    }
                    file -= n as usize;
                    continue;
                }
                let token = if c == '+' {
                    match chars.next() {
                        Some(next) => format!("+{next}"),
                        None => return Err(SfenError::InvalidPiece("+".to_string())),
                    }
                } else {
                    c.to_string()
                };
                let piece =
                    Piece::from_usi(&token).ok_or_else(|| SfenError::InvalidPiece(token.clone()))?;
                if file == 0 {
                    return Err(SfenError::InvalidFileCount {
                        rank: rank_char,
                        files: 10,
                    });
                }
                file -= 1;
                board[file * 9 + rank] = piece;
            }
            if file != 0 {
                return Err(SfenError::InvalidFileCount {
                    rank: rank_char,
                    files: 9 - file,
                });
            }
        }
        Ok(board)
    }

    fn parse_hands(s: &str) -> Result<[Hand; 2], SfenError> {
        let mut hands = [Hand::EMPTY; 2];
        if s == "-" {
            return Ok(hands);
        }

        let mut count: Option<u32> = None;
        for c in s.chars() {
            if let Some(d) = c.to_digit(10) {
                let n = count.unwrap_or(0) * 10 + d;
                if n > 18 {
                    return Err(SfenError::InvalidHand(s.to_string()));
                }
                count = Some(n);
                continue;
            }
            let color = if c.is_ascii_uppercase() {
                Color::Black
            } else {
                Color::White
            };
            let pt = PieceType::from_usi_char(c.to_ascii_uppercase())
                .filter(|&pt| pt != PieceType::King)
                .ok_or_else(|| SfenError::InvalidHand(s.to_string()))?;
            let n = count.take().unwrap_or(1);
            if n == 0 {
                return Err(SfenError::InvalidHand(s.to_string()));
            }
            let hand = &mut hands[color.index()];
            hand.set(pt, hand.count(pt).saturating_add(n as u8));
        }
        if count.is_some() {
            return Err(SfenError::InvalidHand(s.to_string()));
        }
        Ok(hands)
    }

    fn validate_counts(&self) -> Result<(), SfenError> {
        let mut kings = [0u32; 2];
        let mut counts = [0u32; PieceType::NB];
        for piece in self.board {
            if let Some(pt) = piece.piece_type() {
                if pt == PieceType::King {
                    kings[piece.color().index()] += 1;
                }
                counts[pt.unpromoted().index()] += 1;
            }
        }
        for hand in &self.hands {
            for (pt, n) in hand.iter() {
                counts[pt.index()] += u32::from(n);
            }
        }

        for color in Color::ALL {
            if kings[color.index()] > 1 {
                return Err(SfenError::DuplicateKing(color));
            }
        }
        for pt in PieceType::HAND {
            let max = u32::from(Hand::FULL_SET.count(pt));
            let count = counts[pt.index()];
            if count > max {
                return Err(SfenError::TooManyPieces {
                    piece: pt,
                    count,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Returns the piece on `sq`.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board[sq.index() as usize]
    }

    /// Formats the board field.
    pub fn board_to_sfen(board: &[Piece; 81]) -> String {
        let mut out = String::with_capacity(81);
        for rank in 0..9 {
            if rank > 0 {
                out.push('/');
            }
            let mut empty = 0;
            for file in (0..9).rev() {
                match board[file * 9 + rank].to_usi() {
                    Some(token) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push_str(&token);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }
        out
    }

    /// Formats the hand field: Black's pieces then White's, each in
    /// `RBGSNLP` order, or `-` when both are empty.
    pub fn hands_to_sfen(hands: &[Hand; 2]) -> String {
        const ORDER: [PieceType; 7] = [
            PieceType::Rook,
            PieceType::Bishop,
            PieceType::Gold,
            PieceType::Silver,
            PieceType::Knight,
            PieceType::Lance,
            PieceType::Pawn,
        ];
        let mut out = String::new();
        for color in Color::ALL {
            for pt in ORDER {
                let n = hands[color.index()].count(pt);
                if n == 0 {
                    continue;
                }
                if n > 1 {
                    out.push_str(&n.to_string());
                }
                out.push(match color {
                    Color::Black => pt.usi_char(),
                    Color::White => pt.usi_char().to_ascii_lowercase(),
                });
            }
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }

    /// Converts back to an SFEN string.
    pub fn to_sfen(&self) -> String {
        format!(
            "{} {} {} {}",
            Self::board_to_sfen(&self.board),
            self.side_to_move.to_sfen_char(),
            Self::hands_to_sfen(&self.hands),
            self.ply
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let sfen = Sfen::parse(Sfen::STARTPOS).unwrap();
        assert_eq!(sfen.side_to_move, Color::Black);
        assert_eq!(sfen.ply, 1);
        assert!(sfen.hands.iter().all(Hand::is_empty));
        assert_eq!(
            sfen.piece_on(Square::SQ_59),
            Piece::new(Color::Black, PieceType::King)
        );
        assert_eq!(
            sfen.piece_on(Square::SQ_51),
            Piece::new(Color::White, PieceType::King)
        );
        assert_eq!(
            sfen.piece_on(Square::from_usi("2h").unwrap()),
            Piece::new(Color::Black, PieceType::Rook)
        );
        assert_eq!(
            sfen.piece_on(Square::from_usi("8b").unwrap()),
            Piece::new(Color::White, PieceType::Rook)
        );
    }

    #[test]
    fn roundtrip() {
        for s in [
            Sfen::STARTPOS,
            "lnsgkgsnl/1r5b1/ppppppppp/9/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL w - 2",
            "8l/1l+R2P3/p2pBG1pp/kps1p4/Nn1P2G2/P1P1P2PP/1PS6/1KSG3+r1/LN2+p3L w Sbgn3p 124",
            "R8/2K1S1SSk/4B4/9/9/9/9/9/1L1L1L3 b RBGSNLP3g3n17p 1",
        ] {
            assert_eq!(Sfen::parse(s).unwrap().to_sfen(), s);
        }
    }

    #[test]
    fn hand_counts_and_order() {
        let sfen = Sfen::parse("4k4/9/9/9/9/9/9/9/4K4 b 2P1Grb10p 1").unwrap();
        assert_eq!(sfen.hands[0].count(PieceType::Pawn), 2);
        assert_eq!(sfen.hands[0].count(PieceType::Gold), 1);
        assert_eq!(sfen.hands[1].count(PieceType::Pawn), 10);
        assert_eq!(Sfen::hands_to_sfen(&sfen.hands), "G2Prb10p");
    }

    #[test]
    fn missing_or_bad_ply() {
        assert_eq!(Sfen::parse("4k4/9/9/9/9/9/9/9/4K4 b -").unwrap().ply, 0);
        assert_eq!(Sfen::parse("4k4/9/9/9/9/9/9/9/4K4 b - x").unwrap().ply, 0);
    }

    #[test]
    fn invalid_sfen() {
        assert_eq!(
            Sfen::parse("invalid"),
            Err(SfenError::InvalidFieldCount(1))
        );
        assert_eq!(
            Sfen::parse("9/9/9/9/9/9/9/9 b -"),
            Err(SfenError::InvalidRankCount(8))
        );
        assert!(matches!(
            Sfen::parse("4k5/9/9/9/9/9/9/9/4K4 b -"),
            Err(SfenError::InvalidFileCount { rank: 'a', .. })
        ));
        assert_eq!(
            Sfen::parse("4k4/9/9/9/9/9/9/9/4K3 b -"),
            Err(SfenError::InvalidFileCount { rank: 'i', files: 8 })
        );
        assert!(matches!(
            Sfen::parse("4k4/9/9/9/9/9/9/9/4X4 b -"),
            Err(SfenError::InvalidPiece(_))
        ));
        assert!(matches!(
            Sfen::parse("4k4/9/9/9/9/9/9/9/3+GK4 b -"),
            Err(SfenError::InvalidPiece(_))
        ));
        assert!(matches!(
            Sfen::parse("4k4/9/9/9/9/9/9/9/4K4 x -"),
            Err(SfenError::InvalidSideToMove(_))
        ));
    }

    #[test]
    fn invalid_hands() {
        for hand in ["K", "2", "0P", "19p", "Px"] {
            let s = format!("4k4/9/9/9/9/9/9/9/4K4 b {hand} 1");
            assert!(
                matches!(Sfen::parse(&s), Err(SfenError::InvalidHand(_))),
                "hand {hand:?} should be rejected"
            );
        }
    }

    #[test]
    fn piece_count_limits() {
        assert_eq!(
            Sfen::parse("4k4/9/9/9/9/9/9/9/4K4 b 3B 1"),
            Err(SfenError::TooManyPieces {
                piece: PieceType::Bishop,
                count: 3,
                max: 2
            })
        );
        assert_eq!(
            Sfen::parse("3kk4/9/9/9/9/9/9/9/4K4 b - 1"),
            Err(SfenError::DuplicateKing(Color::White))
        );
        // A promoted piece counts towards its base kind.
        assert!(matches!(
            Sfen::parse("4k4/9/9/9/9/9/9/+R8/4K4 b 2R 1"),
            Err(SfenError::TooManyPieces { piece: PieceType::Rook, .. })
        ));
    }

    #[test]
    fn error_display() {
        let err = SfenError::TooManyPieces {
            piece: PieceType::Pawn,
            count: 19,
            max: 18,
        };
        assert_eq!(format!("{err}"), "too many Pawn pieces: 19 (max 18)");
        assert!(format!("{}", SfenError::DuplicateKing(Color::Black)).contains("Black"));
    }
}
