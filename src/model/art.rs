//! Preformatted art blocks loaded from files.

use super::Alignment;
use serde::Serialize;
use std::path::PathBuf;

/// One piece of preformatted art, loaded from a file and positioned by
/// its alignment tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtPiece {
    /// Kind label from the directive (first non-tag token).
    pub kind: String,
    /// Optional display name (remaining non-tag tokens).
    pub name: String,
    /// Resolved path the lines were loaded from.
    pub path: PathBuf,
    /// Alignment tag, if one was recognized.
    pub align: Option<Alignment>,
    /// Raw lines, loaded once at resolve time.
    pub lines: Vec<String>,
}

impl ArtPiece {
    /// Returns the widest line of this piece in columns.
    pub fn width(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.trim_end().chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Art pieces that shared a single source line, laid out side by side
/// when they fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtGroup {
    pub pieces: Vec<ArtPiece>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_width_ignores_trailing_spaces() {
        let piece = ArtPiece {
            kind: "logo".into(),
            name: String::new(),
            path: PathBuf::from("logo.txt"),
            align: None,
            lines: vec!["abc   ".into(), "ab".into()],
        };
        assert_eq!(piece.width(), 3);
    }
}
