//! Art directive scanning and loading.
//!
//! Directives name a file of preformatted text and an optional
//! alignment tag: `#[label :align](path)`. Several directives on one
//! source line form a single layout group rendered side by side.

use crate::error::{Error, Result};
use crate::model::{Alignment, ArtGroup, ArtPiece};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static ART_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#\[(?P<label>[^\]]+)\]\((?P<target>[^)]+)\)\s*(?P<attr>\{\s*:[^}]+\})?\s*$")
        .unwrap()
});
static ART_INLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\[(?P<label>[^\]]+)\]\((?P<target>[^)]+)\)").unwrap());

/// The result of scanning one source line for art directives.
pub(super) enum ArtScan {
    /// A single block-form directive, possibly carrying a trailing
    /// attribute block that should style the art.
    Block { group: ArtGroup, attr: Option<String> },
    /// One or more inline directives forming a side-by-side group.
    Group(ArtGroup),
}

/// Scans a line for art directives, loading each referenced file.
///
/// Returns `Ok(None)` when the line holds no directives (or mixes
/// directives with other text, which leaves it ordinary content).
pub(super) fn scan_art_line(line: &str, base_dir: &Path) -> Result<Option<ArtScan>> {
    let stripped = line.trim_end_matches(['\n', '\r']);

    if let Some(captures) = ART_BLOCK.captures(stripped) {
        let piece = load_piece(&captures["label"], &captures["target"], base_dir)?;
        let attr = captures.name("attr").map(|m| m.as_str().to_string());
        return Ok(Some(ArtScan::Block {
            group: ArtGroup {
                pieces: vec![piece],
            },
            attr,
        }));
    }

    let matches: Vec<_> = ART_INLINE.captures_iter(stripped).collect();
    if matches.is_empty() {
        return Ok(None);
    }

    // Only whitespace may surround and separate the directives.
    let mut last_end = 0;
    for captures in &matches {
        let whole = captures.get(0).unwrap();
        if stripped[last_end..whole.start()].trim() != "" {
            return Ok(None);
        }
        last_end = whole.end();
    }
    if stripped[last_end..].trim() != "" {
        return Ok(None);
    }

    let mut pieces = Vec::with_capacity(matches.len());
    for captures in &matches {
        pieces.push(load_piece(&captures["label"], &captures["target"], base_dir)?);
    }
    Ok(Some(ArtScan::Group(ArtGroup { pieces })))
}

fn load_piece(label: &str, target: &str, base_dir: &Path) -> Result<ArtPiece> {
    let (kind, name, align) = parse_label(label);
    let path = base_dir.join(super::normalize_target(target));
    if !path.exists() {
        return Err(Error::ArtLoad(path));
    }
    let content = std::fs::read_to_string(&path)?;
    let lines = content
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();
    Ok(ArtPiece {
        kind,
        name,
        path,
        align,
        lines,
    })
}

/// Splits a directive label into kind, name, and alignment.
///
/// Colon tags select alignment; unrecognized tags are ignored without
/// error. The first plain token is the kind, the rest form the name.
fn parse_label(label: &str) -> (String, String, Option<Alignment>) {
    let mut plain: Vec<&str> = Vec::new();
    let mut align = None;
    for token in label.split_whitespace() {
        if let Some(tag) = token.strip_prefix(':') {
            if let Some(parsed) = Alignment::from_keyword(tag) {
                align = Some(parsed);
            }
        } else {
            plain.push(token);
        }
    }
    let kind = plain.first().copied().unwrap_or("custom").to_string();
    let name = plain.get(1..).unwrap_or(&[]).join(" ");
    (kind, name, align)
}
