//! Width-constrained layout: margins, wrapping, alignment, and the
//! side-by-side placement of art groups.
//!
//! Inline code spans and link markers reach this module with their
//! spaces replaced by `NBSP`, so the wrapper cannot break inside them;
//! the padding pass turns them back into plain spaces.

use crate::model::{Alignment, ArtGroup, BlockStyle};
use hyphenation::{Language, Load, Standard};
use textwrap::{Options, WordSeparator, WordSplitter};
use unicode_width::UnicodeWidthStr;

/// Non-breaking placeholder for spaces inside atomic fragments.
pub const NBSP: char = '\u{a0}';

/// Replaces spaces so the fragment survives wrapping as one token.
pub fn protect(fragment: &str) -> String {
    fragment.replace(' ', &NBSP.to_string())
}

/// Display width of a string in columns.
pub fn str_cols(text: &str) -> usize {
    text.width()
}

/// Clamped margins for a style: `(left, right, available)`.
///
/// The left margin always leaves at least one column; the right margin
/// yields before the left one does.
pub fn margins(width: usize, style: &BlockStyle) -> (usize, usize, usize) {
    let margin_left = style.margin_left.min(width.saturating_sub(1));
    let remaining = width - margin_left;
    let margin_right = style.margin_right.min(remaining.saturating_sub(1));
    let available = width
        .saturating_sub(margin_left)
        .saturating_sub(margin_right)
        .max(1);
    (margin_left, margin_right, available)
}

/// Looks up an embedded hyphenation dictionary for a language tag.
///
/// Unknown tags simply disable hyphenation; wrapping then breaks only
/// at whitespace.
pub fn hyphenator_for(lang: &str) -> Option<Standard> {
    let language = match lang.to_ascii_lowercase().replace('-', "_").as_str() {
        "en_us" | "en" => Language::EnglishUS,
        "en_gb" => Language::EnglishGB,
        "de_de" | "de" => Language::German1996,
        "fr_fr" | "fr" => Language::French,
        "es_es" | "es" => Language::Spanish,
        "it_it" | "it" => Language::Italian,
        "nl_nl" | "nl" => Language::Dutch,
        "pt_pt" | "pt" => Language::Portuguese,
        "sv_se" | "sv" => Language::Swedish,
        "ru_ru" | "ru" => Language::Russian,
        _ => return None,
    };
    Standard::from_embedded(language).ok()
}

/// Wraps text to the style's content width, then pads each line for
/// alignment and margins.
pub fn wrap_styled(
    text: &str,
    initial_indent: &str,
    subsequent_indent: &str,
    style: &BlockStyle,
    width: usize,
    hyphenator: Option<&Standard>,
) -> Vec<String> {
    let (margin_left, _, available) = margins(width, style);

    let mut options = Options::new(available)
        .initial_indent(initial_indent)
        .subsequent_indent(subsequent_indent)
        .break_words(true)
        .word_separator(WordSeparator::AsciiSpace);
    if let Some(dictionary) = hyphenator {
        options = options.word_splitter(WordSplitter::Hyphenation(dictionary.clone()));
    }

    let mut wrapped: Vec<String> = textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .collect();
    if wrapped.is_empty() {
        wrapped.push(initial_indent.trim_end().to_string());
    }

    wrapped
        .into_iter()
        .map(|line| pad_line(&line, style, margin_left, available, width))
        .collect()
}

/// Applies alignment padding inside the content width, then the left
/// margin outside it. Restores protected spaces.
fn pad_line(
    line: &str,
    style: &BlockStyle,
    margin_left: usize,
    available: usize,
    width: usize,
) -> String {
    let cols = str_cols(line);
    let extra = available.saturating_sub(cols);
    let extra_left = match style.align {
        Alignment::Center => extra / 2,
        Alignment::Right => extra,
        Alignment::Left => 0,
    };
    let max_indent = width.saturating_sub(cols);
    let indent = (margin_left + extra_left).min(max_indent);
    let mut padded = " ".repeat(indent);
    padded.push_str(line);
    padded.replace(NBSP, " ")
}

/// Aligns already-formatted lines (banners, art) as one block: the
/// block's widest line decides the offset so internal shape survives.
pub fn align_preformatted(
    lines: &[String],
    style: &BlockStyle,
    width: usize,
    explicit_align: Option<Alignment>,
) -> Vec<String> {
    if lines.is_empty() {
        return Vec::new();
    }
    let (margin_left, _, available) = margins(width, style);
    let block_width = lines
        .iter()
        .map(|line| line.trim_end().chars().count())
        .max()
        .unwrap_or(0);
    let extra = available.saturating_sub(block_width.min(available));
    let align = explicit_align.unwrap_or(style.align);
    let offset = match align {
        Alignment::Center => extra / 2,
        Alignment::Right => extra,
        Alignment::Left => 0,
    };
    let max_indent = width.saturating_sub(block_width.min(width));
    let indent = " ".repeat((margin_left + offset).min(max_indent));
    lines
        .iter()
        .map(|line| {
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                String::new()
            } else {
                format!("{indent}{trimmed}")
            }
        })
        .collect()
}

/// Tops up trailing blank lines to `count`.
pub fn ensure_blank_lines(output: &mut Vec<String>, count: usize) {
    if count == 0 {
        return;
    }
    let mut existing = 0;
    for line in output.iter().rev() {
        if line.trim().is_empty() {
            existing += 1;
            if existing >= count {
                return;
            }
        } else {
            break;
        }
    }
    for _ in 0..count - existing {
        output.push(String::new());
    }
}

/// Lays out an art group: side by side on a shared canvas when the
/// pieces fit, stacked as independent aligned blocks otherwise.
pub fn layout_art(group: &ArtGroup, style: &BlockStyle, width: usize) -> Vec<String> {
    let pieces = &group.pieces;
    if pieces.is_empty() {
        return Vec::new();
    }
    if pieces.len() == 1 {
        return align_preformatted(&pieces[0].lines, style, width, pieces[0].align);
    }

    let (margin_left, _, available) = margins(width, style);
    let max_height = pieces.iter().map(|piece| piece.lines.len()).max().unwrap_or(0);
    let widths: Vec<usize> = pieces.iter().map(|piece| piece.width()).collect();

    let Some(positions) = compute_positions(group, &widths, available) else {
        return pieces
            .iter()
            .flat_map(|piece| align_preformatted(&piece.lines, style, width, piece.align))
            .collect();
    };

    // Shorter pieces are padded by the blank canvas rows themselves.
    let mut canvas = vec![vec![' '; available]; max_height];
    for (index, pos, _) in positions {
        let piece = &pieces[index];
        for (row, line) in piece.lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let target = pos + col;
                if target >= available {
                    break;
                }
                if ch == ' ' {
                    continue;
                }
                canvas[row][target] = ch;
            }
        }
    }

    let prefix = " ".repeat(margin_left);
    canvas
        .into_iter()
        .map(|row| {
            let text: String = row.into_iter().collect();
            format!("{prefix}{}", text.trim_end())
        })
        .collect()
}

/// Assigns a column to each piece by alignment tag. Returns `None`
/// when any two placements overlap, which sends the caller down the
/// stacking fallback.
fn compute_positions(
    group: &ArtGroup,
    widths: &[usize],
    available: usize,
) -> Option<Vec<(usize, usize, usize)>> {
    if available == 0 {
        return None;
    }
    const GAP: usize = 4;

    let mut left_cursor = 0usize;
    let mut right_cursor = available;
    let mut placements: Vec<Option<(usize, usize)>> = vec![None; group.pieces.len()];

    let mut left_group = Vec::new();
    let mut center_group = Vec::new();
    let mut right_group = Vec::new();
    for (index, piece) in group.pieces.iter().enumerate() {
        match piece.align.unwrap_or(Alignment::Left) {
            Alignment::Left => left_group.push(index),
            Alignment::Center => center_group.push(index),
            Alignment::Right => right_group.push(index),
        }
    }

    for index in left_group {
        let piece_width = widths[index].min(available);
        let pos = left_cursor;
        left_cursor = (pos + piece_width + GAP).min(available);
        placements[index] = Some((pos, piece_width));
    }

    for index in right_group.into_iter().rev() {
        let piece_width = widths[index].min(available);
        let pos = right_cursor.saturating_sub(piece_width);
        right_cursor = pos.saturating_sub(GAP);
        placements[index] = Some((pos, piece_width));
    }

    let mut center_used = false;
    for index in center_group {
        let piece_width = widths[index].min(available);
        let pos = if center_used {
            let pos = left_cursor;
            left_cursor = (pos + piece_width + GAP).min(available);
            pos
        } else {
            center_used = true;
            available.saturating_sub(piece_width) / 2
        };
        placements[index] = Some((pos, piece_width));
    }

    let placed: Vec<(usize, usize, usize)> = placements
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| slot.map(|(pos, w)| (index, pos, w)))
        .collect();

    for (i, &(_, pos_i, width_i)) in placed.iter().enumerate() {
        let end_i = pos_i + width_i;
        for &(_, pos_j, width_j) in &placed[i + 1..] {
            if (pos_i <= pos_j && pos_j < end_i) || (pos_j <= pos_i && pos_i < pos_j + width_j) {
                return None;
            }
        }
    }

    Some(placed)
}
