//! Front matter: the leading delimited key/value block configuring
//! per-document rendering options.
//!
//! A malformed block (missing the closing delimiter) falls back to the
//! defaults and leaves the body untouched, so the stray text renders
//! visibly instead of aborting the conversion.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---\s*$").unwrap());
static INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+").unwrap());

/// Per-document rendering configuration.
///
/// Parsed once per top-level document and never mutated afterwards.
/// Unknown keys are preserved in `extra` but ignored by the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    /// FIGlet font for level-1 headings, or the `caps`/`title` shortcuts.
    pub h1_font: String,
    pub h2_font: String,
    pub h3_font: String,
    pub margin_left: usize,
    pub margin_right: usize,
    /// Blank lines inserted after each paragraph.
    pub paragraph_spacing: usize,
    pub hyphenate: bool,
    pub hyphen_lang: String,
    /// When set, a banner wider than the available width falls back to
    /// uppercase-with-underline instead of being kept.
    pub figlet_fallback: bool,
    /// Blank lines ensured before each heading.
    pub header_spacing: usize,
    pub wrap_code_blocks: bool,
    /// Continuation indent for wrapped code lines.
    pub code_block_wrap_indent: usize,
    pub code_block_line_numbers: bool,
    pub blockquote_bars: bool,
    pub list_marker_indent: usize,
    pub list_text_spacing: usize,
    /// Emit each block's link references directly below it instead of
    /// one table at the end of the document.
    pub links_per_block: bool,
    /// Unrecognized keys, preserved as written.
    pub extra: BTreeMap<String, String>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            h1_font: "small".to_string(),
            h2_font: "caps".to_string(),
            h3_font: "title".to_string(),
            margin_left: 2,
            margin_right: 2,
            paragraph_spacing: 2,
            hyphenate: false,
            hyphen_lang: "en_US".to_string(),
            figlet_fallback: false,
            header_spacing: 2,
            wrap_code_blocks: false,
            code_block_wrap_indent: 2,
            code_block_line_numbers: true,
            blockquote_bars: true,
            list_marker_indent: 0,
            list_text_spacing: 1,
            links_per_block: false,
            extra: BTreeMap::new(),
        }
    }
}

impl FrontMatter {
    /// Font configured for the given heading level, if any.
    pub fn font_for_level(&self, level: u8) -> Option<&str> {
        match level {
            1 => Some(&self.h1_font),
            2 => Some(&self.h2_font),
            3 => Some(&self.h3_font),
            _ => None,
        }
    }
}

/// Splits a document into its front matter and body.
///
/// Returns the defaults and the original lines when the document does
/// not start with a delimiter pair.
pub fn parse_front_matter(lines: &[String]) -> (FrontMatter, Vec<String>) {
    let Some(first) = lines.first() else {
        return (FrontMatter::default(), Vec::new());
    };
    if !DELIMITER.is_match(first) {
        return (FrontMatter::default(), lines.to_vec());
    }

    let mut raw: BTreeMap<String, String> = BTreeMap::new();
    let mut idx = 1;
    while idx < lines.len() {
        if DELIMITER.is_match(&lines[idx]) {
            break;
        }
        if let Some((key, value)) = lines[idx].split_once(':') {
            raw.insert(key.trim().to_string(), value.trim().to_string());
        }
        idx += 1;
    }
    if idx >= lines.len() {
        // No closing delimiter; treat the whole document as body.
        return (FrontMatter::default(), lines.to_vec());
    }
    let body = lines[idx + 1..].to_vec();

    let mut fm = FrontMatter::default();
    let mut take = |key: &str| raw.remove(key);

    if let Some(value) = take("h1_font") {
        set_font(&mut fm.h1_font, value);
    }
    if let Some(value) = take("h2_font") {
        set_font(&mut fm.h2_font, value);
    }
    if let Some(value) = take("h3_font") {
        set_font(&mut fm.h3_font, value);
    }
    if let Some(value) = take("margin_left") {
        fm.margin_left = parse_int(&value, fm.margin_left);
    }
    if let Some(value) = take("margin_right") {
        fm.margin_right = parse_int(&value, fm.margin_right);
    }
    let spacing = take("paragraph_spacing")
        .or_else(|| take("lines_between_paragraphs"))
        .or_else(|| take("paragraph_lines"));
    if let Some(value) = spacing {
        fm.paragraph_spacing = parse_int(&value, fm.paragraph_spacing);
    }
    if let Some(value) = take("hyphenate") {
        fm.hyphenate = parse_bool(&value, fm.hyphenate);
    }
    if let Some(value) = take("hyphen_lang") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            fm.hyphen_lang = trimmed.to_string();
        }
    }
    if let Some(value) = take("figlet_fallback") {
        fm.figlet_fallback = parse_bool(&value, fm.figlet_fallback);
    }
    if let Some(value) = take("header_spacing") {
        fm.header_spacing = parse_int(&value, fm.header_spacing);
    }
    if let Some(value) = take("wrap_code_blocks") {
        fm.wrap_code_blocks = parse_bool(&value, fm.wrap_code_blocks);
    }
    // `code_block_wrap` accepts either a bool or an indent amount; an
    // integer both enables wrapping and sets the continuation indent.
    if let Some(value) = take("code_block_wrap") {
        let normalized = value.trim();
        if !normalized.is_empty() {
            if normalized.parse::<i64>().is_ok() {
                fm.wrap_code_blocks = true;
                fm.code_block_wrap_indent = parse_int(normalized, fm.code_block_wrap_indent);
            } else {
                fm.wrap_code_blocks = parse_bool(normalized, fm.wrap_code_blocks);
            }
        }
    }
    if let Some(value) = take("code_block_line_numbers") {
        fm.code_block_line_numbers = parse_bool(&value, fm.code_block_line_numbers);
    }
    if let Some(value) = take("blockquote_bars") {
        fm.blockquote_bars = parse_bool(&value, fm.blockquote_bars);
    }
    if let Some(value) = take("list_marker_indent") {
        fm.list_marker_indent = parse_int(&value, fm.list_marker_indent);
    }
    if let Some(value) = take("list_text_spacing") {
        fm.list_text_spacing = parse_int(&value, fm.list_text_spacing);
    }
    if let Some(value) = take("links_per_block") {
        fm.links_per_block = parse_bool(&value, fm.links_per_block);
    }

    fm.extra = raw;
    (fm, body)
}

fn set_font(slot: &mut String, value: String) {
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        *slot = trimmed.to_string();
    }
}

/// Parses the first integer found in the value, clamped to zero.
fn parse_int(value: &str, default: usize) -> usize {
    INT.find(value)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(|n| n.max(0) as usize)
        .unwrap_or(default)
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => true,
        "false" | "no" | "0" | "off" => false,
        _ => default,
    }
}
