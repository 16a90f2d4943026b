//! Block events and inline spans.

use super::{ArtGroup, BlockStyle, StyleSpec};
use serde::Serialize;

/// One item of the parser's output stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    /// A structural block, in source order.
    Block(BlockEvent),
    /// A scoped style change applying to the preceding stylable block.
    StyleUpdate(StyleSpec),
}

/// A block event: the payload plus the style that was active when the
/// block was parsed.
///
/// `stylable` marks blocks whose rendering may be redone when a trailing
/// attribute line arrives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockEvent {
    pub payload: BlockPayload,
    pub style: BlockStyle,
    pub stylable: bool,
}

/// Which fence form opened a run of code lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CodeFence {
    /// Opened and closed by ``` sentinels.
    Fenced,
    /// A run of lines indented by four spaces.
    Indented,
}

/// The discriminated block payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BlockPayload {
    Heading {
        level: u8,
        /// Heading text with any trailing attribute block removed.
        text: String,
        spans: Vec<InlineSpan>,
    },
    Paragraph {
        spans: Vec<InlineSpan>,
    },
    ListItem {
        /// Leading whitespace exactly as written.
        indent: String,
        /// The marker itself (`-`, `+`, `*`, or `N.`).
        marker: String,
        /// Whitespace between marker and text as written.
        spacing: String,
        ordered: bool,
        spans: Vec<InlineSpan>,
    },
    Blockquote {
        depth: usize,
        spans: Vec<InlineSpan>,
    },
    /// One raw line of a code block. `starts_block` is set on the first
    /// line of each block so adjacent blocks stay distinct.
    CodeLine {
        fence: CodeFence,
        text: String,
        starts_block: bool,
    },
    /// Side-by-side art pieces resolved during preprocessing.
    Art {
        group: ArtGroup,
    },
    /// A link or image encountered inside the following block's spans.
    /// Always emitted before that block's own event.
    Link {
        label: String,
        url: String,
        title: Option<String>,
        image: bool,
    },
    /// Horizontal rule.
    Rule,
    /// A blank source line.
    Blank,
}

/// Inline emphasis kinds, one tag per span (nested markup is flattened
/// during parsing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmphasisKind {
    /// `**bold**`
    Bold,
    /// `*italic*`
    Italic,
    /// `__strong__`
    Strong,
    /// `_underline_`
    Underline,
    /// `~~strike~~`
    Strike,
}

/// A fragment of a block's text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InlineSpan {
    /// Plain text, including any markup that failed to terminate.
    Text(String),
    /// Inline code, passed through renderers unmodified and never split
    /// across lines.
    Code(String),
    Emphasis {
        kind: EmphasisKind,
        text: String,
    },
    /// Reference to a link or image; renderers decide the reference
    /// syntax and numbering.
    Link {
        label: String,
        url: String,
        image: bool,
    },
}

impl InlineSpan {
    /// The raw text of this span, used for adjacency checks when
    /// renderers add spacing around emphasis.
    pub fn raw_text(&self) -> &str {
        match self {
            InlineSpan::Text(text) => text,
            InlineSpan::Code(code) => code,
            InlineSpan::Emphasis { text, .. } => text,
            InlineSpan::Link { label, .. } => label,
        }
    }
}

/// Flattens spans to plain text, dropping markup entirely.
pub fn spans_to_plain(spans: &[InlineSpan]) -> String {
    let mut result = String::new();
    for span in spans {
        match span {
            InlineSpan::Text(text) => result.push_str(text),
            InlineSpan::Code(code) => result.push_str(code),
            InlineSpan::Emphasis { text, .. } => result.push_str(text),
            InlineSpan::Link { label, url, .. } => {
                if label.is_empty() {
                    result.push_str(url);
                } else {
                    result.push_str(label);
                }
            }
        }
    }
    result
}
