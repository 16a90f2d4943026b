//! Markdown block parser.
//!
//! A line-oriented state machine that turns preprocessed source into a
//! flat event stream. The dialect is deliberately small: headings,
//! paragraphs, lists, blockquotes, fenced and indented code, horizontal
//! rules, art groups, and attribute blocks. Anything malformed falls
//! back to literal text.

mod attrs;
mod inline;

pub use inline::{parse_inline, split_link_target, LinkRef};

use crate::model::{
    BlockEvent, BlockPayload, BlockStyle, CodeFence, Event, InlineSpan, StyleSpec,
};
use crate::pipeline::Parser;
use crate::preprocess::SourceLine;
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\d+\.)(\s+)(.*)$").unwrap());
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([*+-])(\s+)(.*)$").unwrap());
static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{0,3}>").unwrap());
static HORIZONTAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:-(?:\s*-){2,}|\*(?:\s*\*){2,}|_(?:\s*_){2,})\s*$").unwrap()
});
static INLINE_PARA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*<p\b([^>]*)>(.*?)</p>\s*$").unwrap());
static PARA_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*<p\b([^>]*)>\s*$").unwrap());
static PARA_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*</p>\s*$").unwrap());
static ATTR_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{\s*:(.+)\}\s*$").unwrap());

/// The event-producing Markdown parser.
///
/// Restartable by calling [`Parser::parse`] again on the same input;
/// each call resets all state.
pub struct MarkdownParser {
    base_style: BlockStyle,
    style_stack: Vec<BlockStyle>,
    paragraph_spec: Option<StyleSpec>,
    pending_spec: Option<StyleSpec>,
    last_stylable: bool,
}

impl MarkdownParser {
    pub fn new(base_style: BlockStyle) -> Self {
        Self {
            base_style,
            style_stack: vec![base_style],
            paragraph_spec: None,
            pending_spec: None,
            last_stylable: false,
        }
    }

    fn reset(&mut self) {
        self.style_stack = vec![self.base_style];
        self.paragraph_spec = None;
        self.pending_spec = None;
        self.last_stylable = false;
    }

    fn current_style(&self) -> BlockStyle {
        *self.style_stack.last().unwrap_or(&self.base_style)
    }

    fn push_style(&mut self, spec: Option<StyleSpec>) {
        let base = self.current_style();
        self.style_stack.push(base.combined(spec.as_ref()));
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn emit(&mut self, events: &mut Vec<Event>, payload: BlockPayload, style: BlockStyle, stylable: bool) {
        events.push(Event::Block(BlockEvent {
            payload,
            style,
            stylable,
        }));
    }

    /// Emits one `Link` event per reference, ahead of the block that
    /// contains them.
    fn emit_links(&mut self, events: &mut Vec<Event>, links: Vec<LinkRef>, style: BlockStyle) {
        for link in links {
            self.emit(
                events,
                BlockPayload::Link {
                    label: link.label,
                    url: link.url,
                    title: link.title,
                    image: link.image,
                },
                style,
                false,
            );
        }
    }

    fn flush_paragraph(&mut self, paragraph: &mut Vec<String>, events: &mut Vec<Event>) {
        if paragraph.is_empty() {
            return;
        }
        let text = paragraph
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(" ");
        paragraph.clear();

        let combined = StyleSpec::merged(self.pending_spec.take(), self.paragraph_spec.take());
        let style = self.current_style().combined(combined.as_ref());
        self.last_stylable = true;

        let (spans, links) = parse_inline(&text);
        self.emit_links(events, links, style);
        self.emit(events, BlockPayload::Paragraph { spans }, style, true);
    }

    fn handle_heading(&mut self, level: u8, raw_text: &str, events: &mut Vec<Event>) {
        let (text, inline_spec) = attrs::extract_trailing_attr(raw_text.trim());
        let combined = StyleSpec::merged(self.pending_spec.take(), inline_spec);
        let style = self.current_style().combined(combined.as_ref());
        self.last_stylable = true;

        let (spans, links) = parse_inline(&text);
        self.emit_links(events, links, style);
        self.emit(
            events,
            BlockPayload::Heading { level, text, spans },
            style,
            true,
        );
    }

    fn handle_blockquote(&mut self, line: &str, events: &mut Vec<Event>) {
        // Depth is the number of markers, adjacent or space-separated.
        let mut content = line;
        let mut depth = 0;
        loop {
            let trimmed = content.trim_start();
            match trimmed.strip_prefix('>') {
                Some(rest) => {
                    depth += 1;
                    content = rest;
                }
                None => break,
            }
        }
        let style = self.current_style();
        self.last_stylable = false;

        let (spans, links) = parse_inline(content.trim_start());
        self.emit_links(events, links, style);
        self.emit(
            events,
            BlockPayload::Blockquote {
                depth: depth.max(1),
                spans,
            },
            style,
            false,
        );
    }

    fn handle_list_item(&mut self, line: &str, events: &mut Vec<Event>) {
        let (captures, ordered) = match ORDERED_ITEM.captures(line) {
            Some(captures) => (captures, true),
            None => match UNORDERED_ITEM.captures(line) {
                Some(captures) => (captures, false),
                None => return,
            },
        };
        let style = self.current_style();
        self.last_stylable = false;

        let (spans, links) = parse_inline(&captures[4]);
        self.emit_links(events, links, style);
        self.emit(
            events,
            BlockPayload::ListItem {
                indent: captures[1].to_string(),
                marker: captures[2].to_string(),
                spacing: captures[3].to_string(),
                ordered,
                spans,
            },
            style,
            false,
        );
    }

    fn handle_art(&mut self, group: &crate::model::ArtGroup, events: &mut Vec<Event>) {
        let combined = self.pending_spec.take();
        let style = self.current_style().combined(combined.as_ref());
        self.last_stylable = true;
        self.emit(
            events,
            BlockPayload::Art {
                group: group.clone(),
            },
            style,
            true,
        );
    }
}

impl Parser for MarkdownParser {
    fn parse(&mut self, lines: &[SourceLine]) -> Vec<Event> {
        self.reset();
        let mut events = Vec::new();
        let mut paragraph: Vec<String> = Vec::new();
        let mut fenced = false;
        let mut indented = false;
        let mut code_first = false;

        for source in lines {
            let line = match source {
                SourceLine::Art(group) => {
                    self.flush_paragraph(&mut paragraph, &mut events);
                    self.handle_art(group, &mut events);
                    continue;
                }
                SourceLine::Text(line) => line,
            };

            if fenced {
                if line.trim().starts_with("```") {
                    fenced = false;
                } else {
                    let style = self.current_style();
                    self.last_stylable = false;
                    self.emit(
                        &mut events,
                        BlockPayload::CodeLine {
                            fence: CodeFence::Fenced,
                            text: line.clone(),
                            starts_block: std::mem::replace(&mut code_first, false),
                        },
                        style,
                        false,
                    );
                }
                continue;
            }

            if indented {
                if let Some(rest) = line.strip_prefix("    ") {
                    let style = self.current_style();
                    self.emit(
                        &mut events,
                        BlockPayload::CodeLine {
                            fence: CodeFence::Indented,
                            text: rest.to_string(),
                            starts_block: false,
                        },
                        style,
                        false,
                    );
                    continue;
                }
                indented = false;
                // Fall through: the terminating line is processed normally.
            }

            let stripped = line.trim();

            if let Some(captures) = INLINE_PARA.captures(stripped) {
                self.flush_paragraph(&mut paragraph, &mut events);
                let spec = attrs::spec_from_html_attributes(&captures[1]);
                self.push_style(spec);
                let content = captures[2].to_string();
                if !content.is_empty() {
                    paragraph.push(content);
                    self.flush_paragraph(&mut paragraph, &mut events);
                }
                self.pop_style();
                continue;
            }

            if let Some(captures) = PARA_OPEN.captures(line) {
                let spec = attrs::spec_from_html_attributes(&captures[1]);
                self.push_style(spec);
                continue;
            }

            if PARA_CLOSE.is_match(line) {
                self.flush_paragraph(&mut paragraph, &mut events);
                self.paragraph_spec = None;
                self.pop_style();
                continue;
            }

            if let Some(captures) = ATTR_LINE.captures(stripped) {
                if let Some(spec) = attrs::spec_from_tokens(&captures[1]) {
                    if !paragraph.is_empty() {
                        self.paragraph_spec = StyleSpec::merged(self.paragraph_spec, Some(spec));
                    } else if self.last_stylable {
                        events.push(Event::StyleUpdate(spec));
                    } else {
                        self.pending_spec = StyleSpec::merged(self.pending_spec, Some(spec));
                    }
                }
                continue;
            }

            if stripped.starts_with("```") {
                self.flush_paragraph(&mut paragraph, &mut events);
                fenced = true;
                code_first = true;
                continue;
            }

            if let Some(rest) = line.strip_prefix("    ") {
                self.flush_paragraph(&mut paragraph, &mut events);
                indented = true;
                let style = self.current_style();
                self.last_stylable = false;
                self.emit(
                    &mut events,
                    BlockPayload::CodeLine {
                        fence: CodeFence::Indented,
                        text: rest.to_string(),
                        starts_block: true,
                    },
                    style,
                    false,
                );
                continue;
            }

            if let Some(captures) = HEADING.captures(line) {
                self.flush_paragraph(&mut paragraph, &mut events);
                let level = captures[1].len() as u8;
                self.handle_heading(level, &captures[2], &mut events);
                continue;
            }

            if HORIZONTAL_RULE.is_match(line) {
                self.flush_paragraph(&mut paragraph, &mut events);
                let style = self.current_style();
                self.last_stylable = false;
                self.emit(&mut events, BlockPayload::Rule, style, false);
                continue;
            }

            if BLOCKQUOTE.is_match(line) {
                self.flush_paragraph(&mut paragraph, &mut events);
                self.handle_blockquote(line, &mut events);
                continue;
            }

            if ORDERED_ITEM.is_match(line) || UNORDERED_ITEM.is_match(line) {
                self.flush_paragraph(&mut paragraph, &mut events);
                self.handle_list_item(line, &mut events);
                continue;
            }

            if stripped.is_empty() {
                self.flush_paragraph(&mut paragraph, &mut events);
                let style = self.current_style();
                self.emit(&mut events, BlockPayload::Blank, style, false);
                continue;
            }

            paragraph.push(line.clone());
        }

        self.flush_paragraph(&mut paragraph, &mut events);
        events
    }
}

/// Convenience for tests and tools: true when the span list contains
/// only plain text.
pub fn is_plain(spans: &[InlineSpan]) -> bool {
    spans.iter().all(|span| matches!(span, InlineSpan::Text(_)))
}
