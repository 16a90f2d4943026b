//! Micron renderer.
//!
//! Micron is a line-oriented hypertext markup: `>` heading markers,
//! `` `! ``/`` `* `` emphasis toggles, `` `= `` code fences, and
//! inline `` `[label`url] `` links, so no reference table is
//! collected.

use super::emphasis::pad_for_neighbors;
use super::layout::{ensure_blank_lines, hyphenator_for, layout_art, margins, protect, wrap_styled};
use crate::frontmatter::FrontMatter;
use crate::model::{ArtGroup, BlockPayload, BlockStyle, Event, InlineSpan, StyleSpec};
use crate::pipeline::{LineEnding, Renderer};
use hyphenation::Standard;

enum StylableBlock {
    Paragraph { text: String },
    Art { group: ArtGroup },
}

struct BlockRecord {
    start: usize,
    len: usize,
    style: BlockStyle,
    block: StylableBlock,
}

struct PendingCode {
    style: BlockStyle,
    lines: Vec<String>,
}

pub struct MicronRenderer {
    width: usize,
    front: FrontMatter,
    hyphenator: Option<Standard>,
    output: Vec<String>,
    pending_code: Option<PendingCode>,
    last_stylable: Option<BlockRecord>,
    finished: bool,
}

impl MicronRenderer {
    pub fn new(front: FrontMatter, width: usize) -> Self {
        let hyphenator = front
            .hyphenate
            .then(|| hyphenator_for(&front.hyphen_lang))
            .flatten();
        Self {
            width: width.max(1),
            front,
            hyphenator,
            output: Vec::new(),
            pending_code: None,
            last_stylable: None,
            finished: false,
        }
    }

    fn emit_block(&mut self, lines: Vec<String>, style: BlockStyle, block: Option<StylableBlock>) {
        if lines.is_empty() {
            return;
        }
        let start = self.output.len();
        let len = lines.len();
        self.output.extend(lines);
        self.last_stylable = block.map(|block| BlockRecord {
            start,
            len,
            style,
            block,
        });
    }

    fn render_stylable(&self, block: &StylableBlock, style: &BlockStyle) -> Vec<String> {
        match block {
            StylableBlock::Paragraph { text } => wrap_styled(
                text,
                "",
                "",
                style,
                self.width,
                self.hyphenator.as_ref(),
            ),
            StylableBlock::Art { group } => layout_art(group, style, self.width),
        }
    }

    fn apply_style_update(&mut self, spec: &StyleSpec) {
        let Some(mut record) = self.last_stylable.take() else {
            return;
        };
        let new_style = record.style.combined(Some(spec));
        let new_lines = self.render_stylable(&record.block, &new_style);
        let end = record.start + record.len;
        record.len = new_lines.len();
        record.style = new_style;
        self.output.splice(record.start..end, new_lines);
        self.last_stylable = Some(record);
    }

    fn flush_code(&mut self) {
        let Some(pending) = self.pending_code.take() else {
            return;
        };
        let (margin_left, _, _) = margins(self.width, &pending.style);
        let indent = " ".repeat(margin_left);
        let mut body = Vec::with_capacity(pending.lines.len() + 2);
        body.push(format!("{indent}`="));
        for line in &pending.lines {
            body.push(format!("{indent}{}", line.trim_end()));
        }
        body.push(format!("{indent}`="));
        self.emit_block(body, pending.style, None);
        self.output.push(String::new());
    }

    /// Micron inline markup for a span list. Fragments carrying micron
    /// toggles are protected against wrapping.
    fn process_spans(&self, spans: &[InlineSpan]) -> String {
        use crate::model::EmphasisKind::*;
        let mut out = String::new();
        for (index, span) in spans.iter().enumerate() {
            let prev = index
                .checked_sub(1)
                .and_then(|i| spans[i].raw_text().chars().last());
            let next = spans
                .get(index + 1)
                .and_then(|span| span.raw_text().chars().next());
            match span {
                InlineSpan::Text(text) => out.push_str(text),
                InlineSpan::Code(code) => {
                    let inner = code.trim_matches('`');
                    out.push_str(&protect(&format!("`={inner}`=")));
                }
                InlineSpan::Emphasis { kind, text } => {
                    let fragment = match kind {
                        Bold | Strong => format!("`!{text}`!"),
                        Italic | Underline => format!("`*{text}`*"),
                        // Micron has no strikethrough; keep it literal.
                        Strike => format!("~~{text}~~"),
                    };
                    let padded = match kind {
                        Strike => fragment,
                        _ => pad_for_neighbors(fragment, prev, next),
                    };
                    out.push_str(&padded);
                }
                InlineSpan::Link { label, url, image } => {
                    out.push_str(&protect(&micron_link(label, url, *image)));
                }
            }
        }
        out
    }

    fn render_paragraph(&mut self, spans: &[InlineSpan], style: BlockStyle) {
        let text = self.process_spans(spans);
        if text.is_empty() {
            return;
        }
        let block = StylableBlock::Paragraph { text };
        let lines = self.render_stylable(&block, &style);
        self.emit_block(lines, style, Some(block));
        for _ in 0..self.front.paragraph_spacing {
            self.output.push(String::new());
        }
    }

    fn render_heading(&mut self, level: u8, spans: &[InlineSpan], style: BlockStyle) {
        let _ = style;
        ensure_blank_lines(&mut self.output, self.front.header_spacing);
        let level = level.clamp(1, 3) as usize;
        let marker = ">".repeat(level);
        let text = self.process_spans(spans);
        let line = format!("{marker} {text}").trim_end().to_string();
        self.output.push(line);
        self.output.push(String::new());
        self.last_stylable = None;
    }

    fn render_blockquote(&mut self, depth: usize, spans: &[InlineSpan], style: BlockStyle) {
        let text = self.process_spans(spans);
        if text.is_empty() {
            return;
        }
        let indent = ">>>>".repeat(depth.max(1));
        let lines = wrap_styled(
            &text,
            &indent,
            &indent,
            &style,
            self.width,
            self.hyphenator.as_ref(),
        );
        self.emit_block(lines, style, None);
        self.output.push(String::new());
    }

    fn render_list_item(
        &mut self,
        indent: &str,
        marker: &str,
        spans: &[InlineSpan],
        style: BlockStyle,
    ) {
        let text = self.process_spans(spans);
        if text.is_empty() {
            return;
        }
        let base_indent = indent.replace('\t', "    ");
        let marker_indent = " ".repeat(self.front.list_marker_indent);
        let spacing = " ".repeat(self.front.list_text_spacing);
        let initial = format!("{base_indent}{marker_indent}{marker}{spacing}");
        let subsequent = format!(
            "{base_indent}{marker_indent}{}{spacing}",
            " ".repeat(marker.chars().count())
        );
        let lines = wrap_styled(
            &text,
            &initial,
            &subsequent,
            &style,
            self.width,
            self.hyphenator.as_ref(),
        );
        self.emit_block(lines, style, None);
    }

    fn render_rule(&mut self, style: BlockStyle) {
        let (margin_left, _, available) = margins(self.width, &style);
        let line = format!("{}{}", " ".repeat(margin_left), "-".repeat(available));
        self.emit_block(vec![line], style, None);
    }
}

/// Micron link syntax: bare target when the label adds nothing,
/// `` `[label`url] `` otherwise.
fn micron_link(label: &str, url: &str, image: bool) -> String {
    let label = label.trim();
    let url = url.trim();
    if image {
        let display = if label.is_empty() { url } else { label };
        return format!("`[{display}`{url}]");
    }
    if label.is_empty() {
        return url.to_string();
    }
    if label == url || url == format!("mailto:{label}") {
        return format!("`[{label}`");
    }
    format!("`[{label}`{url}]")
}

impl Renderer for MicronRenderer {
    fn handle_event(&mut self, event: &Event) {
        debug_assert!(!self.finished, "event after finalize");
        if self.finished {
            return;
        }
        let block = match event {
            Event::StyleUpdate(spec) => {
                self.flush_code();
                self.apply_style_update(spec);
                return;
            }
            Event::Block(block) => block,
        };
        match &block.payload {
            BlockPayload::CodeLine {
                text, starts_block, ..
            } => {
                if *starts_block {
                    self.flush_code();
                }
                match &mut self.pending_code {
                    Some(pending) => pending.lines.push(text.clone()),
                    None => {
                        self.pending_code = Some(PendingCode {
                            style: block.style,
                            lines: vec![text.clone()],
                        })
                    }
                }
            }
            BlockPayload::Link { .. } => {}
            BlockPayload::Blank => {
                self.flush_code();
                if self.front.paragraph_spacing == 0 {
                    self.output.push(String::new());
                }
            }
            BlockPayload::Paragraph { spans } => {
                self.flush_code();
                self.render_paragraph(spans, block.style);
            }
            BlockPayload::Heading { level, spans, .. } => {
                self.flush_code();
                self.render_heading(*level, spans, block.style);
            }
            BlockPayload::Blockquote { depth, spans } => {
                self.flush_code();
                self.render_blockquote(*depth, spans, block.style);
            }
            BlockPayload::ListItem {
                indent,
                marker,
                spans,
                ..
            } => {
                self.flush_code();
                self.render_list_item(indent, marker, spans, block.style);
            }
            BlockPayload::Rule => {
                self.flush_code();
                self.render_rule(block.style);
            }
            BlockPayload::Art { group } => {
                self.flush_code();
                let style = block.style;
                let art = StylableBlock::Art {
                    group: group.clone(),
                };
                let lines = self.render_stylable(&art, &style);
                self.emit_block(lines, style, Some(art));
            }
        }
    }

    fn finalize(&mut self) -> Vec<String> {
        self.flush_code();
        self.finished = true;
        std::mem::take(&mut self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockEvent, CodeFence};
    use crate::parser::parse_inline;

    fn front() -> FrontMatter {
        FrontMatter {
            margin_left: 0,
            margin_right: 0,
            paragraph_spacing: 0,
            header_spacing: 0,
            ..FrontMatter::default()
        }
    }

    fn paragraph(text: &str) -> Event {
        let (spans, _) = parse_inline(text);
        Event::Block(BlockEvent {
            payload: BlockPayload::Paragraph { spans },
            style: BlockStyle::default(),
            stylable: true,
        })
    }

    fn render(events: Vec<Event>) -> Vec<String> {
        let mut renderer = MicronRenderer::new(front(), 80);
        for event in &events {
            renderer.handle_event(event);
        }
        renderer.finalize()
    }

    #[test]
    fn test_heading_markers_clamp_to_three() {
        let (spans, _) = parse_inline("Deep");
        let lines = render(vec![Event::Block(BlockEvent {
            payload: BlockPayload::Heading {
                level: 5,
                text: "Deep".into(),
                spans,
            },
            style: BlockStyle::default(),
            stylable: true,
        })]);
        assert_eq!(lines[0], ">>> Deep");
    }

    #[test]
    fn test_emphasis_toggles() {
        let lines = render(vec![paragraph("**loud** and *soft*")]);
        assert_eq!(lines, vec!["`!loud`! and `*soft`*"]);
    }

    #[test]
    fn test_inline_code_fences() {
        let lines = render(vec![paragraph("run `ls` often")]);
        assert_eq!(lines, vec!["run `=ls`= often"]);
    }

    #[test]
    fn test_links_inline_without_table() {
        let lines = render(vec![paragraph("see [docs](https://example.com)")]);
        assert_eq!(lines, vec!["see `[docs`https://example.com]"]);
        // Self-describing link collapses to the short form.
        let lines = render(vec![paragraph(
            "[https://example.com](https://example.com)",
        )]);
        assert_eq!(lines, vec!["`[https://example.com`"]);
    }

    #[test]
    fn test_code_block_fences() {
        let code = |text: &str, starts: bool| {
            Event::Block(BlockEvent {
                payload: BlockPayload::CodeLine {
                    fence: CodeFence::Fenced,
                    text: text.into(),
                    starts_block: starts,
                },
                style: BlockStyle::default(),
                stylable: false,
            })
        };
        let lines = render(vec![code("a = 1", true), code("b = 2", false)]);
        assert_eq!(lines, vec!["`=", "a = 1", "b = 2", "`=", ""]);
    }

    #[test]
    fn test_blockquote_depth_markers() {
        let (spans, _) = parse_inline("nested words");
        let lines = render(vec![Event::Block(BlockEvent {
            payload: BlockPayload::Blockquote { depth: 2, spans },
            style: BlockStyle::default(),
            stylable: false,
        })]);
        assert!(lines[0].starts_with(">>>>>>>>nested"));
    }

    #[test]
    fn test_strike_stays_literal() {
        let lines = render(vec![paragraph("~~gone~~")]);
        assert_eq!(lines, vec!["~~gone~~"]);
    }
}
