//! The fixed-width DOS text renderer.
//!
//! This is the reference dialect: 80 columns, CRLF terminators, FIGlet
//! banner headings, gutter-numbered code blocks, and a numbered link
//! table.

use super::banner::{banner_width, split_overflow, BannerFonts};
use super::emphasis::{pad_for_neighbors, stylize_delimited, stylize_letters, Transform};
use super::layout::{
    align_preformatted, ensure_blank_lines, hyphenator_for, layout_art, margins, protect,
    wrap_styled,
};
use crate::frontmatter::FrontMatter;
use crate::model::{
    ArtGroup, BlockEvent, BlockPayload, BlockStyle, EmphasisKind, Event, InlineSpan, StyleSpec,
};
use crate::pipeline::{LineEnding, Renderer};
use hyphenation::Standard;
use std::collections::HashMap;

/// A stylable block kept around so a trailing attribute line can
/// re-render it with a different style.
enum StylableBlock {
    Paragraph { text: String },
    Heading { level: u8, text: String },
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

pub struct TextRenderer {
    width: usize,
    front: FrontMatter,
    hyphenator: Option<Standard>,
    fonts: BannerFonts,
    output: Vec<String>,
    links: Vec<(usize, String)>,
    link_indices: HashMap<String, usize>,
    block_links: Vec<usize>,
    pending_code: Option<PendingCode>,
    last_stylable: Option<BlockRecord>,
    finished: bool,
}

impl TextRenderer {
    pub fn new(front: FrontMatter, width: usize) -> Self {
        let hyphenator = front
            .hyphenate
            .then(|| hyphenator_for(&front.hyphen_lang))
            .flatten();
        Self {
            width: width.max(1),
            front,
            hyphenator,
            fonts: BannerFonts::new(),
            output: Vec::new(),
            links: Vec::new(),
            link_indices: HashMap::new(),
            block_links: Vec::new(),
            pending_code: None,
            last_stylable: None,
            finished: false,
        }
    }

    fn base_style(&self) -> BlockStyle {
        BlockStyle::with_margins(self.front.margin_left, self.front.margin_right)
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

    fn render_stylable(&mut self, block: &StylableBlock, style: &BlockStyle) -> Vec<String> {
        match block {
            StylableBlock::Paragraph { text } => wrap_styled(
                text,
                "",
                "",
                style,
                self.width,
                self.hyphenator.as_ref(),
            ),
            StylableBlock::Heading { level, text } => self.render_heading_lines(*level, text, style),
            StylableBlock::Art { group } => layout_art(group, style, self.width),
        }
    }

    fn render_heading_lines(&mut self, level: u8, text: &str, style: &BlockStyle) -> Vec<String> {
        let font = self.front.font_for_level(level).map(str::to_ascii_lowercase);
        match font.as_deref() {
            Some("caps") => self.underline_heading(text, style, Transform::Upper, false),
            Some("title") => self.underline_heading(text, style, Transform::Preserve, true),
            Some(name) => {
                if let Some(banner) = self.fonts.render(name, text) {
                    let (_, _, available) = margins(self.width, style);
                    // Overflow is judged against the margin-adjusted width.
                    if banner_width(&banner) > available {
                        if self.front.figlet_fallback {
                            return self.underline_heading(text, style, Transform::Upper, false);
                        }
                        let split = split_overflow(banner, available);
                        let mut lines = align_preformatted(&split, style, self.width, None);
                        lines.push(String::new());
                        return lines;
                    }
                    let mut lines = align_preformatted(&banner, style, self.width, None);
                    lines.push(String::new());
                    return lines;
                }
                self.underline_heading(text, style, Transform::Upper, false)
            }
            // Levels 4+ have no font lookup at all.
            None => self.underline_heading(text, style, Transform::Upper, false),
        }
    }

    /// Uppercase (or title-case) text with a dashed underline matching
    /// each wrapped line.
    fn underline_heading(
        &self,
        text: &str,
        style: &BlockStyle,
        transform: Transform,
        title_case: bool,
    ) -> Vec<String> {
        let processed = if title_case {
            title_case_words(text)
        } else {
            match transform {
                Transform::Upper => text.to_uppercase(),
                Transform::Preserve => text.to_string(),
            }
        };
        let wrapped = wrap_styled(&processed, "", "", style, self.width, None);
        let mut output = Vec::with_capacity(wrapped.len() * 2 + 1);
        for line in wrapped {
            let line = line.trim_end().to_string();
            if line.trim().is_empty() {
                output.push(String::new());
                continue;
            }
            let leading = line.chars().take_while(|ch| *ch == ' ').count();
            let body_width = line.chars().count() - leading;
            output.push(line);
            output.push(format!("{}{}", " ".repeat(leading), "-".repeat(body_width)));
        }
        output.push(String::new());
        output
    }

    /// Renders spans into a single wrappable string, registering links
    /// as they are first used. Inline code and link markers have their
    /// spaces protected so wrapping cannot break them apart.
    fn process_spans(&mut self, spans: &[InlineSpan]) -> String {
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
                InlineSpan::Code(code) => out.push_str(&protect(code)),
                InlineSpan::Emphasis { kind, text } => {
                    let styled = match kind {
                        EmphasisKind::Bold => stylize_letters(text, Transform::Upper),
                        EmphasisKind::Italic => stylize_letters(text, Transform::Preserve),
                        EmphasisKind::Strong => stylize_delimited(text, '_', Transform::Upper, 3),
                        EmphasisKind::Underline => {
                            stylize_delimited(text, '_', Transform::Preserve, 3)
                        }
                        EmphasisKind::Strike => stylize_delimited(text, '~', Transform::Preserve, 2),
                    };
                    if styled.is_empty() {
                        continue;
                    }
                    let padded = match kind {
                        // Strike keeps its exact shape; the others get
                        // breathing room next to alphanumerics.
                        EmphasisKind::Strike => styled,
                        _ => pad_for_neighbors(styled, prev, next),
                    };
                    out.push_str(&padded);
                }
                InlineSpan::Link { label, url, image } => {
                    let number = self.register_link(url);
                    let marker = if *image {
                        let display = if label.is_empty() { "Image" } else { label };
                        format!("[Image: {display}]({number})")
                    } else {
                        format!("[{label}]({number})")
                    };
                    out.push_str(&protect(&marker));
                }
            }
        }
        out
    }

    /// Numbers a URL by first occurrence, deduplicating repeats.
    fn register_link(&mut self, url: &str) -> usize {
        let number = match self.link_indices.get(url) {
            Some(number) => *number,
            None => {
                let number = self.links.len() + 1;
                self.links.push((number, url.to_string()));
                self.link_indices.insert(url.to_string(), number);
                number
            }
        };
        if !self.block_links.contains(&number) {
            self.block_links.push(number);
        }
        number
    }

    /// With `links_per_block`, emits the current block's references
    /// right below it; otherwise they wait for the end-of-document
    /// table.
    fn emit_block_links(&mut self) {
        let numbers = std::mem::take(&mut self.block_links);
        if !self.front.links_per_block || numbers.is_empty() {
            return;
        }
        let style = self.base_style();
        for number in numbers {
            let url = &self.links[number - 1].1;
            let entry = format!("[{number}] {url}");
            let lines = wrap_styled(&entry, "", "", &style, self.width, None);
            self.output.extend(lines);
        }
    }

    fn flush_code(&mut self) {
        let Some(pending) = self.pending_code.take() else {
            return;
        };
        let lines = self.format_code_block(&pending.lines, &pending.style);
        self.emit_block(lines, pending.style, None);
    }

    fn format_code_block(&self, lines: &[String], style: &BlockStyle) -> Vec<String> {
        if lines.is_empty() {
            return Vec::new();
        }
        let (margin_left, _, available) = margins(self.width, style);
        let indent = " ".repeat(margin_left);
        let numbered = self.front.code_block_line_numbers;
        let wrap = self.front.wrap_code_blocks;

        let (cont_prefix, content_width) = if numbered {
            (format!("{indent}   | "), available.saturating_sub(5).max(1))
        } else {
            (format!("{indent}   "), available.saturating_sub(3).max(1))
        };

        let mut formatted = Vec::with_capacity(lines.len() + 1);
        for (index, line) in lines.iter().enumerate() {
            let prefix = if numbered {
                // Two digits, cycling, so the gutter never widens.
                format!("{indent}{:02} | ", (index + 1) % 100)
            } else {
                cont_prefix.clone()
            };
            let segments = if line.is_empty() {
                Vec::new()
            } else if wrap {
                wrap_code_segments(line, content_width, self.front.code_block_wrap_indent)
            } else {
                vec![line.clone()]
            };
            if segments.is_empty() {
                formatted.push(prefix.trim_end().to_string());
                continue;
            }
            formatted.push(format!("{prefix}{}", segments[0]));
            for segment in &segments[1..] {
                formatted.push(format!("{cont_prefix}{segment}"));
            }
        }
        formatted.push(String::new());
        formatted
    }

    fn render_paragraph(&mut self, spans: &[InlineSpan], style: BlockStyle) {
        let text = self.process_spans(spans);
        if text.is_empty() {
            self.block_links.clear();
            return;
        }
        let block = StylableBlock::Paragraph { text };
        let lines = self.render_stylable(&block, &style);
        self.emit_block(lines, style, Some(block));
        self.emit_block_links();
        for _ in 0..self.front.paragraph_spacing {
            self.output.push(String::new());
        }
    }

    fn render_heading(&mut self, level: u8, text: &str, style: BlockStyle) {
        ensure_blank_lines(&mut self.output, self.front.header_spacing);
        let block = StylableBlock::Heading {
            level,
            text: text.to_string(),
        };
        let lines = self.render_stylable(&block, &style);
        self.emit_block(lines, style, Some(block));
    }

    fn render_blockquote(&mut self, depth: usize, spans: &[InlineSpan], style: BlockStyle) {
        let text = self.process_spans(spans);
        if text.is_empty() {
            self.block_links.clear();
            return;
        }
        let unit = if self.front.blockquote_bars {
            " | "
        } else {
            "   "
        };
        let indent = unit.repeat(depth.max(1));
        let lines = wrap_styled(
            &text,
            &indent,
            &indent,
            &style,
            self.width,
            self.hyphenator.as_ref(),
        );
        self.emit_block(lines, style, None);
        self.emit_block_links();
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
            self.block_links.clear();
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
        self.emit_block_links();
    }

    fn render_rule(&mut self, style: BlockStyle) {
        let (margin_left, _, available) = margins(self.width, &style);
        let line = format!("{}{}", " ".repeat(margin_left), "-".repeat(available));
        self.emit_block(vec![line], style, None);
    }

    fn render_art(&mut self, group: &ArtGroup, style: BlockStyle) {
        let block = StylableBlock::Art {
            group: group.clone(),
        };
        let lines = self.render_stylable(&block, &style);
        self.emit_block(lines, style, Some(block));
    }
}

impl Renderer for TextRenderer {
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
        let BlockEvent { payload, style, .. } = block;
        match payload {
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
                            style: *style,
                            lines: vec![text.clone()],
                        })
                    }
                }
            }
            // Link events only announce what the spans already carry.
            BlockPayload::Link { .. } => {}
            BlockPayload::Blank => {
                self.flush_code();
                if self.front.paragraph_spacing == 0 {
                    self.output.push(String::new());
                }
            }
            BlockPayload::Paragraph { spans } => {
                self.flush_code();
                self.render_paragraph(spans, *style);
            }
            BlockPayload::Heading { level, text, .. } => {
                self.flush_code();
                self.render_heading(*level, text, *style);
            }
            BlockPayload::Blockquote { depth, spans } => {
                self.flush_code();
                self.render_blockquote(*depth, spans, *style);
            }
            BlockPayload::ListItem {
                indent,
                marker,
                spans,
                ..
            } => {
                self.flush_code();
                self.render_list_item(indent, marker, spans, *style);
            }
            BlockPayload::Rule => {
                self.flush_code();
                self.render_rule(*style);
            }
            BlockPayload::Art { group } => {
                self.flush_code();
                self.render_art(group, *style);
            }
        }
    }

    fn finalize(&mut self) -> Vec<String> {
        self.flush_code();
        if !self.front.links_per_block && !self.links.is_empty() {
            if self.output.last().is_some_and(|line| !line.is_empty()) {
                self.output.push(String::new());
            }
            let style = self.base_style();
            let entries: Vec<(usize, String)> = self.links.clone();
            for (number, url) in entries {
                let entry = format!("[{number}] {url}");
                let lines = wrap_styled(&entry, "", "", &style, self.width, None);
                self.output.extend(lines);
            }
            self.last_stylable = None;
        }
        self.finished = true;
        std::mem::take(&mut self.output)
    }

    fn line_ending(&self) -> LineEnding {
        LineEnding::Crlf
    }
}

/// Capitalizes each whitespace-separated word, lowercasing the rest.
fn title_case_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Word-wraps one code line, indenting continuations past the original
/// leading whitespace.
fn wrap_code_segments(line: &str, content_width: usize, wrap_indent: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut remaining = line.to_string();
    let mut current_indent = 0usize;
    let max_indent = content_width.saturating_sub(1);
    while !remaining.is_empty() {
        let available = content_width.saturating_sub(current_indent).max(1);
        let (segment, rest) = split_code_segment(&remaining, available);
        let leading = segment
            .chars()
            .take_while(|ch| *ch == ' ' || *ch == '\t')
            .count();
        segments.push(format!("{}{}", " ".repeat(current_indent), segment));
        current_indent = (current_indent + leading + wrap_indent).min(max_indent);
        remaining = rest;
    }
    segments
}

/// Splits at the last whitespace inside the width, or hard-breaks when
/// there is none.
fn split_code_segment(text: &str, max_width: usize) -> (String, String) {
    let max_width = max_width.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        return (text.to_string(), String::new());
    }
    let mut break_pos = None;
    for (index, ch) in chars[..max_width].iter().enumerate() {
        if *ch == ' ' || *ch == '\t' {
            break_pos = Some(index);
        }
    }
    match break_pos {
        Some(pos) if pos > 0 => (
            chars[..pos].iter().collect(),
            chars[pos..].iter().collect(),
        ),
        _ => (
            chars[..max_width].iter().collect(),
            chars[max_width..].iter().collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, ArtPiece, BlockEvent};
    use crate::parser::parse_inline;
    use std::path::PathBuf;

    fn front() -> FrontMatter {
        FrontMatter {
            margin_left: 0,
            margin_right: 0,
            paragraph_spacing: 0,
            header_spacing: 0,
            ..FrontMatter::default()
        }
    }

    fn block(payload: BlockPayload, style: BlockStyle, stylable: bool) -> Event {
        Event::Block(BlockEvent {
            payload,
            style,
            stylable,
        })
    }

    fn paragraph(text: &str, style: BlockStyle) -> Event {
        let (spans, _) = parse_inline(text);
        block(BlockPayload::Paragraph { spans }, style, true)
    }

    fn render(front: FrontMatter, events: Vec<Event>) -> Vec<String> {
        let mut renderer = TextRenderer::new(front, 80);
        for event in &events {
            renderer.handle_event(event);
        }
        renderer.finalize()
    }

    #[test]
    fn test_bold_and_strike_transforms() {
        let lines = render(
            front(),
            vec![paragraph("**bold** and ~~go~~", BlockStyle::default())],
        );
        assert_eq!(lines, vec!["B O L D and ~g~o~"]);
    }

    #[test]
    fn test_strong_and_underline_transforms() {
        let lines = render(
            front(),
            vec![paragraph("__up__ and _low_", BlockStyle::default())],
        );
        assert_eq!(lines, vec!["_U_P_ and _l_o_w_"]);
    }

    #[test]
    fn test_inline_code_passes_through() {
        let lines = render(
            front(),
            vec![paragraph("run `cargo test` now", BlockStyle::default())],
        );
        assert_eq!(lines, vec!["run `cargo test` now"]);
    }

    #[test]
    fn test_wrap_width_invariant_with_margins() {
        let style = BlockStyle::with_margins(4, 6);
        let text =
            "a moderately long paragraph that definitely has to wrap when the page is narrow";
        let mut renderer = TextRenderer::new(front(), 40);
        renderer.handle_event(&paragraph(text, style));
        let lines = renderer.finalize();
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 40, "too wide: {line:?}");
        }
    }

    #[test]
    fn test_links_collected_at_end_in_first_use_order() {
        let lines = render(
            front(),
            vec![
                paragraph("see [a](https://a.example) first", BlockStyle::default()),
                paragraph(
                    "then [b](https://b.example) and [a again](https://a.example)",
                    BlockStyle::default(),
                ),
            ],
        );
        assert!(lines[0].contains("[a](1)"));
        assert!(lines[1].contains("[b](2)"));
        assert!(lines[1].contains("[a again](1)"));
        let tail: Vec<&String> = lines.iter().filter(|line| line.starts_with('[')).collect();
        assert_eq!(tail, vec!["[1] https://a.example", "[2] https://b.example"]);
    }

    #[test]
    fn test_links_per_block_emits_after_each_block() {
        let mut fm = front();
        fm.links_per_block = true;
        let lines = render(
            fm,
            vec![
                paragraph("see [a](https://a.example)", BlockStyle::default()),
                paragraph("plain follow-up", BlockStyle::default()),
            ],
        );
        let position = lines
            .iter()
            .position(|line| line == "[1] https://a.example")
            .unwrap();
        assert_eq!(position, 1);
        assert!(!lines.contains(&"[2] https://a.example".to_string()));
    }

    #[test]
    fn test_image_marker() {
        let lines = render(
            front(),
            vec![paragraph("![chart](pic.png)", BlockStyle::default())],
        );
        assert!(lines[0].contains("[Image: chart](1)"));
    }

    #[test]
    fn test_code_block_gutter_and_cycling() {
        let style = BlockStyle::default();
        let mut events = Vec::new();
        for index in 0..101 {
            events.push(block(
                BlockPayload::CodeLine {
                    fence: crate::model::CodeFence::Fenced,
                    text: format!("line {index}"),
                    starts_block: index == 0,
                },
                style,
                false,
            ));
        }
        let lines = render(front(), events);
        assert!(lines[0].starts_with("01 | "));
        assert!(lines[98].starts_with("99 | "));
        assert!(lines[99].starts_with("00 | "), "cycling: {:?}", &lines[99]);
        assert!(lines[100].starts_with("01 | "));
    }

    #[test]
    fn test_code_wrap_mode_indents_continuations() {
        let mut fm = front();
        fm.wrap_code_blocks = true;
        fm.code_block_line_numbers = false;
        let long = "let value = some_function(argument_one, argument_two, argument_three, argument_four);";
        let mut renderer = TextRenderer::new(fm, 40);
        renderer.handle_event(&block(
            BlockPayload::CodeLine {
                fence: crate::model::CodeFence::Fenced,
                text: long.to_string(),
                starts_block: true,
            },
            BlockStyle::default(),
            false,
        ));
        let lines = renderer.finalize();
        assert!(lines.len() > 2);
        for line in lines.iter().filter(|line| !line.is_empty()) {
            assert!(line.chars().count() <= 40, "too wide: {line:?}");
        }
        assert!(lines[1].starts_with("     "), "continuation indent: {:?}", &lines[1]);
    }

    #[test]
    fn test_blockquote_bars_repeat_per_depth() {
        let (spans, _) = parse_inline("quoted words");
        let lines = render(
            front(),
            vec![block(
                BlockPayload::Blockquote { depth: 2, spans },
                BlockStyle::default(),
                false,
            )],
        );
        assert!(lines[0].starts_with(" |  | "), "got: {:?}", &lines[0]);
    }

    #[test]
    fn test_blockquote_bars_disabled() {
        let mut fm = front();
        fm.blockquote_bars = false;
        let (spans, _) = parse_inline("quiet");
        let lines = render(
            fm,
            vec![block(
                BlockPayload::Blockquote { depth: 1, spans },
                BlockStyle::default(),
                false,
            )],
        );
        assert!(lines[0].starts_with("   quiet"));
    }

    #[test]
    fn test_list_item_continuation_aligns_under_text() {
        let (spans, _) = parse_inline(
            "a list item long enough that the wrapped continuation must align under the text column",
        );
        let mut renderer = TextRenderer::new(front(), 40);
        renderer.handle_event(&block(
            BlockPayload::ListItem {
                indent: String::new(),
                marker: "-".into(),
                spacing: " ".into(),
                ordered: false,
                spans,
            },
            BlockStyle::default(),
            false,
        ));
        let lines = renderer.finalize();
        assert!(lines.len() > 1);
        assert!(lines[0].starts_with("- "));
        assert!(lines[1].starts_with("  ") && !lines[1].starts_with("   "));
    }

    #[test]
    fn test_heading_level_four_uses_underline() {
        let lines = render(
            front(),
            vec![block(
                BlockPayload::Heading {
                    level: 4,
                    text: "minor heading".into(),
                    spans: Vec::new(),
                },
                BlockStyle::default(),
                true,
            )],
        );
        assert_eq!(lines[0], "MINOR HEADING");
        assert_eq!(lines[1], "-".repeat("MINOR HEADING".len()));
    }

    #[test]
    fn test_caps_and_title_shortcuts() {
        let mut fm = front();
        fm.h1_font = "caps".into();
        fm.h2_font = "title".into();
        let lines = render(
            fm,
            vec![
                block(
                    BlockPayload::Heading {
                        level: 1,
                        text: "the big one".into(),
                        spans: Vec::new(),
                    },
                    BlockStyle::default(),
                    true,
                ),
                block(
                    BlockPayload::Heading {
                        level: 2,
                        text: "the SECOND one".into(),
                        spans: Vec::new(),
                    },
                    BlockStyle::default(),
                    true,
                ),
            ],
        );
        assert!(lines.contains(&"THE BIG ONE".to_string()));
        assert!(lines.contains(&"The Second One".to_string()));
    }

    #[test]
    fn test_banner_fallback_when_too_wide() {
        let mut fm = front();
        fm.h1_font = "standard".into();
        fm.figlet_fallback = true;
        let text = "a heading far too long for any banner to fit the page";
        let mut renderer = TextRenderer::new(fm, 40);
        renderer.handle_event(&block(
            BlockPayload::Heading {
                level: 1,
                text: text.into(),
                spans: Vec::new(),
            },
            BlockStyle::default(),
            true,
        ));
        let lines = renderer.finalize();
        assert!(lines.iter().any(|line| line.contains("A HEADING FAR TOO")));
    }

    #[test]
    fn test_banner_rendering_when_it_fits() {
        let mut fm = front();
        fm.h1_font = "standard".into();
        let mut renderer = TextRenderer::new(fm, 80);
        renderer.handle_event(&block(
            BlockPayload::Heading {
                level: 1,
                text: "Hi".into(),
                spans: Vec::new(),
            },
            BlockStyle::default(),
            true,
        ));
        let lines = renderer.finalize();
        assert!(lines.len() > 2, "expected a multi-row banner: {lines:?}");
    }

    #[test]
    fn test_header_spacing_inserted_before_heading() {
        let mut fm = front();
        fm.header_spacing = 2;
        let lines = render(
            fm,
            vec![
                paragraph("before", BlockStyle::default()),
                block(
                    BlockPayload::Heading {
                        level: 4,
                        text: "next".into(),
                        spans: Vec::new(),
                    },
                    BlockStyle::default(),
                    true,
                ),
            ],
        );
        assert_eq!(&lines[..4], &["before", "", "", "NEXT"]);
    }

    #[test]
    fn test_style_update_re_renders_last_block() {
        let style = BlockStyle::default();
        let spec = StyleSpec {
            align: Some(Alignment::Right),
            ..Default::default()
        };
        let mut renderer = TextRenderer::new(front(), 20);
        renderer.handle_event(&paragraph("short", style));
        renderer.handle_event(&Event::StyleUpdate(spec));
        let lines = renderer.finalize();
        assert_eq!(lines, vec![format!("{}short", " ".repeat(15))]);
    }

    #[test]
    fn test_art_block_renders_and_restyles() {
        let group = ArtGroup {
            pieces: vec![ArtPiece {
                kind: "logo".into(),
                name: String::new(),
                path: PathBuf::from("logo.txt"),
                align: None,
                lines: vec!["##".into()],
            }],
        };
        let mut renderer = TextRenderer::new(front(), 10);
        renderer.handle_event(&block(
            BlockPayload::Art {
                group: group.clone(),
            },
            BlockStyle::default(),
            true,
        ));
        renderer.handle_event(&Event::StyleUpdate(StyleSpec {
            align: Some(Alignment::Right),
            ..Default::default()
        }));
        let lines = renderer.finalize();
        assert_eq!(lines, vec!["        ##".to_string()]);
    }

    #[test]
    fn test_paragraph_spacing_inserts_blanks() {
        let mut fm = front();
        fm.paragraph_spacing = 2;
        let lines = render(
            fm,
            vec![
                paragraph("one", BlockStyle::default()),
                paragraph("two", BlockStyle::default()),
            ],
        );
        assert_eq!(&lines[..4], &["one", "", "", "two"]);
    }

    #[test]
    fn test_no_events_after_finalize() {
        let mut renderer = TextRenderer::new(front(), 80);
        renderer.handle_event(&paragraph("x", BlockStyle::default()));
        let first = renderer.finalize();
        assert_eq!(first, vec!["x"]);
    }

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case_words("the BIG one"), "The Big One");
    }
}
