//! Gemtext renderer for the Gemini protocol.
//!
//! Gemtext is deliberately plain: `#` headings, `>` quotes, `*`
//! bullets, fenced preformatted blocks, and one link per line. Banner
//! headings ride inside preformatted fences when a font is configured
//! and fits.

use super::banner::{banner_width, BannerFonts};
use crate::frontmatter::FrontMatter;
use crate::model::{ArtGroup, BlockPayload, Event, InlineSpan};
use crate::pipeline::{LineEnding, Renderer};
use textwrap::{Options, WordSeparator};

pub struct GeminiRenderer {
    width: usize,
    front: FrontMatter,
    preformatted_alt: Option<String>,
    fonts: BannerFonts,
    output: Vec<String>,
    in_list: bool,
    /// Catalog entries by number − 1: URL plus an optional label.
    catalog: Vec<(String, Option<String>)>,
    pending_links: Vec<usize>,
    pending_code: Vec<String>,
    finished: bool,
}

impl GeminiRenderer {
    pub fn new(front: FrontMatter, width: usize, preformatted_alt: Option<String>) -> Self {
        Self {
            width: width.max(20),
            front,
            preformatted_alt,
            fonts: BannerFonts::new(),
            output: Vec::new(),
            in_list: false,
            catalog: Vec::new(),
            pending_links: Vec::new(),
            pending_code: Vec::new(),
            finished: false,
        }
    }

    fn preformatted_header(&self) -> String {
        match &self.preformatted_alt {
            Some(alt) if !alt.is_empty() => format!("``` {alt}"),
            _ => "```".to_string(),
        }
    }

    fn begin_list(&mut self) {
        if !self.in_list {
            self.ensure_blank_line(false);
            self.in_list = true;
        }
    }

    fn end_list(&mut self) {
        if self.in_list {
            if self.output.last().is_some_and(|line| !line.is_empty()) {
                self.output.push(String::new());
            }
            self.in_list = false;
        }
    }

    fn ensure_blank_line(&mut self, force: bool) {
        if self.output.is_empty() {
            return;
        }
        if force || self.output.last().is_some_and(|line| !line.is_empty()) {
            self.output.push(String::new());
        }
    }

    fn wrap(&self, text: &str, initial: &str, subsequent: &str) -> Vec<String> {
        let normalized = normalize_whitespace(text);
        if normalized.is_empty() {
            return if initial.is_empty() {
                Vec::new()
            } else {
                vec![initial.trim_end().to_string()]
            };
        }
        let options = Options::new(self.width)
            .initial_indent(initial)
            .subsequent_indent(subsequent)
            .break_words(false)
            .word_separator(WordSeparator::AsciiSpace);
        textwrap::wrap(&normalized, options)
            .into_iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }

    fn register_link(&mut self, url: &str, label: Option<&str>) -> usize {
        if let Some(number) = self
            .catalog
            .iter()
            .position(|(stored, _)| stored == url)
            .map(|index| index + 1)
        {
            // Keep the first label seen; fill one in if we only had the
            // bare URL before.
            if let Some(label) = label {
                let entry = &mut self.catalog[number - 1];
                if entry.1.is_none() {
                    entry.1 = Some(label.to_string());
                }
            }
            return number;
        }
        self.catalog
            .push((url.to_string(), label.map(str::to_string)));
        self.catalog.len()
    }

    /// Strips emphasis and code markers, replaces links with
    /// `label [n]`, and returns the numbers used by this block.
    fn process_spans(&mut self, spans: &[InlineSpan]) -> (String, Vec<usize>) {
        let mut out = String::new();
        let mut numbers = Vec::new();
        for span in spans {
            match span {
                InlineSpan::Text(text) => out.push_str(text),
                InlineSpan::Code(code) => out.push_str(code.trim_matches('`')),
                InlineSpan::Emphasis { text, .. } => out.push_str(text),
                InlineSpan::Link { label, url, .. } => {
                    let label = label.trim();
                    let display = if label.is_empty() { url.trim() } else { label };
                    let stored_label = (!label.is_empty() && label != url).then_some(label);
                    let number = self.register_link(url.trim(), stored_label);
                    if !numbers.contains(&number) {
                        numbers.push(number);
                    }
                    out.push_str(&format!("{display} [{number}]"));
                }
            }
        }
        (normalize_whitespace(&out), numbers)
    }

    fn handle_links(&mut self, numbers: Vec<usize>, leading_blank: bool, trailing_blank: bool) {
        if numbers.is_empty() {
            return;
        }
        if self.front.links_per_block {
            self.emit_links(&numbers, leading_blank, trailing_blank);
        } else {
            for number in numbers {
                if !self.pending_links.contains(&number) {
                    self.pending_links.push(number);
                }
            }
        }
    }

    fn emit_links(&mut self, numbers: &[usize], leading_blank: bool, trailing_blank: bool) {
        if numbers.is_empty() {
            return;
        }
        let mut trailing = Vec::new();
        while self.output.last().is_some_and(|line| line.is_empty()) {
            if let Some(blank) = self.output.pop() {
                trailing.push(blank);
            }
        }
        if leading_blank && self.output.last().is_some_and(|line| !line.is_empty()) {
            self.output.push(String::new());
        }
        for number in numbers {
            let (url, label) = &self.catalog[number - 1];
            let line = match label {
                Some(label) => format!("=> {url} [{number}] {label}"),
                None => format!("=> {url} [{number}]"),
            };
            self.output.push(line);
        }
        if trailing_blank
            && trailing.is_empty()
            && self.output.last().is_some_and(|line| !line.is_empty())
        {
            self.output.push(String::new());
        }
        self.output.extend(trailing);
    }

    fn flush_code(&mut self) {
        if self.pending_code.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.pending_code);
        let header = self.preformatted_header();
        self.end_list();
        self.ensure_blank_line(false);
        self.output.push(header);
        self.output.extend(lines);
        self.output.push("```".to_string());
    }

    fn render_heading(&mut self, level: u8, spans: &[InlineSpan]) {
        self.end_list();
        let (text, numbers) = self.process_spans(spans);
        let lines = match self.banner_lines(level, &text) {
            Some(banner) => {
                let mut lines = vec![self.preformatted_header()];
                lines.extend(banner);
                lines.push("```".to_string());
                lines
            }
            None => {
                if text.is_empty() {
                    return;
                }
                let marker = "#".repeat(level.clamp(1, 3) as usize);
                let prefix = format!("{marker} ");
                let mut wrapped = self.wrap(&text, &prefix, &prefix);
                if wrapped.last().is_some_and(|line| !line.is_empty()) {
                    wrapped.push(String::new());
                }
                wrapped
            }
        };
        if lines.is_empty() {
            return;
        }
        self.ensure_blank_line(false);
        self.output.extend(lines);
        self.handle_links(numbers, true, true);
    }

    fn banner_lines(&mut self, level: u8, text: &str) -> Option<Vec<String>> {
        if level > 3 {
            return None;
        }
        let font = self.front.font_for_level(level)?.to_ascii_lowercase();
        if font == "caps" || font == "title" {
            return None;
        }
        let banner = self.fonts.render(&font, text)?;
        if banner_width(&banner) > self.width && self.front.figlet_fallback {
            return None;
        }
        Some(banner)
    }

    fn render_paragraph(&mut self, spans: &[InlineSpan]) {
        self.end_list();
        let (text, numbers) = self.process_spans(spans);
        if !text.is_empty() {
            self.ensure_blank_line(false);
            let lines = self.wrap(&text, "", "");
            self.output.extend(lines);
        }
        self.handle_links(numbers, true, true);
    }

    fn render_blockquote(&mut self, spans: &[InlineSpan]) {
        self.end_list();
        let (text, numbers) = self.process_spans(spans);
        if !text.is_empty() {
            self.ensure_blank_line(false);
            let lines = self.wrap(&text, "> ", "> ");
            self.output.extend(lines);
        }
        self.handle_links(numbers, true, true);
    }

    fn render_list_item(&mut self, indent: &str, spans: &[InlineSpan]) {
        let depth = indent.replace('\t', "    ").chars().count() / 2;
        let bullet = format!("{}* ", "  ".repeat(depth));
        let continuation = format!("{}  ", "  ".repeat(depth));
        let (text, numbers) = self.process_spans(spans);
        self.begin_list();
        if !text.is_empty() {
            let lines = self.wrap(&text, &bullet, &continuation);
            self.output.extend(lines);
        }
        self.handle_links(numbers, false, false);
    }

    fn render_art(&mut self, group: &ArtGroup) {
        let mut lines = Vec::new();
        for (index, piece) in group.pieces.iter().enumerate() {
            lines.extend(piece.lines.iter().map(|line| line.trim_end().to_string()));
            if index + 1 < group.pieces.len() {
                lines.push(String::new());
            }
        }
        if lines.is_empty() {
            return;
        }
        let header = self.preformatted_header();
        self.end_list();
        self.ensure_blank_line(false);
        self.output.push(header);
        self.output.extend(lines);
        self.output.push("```".to_string());
    }
}

impl Renderer for GeminiRenderer {
    fn handle_event(&mut self, event: &Event) {
        debug_assert!(!self.finished, "event after finalize");
        if self.finished {
            return;
        }
        let block = match event {
            // Gemtext has no per-block styling; updates are ignored.
            Event::StyleUpdate(_) => {
                self.flush_code();
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
                self.pending_code.push(text.clone());
            }
            BlockPayload::Link { .. } => {}
            BlockPayload::Blank => {
                self.flush_code();
                self.end_list();
                self.ensure_blank_line(true);
            }
            BlockPayload::Paragraph { spans } => {
                self.flush_code();
                self.render_paragraph(spans);
            }
            BlockPayload::Heading { level, spans, .. } => {
                self.flush_code();
                self.render_heading(*level, spans);
            }
            BlockPayload::Blockquote { spans, .. } => {
                self.flush_code();
                self.render_blockquote(spans);
            }
            BlockPayload::ListItem { indent, spans, .. } => {
                self.flush_code();
                self.render_list_item(indent, spans);
            }
            BlockPayload::Rule => {
                self.flush_code();
                self.end_list();
                self.ensure_blank_line(false);
                self.output.push("---".to_string());
            }
            BlockPayload::Art { group } => {
                self.flush_code();
                self.render_art(group);
            }
        }
    }

    fn finalize(&mut self) -> Vec<String> {
        self.flush_code();
        self.end_list();
        let pending = std::mem::take(&mut self.pending_links);
        self.emit_links(&pending, true, false);
        self.finished = true;
        std::mem::take(&mut self.output)
    }

    fn line_ending(&self) -> LineEnding {
        LineEnding::Lf
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
