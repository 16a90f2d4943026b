//! The conversion pipeline: preprocess, parse, render.
//!
//! The pipeline is a strict sequential pass over one document. It is
//! agnostic to the concrete parser and renderer; it only requires the
//! two capability contracts defined here.

use crate::error::Result;
use crate::frontmatter::{parse_front_matter, FrontMatter};
use crate::model::{BlockStyle, Event};
use crate::plugins::{PluginOptions, Registry};
use crate::preprocess::{preprocess, SourceLine};
use std::path::Path;

/// Produces the event stream for a preprocessed document.
///
/// Restartable only by re-invocation on the same input; there is no
/// resumable cursor.
pub trait Parser {
    fn parse(&mut self, lines: &[SourceLine]) -> Vec<Event>;
}

/// A stateful consumer of the event stream.
///
/// After `finalize` returns the completed output, the renderer is
/// terminal: further events are ignored.
pub trait Renderer {
    fn handle_event(&mut self, event: &Event);
    fn finalize(&mut self) -> Vec<String>;

    /// Line terminator of this dialect.
    fn line_ending(&self) -> LineEnding {
        LineEnding::Lf
    }
}

/// Line terminators for assembled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// A finished conversion: output lines plus the dialect's terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub lines: Vec<String>,
    pub line_ending: LineEnding,
}

impl Rendered {
    /// Joins the lines with the dialect terminator, including a final
    /// one.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join(self.line_ending.as_str());
        text.push_str(self.line_ending.as_str());
        text
    }
}

/// Drives one parser/renderer pair over preprocessed input.
pub fn run_pipeline(
    source: &[SourceLine],
    parser: &mut dyn Parser,
    renderer: &mut dyn Renderer,
) -> Vec<String> {
    for event in parser.parse(source) {
        renderer.handle_event(&event);
    }
    renderer.finalize()
}

/// Converts document body lines that have already had their front
/// matter split off.
pub fn run_conversion(
    body: &[String],
    front: &FrontMatter,
    registry: &Registry,
    parser_name: &str,
    renderer_name: &str,
    options: &PluginOptions,
    base_dir: &Path,
) -> Result<Rendered> {
    // Plugin lookups fail before any file work starts.
    let parser_factory = registry.parser(parser_name)?;
    let renderer_factory = registry.renderer(renderer_name)?;

    let base_style = BlockStyle::with_margins(front.margin_left, front.margin_right);
    let mut parser = parser_factory(base_style, options);
    let mut renderer = renderer_factory(front, options);

    let source = preprocess(body, base_dir)?;
    let lines = run_pipeline(&source, parser.as_mut(), renderer.as_mut());
    Ok(Rendered {
        lines,
        line_ending: renderer.line_ending(),
    })
}

/// Full conversion of raw document lines: front matter, preprocessing,
/// parsing, rendering.
pub fn convert_lines(
    lines: &[String],
    registry: &Registry,
    parser_name: &str,
    renderer_name: &str,
    options: &PluginOptions,
    base_dir: &Path,
) -> Result<Rendered> {
    let (front, body) = parse_front_matter(lines);
    run_conversion(
        &body,
        &front,
        registry,
        parser_name,
        renderer_name,
        options,
        base_dir,
    )
}
