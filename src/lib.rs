//! # md2txt
//!
//! A library for converting Markdown documents into constrained,
//! formatted plain text: fixed-width DOS-style output by default, with
//! micron and gemtext dialects available through the same pipeline.
//!
//! ## Pipeline
//!
//! Raw text → front matter extraction → recursive include expansion →
//! art resolution → block parser → event stream → renderer. The parser
//! and renderer are pluggable; the registry binds them by name.
//!
//! ## Quick Start
//!
//! ```no_run
//! use md2txt::Converter;
//!
//! fn main() -> md2txt::Result<()> {
//!     let text = Converter::new()
//!         .with_width(80)
//!         .convert_file("document.md")?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! Per-document behavior (margins, heading fonts, hyphenation, link
//! policy) is configured through the document's own front matter; see
//! [`FrontMatter`] for the recognized keys.

pub mod error;
pub mod frontmatter;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod plugins;
pub mod preprocess;
pub mod render;

// Re-exports
pub use error::{Error, Result};
pub use frontmatter::{parse_front_matter, FrontMatter};
pub use model::{BlockEvent, BlockPayload, BlockStyle, Event, InlineSpan, StyleSpec};
pub use pipeline::{convert_lines, LineEnding, Parser, Rendered, Renderer};
pub use plugins::{PluginOptions, Registry};
pub use preprocess::{preprocess, read_lines, SourceLine};

use std::path::Path;

/// Converts a Markdown file to DOS text with default settings.
///
/// # Example
///
/// ```no_run
/// let text = md2txt::convert_file("notes.md")?;
/// std::fs::write("notes.txt", text)?;
/// # Ok::<(), md2txt::Error>(())
/// ```
pub fn convert_file(path: impl AsRef<Path>) -> Result<String> {
    Converter::new().convert_file(path)
}

/// Converts Markdown source text with default settings. Includes and
/// art paths resolve against `base_dir`.
pub fn convert_str(text: &str, base_dir: impl AsRef<Path>) -> Result<String> {
    Converter::new().convert_str(text, base_dir)
}

/// Builder for conversions.
///
/// # Example
///
/// ```no_run
/// use md2txt::Converter;
///
/// let output = Converter::new()
///     .with_width(64)
///     .with_renderer("gemini")
///     .convert_file("document.md")?;
/// # Ok::<(), md2txt::Error>(())
/// ```
pub struct Converter {
    registry: Registry,
    parser: String,
    renderer: String,
    options: PluginOptions,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// Creates a converter with the built-in plugins, the `markdown`
    /// parser, and the `text` renderer at 80 columns.
    pub fn new() -> Self {
        Self {
            registry: Registry::with_defaults(),
            parser: "markdown".to_string(),
            renderer: "text".to_string(),
            options: PluginOptions::new(),
        }
    }

    /// Replaces the plugin registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Selects the parser plugin by name.
    pub fn with_parser(mut self, name: impl Into<String>) -> Self {
        self.parser = name.into();
        self
    }

    /// Selects the renderer plugin by name.
    pub fn with_renderer(mut self, name: impl Into<String>) -> Self {
        self.renderer = name.into();
        self
    }

    /// Sets the page width in columns.
    pub fn with_width(mut self, width: usize) -> Self {
        self.options.insert("width".to_string(), width.to_string());
        self
    }

    /// Passes a free-form option through to the plugin factories.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Converts a file, resolving includes and art against its
    /// directory.
    pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let lines = read_lines(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(self.convert(&lines, base_dir)?.to_text())
    }

    /// Converts source text, resolving includes and art against
    /// `base_dir`.
    pub fn convert_str(&self, text: &str, base_dir: impl AsRef<Path>) -> Result<String> {
        let lines: Vec<String> = text.lines().map(|line| line.to_string()).collect();
        Ok(self.convert(&lines, base_dir.as_ref())?.to_text())
    }

    /// Converts raw lines, returning the line sequence and dialect
    /// terminator instead of a joined string.
    pub fn convert(&self, lines: &[String], base_dir: &Path) -> Result<Rendered> {
        convert_lines(
            lines,
            &self.registry,
            &self.parser,
            &self.renderer,
            &self.options,
            base_dir,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_convert_str_basic_paragraph() {
        let text = convert_str("a plain paragraph", ".").unwrap();
        assert!(text.contains("a plain paragraph"));
        assert!(text.ends_with("\r\n"));
    }

    #[test]
    fn test_front_matter_margins_apply() {
        let input = "---\nmargin_left: 6\nmargin_right: 0\n---\nindented text";
        let text = convert_str(input, ".").unwrap();
        let line = text
            .lines()
            .find(|line| line.contains("indented text"))
            .unwrap();
        assert!(line.starts_with("      indented"));
    }

    #[test]
    fn test_convert_file_with_include_and_art() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "logo.txt", " /\\ \n/__\\\n");
        write_file(&dir, "part.md", "included paragraph\n");
        let doc = write_file(
            &dir,
            "doc.md",
            "#[logo :center](logo.txt)\n\n![[part.md]]\n\nmain paragraph\n",
        );
        let text = Converter::new().convert_file(&doc).unwrap();
        assert!(text.contains("/__\\"));
        assert!(text.contains("included paragraph"));
        assert!(text.contains("main paragraph"));
    }

    #[test]
    fn test_missing_include_propagates() {
        let dir = TempDir::new().unwrap();
        let doc = write_file(&dir, "doc.md", "![[absent.md]]\n");
        let result = Converter::new().convert_file(&doc);
        assert!(matches!(result, Err(Error::MissingInclude(_))));
    }

    #[test]
    fn test_include_cycle_propagates() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "a.md", "![[b.md]]\n");
        write_file(&dir, "b.md", "![[a.md]]\n");
        let doc = write_file(&dir, "doc.md", "![[a.md]]\n");
        let result = Converter::new().convert_file(&doc);
        assert!(matches!(result, Err(Error::IncludeCycle(_))));
    }

    #[test]
    fn test_renderer_selection() {
        let micron = Converter::new()
            .with_renderer("micron")
            .convert_str("# Title\n\nBody **bold**.", ".")
            .unwrap();
        assert!(micron.contains("> Title"));
        assert!(micron.contains("`!bold`!"));
        assert!(!micron.ends_with("\r\n"));

        let gemini = Converter::new()
            .with_renderer("gemini")
            .convert_str("see [docs](https://example.com)", ".")
            .unwrap();
        assert!(gemini.contains("=> https://example.com"));
    }

    #[test]
    fn test_unknown_renderer_errors() {
        let result = Converter::new()
            .with_renderer("html")
            .convert_str("text", ".");
        assert!(matches!(result, Err(Error::UnknownPlugin { .. })));
    }

    #[test]
    fn test_width_option_respected() {
        let input = "---\nmargin_left: 0\nmargin_right: 0\n---\n".to_string()
            + &"word ".repeat(30);
        let text = Converter::new()
            .with_width(40)
            .convert_str(&input, ".")
            .unwrap();
        for line in text.lines() {
            assert!(line.chars().count() <= 40, "too wide: {line:?}");
        }
    }

    #[test]
    fn test_emphasis_end_to_end() {
        let text = convert_str("**bold** and ~~go~~", ".").unwrap();
        assert!(text.contains("B O L D"));
        assert!(text.contains("~g~o~"));
    }

    #[test]
    fn test_heading_fallback_end_to_end() {
        let input = "---\nh1_font: standard\nfiglet_fallback: true\nmargin_left: 0\nmargin_right: 0\n---\n# a very long heading that cannot fit as a banner on a narrow page";
        let text = Converter::new()
            .with_width(40)
            .convert_str(input, ".")
            .unwrap();
        assert!(text.contains("A VERY LONG HEADING"));
        for line in text.lines() {
            assert!(line.chars().count() <= 40, "too wide: {line:?}");
        }
    }

    #[test]
    fn test_list_marker_change_end_to_end() {
        let text = convert_str("+ alpha\n- beta", ".").unwrap();
        let markers: Vec<&str> = text
            .lines()
            .filter_map(|line| line.trim_start().get(..1))
            .filter(|tag| *tag == "+" || *tag == "-")
            .collect();
        assert_eq!(markers, vec!["+", "-"]);
    }

    #[test]
    fn test_links_per_block_end_to_end() {
        let input = "---\nlinks_per_block: true\nparagraph_spacing: 0\n---\nsee [a](https://a.example)\n\nplain";
        let text = convert_str(input, ".").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        let link_line = lines
            .iter()
            .position(|line| line.contains("[1] https://a.example"))
            .unwrap();
        let plain_line = lines.iter().position(|line| line.contains("plain")).unwrap();
        assert!(link_line < plain_line);
    }
}
