//! Plugin registry for parsers and renderers.
//!
//! The registry is an explicit value passed into the pipeline entry
//! points, not process-wide state; independent conversions can use
//! independent registries. Factories receive free-form string options
//! (`width`, `preformatted_alt`, ...) and pick out what they
//! understand.

use crate::error::{Error, Result};
use crate::frontmatter::FrontMatter;
use crate::model::BlockStyle;
use crate::parser::MarkdownParser;
use crate::pipeline::{Parser, Renderer};
use crate::render::{GeminiRenderer, MicronRenderer, TextRenderer};
use std::collections::BTreeMap;

/// Free-form options passed through to plugin factories.
pub type PluginOptions = BTreeMap<String, String>;

/// Reads the page width from options, defaulting to 80 columns.
pub fn option_width(options: &PluginOptions) -> usize {
    options
        .get("width")
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width > 0)
        .unwrap_or(80)
}

pub type ParserFactory = Box<dyn Fn(BlockStyle, &PluginOptions) -> Box<dyn Parser> + Send + Sync>;
pub type RendererFactory =
    Box<dyn Fn(&FrontMatter, &PluginOptions) -> Box<dyn Renderer> + Send + Sync>;

/// Name → factory mapping for parsers and renderers.
#[derive(Default)]
pub struct Registry {
    parsers: BTreeMap<String, ParserFactory>,
    renderers: BTreeMap<String, RendererFactory>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `markdown` parser and the
    /// `text`, `micron`, and `gemini` renderers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let markdown: ParserFactory =
            Box::new(|base_style, _options| Box::new(MarkdownParser::new(base_style)));
        registry.parsers.insert("markdown".to_string(), markdown);

        let text: RendererFactory = Box::new(|front, options| {
            Box::new(TextRenderer::new(front.clone(), option_width(options)))
        });
        registry.renderers.insert("text".to_string(), text);

        let micron: RendererFactory = Box::new(|front, options| {
            Box::new(MicronRenderer::new(front.clone(), option_width(options)))
        });
        registry.renderers.insert("micron".to_string(), micron);

        let gemini: RendererFactory = Box::new(|front, options| {
            Box::new(GeminiRenderer::new(
                front.clone(),
                option_width(options),
                options.get("preformatted_alt").cloned(),
            ))
        });
        registry.renderers.insert("gemini".to_string(), gemini);
        registry
    }

    pub fn register_parser(
        &mut self,
        name: &str,
        factory: impl Fn(BlockStyle, &PluginOptions) -> Box<dyn Parser> + Send + Sync + 'static,
    ) -> Result<()> {
        if self.parsers.contains_key(name) {
            return Err(Error::DuplicatePlugin {
                kind: "parser",
                name: name.to_string(),
            });
        }
        self.parsers.insert(name.to_string(), Box::new(factory));
        Ok(())
    }

    pub fn register_renderer(
        &mut self,
        name: &str,
        factory: impl Fn(&FrontMatter, &PluginOptions) -> Box<dyn Renderer> + Send + Sync + 'static,
    ) -> Result<()> {
        if self.renderers.contains_key(name) {
            return Err(Error::DuplicatePlugin {
                kind: "renderer",
                name: name.to_string(),
            });
        }
        self.renderers.insert(name.to_string(), Box::new(factory));
        Ok(())
    }

    pub fn parser(&self, name: &str) -> Result<&ParserFactory> {
        self.parsers.get(name).ok_or_else(|| Error::UnknownPlugin {
            kind: "parser",
            name: name.to_string(),
        })
    }

    pub fn renderer(&self, name: &str) -> Result<&RendererFactory> {
        self.renderers
            .get(name)
            .ok_or_else(|| Error::UnknownPlugin {
                kind: "renderer",
                name: name.to_string(),
            })
    }

    /// Registered parser names, sorted.
    pub fn parser_names(&self) -> Vec<String> {
        self.parsers.keys().cloned().collect()
    }

    /// Registered renderer names, sorted.
    pub fn renderer_names(&self) -> Vec<String> {
        self.renderers.keys().cloned().collect()
    }
}
