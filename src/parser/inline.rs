//! Inline markup parsing.
//!
//! Splits block text into flat spans: inline code, links and images,
//! and single-tag emphasis regions. Markers that never terminate stay
//! in the surrounding text untouched, so malformed markup can never
//! fail a conversion.

use crate::model::{EmphasisKind, InlineSpan};
use regex::Regex;
use std::sync::LazyLock;

// Alternatives are tried in order at each position, so inline code wins
// over everything, images win over links (the `!` starts one column
// earlier), and double markers win over their single forms.
static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?P<code>`[^`]*`)
        |(?P<image>!\[(?P<image_label>[^\]]*)\]\((?P<image_target>[^)]+)\))
        |(?P<link>\[(?P<link_label>[^\]]+)\]\((?P<link_target>[^)]+)\))
        |(?P<bold>\*\*(?P<bold_text>.+?)\*\*)
        |(?P<strong>__(?P<strong_text>.+?)__)
        |(?P<strike>~~(?P<strike_text>.+?)~~)
        |(?P<italic>\*(?P<italic_text>[^*]+)\*)
        |(?P<underline>_(?P<underline_text>[^_]+)_)
        ",
    )
    .unwrap()
});

/// A link or image reference found while parsing spans, in source
/// order. The parser turns each into a `Link` event ahead of the
/// enclosing block's event.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRef {
    pub label: String,
    pub url: String,
    pub title: Option<String>,
    pub image: bool,
}

/// Parses block text into spans, collecting link references.
pub fn parse_inline(text: &str) -> (Vec<InlineSpan>, Vec<LinkRef>) {
    let mut spans = Vec::new();
    let mut links = Vec::new();
    let mut last = 0;

    for captures in INLINE.captures_iter(text) {
        let whole = captures.get(0).unwrap();
        if whole.start() > last {
            spans.push(InlineSpan::Text(text[last..whole.start()].to_string()));
        }
        last = whole.end();

        if let Some(code) = captures.name("code") {
            spans.push(InlineSpan::Code(code.as_str().to_string()));
        } else if captures.name("image").is_some() {
            let (url, title) = split_link_target(&captures["image_target"]);
            let label = captures["image_label"].trim().to_string();
            links.push(LinkRef {
                label: label.clone(),
                url: url.clone(),
                title,
                image: true,
            });
            spans.push(InlineSpan::Link {
                label,
                url,
                image: true,
            });
        } else if captures.name("link").is_some() {
            let (url, title) = split_link_target(&captures["link_target"]);
            let label = captures["link_label"].trim().to_string();
            links.push(LinkRef {
                label: label.clone(),
                url: url.clone(),
                title,
                image: false,
            });
            spans.push(InlineSpan::Link {
                label,
                url,
                image: false,
            });
        } else if captures.name("bold").is_some() {
            spans.push(emphasis(EmphasisKind::Bold, &captures["bold_text"]));
        } else if captures.name("strong").is_some() {
            spans.push(emphasis(EmphasisKind::Strong, &captures["strong_text"]));
        } else if captures.name("strike").is_some() {
            spans.push(emphasis(EmphasisKind::Strike, &captures["strike_text"]));
        } else if captures.name("italic").is_some() {
            spans.push(emphasis(EmphasisKind::Italic, &captures["italic_text"]));
        } else if captures.name("underline").is_some() {
            spans.push(emphasis(EmphasisKind::Underline, &captures["underline_text"]));
        }
    }

    if last < text.len() {
        spans.push(InlineSpan::Text(text[last..].to_string()));
    }
    (spans, links)
}

fn emphasis(kind: EmphasisKind, text: &str) -> InlineSpan {
    InlineSpan::Emphasis {
        kind,
        text: text.to_string(),
    }
}

/// Splits a link target into URL and optional quoted title.
pub fn split_link_target(value: &str) -> (String, Option<String>) {
    let value = value.trim();
    let Some((url, remainder)) = value.split_once(' ') else {
        return (value.to_string(), None);
    };
    let remainder = remainder.trim();
    let title = if remainder.len() >= 2 && remainder.starts_with('"') && remainder.ends_with('"') {
        remainder[1..remainder.len() - 1].to_string()
    } else {
        remainder.to_string()
    };
    (url.trim().to_string(), Some(title))
}
