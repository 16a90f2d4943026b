//! Style attribute parsing.
//!
//! Attribute blocks (`{: .center margin=40px}`), HTML paragraph
//! attributes (`align="center"`, `style="margin: 0 auto;"`), and CSS
//! declarations all reduce to a [`StyleSpec`].

use crate::model::{Alignment, StyleSpec};
use regex::Regex;
use std::sync::LazyLock;

static HTML_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w:-]+)\s*=\s*("[^"]*"|'[^']*'|\S+)"#).unwrap());
static ATTR_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?)\s*\{\s*:(.+?)\}\s*$").unwrap());
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(-?\d+(?:\.\d+)?)").unwrap());

/// Parses the token form used by attribute lines: classes (`.center`),
/// key=value pairs, and bare alignment keywords.
pub fn spec_from_tokens(tokens: &str) -> Option<StyleSpec> {
    let mut spec = StyleSpec::default();
    for token in tokens.split_whitespace() {
        if let Some(class) = token.strip_prefix('.') {
            if let Some(align) = class_to_align(class) {
                spec.align = Some(align);
            }
            continue;
        }
        if let Some((key, value)) = token.split_once('=') {
            let key = key.trim().trim_start_matches('.').to_ascii_lowercase();
            let value = value.trim().trim_matches(['"', '\'']);
            match key.as_str() {
                "align" | "text-align" => {
                    if let Some(align) = Alignment::from_keyword(value) {
                        spec.align = Some(align);
                    }
                }
                "margin" => apply_margin_shorthand(&mut spec, value),
                "margin-left" => apply_margin_side(&mut spec.margin_left, &mut spec.align, value),
                "margin-right" => apply_margin_side(&mut spec.margin_right, &mut spec.align, value),
                _ => {}
            }
            continue;
        }
        if let Some(align) = Alignment::from_keyword(token) {
            spec.align = Some(align);
        }
    }
    (!spec.is_empty()).then_some(spec)
}

/// Parses the attribute text of an HTML `<p>` tag.
pub fn spec_from_html_attributes(attributes: &str) -> Option<StyleSpec> {
    if attributes.is_empty() {
        return None;
    }
    let mut spec: Option<StyleSpec> = None;
    let mut style_value = None;
    for captures in HTML_ATTR.captures_iter(attributes) {
        let name = captures[1].to_ascii_lowercase();
        let value = captures[2].trim_matches(['"', '\'']).to_string();
        match name.as_str() {
            "align" => {
                if let Some(align) = Alignment::from_keyword(&value) {
                    spec = StyleSpec::merged(
                        spec,
                        Some(StyleSpec {
                            align: Some(align),
                            ..Default::default()
                        }),
                    );
                }
            }
            "style" => style_value = Some(value),
            _ => {}
        }
    }
    if let Some(css) = style_value {
        spec = StyleSpec::merged(spec, spec_from_css(&css));
    }
    spec
}

/// Parses inline CSS declarations (`text-align`, `margin`,
/// `margin-left`, `margin-right`).
pub fn spec_from_css(css: &str) -> Option<StyleSpec> {
    let mut spec = StyleSpec::default();
    for declaration in css.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match name.as_str() {
            "text-align" => {
                if let Some(align) = Alignment::from_keyword(value) {
                    spec.align = Some(align);
                }
            }
            "margin" => apply_margin_shorthand(&mut spec, value),
            "margin-left" => apply_margin_side(&mut spec.margin_left, &mut spec.align, value),
            "margin-right" => apply_margin_side(&mut spec.margin_right, &mut spec.align, value),
            _ => {}
        }
    }
    (!spec.is_empty()).then_some(spec)
}

/// Splits trailing `{: ...}` attributes off a heading or paragraph
/// source line.
pub fn extract_trailing_attr(text: &str) -> (String, Option<StyleSpec>) {
    match ATTR_TAIL.captures(text) {
        Some(captures) => {
            let clean = captures[1].trim_end().to_string();
            (clean, spec_from_tokens(&captures[2]))
        }
        None => (text.to_string(), None),
    }
}

/// CSS margin shorthand: 1–4 values, `auto` on both sides implies
/// centering.
fn apply_margin_shorthand(spec: &mut StyleSpec, value: &str) {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.is_empty() {
        return;
    }
    let parsed: Vec<(Option<usize>, bool)> = parts
        .iter()
        .map(|part| {
            if part.eq_ignore_ascii_case("auto") {
                (None, true)
            } else {
                (space_value(part), false)
            }
        })
        .collect();

    let (left, right) = match parsed.len() {
        1 => (parsed[0], parsed[0]),
        2 | 3 => (parsed[1], parsed[1]),
        _ => (parsed[3], parsed[1]),
    };
    if let (Some(columns), _) = left {
        spec.margin_left = Some(columns);
    }
    if let (Some(columns), _) = right {
        spec.margin_right = Some(columns);
    }
    if left.1 && right.1 {
        spec.align = Some(Alignment::Center);
    }
}

fn apply_margin_side(slot: &mut Option<usize>, align: &mut Option<Alignment>, value: &str) {
    if let Some(columns) = space_value(value) {
        *slot = Some(columns);
    } else if value.eq_ignore_ascii_case("auto") && align.is_none() {
        *align = Some(Alignment::Center);
    }
}

/// Parses a CSS length; `px` values round to the nearest whole column,
/// negatives clamp to zero.
fn space_value(value: &str) -> Option<usize> {
    let captures = NUMBER.captures(value.trim())?;
    let number: f64 = captures[1].parse().ok()?;
    Some(number.round().max(0.0) as usize)
}

fn class_to_align(class: &str) -> Option<Alignment> {
    match class.trim().to_ascii_lowercase().as_str() {
        "center" | "text-center" | "align-center" => Some(Alignment::Center),
        "left" | "text-left" | "align-left" => Some(Alignment::Left),
        "right" | "text-right" | "align-right" => Some(Alignment::Right),
        _ => None,
    }
}
