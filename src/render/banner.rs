//! FIGlet banner rendering for heading levels 1–3.

use figlet_rs::FIGfont;
use std::collections::HashMap;

/// Loads and caches FIGlet fonts by name.
///
/// `standard` resolves to the embedded font; any other name is treated
/// as a path to a `.flf` font file. A font that cannot be loaded is
/// cached as absent so the caller falls back to underline headings
/// without retrying the filesystem.
#[derive(Default)]
pub struct BannerFonts {
    cache: HashMap<String, Option<FIGfont>>,
}

impl BannerFonts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders text in the named font, right-trimmed, without trailing
    /// blank rows. Returns `None` when the font is unavailable or the
    /// text renders to nothing.
    pub fn render(&mut self, font_name: &str, text: &str) -> Option<Vec<String>> {
        if text.split_whitespace().next().is_none() {
            return None;
        }
        let font = self
            .cache
            .entry(font_name.to_string())
            .or_insert_with(|| load_font(font_name))
            .as_ref()?;

        let figure = font.convert(text)?;
        let rendered = figure.to_string();
        let mut lines: Vec<String> = rendered
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return None;
        }
        Some(lines)
    }
}

fn load_font(name: &str) -> Option<FIGfont> {
    if name.eq_ignore_ascii_case("standard") {
        return FIGfont::standard().ok();
    }
    let path = if name.ends_with(".flf") {
        name.to_string()
    } else {
        format!("{name}.flf")
    };
    FIGfont::from_file(&path).ok()
}

/// Widest line of a rendered banner, in columns.
pub fn banner_width(lines: &[String]) -> usize {
    lines
        .iter()
        .map(|line| line.trim_end().chars().count())
        .max()
        .unwrap_or(0)
}

/// Hard-splits overflowing banner rows at the available width, keeping
/// the banner rather than discarding it.
pub fn split_overflow(lines: Vec<String>, available: usize) -> Vec<String> {
    if available == 0 {
        return lines;
    }
    let mut result = Vec::with_capacity(lines.len());
    for line in lines {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() <= available {
            result.push(line);
            continue;
        }
        for chunk in chars.chunks(available) {
            result.push(chunk.iter().collect::<String>().trim_end().to_string());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_font_renders() {
        let mut fonts = BannerFonts::new();
        let banner = fonts.render("standard", "Hi").unwrap();
        assert!(!banner.is_empty());
        assert!(banner_width(&banner) > 2);
    }

    #[test]
    fn test_unknown_font_is_absent() {
        let mut fonts = BannerFonts::new();
        assert!(fonts.render("no-such-font", "Hi").is_none());
        // Second lookup hits the negative cache.
        assert!(fonts.render("no-such-font", "Hi").is_none());
    }

    #[test]
    fn test_blank_text_renders_nothing() {
        let mut fonts = BannerFonts::new();
        assert!(fonts.render("standard", "   ").is_none());
    }

    #[test]
    fn test_split_overflow_chunks_rows() {
        let lines = vec!["abcdefgh".to_string()];
        let split = split_overflow(lines, 3);
        assert_eq!(split, vec!["abc", "def", "gh"]);
    }
}
