//! Preprocessing: include expansion and art resolution.
//!
//! Both run before the parser ever sees a line, so nested includes,
//! art, and styling behave uniformly regardless of origin file.

mod art;

use crate::error::{Error, Result};
use crate::frontmatter::parse_front_matter;
use crate::model::ArtGroup;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use art::{scan_art_line, ArtScan};

static INCLUDE_WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*!\[\[(.+?)\]\]\s*$").unwrap());
static INCLUDE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{\s*\.include\s+(.+?)\s*\}\s*$").unwrap());

/// One unit of preprocessed input: ordinary text, or an art group that
/// replaced its directive line.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLine {
    Text(String),
    Art(ArtGroup),
}

/// Reads a file into lines, stripping line terminators.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}

/// Expands includes and resolves art directives against `base_dir`.
pub fn preprocess(lines: &[String], base_dir: &Path) -> Result<Vec<SourceLine>> {
    let mut stack = Vec::new();
    expand(lines, base_dir, &mut stack)
}

fn expand(
    lines: &[String],
    base_dir: &Path,
    stack: &mut Vec<PathBuf>,
) -> Result<Vec<SourceLine>> {
    let mut expanded = Vec::with_capacity(lines.len());
    for line in lines {
        match scan_art_line(line, base_dir)? {
            Some(ArtScan::Block { group, attr }) => {
                expanded.push(SourceLine::Art(group));
                // The attribute block trails the directive on its own
                // line so it styles the art it follows.
                if let Some(attr) = attr {
                    expanded.push(SourceLine::Text(attr));
                }
                continue;
            }
            Some(ArtScan::Group(group)) => {
                expanded.push(SourceLine::Art(group));
                continue;
            }
            None => {}
        }

        let Some(target) = include_target(line) else {
            expanded.push(SourceLine::Text(line.clone()));
            continue;
        };
        let target_path = base_dir.join(target);
        if !target_path.exists() {
            return Err(Error::MissingInclude(target_path));
        }
        let resolved = target_path.canonicalize()?;
        if stack.contains(&resolved) {
            return Err(Error::IncludeCycle(resolved));
        }

        stack.push(resolved.clone());
        let included = read_lines(&resolved)?;
        // The included file's own front matter is parsed and discarded;
        // only its body is inlined.
        let (_, body) = parse_front_matter(&included);
        let parent = resolved.parent().unwrap_or(base_dir).to_path_buf();
        let content = expand(&body, &parent, stack)?;
        expanded.extend(content);
        stack.pop();
    }
    Ok(expanded)
}

fn include_target(line: &str) -> Option<String> {
    let stripped = line.trim_end_matches(['\n', '\r']);
    INCLUDE_WIKILINK
        .captures(stripped)
        .or_else(|| INCLUDE_DIRECTIVE.captures(stripped))
        .map(|captures| normalize_target(&captures[1]))
}

/// Trims a directive target and unwraps one layer of quoting.
fn normalize_target(value: &str) -> String {
    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
            return trimmed[1..trimmed.len() - 1].trim().to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn text_lines(source: &[SourceLine]) -> Vec<String> {
        source
            .iter()
            .map(|line| match line {
                SourceLine::Text(text) => text.clone(),
                SourceLine::Art(_) => "<art>".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_include_targets() {
        assert_eq!(include_target("![[notes/a.md]]"), Some("notes/a.md".into()));
        assert_eq!(include_target("{.include b.md}"), Some("b.md".into()));
        assert_eq!(
            include_target("{ .include 'c d.md' }"),
            Some("c d.md".into())
        );
        assert_eq!(include_target("plain text"), None);
    }

    #[test]
    fn test_expansion_inlines_body_without_front_matter() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "part.md", "---\nmargin_left: 9\n---\nincluded text\n");
        let input = vec!["before".to_string(), "![[part.md]]".to_string()];
        let result = preprocess(&input, dir.path()).unwrap();
        assert_eq!(text_lines(&result), vec!["before", "included text"]);
    }

    #[test]
    fn test_nested_includes_resolve_against_their_own_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(&dir, "sub/inner.md", "innermost\n");
        write_file(&dir, "sub/outer.md", "![[inner.md]]\n");
        let input = vec!["![[sub/outer.md]]".to_string()];
        let result = preprocess(&input, dir.path()).unwrap();
        assert_eq!(text_lines(&result), vec!["innermost"]);
    }

    #[test]
    fn test_cycle_detection() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "a.md", "![[b.md]]\n");
        write_file(&dir, "b.md", "![[a.md]]\n");
        let input = vec!["![[a.md]]".to_string()];
        let result = preprocess(&input, dir.path());
        assert!(matches!(result, Err(Error::IncludeCycle(_))));
    }

    #[test]
    fn test_missing_include_is_fatal() {
        let dir = TempDir::new().unwrap();
        let input = vec!["{.include absent.md}".to_string()];
        let result = preprocess(&input, dir.path());
        match result {
            Err(Error::MissingInclude(path)) => {
                assert!(path.ends_with("absent.md"));
            }
            other => panic!("expected MissingInclude, got {other:?}"),
        }
    }

    #[test]
    fn test_expansion_is_idempotent_without_directives() {
        let dir = TempDir::new().unwrap();
        let input = vec![
            "no directives here".to_string(),
            "".to_string(),
            "just text".to_string(),
        ];
        let once = preprocess(&input, dir.path()).unwrap();
        assert_eq!(text_lines(&once), input);
        let again = preprocess(&text_lines(&once), dir.path()).unwrap();
        assert_eq!(again, once);
    }

    #[test]
    fn test_same_file_twice_sequentially_is_not_a_cycle() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "part.md", "piece\n");
        let input = vec!["![[part.md]]".to_string(), "![[part.md]]".to_string()];
        let result = preprocess(&input, dir.path()).unwrap();
        assert_eq!(text_lines(&result), vec!["piece", "piece"]);
    }
}
