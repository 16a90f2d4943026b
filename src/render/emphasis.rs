//! Plain-text emphasis transforms.
//!
//! Fixed-width output has no font attributes, so emphasis becomes
//! letter spacing and delimiter interleaving: `**bold**` turns into
//! `B O L D`, `__strong__` into `_S_T_R_O_N_G_`, `~~strike~~` into
//! `~s~t~r~i~k~e~`.

/// Character casing applied while stylizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Upper,
    Preserve,
}

impl Transform {
    fn apply(self, ch: char) -> char {
        match self {
            Transform::Upper => ch.to_uppercase().next().unwrap_or(ch),
            Transform::Preserve => ch,
        }
    }
}

/// Spaces out letters: one space between letters of a word, three
/// between words. Punctuation attaches to its neighbor without extra
/// spacing.
pub fn stylize_letters(content: &str, transform: Transform) -> String {
    if content.is_empty() {
        return String::new();
    }
    let mut result: Vec<String> = Vec::new();
    let mut previous_alnum = false;
    let mut pending_gap = false;

    let last_is_alnum = |parts: &[String]| {
        parts
            .last()
            .map(|part| part.chars().all(char::is_alphanumeric) && !part.is_empty())
            .unwrap_or(false)
    };

    for ch in content.chars() {
        let processed = transform.apply(ch);
        if processed.is_whitespace() {
            if last_is_alnum(&result) {
                pending_gap = true;
            }
            previous_alnum = false;
            continue;
        }
        if processed.is_alphanumeric() {
            if previous_alnum {
                result.push(" ".to_string());
            } else if pending_gap {
                result.push("   ".to_string());
                pending_gap = false;
            } else if !result.is_empty() {
                result.push("   ".to_string());
            }
            result.push(processed.to_string());
            previous_alnum = true;
        } else {
            if result.last().map(String::as_str) == Some(" ") {
                result.pop();
            }
            if pending_gap {
                pending_gap = false;
            }
            result.push(processed.to_string());
            previous_alnum = false;
        }
    }
    result.concat().trim().to_string()
}

/// Interleaves a delimiter between characters: one per letter inside a
/// word, `word_repeat` across word gaps, one at each end.
pub fn stylize_delimited(
    content: &str,
    delimiter: char,
    transform: Transform,
    word_repeat: usize,
) -> String {
    let mut output = String::new();
    let mut open = false;
    let mut pending_gap = false;

    for ch in content.chars() {
        if ch.is_whitespace() {
            if open {
                pending_gap = true;
            }
            continue;
        }
        let processed = transform.apply(ch);
        if !open {
            output.push(delimiter);
            open = true;
        } else {
            let repeat = if pending_gap { word_repeat } else { 1 };
            for _ in 0..repeat {
                output.push(delimiter);
            }
        }
        output.push(processed);
        pending_gap = false;
    }

    if !open {
        return delimiter.to_string().repeat(2);
    }
    output.push(delimiter);
    output
}

/// Buffers a stylized fragment with two spaces on any side that abuts
/// an alphanumeric character, so spaced-out letters stay readable.
pub fn pad_for_neighbors(stylized: String, prev: Option<char>, next: Option<char>) -> String {
    if stylized.is_empty() {
        return stylized;
    }
    let prefix = prev.is_some_and(char::is_alphanumeric);
    let suffix = next.is_some_and(char::is_alphanumeric);
    match (prefix, suffix) {
        (false, false) => stylized,
        (true, false) => format!("  {stylized}"),
        (false, true) => format!("{stylized}  "),
        (true, true) => format!("  {stylized}  "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_letters_spaced_and_uppercased() {
        assert_eq!(stylize_letters("bold", Transform::Upper), "B O L D");
    }

    #[test]
    fn test_word_gap_is_three_spaces() {
        assert_eq!(stylize_letters("go now", Transform::Upper), "G O   N O W");
    }

    #[test]
    fn test_punctuation_attaches_to_neighbor() {
        assert_eq!(stylize_letters("hi!", Transform::Preserve), "h i!");
    }

    #[test]
    fn test_strike_interleave() {
        assert_eq!(
            stylize_delimited("go", '~', Transform::Preserve, 2),
            "~g~o~"
        );
    }

    #[test]
    fn test_strong_interleave_uppercases() {
        assert_eq!(
            stylize_delimited("ab cd", '_', Transform::Upper, 3),
            "_A_B___C_D_"
        );
    }

    #[test]
    fn test_empty_content_renders_bare_delimiters() {
        assert_eq!(stylize_delimited("  ", '_', Transform::Preserve, 2), "__");
    }

    #[test]
    fn test_neighbor_padding() {
        assert_eq!(
            pad_for_neighbors("B O L D".into(), Some('x'), Some('y')),
            "  B O L D  "
        );
        assert_eq!(
            pad_for_neighbors("B O L D".into(), Some(' '), None),
            "B O L D"
        );
    }
}
