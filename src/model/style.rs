//! Block styling: alignment and margins.

use serde::Serialize;

/// Horizontal alignment of a block within the content width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Parses an alignment keyword. Accepts the British spelling of
    /// "centre" as well.
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" | "centre" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// The active style applied to emitted blocks.
///
/// Margins are measured in columns and applied outside the alignment
/// padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockStyle {
    pub align: Alignment,
    pub margin_left: usize,
    pub margin_right: usize,
}

impl BlockStyle {
    /// Creates a left-aligned style with the given margins.
    pub fn with_margins(margin_left: usize, margin_right: usize) -> Self {
        Self {
            align: Alignment::Left,
            margin_left,
            margin_right,
        }
    }

    /// Returns a copy of this style with the spec's overrides applied.
    pub fn combined(&self, spec: Option<&StyleSpec>) -> BlockStyle {
        match spec {
            None => *self,
            Some(spec) => BlockStyle {
                align: spec.align.unwrap_or(self.align),
                margin_left: spec.margin_left.unwrap_or(self.margin_left),
                margin_right: spec.margin_right.unwrap_or(self.margin_right),
            },
        }
    }
}

/// A partial style override carried by style update events.
///
/// Unset fields leave the base style untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StyleSpec {
    pub align: Option<Alignment>,
    pub margin_left: Option<usize>,
    pub margin_right: Option<usize>,
}

impl StyleSpec {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.align.is_none() && self.margin_left.is_none() && self.margin_right.is_none()
    }

    /// Merges two optional specs; fields of `second` win.
    pub fn merged(first: Option<StyleSpec>, second: Option<StyleSpec>) -> Option<StyleSpec> {
        match (first, second) {
            (None, None) => None,
            (Some(spec), None) | (None, Some(spec)) => Some(spec),
            (Some(first), Some(second)) => Some(StyleSpec {
                align: second.align.or(first.align),
                margin_left: second.margin_left.or(first.margin_left),
                margin_right: second.margin_right.or(first.margin_right),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_keywords() {
        assert_eq!(Alignment::from_keyword("center"), Some(Alignment::Center));
        assert_eq!(Alignment::from_keyword("Centre"), Some(Alignment::Center));
        assert_eq!(Alignment::from_keyword(" right "), Some(Alignment::Right));
        assert_eq!(Alignment::from_keyword("justify"), None);
    }

    #[test]
    fn test_combined_prefers_spec_fields() {
        let base = BlockStyle::with_margins(2, 2);
        let spec = StyleSpec {
            align: Some(Alignment::Center),
            margin_left: Some(10),
            margin_right: None,
        };
        let combined = base.combined(Some(&spec));
        assert_eq!(combined.align, Alignment::Center);
        assert_eq!(combined.margin_left, 10);
        assert_eq!(combined.margin_right, 2);
    }

    #[test]
    fn test_merged_second_wins() {
        let first = StyleSpec {
            align: Some(Alignment::Left),
            margin_left: Some(1),
            margin_right: None,
        };
        let second = StyleSpec {
            align: Some(Alignment::Right),
            margin_left: None,
            margin_right: Some(3),
        };
        let merged = StyleSpec::merged(Some(first), Some(second)).unwrap();
        assert_eq!(merged.align, Some(Alignment::Right));
        assert_eq!(merged.margin_left, Some(1));
        assert_eq!(merged.margin_right, Some(3));
    }
}
