//! Output data model for highlighting and outline results

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Half-open byte interval `[start, end)` into a file's source text
///
/// Identity is the pair of offsets. Ranges are used as independent map keys;
/// overlapping ranges are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl OffsetRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Build a range covering a tree-sitter node
    pub fn of_node(node: &tree_sitter::Node) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Display-style category applied to a source range
///
/// The palette is fixed; the host's rendering layer maps each tag to
/// concrete colors and font attributes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleTag {
    Class,
    Interface,
    Field,
    FinalField,
    StaticField,
    StaticFinalField,
    LocalVariable,
    LocalFinalVariable,
    ParameterVariable,
    TypeParameter,
    FunctionDeclaration,
    Annotation,
}

impl StyleTag {
    /// Canonical display name of the tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::Class => "CLASS",
            Self::Interface => "INTERFACE",
            Self::Field => "FIELD",
            Self::FinalField => "FINAL_FIELD",
            Self::StaticField => "STATIC_FIELD",
            Self::StaticFinalField => "STATIC_FINAL_FIELD",
            Self::LocalVariable => "LOCAL_VARIABLE",
            Self::LocalFinalVariable => "LOCAL_FINAL_VARIABLE",
            Self::ParameterVariable => "PARAMETER_VARIABLE",
            Self::TypeParameter => "TYPE_PARAMETER",
            Self::FunctionDeclaration => "FUNCTION_DECLARATION",
            Self::Annotation => "ANNOTATION",
        }
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One highlighted range with its style tags, in serializable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightEntry {
    pub start: usize,
    pub end: usize,
    pub tags: Vec<StyleTag>,
}

/// Serializable summary of a highlighting pass over one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightSummary {
    pub file: String,
    pub language: String,
    pub highlights: Vec<HighlightEntry>,
}

/// One outline entry, in serializable form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub leaf: bool,
}

/// Flatten a highlight map into entries sorted by range
///
/// The in-memory map is unordered; CLI and test output want a stable order.
pub fn sorted_entries(map: &HashMap<OffsetRange, HashSet<StyleTag>>) -> Vec<HighlightEntry> {
    let mut entries: Vec<HighlightEntry> = map
        .iter()
        .map(|(range, tags)| {
            let mut tags: Vec<StyleTag> = tags.iter().copied().collect();
            tags.sort();
            HighlightEntry {
                start: range.start,
                end: range.end,
                tags,
            }
        })
        .collect();
    entries.sort_by_key(|e| (e.start, e.end));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_range_identity() {
        let a = OffsetRange::new(3, 8);
        let b = OffsetRange::new(3, 8);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert!(!a.is_empty());
        assert!(OffsetRange::new(4, 4).is_empty());
    }

    #[test]
    fn test_style_tag_names() {
        assert_eq!(StyleTag::StaticFinalField.name(), "STATIC_FINAL_FIELD");
        assert_eq!(StyleTag::Class.to_string(), "CLASS");
    }

    #[test]
    fn test_style_tag_serialization() {
        let json = serde_json::to_string(&StyleTag::LocalFinalVariable).unwrap();
        assert_eq!(json, "\"LOCAL_FINAL_VARIABLE\"");
    }

    #[test]
    fn test_sorted_entries_order() {
        let mut map: HashMap<OffsetRange, HashSet<StyleTag>> = HashMap::new();
        map.insert(
            OffsetRange::new(10, 13),
            HashSet::from([StyleTag::Field]),
        );
        map.insert(
            OffsetRange::new(2, 5),
            HashSet::from([StyleTag::Class]),
        );

        let entries = sorted_entries(&map);
        assert_eq!(entries[0].start, 2);
        assert_eq!(entries[0].tags, vec![StyleTag::Class]);
        assert_eq!(entries[1].start, 10);
    }
}
