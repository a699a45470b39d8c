//! Token definitions for the tree-drawing prefix of a node line
//!
//! Only the prefix (indent segments and the branch connector) is tokenized; everything after the
//! connector is free text and is handed to [remainder](super::remainder) splitting instead.
use logos::Logos;
use serde::{Deserialize, Serialize};

/// Glyphs that may open a node line's prefix
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixToken {
    // Vertical continuation: glyph + 3 spaces. `tree` sometimes emits no-break spaces here.
    #[regex("[│|][ \u{a0}]{3}", priority = 3)]
    Vertical,

    // Indent segment under a last child
    #[token("    ", priority = 3)]
    Blank,

    // Irregular indentation, truncated when computing depth
    #[regex(" {1,3}", priority = 1)]
    Space,

    // A vertical glyph that is not followed by a full segment. A bare `|` only counts when
    // spacing follows, so names such as `|tmp|` stay names.
    #[regex("│ {0,2}|\\| {1,2}", priority = 1)]
    StrayGlyph,

    #[token("├──")]
    UnicodeTee,

    #[token("└──")]
    UnicodeElbow,

    #[token("|--")]
    AsciiTee,

    #[token("`--")]
    AsciiElbow,
}

impl PrefixToken {
    /// The connector this token stands for, if it is one
    pub fn connector(self) -> Option<Connector> {
        match self {
            PrefixToken::UnicodeTee | PrefixToken::AsciiTee => Some(Connector::Tee),
            PrefixToken::UnicodeElbow | PrefixToken::AsciiElbow => Some(Connector::Elbow),
            _ => None,
        }
    }

    /// Whether the token carries a drawn glyph (as opposed to plain spaces)
    pub fn is_glyph(self) -> bool {
        !matches!(self, PrefixToken::Blank | PrefixToken::Space)
    }
}

/// Branch connector of a node line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    /// `├──` / `|--`: more siblings follow
    Tee,
    /// `└──` / `` `-- ``: last sibling
    Elbow,
}

/// Whether a line opens like a tree prefix even when it is malformed.
///
/// The box-drawing glyphs always do. The ASCII `|` and `` ` `` only do when a segment or
/// connector shape follows them.
pub(crate) fn starts_with_tree_glyph(line: &str) -> bool {
    let mut chars = line.trim_start().chars();
    match chars.next() {
        Some('│' | '├' | '└' | '─') => true,
        Some('|' | '`') => matches!(chars.next(), None | Some(' ' | '-' | '\u{a0}')),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Result<PrefixToken, ()>> {
        PrefixToken::lexer(source).collect()
    }

    #[test]
    fn test_unicode_segments() {
        assert_eq!(
            tokens("│   ├──"),
            vec![Ok(PrefixToken::Vertical), Ok(PrefixToken::UnicodeTee)]
        );
        assert_eq!(
            tokens("    └──"),
            vec![Ok(PrefixToken::Blank), Ok(PrefixToken::UnicodeElbow)]
        );
    }

    #[test]
    fn test_ascii_segments() {
        assert_eq!(
            tokens("|   |--"),
            vec![Ok(PrefixToken::Vertical), Ok(PrefixToken::AsciiTee)]
        );
        assert_eq!(
            tokens("    `--"),
            vec![Ok(PrefixToken::Blank), Ok(PrefixToken::AsciiElbow)]
        );
    }

    #[test]
    fn test_no_break_space_segment() {
        assert_eq!(
            tokens("│\u{a0}\u{a0} └──"),
            vec![Ok(PrefixToken::Vertical), Ok(PrefixToken::UnicodeElbow)]
        );
    }

    #[test]
    fn test_irregular_indent() {
        assert_eq!(
            tokens("      ├──"),
            vec![
                Ok(PrefixToken::Blank),
                Ok(PrefixToken::Space),
                Ok(PrefixToken::UnicodeTee)
            ]
        );
        assert_eq!(
            tokens("│  ├──"),
            vec![Ok(PrefixToken::StrayGlyph), Ok(PrefixToken::UnicodeTee)]
        );
    }

    #[test]
    fn test_ascii_glyph_needs_spacing() {
        assert_eq!(tokens("|  "), vec![Ok(PrefixToken::StrayGlyph)]);
        assert_eq!(tokens("|tmp").first(), Some(&Err(())));
    }

    #[test]
    fn test_tree_glyph_detection() {
        assert!(starts_with_tree_glyph("│ dangling"));
        assert!(starts_with_tree_glyph("  |- x"));
        assert!(starts_with_tree_glyph("` "));
        assert!(starts_with_tree_glyph("|"));
        assert!(!starts_with_tree_glyph("|tmp|"));
        assert!(!starts_with_tree_glyph("`proj`"));
    }

    #[test]
    fn test_connector_mapping() {
        assert_eq!(PrefixToken::AsciiElbow.connector(), Some(Connector::Elbow));
        assert_eq!(PrefixToken::UnicodeTee.connector(), Some(Connector::Tee));
        assert_eq!(PrefixToken::Vertical.connector(), None);
        assert!(!PrefixToken::Blank.is_glyph());
    }
}
