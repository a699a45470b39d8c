//! Line classification
//!
//!     ptree is line based: every physical line falls into exactly one category, decided from
//!     the line alone. The classifier is a pure function; whether a text line becomes the root
//!     or an error depends on what came before it, and that decision belongs to the
//!     [builder](crate::ptree::building).
//!
//! Line Kinds
//!
//!     Checked in this order:
//!
//!         - Blank: empty or whitespace only
//!         - Comment: first non-whitespace character is `#`
//!         - Directive: `@key`, `@key: value` or `@key=value`
//!         - Node: indent segments + connector + space(s) + remainder
//!         - Summary: `N directories, M files`
//!         - Unrecognized: looks like a tree line or a directive but is malformed
//!         - RootCandidate: anything else
//!
//!     Node depth is the number of complete 4-character indent segments in the prefix. An
//!     irregular prefix is truncated at the last complete segment; if that makes the depth jump,
//!     the builder reports it.
pub mod remainder;
pub mod tokens;

use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use remainder::{parse_metadata, split_remainder, InlineMetadata, Remainder, SYMLINK_ARROW};
pub use tokens::{Connector, PrefixToken};

/// Width of one indent segment and of a connector plus its space
pub const SEGMENT_WIDTH: usize = 4;

static DIRECTIVE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*@([A-Za-z][A-Za-z0-9_-]*)\s*(?:[:=]\s*(.*))?$").unwrap());

static SUMMARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s+director(?:y|ies),\s*(\d+)\s+files?\s*$").unwrap()
});

/// The classification of one physical line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LineKind {
    Blank,
    Comment { text: String },
    Directive(DirectiveLine),
    Node(NodeLine),
    Summary(SummaryLine),
    RootCandidate(Remainder),
    Unrecognized { reason: String, start_col: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveLine {
    pub key: String,
    pub value: String,
    /// Column of the first key character (just after `@`)
    pub key_col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLine {
    pub depth: usize,
    pub connector: Connector,
    pub remainder: Remainder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub directories: usize,
    pub files: usize,
}

/// Classify a single line (without its line terminator).
pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some(text) = trimmed.strip_prefix('#') {
        return LineKind::Comment {
            text: text.trim().to_string(),
        };
    }
    if trimmed.starts_with('@') {
        return classify_directive(line);
    }
    match classify_node(line) {
        Some(Ok(node)) => return LineKind::Node(node),
        Some(Err(reason)) => {
            return LineKind::Unrecognized {
                reason,
                start_col: leading_columns(line),
            }
        }
        None => {}
    }
    if let Some(summary) = classify_summary(line) {
        return LineKind::Summary(summary);
    }
    LineKind::RootCandidate(split_remainder(trimmed, leading_columns(line)))
}

fn classify_directive(line: &str) -> LineKind {
    match DIRECTIVE_REGEX.captures(line) {
        Some(captures) => {
            let key = &captures[1];
            let key_col = line[..captures.get(1).map_or(0, |m| m.start())]
                .chars()
                .count();
            LineKind::Directive(DirectiveLine {
                key: key.to_string(),
                value: captures
                    .get(2)
                    .map_or("", |m| m.as_str())
                    .trim_end()
                    .to_string(),
                key_col,
            })
        }
        None => LineKind::Unrecognized {
            reason: "malformed directive: expected `@key: value`".to_string(),
            start_col: leading_columns(line),
        },
    }
}

/// `None` when the line is not tree shaped, `Some(Err(..))` when it is but breaks the grammar.
fn classify_node(line: &str) -> Option<Result<NodeLine, String>> {
    let mut lexer = PrefixToken::lexer(line);
    let mut prefix_columns = 0;
    let mut saw_glyph = false;

    while let Some(token) = lexer.next() {
        let Ok(token) = token else {
            break;
        };
        let Some(connector) = token.connector() else {
            saw_glyph |= token.is_glyph();
            prefix_columns += lexer.slice().chars().count();
            continue;
        };

        let rest = lexer.remainder();
        let name_text = rest.trim_start_matches(' ');
        let spaces = rest.len() - name_text.len();
        if spaces == 0 {
            return Some(Err("connector must be followed by a space".to_string()));
        }
        if name_text.trim().is_empty() {
            return Some(Err("connector without a name".to_string()));
        }
        let name_col = prefix_columns + 3 + spaces;
        return Some(Ok(NodeLine {
            depth: prefix_columns / SEGMENT_WIDTH,
            connector,
            remainder: split_remainder(name_text, name_col),
        }));
    }

    if saw_glyph || tokens::starts_with_tree_glyph(line) {
        Some(Err("malformed tree prefix".to_string()))
    } else {
        None
    }
}

fn classify_summary(line: &str) -> Option<SummaryLine> {
    let captures = SUMMARY_REGEX.captures(line)?;
    Some(SummaryLine {
        directories: captures[1].parse().ok()?,
        files: captures[2].parse().ok()?,
    })
}

fn leading_columns(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
