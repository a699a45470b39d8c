//! Remainder splitting
//!
//!     The text after a connector (or the whole root line) carries up to three parts:
//!
//!         <name>[ -> <symlink target>][  [attributes]][  # comment]
//!
//!     The inline metadata boundary is searched first: the first run of two or more spaces
//!     followed by `#` or `[`. Only the text before that boundary is searched for the symlink
//!     token ` -> `, so metadata such as `# maps a -> b` is never read as a link.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static METADATA_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}[#\[]").unwrap());

/// Symlink token, surrounded by single spaces
pub const SYMLINK_ARROW: &str = " -> ";

/// The decomposed remainder of a node or root line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remainder {
    pub name: String,
    /// Column (in characters) where the name starts in the physical line
    pub name_start: usize,
    /// Column one past the last character of the name
    pub name_end: usize,
    pub symlink_target: Option<String>,
    pub metadata: Option<InlineMetadata>,
    /// The remainder as written, trailing whitespace removed
    pub raw: String,
}

/// Inline attributes and/or comment trailing a name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineMetadata {
    /// Metadata text from the opening `[` or `#`, trailing whitespace removed
    pub raw: String,
    pub attributes: Option<Vec<(String, String)>>,
    pub comment: Option<String>,
}

/// Split `text` into name, symlink target and inline metadata.
///
/// `offset` is the character column at which `text` starts in its line; it is added to the
/// name columns so they point into the original source.
pub fn split_remainder(text: &str, offset: usize) -> Remainder {
    let raw = text.trim_end();
    let (name_region, metadata) = match METADATA_BOUNDARY.find(raw) {
        // The match ends right after the single-byte `#` or `[`
        Some(found) => (
            &raw[..found.start()],
            Some(parse_metadata(&raw[found.end() - 1..])),
        ),
        None => (raw, None),
    };

    let (name, symlink_target) = match name_region.find(SYMLINK_ARROW) {
        Some(index) => (
            name_region[..index].trim_end(),
            Some(name_region[index + SYMLINK_ARROW.len()..].trim().to_string()),
        ),
        None => (name_region.trim_end(), None),
    };

    Remainder {
        name: name.to_string(),
        name_start: offset,
        name_end: offset + name.chars().count(),
        symlink_target,
        metadata,
        raw: raw.to_string(),
    }
}

/// Parse an inline metadata span starting with `[` or `#`.
pub fn parse_metadata(raw: &str) -> InlineMetadata {
    let raw = raw.trim_end();
    let mut metadata = InlineMetadata {
        raw: raw.to_string(),
        ..InlineMetadata::default()
    };

    if let Some(rest) = raw.strip_prefix('[') {
        let (inner, after) = match rest.find(']') {
            Some(close) => (&rest[..close], &rest[close + 1..]),
            None => (rest, ""),
        };
        metadata.attributes = Some(parse_attributes(inner));
        metadata.comment = after
            .trim_start()
            .strip_prefix('#')
            .map(|comment| comment.trim().to_string());
    } else if let Some(rest) = raw.strip_prefix('#') {
        metadata.comment = Some(rest.trim().to_string());
    }

    metadata
}

/// Comma separated `key=value` pairs; a bare key maps to an empty value.
fn parse_attributes(inner: &str) -> Vec<(String, String)> {
    inner
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (part.to_string(), String::new()),
        })
        .collect()
}
