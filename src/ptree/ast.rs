//! Document model
//!
//!     A [`Document`] is the parse result for one input text. It is built once by the
//!     [builder](crate::ptree::building) and never mutated afterwards: the fixer and the
//!     formatter always start from a fresh parse.
//!
//! Hierarchy
//!
//!     Nodes are kept as a flat sequence in depth-first pre-order. Order plus depth is the only
//!     encoding of the hierarchy; the [tree](tree::Tree) arena derives parent and child links
//!     on demand. The root is the implicit parent of every depth-0 node.
//!
//! Positions
//!
//!     Lines are 0-indexed. Columns count characters (not bytes) from the start of the physical
//!     line, so every position points into the original source.
pub mod error;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ptree::lexing::{Connector, InlineMetadata};
use crate::ptree::naming::{self, Classification, Entity, META_MARKER};

pub use error::{ParseError, ParseErrorKind};
pub use tree::{compare_siblings, SortKey, Tree};

/// Directive key of the delimiter block
pub const DELIMITERS_KEY: &str = "separation_delimiters";
/// Historical spelling, accepted as an alias of [`DELIMITERS_KEY`]
pub const LEGACY_DELIMITERS_KEY: &str = "seperation_delimiters";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Key to value; the first occurrence of a key wins
    pub directives: BTreeMap<String, String>,
    /// Every directive record in source order
    pub directive_lines: Vec<Directive>,
    pub root: Option<Root>,
    pub nodes: Vec<Node>,
    pub errors: Vec<ParseError>,
    pub summary: Option<Summary>,
    /// Comment lines before the root
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub line: usize,
    /// Last physical line of a folded block (equal to `line` otherwise)
    pub end_line: usize,
    pub key: String,
    pub key_col: usize,
    pub value: String,
    /// Source text of all physical lines, joined with `\n`
    pub raw_text: String,
}

impl Directive {
    pub fn is_block(&self) -> bool {
        self.end_line > self.line || self.value.trim_start().starts_with('[')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootKind {
    #[serde(rename = "rootLabel")]
    Label,
    #[serde(rename = "rootPath")]
    Path,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub line: usize,
    pub raw_text: String,
    pub value: String,
    pub kind: RootKind,
    pub start_col: usize,
    pub end_col: usize,
    pub symlink_target: Option<String>,
    pub inline_metadata: Option<InlineMetadata>,
    pub classification: Classification,
}

impl Root {
    pub fn is_label(&self) -> bool {
        self.kind == RootKind::Label
    }

    /// Version carried by the root value, e.g. `1.0.0` in `PTREE-1.0.0//`
    pub fn version(&self) -> Option<&str> {
        self.classification
            .version
            .as_ref()
            .map(|suffix| suffix.version.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub line: usize,
    pub raw_text: String,
    pub depth: usize,
    pub connector: Connector,
    pub name: String,
    pub raw_remainder: String,
    pub symlink_target: Option<String>,
    pub start_col: usize,
    pub end_col: usize,
    pub has_children: bool,
    pub inline_metadata: Option<InlineMetadata>,
    pub classification: Classification,
}

impl Node {
    pub fn entity(&self) -> Entity {
        self.classification.entity
    }

    /// Written with a container marker or holding children
    pub fn is_directory(&self) -> bool {
        self.has_children || self.classification.is_container()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub line: usize,
    pub directories: usize,
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub line: usize,
    pub text: String,
}

impl Document {
    /// Value of a directive; the delimiter block is looked up under both spellings.
    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directive_record(key).map(|record| record.value.as_str())
    }

    /// First record for `key`, with the alias rule for the delimiter block
    pub fn directive_record(&self, key: &str) -> Option<&Directive> {
        if key == DELIMITERS_KEY || key == LEGACY_DELIMITERS_KEY {
            return self.delimiter_block();
        }
        self.first_record(key)
    }

    /// The delimiter block; the canonical spelling wins over the legacy one.
    pub fn delimiter_block(&self) -> Option<&Directive> {
        self.first_record(DELIMITERS_KEY)
            .or_else(|| self.first_record(LEGACY_DELIMITERS_KEY))
    }

    fn first_record(&self, key: &str) -> Option<&Directive> {
        self.directive_lines.iter().find(|record| record.key == key)
    }

    /// A SemVer version known for the document: `@version` first, then the root's suffix.
    pub fn known_version(&self) -> Option<&str> {
        let from_directive = self
            .directive("version")
            .map(str::trim)
            .filter(|version| naming::is_semver(version));
        from_directive.or_else(|| {
            self.root
                .as_ref()
                .and_then(Root::version)
                .filter(|version| naming::is_semver(version))
        })
    }

    /// `PTREE-<version>//`, when a version is known
    pub fn canonical_root_label(&self) -> Option<String> {
        self.known_version()
            .map(|version| format!("PTREE-{}{}", version, META_MARKER))
    }

    pub fn tree(&self) -> Tree {
        Tree::build(&self.nodes)
    }

    pub fn children(&self, index: usize) -> Vec<usize> {
        self.tree().children.get(index).cloned().unwrap_or_default()
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.tree().parents.get(index).copied().flatten()
    }

    /// Nodes sharing a parent with `index`, itself included, in source order
    pub fn siblings(&self, index: usize) -> Vec<usize> {
        let tree = self.tree();
        match tree.parents.get(index) {
            Some(Some(parent)) => tree.children[*parent].clone(),
            Some(None) => tree.roots,
            None => Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
