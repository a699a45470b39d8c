//! Mechanical fixes
//!
//!     [`fix`] rewrites only what can be corrected without judgement, and only inside the
//!     affected name spans:
//!
//!         - a node with children gets its missing `/`
//!         - a file extension is lower-cased
//!         - a path root that holds nodes gets its missing `/`
//!         - spec profile: the root becomes `PTREE-<version>//` when a version is known, missing
//!           `@ptree: spec`, `@style: unicode` and `@version` lines are added at the top, a
//!           conflicting `@ptree` value is replaced and the legacy `@seperation_delimiters` key
//!           is renamed when the canonical key is absent
//!
//!     Inline metadata, comments, symlink targets, connectors, depth and node order are never
//!     touched. Line endings, including a missing final newline, are kept as they are.
//!
//!     Fixing is idempotent: every edit produces text for which the same edit is no longer
//!     needed, so a second run returns its input unchanged.
use std::collections::BTreeMap;

use crate::ptree::ast::{Document, Node, RootKind, DELIMITERS_KEY, LEGACY_DELIMITERS_KEY};
use crate::ptree::building::parse_with_config;
use crate::ptree::config::{Profile, PtreeConfig, Style};
use crate::ptree::naming::{Entity, DIR_MARKER};
use crate::ptree::validation::resolve_profile;

/// Output of a fix run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixResult {
    pub fixed_text: String,
    /// One human-readable line per applied edit, in source order
    pub applied: Vec<String>,
}

impl FixResult {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// A replacement of a character span within one line
#[derive(Debug, Clone)]
struct Edit {
    line: usize,
    start_col: usize,
    end_col: usize,
    replacement: String,
}

/// Parse `text` and fix it.
pub fn fix_text(text: &str, config: &PtreeConfig) -> FixResult {
    let document = parse_with_config(text, config);
    fix(text, &document, config)
}

/// Fix `text`, which `document` must be the parse of.
pub fn fix(text: &str, document: &Document, config: &PtreeConfig) -> FixResult {
    let profile = resolve_profile(document, config);
    let mut edits = Vec::new();
    let mut applied = Vec::new();

    let header = header_lines(document, profile, &mut edits, &mut applied);

    if let Some(root) = &document.root {
        let canonical = canonical_root(document, profile);
        if canonical != root.value {
            applied.push(format!(
                "line {}: root `{}` -> `{}`",
                root.line + 1,
                root.value,
                canonical
            ));
            edits.push(Edit {
                line: root.line,
                start_col: root.start_col,
                end_col: root.end_col,
                replacement: canonical,
            });
        }
    }

    for node in &document.nodes {
        let canonical = canonical_name(node, node.has_children);
        if canonical != node.name {
            applied.push(format!(
                "line {}: `{}` -> `{}`",
                node.line + 1,
                node.name,
                canonical
            ));
            edits.push(Edit {
                line: node.line,
                start_col: node.start_col,
                end_col: node.end_col,
                replacement: canonical,
            });
        }
    }

    let fixed_text = apply(text, &header, edits);
    tracing::debug!(profile = %profile, edits = applied.len(), "fixed ptree document");
    FixResult {
        fixed_text,
        applied,
    }
}

/// Directive lines to insert at the top; in-place directive edits go to `edits`.
fn header_lines(
    document: &Document,
    profile: Profile,
    edits: &mut Vec<Edit>,
    applied: &mut Vec<String>,
) -> Vec<String> {
    let mut insert = Vec::new();
    if profile != Profile::Spec {
        return insert;
    }

    match document.directive_record("ptree") {
        None => insert.push("@ptree: spec".to_string()),
        Some(record) if record.value.trim() != "spec" && record.line == record.end_line => {
            applied.push(format!("line {}: `@ptree: spec`", record.line + 1));
            edits.push(Edit {
                line: record.line,
                start_col: record.key_col.saturating_sub(1),
                end_col: record.raw_text.chars().count(),
                replacement: "@ptree: spec".to_string(),
            });
        }
        Some(_) => {}
    }
    if document.directive_record("style").is_none() {
        insert.push(format!("@style: {}", Style::Unicode.as_str()));
    }
    if document.directive_record("version").is_none() {
        if let Some(version) = document.known_version() {
            insert.push(format!("@version: {}", version));
        }
    }

    let canonical = document
        .directive_lines
        .iter()
        .any(|record| record.key == DELIMITERS_KEY);
    let legacy = document
        .directive_lines
        .iter()
        .find(|record| record.key == LEGACY_DELIMITERS_KEY);
    if let (false, Some(record)) = (canonical, legacy) {
        applied.push(format!(
            "line {}: `@{}` -> `@{}`",
            record.line + 1,
            LEGACY_DELIMITERS_KEY,
            DELIMITERS_KEY
        ));
        edits.push(Edit {
            line: record.line,
            start_col: record.key_col,
            end_col: record.key_col + LEGACY_DELIMITERS_KEY.chars().count(),
            replacement: DELIMITERS_KEY.to_string(),
        });
    }

    for line in &insert {
        applied.push(format!("header: added `{}`", line));
    }
    insert
}

/// The name a node should carry: directory marker added, extension lower-cased.
pub(crate) fn canonical_name(node: &Node, has_children: bool) -> String {
    if has_children && !node.classification.is_container() {
        return format!("{}{}", node.name, DIR_MARKER);
    }
    if node.entity() != Entity::File {
        return node.name.clone();
    }
    match &node.classification.extension {
        Some(extension) if extension.chars().any(char::is_uppercase) => {
            let keep = node.name.chars().count() - extension.chars().count();
            let mut name: String = node.name.chars().take(keep).collect();
            name.push_str(&extension.to_lowercase());
            name
        }
        _ => node.name.clone(),
    }
}

/// The value the root should carry under `profile`.
pub(crate) fn canonical_root(document: &Document, profile: Profile) -> String {
    let Some(root) = &document.root else {
        return String::new();
    };
    if profile == Profile::Spec {
        if let Some(label) = document.canonical_root_label() {
            return label;
        }
    }
    if root.kind == RootKind::Path
        && !document.nodes.is_empty()
        && !root.value.ends_with(DIR_MARKER)
    {
        return format!("{}{}", root.value, DIR_MARKER);
    }
    root.value.clone()
}

fn apply(text: &str, header: &[String], edits: Vec<Edit>) -> String {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut by_line: BTreeMap<usize, Vec<Edit>> = BTreeMap::new();
    for edit in edits {
        by_line.entry(edit.line).or_default().push(edit);
    }

    let mut output = String::with_capacity(text.len() + 64);
    for line in header {
        output.push_str(line);
        output.push_str(newline);
    }
    for (index, chunk) in text.split_inclusive('\n').enumerate() {
        let Some(line_edits) = by_line.get_mut(&index) else {
            output.push_str(chunk);
            continue;
        };
        let (content, ending) = split_ending(chunk);
        let mut content = content.to_string();
        // Right to left, so earlier columns stay valid
        line_edits.sort_by(|a, b| b.start_col.cmp(&a.start_col));
        for edit in line_edits.iter() {
            let start = byte_offset(&content, edit.start_col);
            let end = byte_offset(&content, edit.end_col).max(start);
            content.replace_range(start..end, &edit.replacement);
        }
        output.push_str(&content);
        output.push_str(ending);
    }
    output
}

fn split_ending(chunk: &str) -> (&str, &str) {
    if let Some(content) = chunk.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = chunk.strip_suffix('\n') {
        (content, "\n")
    } else {
        (chunk, "")
    }
}

fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(text: &str, config: &PtreeConfig) -> String {
        fix_text(text, config).fixed_text
    }

    #[test]
    fn test_directory_marker_and_extension() {
        let text = "ROOT//\n├── src\n│   └── Main.RS  # entry\n└── notes.TXT -> ../notes.TXT\n";
        let result = fix_text(text, &PtreeConfig::default());
        assert_eq!(
            result.fixed_text,
            "ROOT//\n├── src/\n│   └── Main.rs  # entry\n└── notes.txt -> ../notes.TXT\n"
        );
        assert_eq!(result.applied.len(), 3);
        assert_eq!(result.applied[0], "line 2: `src` -> `src/`");
    }

    #[test]
    fn test_preserves_crlf_and_missing_final_newline() {
        let text = "Folder\r\n└── a.TXT";
        assert_eq!(fixed(text, &PtreeConfig::default()), "Folder/\r\n└── a.txt");
    }

    #[test]
    fn test_spec_header_insertion() {
        let text = "PTREE-1.2.0//\n└── src/\n";
        let result = fix_text(text, &PtreeConfig::spec());
        assert_eq!(
            result.fixed_text,
            "@ptree: spec\n@style: unicode\n@version: 1.2.0\nPTREE-1.2.0//\n└── src/\n"
        );
        assert_eq!(fixed(&result.fixed_text, &PtreeConfig::spec()), result.fixed_text);
    }

    #[test]
    fn test_spec_root_label() {
        let text = "@ptree: spec\n@style: unicode\n@version: 2.0.0\nmy-project/\n└── src/\n";
        assert_eq!(
            fixed(text, &PtreeConfig::default()),
            "@ptree: spec\n@style: unicode\n@version: 2.0.0\nPTREE-2.0.0//\n└── src/\n"
        );
    }

    #[test]
    fn test_conflicting_ptree_value_is_replaced() {
        let text = "@ptree: default\n@style: unicode\nROOT//\n";
        assert_eq!(
            fixed(text, &PtreeConfig::spec()),
            "@ptree: spec\n@style: unicode\nROOT//\n"
        );
    }

    #[test]
    fn test_legacy_delimiter_key_is_renamed() {
        let text = "@ptree: spec\n@seperation_delimiters: ['-', '_']\nROOT//\n";
        let out = fixed(text, &PtreeConfig::default());
        assert!(out.contains("@separation_delimiters: ['-', '_']\n"));
        assert!(!out.contains("seperation"));

        let both = "@ptree: spec\n@style: unicode\n@seperation_delimiters: ['-']\n\
                    @separation_delimiters: ['_']\nROOT//\n";
        assert_eq!(fixed(both, &PtreeConfig::default()), both);
    }

    #[test]
    fn test_default_profile_leaves_header_alone() {
        let text = "ROOT//\n└── a.md\n";
        let result = fix_text(text, &PtreeConfig::default());
        assert!(!result.changed());
        assert_eq!(result.fixed_text, text);
    }

    #[test]
    fn test_multibyte_columns() {
        let text = "ROOT//\n└── résumé.PDF  # cv\n";
        assert_eq!(
            fixed(text, &PtreeConfig::default()),
            "ROOT//\n└── résumé.pdf  # cv\n"
        );
    }
}
