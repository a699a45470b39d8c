//! Canonical formatting
//!
//!     [`format`] rebuilds the whole text from the document model. The output has this shape:
//!
//!         <directives>
//!         <header comments>
//!
//!         <root>
//!         <tree>
//!
//!         <summary>
//!
//!     Header: the spec profile emits `@ptree: spec`, `@style: unicode`, `@version` (when a
//!     version is known), the `@name_type` block and the `@separation_delimiters` block, then every
//!     other directive as written. Existing blocks are kept verbatim; missing ones are generated
//!     from the configuration. The default profile keeps all directives as written and only adds
//!     `@ptree` and `@style` when they are absent.
//!
//!     Tree: the node sequence is rebuilt through the [arena](crate::ptree::ast::Tree), siblings
//!     sorted directories first then alphabetically, connectors regenerated for the resolved
//!     style. Names are canonicalized like the [fixer](crate::ptree::fixing) does; symlink targets
//!     and inline metadata are re-emitted unchanged, metadata two spaces after the name.
//!
//!     Formatting is a fixpoint: formatting formatted text returns it unchanged.
use crate::ptree::ast::{
    Directive, Document, SortKey, Tree, DELIMITERS_KEY, LEGACY_DELIMITERS_KEY,
};
use crate::ptree::building::{bracket_balance, parse_with_config};
use crate::ptree::config::{Profile, PtreeConfig, Style};
use crate::ptree::fixing::{canonical_name, canonical_root};
use crate::ptree::lexing::{InlineMetadata, SYMLINK_ARROW};
use crate::ptree::validation::{resolve_profile, RuleId, RuleTable};

/// Default delimiter block
const DEFAULT_DELIMITERS: &str = "['-', '_', '.']";

/// Parse `text`, resolve its profile and format it.
pub fn format_text(text: &str, config: &PtreeConfig) -> String {
    let document = parse_with_config(text, config);
    let profile = resolve_profile(&document, config);
    format(text, &document, config, profile)
}

/// Format `document` (the parse of `text`) under `profile`.
pub fn format(text: &str, document: &Document, config: &PtreeConfig, profile: Profile) -> String {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let style = match profile {
        Profile::Spec => Style::Unicode,
        Profile::Default => resolve_style(document, config),
    };

    let mut lines: Vec<String> = match profile {
        Profile::Spec => spec_header(document, config),
        Profile::Default => default_header(document, style),
    };
    lines.extend(document.comments.iter().map(|comment| {
        if comment.text.is_empty() {
            "#".to_string()
        } else {
            format!("# {}", comment.text)
        }
    }));

    let mut body = Vec::new();
    if let Some(root) = &document.root {
        body.push(decorate(
            canonical_root(document, profile),
            root.symlink_target.as_deref(),
            root.inline_metadata.as_ref(),
        ));
    }
    let case_sensitive = RuleTable::resolve(config, profile)
        .get(RuleId::SiblingOrder)
        .case_sensitive;
    let printer = TreePrinter::new(document, style, case_sensitive);
    printer.print(&mut body);

    if !body.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.append(&mut body);
    }
    if document.summary.is_some() {
        let (directories, files) = printer.counts();
        lines.push(String::new());
        lines.push(summary_line(directories, files));
    }

    // Folded blocks carry `\n` internally
    let mut output = lines.join("\n");
    output.push('\n');
    if newline != "\n" {
        output = output.replace('\n', newline);
    }
    tracing::debug!(
        profile = %profile,
        style = style.as_str(),
        lines = lines.len(),
        "formatted ptree document"
    );
    output
}

/// Configured style, then the document's `@style`, then unicode
fn resolve_style(document: &Document, config: &PtreeConfig) -> Style {
    config
        .style
        .or_else(|| document.directive("style").and_then(Style::from_name))
        .unwrap_or_default()
}

fn default_header(document: &Document, style: Style) -> Vec<String> {
    let mut lines = Vec::new();
    if document.directive_record("ptree").is_none() {
        lines.push(format!("@ptree: {}", Profile::Default));
    }
    if document.directive_record("style").is_none() {
        lines.push(format!("@style: {}", style.as_str()));
    }
    lines.extend(document.directive_lines.iter().map(verbatim));
    lines
}

fn spec_header(document: &Document, config: &PtreeConfig) -> Vec<String> {
    let mut lines = vec![
        format!("@ptree: {}", Profile::Spec),
        format!("@style: {}", Style::Unicode.as_str()),
    ];
    let version = document.known_version();
    if let Some(version) = version {
        lines.push(format!("@version: {}", version));
    }

    let name_type = document.directive_record("name_type");
    match name_type {
        Some(record) => lines.push(verbatim(record)),
        None => lines.extend(name_type_block(config)),
    }

    let delimiters = document.delimiter_block();
    match delimiters {
        Some(record) if record.key == LEGACY_DELIMITERS_KEY => lines.push(verbatim(record).replacen(
            &format!("@{}", LEGACY_DELIMITERS_KEY),
            &format!("@{}", DELIMITERS_KEY),
            1,
        )),
        Some(record) => lines.push(verbatim(record)),
        None => lines.push(format!("@{}: {}", DELIMITERS_KEY, DEFAULT_DELIMITERS)),
    }

    for record in &document.directive_lines {
        let consumed = match record.key.as_str() {
            "ptree" | "style" => true,
            "version" => version.is_some(),
            _ => {
                name_type.is_some_and(|used| std::ptr::eq(used, record))
                    || delimiters.is_some_and(|used| std::ptr::eq(used, record))
            }
        };
        if !consumed {
            lines.push(verbatim(record));
        }
    }
    lines
}

/// A directive as written, trailing whitespace dropped; an unclosed block gets its brackets closed.
fn verbatim(record: &Directive) -> String {
    let mut text = record.raw_text.trim_end().to_string();
    let open = bracket_balance(&text);
    if open > 0 {
        text.push('\n');
        text.push_str(&"]".repeat(open.unsigned_abs()));
    }
    text
}

/// `@name_type` generated from ENTITY_NAME_TYPES
fn name_type_block(config: &PtreeConfig) -> Vec<String> {
    if config.entity_name_types.is_empty() {
        return vec!["@name_type: []".to_string()];
    }
    let mut lines = vec!["@name_type: [".to_string()];
    for (entity, ids) in &config.entity_name_types {
        lines.push(format!("    {}: [{}],", entity, ids.join(", ")));
    }
    lines.push("]".to_string());
    lines
}

fn decorate(name: String, symlink: Option<&str>, metadata: Option<&InlineMetadata>) -> String {
    let mut line = name;
    if let Some(target) = symlink.filter(|target| !target.is_empty()) {
        line.push_str(SYMLINK_ARROW);
        line.push_str(target);
    }
    if let Some(metadata) = metadata.filter(|metadata| !metadata.raw.is_empty()) {
        line.push_str("  ");
        line.push_str(&metadata.raw);
    }
    line
}

fn summary_line(directories: usize, files: usize) -> String {
    format!(
        "{} {}, {} {}",
        directories,
        if directories == 1 { "directory" } else { "directories" },
        files,
        if files == 1 { "file" } else { "files" }
    )
}

struct Glyphs {
    tee: &'static str,
    elbow: &'static str,
    vertical: &'static str,
    blank: &'static str,
}

impl Glyphs {
    fn of(style: Style) -> Self {
        match style {
            Style::Unicode => Glyphs {
                tee: "├── ",
                elbow: "└── ",
                vertical: "│   ",
                blank: "    ",
            },
            Style::Ascii => Glyphs {
                tee: "|-- ",
                elbow: "`-- ",
                vertical: "|   ",
                blank: "    ",
            },
        }
    }
}

/// Prints the node arena, depth first, siblings in canonical order
struct TreePrinter<'a> {
    document: &'a Document,
    tree: Tree,
    glyphs: Glyphs,
    case_sensitive: bool,
}

impl<'a> TreePrinter<'a> {
    fn new(document: &'a Document, style: Style, case_sensitive: bool) -> Self {
        Self {
            document,
            tree: document.tree(),
            glyphs: Glyphs::of(style),
            case_sensitive,
        }
    }

    fn has_children(&self, index: usize) -> bool {
        !self.tree.children[index].is_empty()
    }

    fn is_directory(&self, index: usize) -> bool {
        self.has_children(index) || self.document.nodes[index].classification.is_container()
    }

    fn name(&self, index: usize) -> String {
        canonical_name(&self.document.nodes[index], self.has_children(index))
    }

    fn sorted(&self, group: &[usize]) -> Vec<usize> {
        let mut keyed: Vec<(SortKey, usize)> = group
            .iter()
            .map(|&index| {
                let key = SortKey::new(
                    &self.name(index),
                    self.is_directory(index),
                    self.case_sensitive,
                );
                (key, index)
            })
            .collect();
        // Stable: equal keys keep source order
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, index)| index).collect()
    }

    fn print(&self, out: &mut Vec<String>) {
        self.print_group(&self.tree.roots, "", out);
    }

    fn print_group(&self, group: &[usize], prefix: &str, out: &mut Vec<String>) {
        let sorted = self.sorted(group);
        let last = sorted.len().saturating_sub(1);
        for (position, &index) in sorted.iter().enumerate() {
            let node = &self.document.nodes[index];
            let (connector, continuation) = if position == last {
                (self.glyphs.elbow, self.glyphs.blank)
            } else {
                (self.glyphs.tee, self.glyphs.vertical)
            };
            let entry = decorate(
                self.name(index),
                node.symlink_target.as_deref(),
                node.inline_metadata.as_ref(),
            );
            out.push(format!("{}{}{}", prefix, connector, entry));
            self.print_group(
                &self.tree.children[index],
                &format!("{}{}", prefix, continuation),
                out,
            );
        }
    }

    /// `(directories, files)` as printed
    fn counts(&self) -> (usize, usize) {
        let directories = (0..self.document.nodes.len())
            .filter(|&index| self.is_directory(index))
            .count();
        (directories, self.document.nodes.len() - directories)
    }
}
