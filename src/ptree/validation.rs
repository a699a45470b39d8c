//! Rule validation
//!
//!     [`validate`] runs the [rule table](rules) over a parsed [`Document`] and returns
//!     diagnostics sorted by line, then by rule declaration order. Validation is pure: the same
//!     document and configuration always give the same list.
//!
//! Effective Classification
//!
//!     Naming rules look at what a node is, not only at how it is written: a node that has
//!     children is a directory even when its `/` is missing (PT002 reports the missing marker),
//!     so its bare name is checked against the DIR name types.
//!
//! Naming Rules
//!
//!     - PT004: the bare name must match one of the entity's ENTITY_NAME_TYPES. An entity with no
//!       entry is unconstrained; an id with no usable definition never matches.
//!     - PT005 (UniRule_1): a version suffix must not use the word delimiter of the name types
//!       the bare name matches. It passes when any matching type accepts the delimiter.
//!     - PT008 (UniRule_5): `-` and `_` never appear together in one bare name.
pub mod diagnostics;
pub mod rules;

pub use diagnostics::{Diagnostic, Severity};
pub use rules::{ResolvedRule, RuleId, RuleTable};

use crate::ptree::ast::{Directive, Document, Node, Root, SortKey, DELIMITERS_KEY};
use crate::ptree::config::{Profile, PtreeConfig, Style};
use crate::ptree::naming::{self, Classification, Entity, NameTypeRegistry, DIR_MARKER};

/// The profile a document is checked under: `spec` when configured or declared by `@ptree: spec`.
pub fn resolve_profile(document: &Document, config: &PtreeConfig) -> Profile {
    let declared = document
        .directive("ptree")
        .and_then(Profile::from_name);
    if config.profile == Profile::Spec || declared == Some(Profile::Spec) {
        Profile::Spec
    } else {
        Profile::Default
    }
}

pub fn validate(document: &Document, config: &PtreeConfig) -> Vec<Diagnostic> {
    let profile = resolve_profile(document, config);
    let mut validator = Validator {
        document,
        config,
        table: RuleTable::resolve(config, profile),
        registry: NameTypeRegistry::compile(config),
        found: Vec::new(),
    };

    validator.parse_errors();
    validator.root();
    for node in &document.nodes {
        validator.node(node);
    }
    validator.sibling_order();
    if profile == Profile::Spec {
        validator.spec_header();
    }

    let mut found = validator.found;
    found.sort_by_key(|(rule, diagnostic)| rules::ordering_key(diagnostic.line, *rule));
    let diagnostics: Vec<Diagnostic> = found
        .into_iter()
        .map(|(_, diagnostic)| diagnostic)
        .collect();

    tracing::debug!(
        profile = %profile,
        diagnostics = diagnostics.len(),
        "validated ptree document"
    );
    diagnostics
}

/// A node's classification, reclassified as a directory when it holds children.
pub fn effective_classification(node: &Node, config: &PtreeConfig) -> Classification {
    if node.has_children && node.entity() == Entity::File {
        naming::classify(&format!("{}{}", node.name, DIR_MARKER), config)
    } else {
        node.classification.clone()
    }
}

/// Column span of a name: `(line, start, end)`
type Span = (usize, usize, usize);

struct Validator<'a> {
    document: &'a Document,
    config: &'a PtreeConfig,
    table: RuleTable,
    registry: NameTypeRegistry,
    found: Vec<(RuleId, Diagnostic)>,
}

impl Validator<'_> {
    fn report(&mut self, rule: RuleId, span: Span, message: String) {
        let settings = self.table.get(rule);
        if !settings.enabled {
            return;
        }
        let (line, start_col, end_col) = span;
        self.found.push((
            rule,
            Diagnostic {
                code: rule.code().to_string(),
                severity: settings.severity,
                message,
                line,
                start_col,
                end_col,
            },
        ));
    }

    fn parse_errors(&mut self) {
        let document = self.document;
        for error in &document.errors {
            let (start, end) = error.span.unwrap_or((0, 0));
            self.report(
                RuleId::ParseError,
                (error.line, start, end),
                error.message.clone(),
            );
        }
    }

    fn root(&mut self) {
        let document = self.document;
        let Some(root) = &document.root else {
            self.report(
                RuleId::RootMarker,
                (0, 0, 0),
                "missing root line: expected a label such as `PROJECT//`".to_string(),
            );
            return;
        };
        let span = (root.line, root.start_col, root.end_col);
        if !root.is_label() {
            self.report(
                RuleId::RootMarker,
                span,
                format!("root `{}` should be a label ending in `//`", root.value),
            );
        }
        self.no_spaces(&root.value, span);
        self.naming(&root.classification, span);
    }

    fn node(&mut self, node: &Node) {
        let span = (node.line, node.start_col, node.end_col);
        if node.has_children && !node.classification.is_container() {
            self.report(
                RuleId::DirectoryMarker,
                span,
                format!("`{}` has children but does not end in `/`", node.name),
            );
        }
        self.no_spaces(&node.name, span);

        let classification = effective_classification(node, self.config);
        self.naming(&classification, span);

        if let Some(extension) = &classification.extension {
            if extension.chars().any(char::is_uppercase) {
                let width = extension.chars().count();
                self.report(
                    RuleId::ExtensionCase,
                    (node.line, node.end_col.saturating_sub(width), node.end_col),
                    format!("extension `{}` should be lowercase", extension),
                );
            }
        }
        if let Some(numeral) = &classification.numeral_prefix {
            let numeral_span = (
                node.line,
                node.start_col,
                node.start_col + numeral.chars().count(),
            );
            if !naming::is_canonical_roman(numeral) {
                self.report(
                    RuleId::NumeralPrefix,
                    numeral_span,
                    format!("numeral prefix `{}` is not a canonical Roman numeral", numeral),
                );
            }
            // The prefix is a NUMERAL entity of its own
            let unmatched = self
                .registry
                .matching(Entity::Numeral, numeral)
                .is_some_and(|types| types.is_empty());
            if unmatched {
                let message = no_match(&self.registry, Entity::Numeral, numeral);
                self.report(RuleId::NameType, numeral_span, message);
            }
        }
    }

    fn no_spaces(&mut self, name: &str, span: Span) {
        if name.chars().any(char::is_whitespace) {
            self.report(
                RuleId::NoSpaces,
                span,
                format!("`{}` contains whitespace", name),
            );
        }
    }

    /// PT004, PT005 and PT008 for one classified name
    fn naming(&mut self, classification: &Classification, span: Span) {
        for (rule, message) in naming_problems(&self.registry, classification) {
            self.report(rule, span, message);
        }
    }

    fn sibling_order(&mut self) {
        let settings = self.table.get(RuleId::SiblingOrder);
        if !settings.enabled {
            return;
        }
        let document = self.document;
        let nodes = &document.nodes;
        let tree = document.tree();
        // Every inverted pair counts, not just neighbours
        for group in tree.sibling_groups() {
            let keys: Vec<SortKey> = group
                .iter()
                .map(|&index| SortKey::of(&nodes[index], settings.case_sensitive))
                .collect();
            for (later, later_key) in keys.iter().enumerate() {
                for (earlier, earlier_key) in keys[..later].iter().enumerate() {
                    if earlier_key <= later_key {
                        continue;
                    }
                    let (before, after) = (&nodes[group[earlier]], &nodes[group[later]]);
                    self.report(
                        RuleId::SiblingOrder,
                        (after.line, after.start_col, after.end_col),
                        format!("`{}` should come before `{}`", after.name, before.name),
                    );
                }
            }
        }
    }

    fn spec_header(&mut self) {
        let document = self.document;

        let ptree = document.directive_record("ptree");
        if ptree.map(|d| d.value.trim()) != Some("spec") {
            self.report(
                RuleId::SpecHeader,
                directive_span(ptree),
                "expected `@ptree: spec`".to_string(),
            );
        }

        let style = document.directive_record("style");
        if style.and_then(|d| Style::from_name(&d.value)) != Some(Style::Unicode) {
            self.report(
                RuleId::SpecStyle,
                directive_span(style),
                "expected `@style: unicode`".to_string(),
            );
        }

        let version = document.directive_record("version");
        match version {
            None => self.report(
                RuleId::SpecVersion,
                (0, 0, 0),
                "missing `@version` directive".to_string(),
            ),
            Some(record) if !naming::is_semver(record.value.trim()) => self.report(
                RuleId::SpecVersion,
                directive_span(Some(record)),
                format!("`{}` is not a valid SemVer version", record.value.trim()),
            ),
            Some(_) => {}
        }

        if document.directive_record("name_type").is_none() {
            self.report(
                RuleId::SpecNameType,
                (0, 0, 0),
                "missing `@name_type` block".to_string(),
            );
        }
        if document.delimiter_block().is_none() {
            self.report(
                RuleId::SpecDelimiters,
                (0, 0, 0),
                format!("missing `@{}` block", DELIMITERS_KEY),
            );
        }

        if let Some(root) = &document.root {
            self.spec_root_label(root);
        }
    }

    fn spec_root_label(&mut self, root: &Root) {
        let span = (root.line, root.start_col, root.end_col);
        match self.document.canonical_root_label() {
            Some(expected) if root.value != expected => self.report(
                RuleId::SpecRootLabel,
                span,
                format!("root label should be `{}`", expected),
            ),
            Some(_) => {}
            None => self.report(
                RuleId::SpecRootLabel,
                span,
                "root label should be `PTREE-<version>//`".to_string(),
            ),
        }
    }
}

fn naming_problems(
    registry: &NameTypeRegistry,
    classification: &Classification,
) -> Vec<(RuleId, String)> {
    let mut problems = Vec::new();
    let entity = classification.entity;
    let bare = classification.bare_name.as_str();

    if !bare.is_empty() {
        match registry.matching(entity, bare) {
            Some(types) if types.is_empty() => {
                problems.push((RuleId::NameType, no_match(registry, entity, bare)));
            }
            Some(types) => {
                if let Some(suffix) = &classification.version {
                    let accepted = types
                        .iter()
                        .any(|name_type| name_type.def.accepts_version_delimiter(suffix.delimiter));
                    if !accepted {
                        let ids: Vec<&str> = types.iter().map(|t| t.id.as_str()).collect();
                        problems.push((
                            RuleId::VersionDelimiter,
                            format!(
                                "version delimiter `{}` in `{}{}{}` conflicts with the word \
                                 delimiter of {}",
                                suffix.delimiter,
                                bare,
                                suffix.delimiter,
                                suffix.version,
                                ids.join(", ")
                            ),
                        ));
                    }
                }
            }
            None => {}
        }
        if naming::has_mixed_delimiters(bare) {
            problems.push((
                RuleId::MixedDelimiters,
                format!("`{}` mixes `-` and `_` as word delimiters", bare),
            ));
        }
    }

    // Extension segments are checked in lower case; PT006 owns the casing.
    for segment in &classification.extension_segments {
        let segment = segment.to_lowercase();
        if registry
            .matching(Entity::Ext, &segment)
            .is_some_and(|types| types.is_empty())
        {
            problems.push((RuleId::NameType, no_match(registry, Entity::Ext, &segment)));
        }
    }
    problems
}

fn no_match(registry: &NameTypeRegistry, entity: Entity, bare: &str) -> String {
    let allowed = registry.allowed(entity).unwrap_or_default().join(", ");
    format!(
        "`{}` ({}) does not match any allowed NAME_TYPES [{}]",
        bare, entity, allowed
    )
}

fn directive_span(record: Option<&Directive>) -> Span {
    match record {
        Some(record) => (
            record.line,
            record.key_col.saturating_sub(1),
            record.key_col + record.key.chars().count(),
        ),
        None => (0, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ptree::building::parse;

    fn codes(text: &str, config: &PtreeConfig) -> Vec<String> {
        validate(&parse(text), config)
            .into_iter()
            .map(|diagnostic| diagnostic.code)
            .collect()
    }

    #[test]
    fn test_clean_document() {
        let text = "PTREE-1.0.0//\n├── src/\n│   └── main.rs\n└── readme.md\n";
        assert_eq!(codes(text, &PtreeConfig::default()), Vec::<String>::new());
    }

    #[test]
    fn test_missing_root() {
        let diagnostics = validate(&parse("├── a\n"), &PtreeConfig::default());
        assert_eq!(diagnostics[0].code, "PT001");
        assert_eq!(diagnostics[0].line, 0);
        assert_eq!((diagnostics[0].start_col, diagnostics[0].end_col), (0, 0));
    }

    #[test]
    fn test_node_with_children_needs_marker() {
        let text = "ROOT//\n└── src\n    └── main.rs\n";
        let diagnostics = validate(&parse(text), &PtreeConfig::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "PT002");
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!((diagnostics[0].start_col, diagnostics[0].end_col), (4, 7));
    }

    #[test]
    fn test_extension_case_span() {
        let diagnostics = validate(&parse("ROOT//\n└── notes.TXT\n"), &PtreeConfig::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "PT006");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!((diagnostics[0].start_col, diagnostics[0].end_col), (10, 13));
    }

    #[test]
    fn test_numeral_prefix() {
        let config = PtreeConfig::default();
        assert_eq!(codes("ROOT//\n└── IV_chapter/\n", &config), Vec::<String>::new());
        assert_eq!(codes("ROOT//\n└── IIII_chapter/\n", &config), vec!["PT007"]);
    }

    #[test]
    fn test_mixed_delimiters_and_spaces() {
        let config = PtreeConfig::default();
        let found = codes("ROOT//\n└── my-mixed_name/\n", &config);
        assert!(found.contains(&"PT008".to_string()));
        let found = codes("ROOT//\n└── my file.md\n", &config);
        assert!(found.contains(&"PT003".to_string()));
    }

    #[test]
    fn test_sibling_order_when_enabled() {
        let text = "ROOT//\n├── b.md\n├── a.md\n└── src/\n";
        assert_eq!(codes(text, &PtreeConfig::default()), Vec::<String>::new());

        let config = PtreeConfig::from_json(r#"{ "RULES": { "PT009": true } }"#).unwrap();
        let diagnostics = validate(&parse(text), &config);
        let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
        // (b.md, a.md), (b.md, src/) and (a.md, src/)
        assert_eq!(lines, vec![2, 3, 3]);
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Info));
    }

    #[test]
    fn test_profile_from_document() {
        let doc = parse("@ptree: spec\nROOT//\n");
        assert_eq!(resolve_profile(&doc, &PtreeConfig::default()), Profile::Spec);
        let doc = parse("@ptree: default\nROOT//\n");
        assert_eq!(resolve_profile(&doc, &PtreeConfig::default()), Profile::Default);
        assert_eq!(resolve_profile(&doc, &PtreeConfig::spec()), Profile::Spec);
    }

    #[test]
    fn test_ordering_within_a_line() {
        let text = "ROOT//\n└── My File.TXT\n";
        let found = codes(text, &PtreeConfig::default());
        assert_eq!(found, vec!["PT003", "PT004", "PT006"]);
    }

    #[test]
    fn test_empty_config_tolerated() {
        let text = "PTREE-1.0.0//\n└── anything_GOES.md\n";
        assert_eq!(codes(text, &PtreeConfig::empty()), Vec::<String>::new());
    }
}
