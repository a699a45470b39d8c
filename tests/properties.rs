//! Property-based tests for the engine
//!
//! These cover the guarantees the rest of the toolchain leans on:
//! - fixing is idempotent and formatting is a fixpoint after one pass
//! - validation and classification are deterministic
//! - the delimiter UniRules hold for every generated name
//! - sibling ordering is a total order

use proptest::prelude::*;
use ptree::ptree::ast::SortKey;
use ptree::ptree::config::{ExtensionSplit, PtreeConfig};
use ptree::ptree::naming::{self, Entity};
use ptree::{fix_text, format_text, parse, validate};

/// Generate node names with optional extensions in mixed case
fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z][a-zA-Z0-9_-]{0,6}",
        "[a-zA-Z][a-zA-Z0-9_-]{0,6}(\\.[a-zA-Z0-9]{1,3}){1,2}",
        "[a-z]{1,5}-[1-9]\\.[0-9]\\.[0-9](\\.[a-zA-Z]{1,3})?",
        "[a-z][a-z0-9_]{0,6}/",
    ]
}

/// Generate root lines, both labels and paths
fn root_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][A-Z0-9_]{0,6}//",
        "[a-z][a-z0-9-]{0,8}/?",
        "[a-z]{1,6}-[1-9]\\.[0-9]\\.[0-9]/?",
    ]
}

/// Generate a well-formed tree: every depth is at most one deeper than the line before it
fn tree_strategy() -> impl Strategy<Value = String> {
    (
        root_strategy(),
        prop::collection::vec((0usize..4, name_strategy(), any::<bool>()), 0..12),
    )
        .prop_map(|(root, entries)| {
            let mut text = format!("{}\n", root);
            let mut previous: Option<usize> = None;
            for (wanted, name, last) in entries {
                let depth = match previous {
                    None => 0,
                    Some(depth) => wanted.min(depth + 1),
                };
                previous = Some(depth);
                let connector = if last { "└── " } else { "├── " };
                text.push_str(&"│   ".repeat(depth));
                text.push_str(connector);
                text.push_str(&name);
                text.push('\n');
            }
            text
        })
}

/// Generate loosely structured text: tree fragments mixed with arbitrary printable lines
fn noisy_text_strategy() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        "[ -~]{0,24}",
        "(├── |└── |\\|-- |`-- )[a-zA-Z0-9_.-]{1,10}",
        "(│   |    ){1,2}(├── |└── )[a-zA-Z0-9_.-]{1,10}",
        "@[a-z_]{1,8}: [a-z0-9\\[\\]',-]{0,10}",
        Just(String::new()),
    ];
    prop::collection::vec(line, 0..14).prop_map(|lines| lines.join("\n"))
}

fn upper_word() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{0,5}"
}

fn lower_word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,5}"
}

fn version() -> impl Strategy<Value = String> {
    "[1-9][0-9]?\\.[0-9]\\.[0-9]"
}

fn codes(text: &str, config: &PtreeConfig) -> Vec<String> {
    validate(&parse(text), config)
        .into_iter()
        .map(|diagnostic| diagnostic.code)
        .collect()
}

fn scream_only_root() -> PtreeConfig {
    let mut config = PtreeConfig::default();
    config
        .entity_name_types
        .insert(Entity::Root, vec!["SCREAM_TYPE".to_string()]);
    config
}

proptest! {
    #[test]
    fn fix_is_idempotent_on_trees(text in tree_strategy()) {
        for config in [PtreeConfig::default(), PtreeConfig::spec()] {
            let once = fix_text(&text, &config);
            let twice = fix_text(&once.fixed_text, &config);
            prop_assert_eq!(&twice.fixed_text, &once.fixed_text);
            prop_assert!(twice.applied.is_empty(), "second pass applied {:?}", twice.applied);
        }
    }

    #[test]
    fn fix_is_idempotent_on_noisy_text(text in noisy_text_strategy()) {
        let config = PtreeConfig::default();
        let once = fix_text(&text, &config).fixed_text;
        prop_assert_eq!(fix_text(&once, &config).fixed_text, once);
    }

    #[test]
    fn format_is_a_fixpoint(text in tree_strategy()) {
        for config in [PtreeConfig::default(), PtreeConfig::spec()] {
            let once = format_text(&text, &config);
            prop_assert_eq!(format_text(&once, &config), once);
        }
    }

    #[test]
    fn format_keeps_every_node(text in tree_strategy()) {
        let before = parse(&text);
        let formatted = parse(&format_text(&text, &PtreeConfig::default()));

        prop_assert!(formatted.errors.is_empty(), "errors: {:?}", formatted.errors);
        prop_assert_eq!(formatted.nodes.len(), before.nodes.len());
        let mut depths_before: Vec<usize> = before.nodes.iter().map(|node| node.depth).collect();
        let mut depths_after: Vec<usize> = formatted.nodes.iter().map(|node| node.depth).collect();
        depths_before.sort_unstable();
        depths_after.sort_unstable();
        prop_assert_eq!(depths_before, depths_after);
    }

    #[test]
    fn validation_is_deterministic(text in noisy_text_strategy()) {
        for config in [PtreeConfig::default(), PtreeConfig::spec()] {
            let document = parse(&text);
            prop_assert_eq!(validate(&document, &config), validate(&document, &config));
            prop_assert_eq!(validate(&document, &config), validate(&parse(&text), &config));
        }
    }

    #[test]
    fn classification_is_deterministic(name in "[ -~]{0,20}") {
        for split in [ExtensionSplit::FirstDot, ExtensionSplit::LastDot] {
            prop_assert_eq!(
                naming::classify_with_split(&name, split),
                naming::classify_with_split(&name, split)
            );
        }
        prop_assert_eq!(naming::classify_root(&name), naming::classify_root(&name));
    }

    #[test]
    fn word_delimiter_as_version_delimiter_is_flagged(
        words in prop::collection::vec(upper_word(), 1..4),
        version in version(),
    ) {
        let config = scream_only_root();
        let bare = words.join("_");

        let conflicting = format!("{}_{}//\n", bare, version);
        prop_assert_eq!(codes(&conflicting, &config), vec!["PT005".to_string()]);

        let allowed = format!("{}-{}//\n", bare, version);
        prop_assert!(codes(&allowed, &config).is_empty());
    }

    #[test]
    fn mixed_delimiters_are_flagged(
        first in lower_word(),
        second in lower_word(),
        third in lower_word(),
    ) {
        let config = PtreeConfig::default();

        let mixed = format!("ROOT//\n└── {}-{}_{}.md\n", first, second, third);
        prop_assert!(codes(&mixed, &config).contains(&"PT008".to_string()));

        for single in [format!("{}-{}", first, second), format!("{}_{}", first, second)] {
            let text = format!("ROOT//\n└── {}.md\n", single);
            prop_assert!(!codes(&text, &config).contains(&"PT008".to_string()));
        }
    }

    #[test]
    fn sibling_order_is_transitive(
        names in prop::collection::vec(("[a-zA-Z_.-]{1,6}", any::<bool>(), any::<bool>()), 3),
    ) {
        let keys: Vec<SortKey> = names
            .iter()
            .map(|(name, is_dir, case_sensitive)| SortKey::new(name, *is_dir, *case_sensitive))
            .collect();
        let (a, b, c) = (&keys[0], &keys[1], &keys[2]);
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }

        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert!(sorted.windows(2).all(|pair| pair[0] <= pair[1]));
        // Directories always precede files
        let first_file = sorted.iter().position(|key| *key >= SortKey::new("", false, false));
        if let Some(index) = first_file {
            prop_assert!(sorted[index..].iter().all(|key| *key >= SortKey::new("", false, false)));
        }
    }
}
