//! Formatter tests: canonical output, round trips and fixpoints

use ptree::ptree::config::{Profile, PtreeConfig, Style};
use ptree::{format, format_text, parse, validate};

const MESSY: &str = "\
# service layout
proj
|-- zeta.MD
|-- Src
|   |-- lib.rs  # library
|   `-- Bin
|       `-- main.rs
`-- alpha -> ../alpha  [pinned]

3 directories, 9 files
";

#[test]
fn test_default_profile_snapshot() {
    let out = format_text(MESSY, &PtreeConfig::default());
    insta::assert_snapshot!(out, @r"
@ptree: default
@style: unicode
# service layout

proj/
├── Src/
│   ├── Bin/
│   │   └── main.rs
│   └── lib.rs  # library
├── alpha -> ../alpha  [pinned]
└── zeta.md

2 directories, 4 files
");
}

#[test]
fn test_explicit_ascii_style() {
    let config = PtreeConfig {
        style: Some(Style::Ascii),
        ..PtreeConfig::default()
    };
    let out = format_text("ROOT//\n├── b/\n│   └── x.rs\n└── a.rs\n", &config);
    assert_eq!(
        out,
        "@ptree: default\n@style: ascii\n\nROOT//\n|-- b/\n|   `-- x.rs\n`-- a.rs\n"
    );
}

#[test]
fn test_spec_profile_output() {
    let text = "@author: ops\n@seperation_delimiters: ['-']\nservice-2.1.0/\n└── src/\n";
    let out = format(text, &parse(text), &PtreeConfig::default(), Profile::Spec);
    assert_eq!(
        out,
        "\
@ptree: spec
@style: unicode
@version: 2.1.0
@name_type: [
    ROOT: [SCREAM_TYPE, HIGH_TYPE, PASCAL_TYPE, KEBAB_TYPE, SNAKE_TYPE],
    DIR: [SNAKE_TYPE, KEBAB_TYPE, CAMEL_TYPE, PASCAL_TYPE, SCREAM_TYPE, HIGH_TYPE],
    FILE: [SNAKE_TYPE, KEBAB_TYPE, CAMEL_TYPE, PASCAL_TYPE, SCREAM_TYPE, HIGH_TYPE, DOT_TYPE],
    EXT: [EXT_TYPE],
    META: [SCREAM_TYPE, HIGH_TYPE, PASCAL_TYPE, SNAKE_TYPE, KEBAB_TYPE],
]
@separation_delimiters: ['-']
@author: ops

PTREE-2.1.0//
└── src/
"
    );
    // The formatted document satisfies every spec header rule
    assert!(validate(&parse(&out), &PtreeConfig::spec()).is_empty());
}

#[test]
fn test_round_trip_preserves_structure() {
    let config = PtreeConfig::default();
    let formatted = format_text(MESSY, &config);
    let doc = parse(&formatted);

    assert!(doc.errors.is_empty());
    let names: Vec<(usize, &str)> = doc
        .nodes
        .iter()
        .map(|node| (node.depth, node.name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            (0, "Src/"),
            (1, "Bin/"),
            (2, "main.rs"),
            (1, "lib.rs"),
            (0, "alpha"),
            (0, "zeta.md"),
        ]
    );
    assert_eq!(doc.nodes[4].symlink_target.as_deref(), Some("../alpha"));
    assert_eq!(doc.comments.len(), 1);
}

#[test]
fn test_formatting_is_a_fixpoint() {
    for config in [PtreeConfig::default(), PtreeConfig::spec()] {
        let once = format_text(MESSY, &config);
        assert_eq!(format_text(&once, &config), once);
    }
}

#[test]
fn test_empty_input() {
    assert_eq!(
        format_text("", &PtreeConfig::default()),
        "@ptree: default\n@style: unicode\n"
    );
}
