//! Document building
//!
//!     Folds the classified line stream into a [`Document`]. Two passes:
//!
//!         1. Line pass: directives (folding bracket blocks), root, nodes, summary, comments and
//!            recovered errors, in source order.
//!         2. Structure pass: `has_children` for every node, plus a depth-jump error wherever a
//!            node is more than one level deeper than its predecessor.
//!
//!     Nothing here aborts. The worst a malformed line can do is add one entry to
//!     [`Document::errors`] and be skipped.
//!
//! Directive Blocks
//!
//!     A directive whose value leaves a `[` open swallows the following physical lines until the
//!     brackets balance:
//!
//!         @name_type: [
//!             DIR: [SNAKE_TYPE, KEBAB_TYPE],
//!         ]
//!
//!     If the input ends first, the directive is still stored with what was collected and an
//!     unclosed-bracket error is recorded at its first line.
use crate::ptree::ast::{
    Comment, Directive, Document, Node, ParseError, ParseErrorKind, Root, RootKind, Summary,
};
use crate::ptree::config::PtreeConfig;
use crate::ptree::lexing::{self, DirectiveLine, LineKind, NodeLine, Remainder};
use crate::ptree::naming::{self, META_MARKER};

/// Parse with the default configuration.
pub fn parse(text: &str) -> Document {
    parse_with_config(text, &PtreeConfig::default())
}

/// Parse; the configuration decides how file names split into stem and extension.
pub fn parse_with_config(text: &str, config: &PtreeConfig) -> Document {
    let lines = source_lines(text);
    let mut builder = Builder {
        config,
        document: Document::default(),
    };

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        index += match lexing::classify(line) {
            LineKind::Blank => 1,
            LineKind::Comment { text } => {
                if builder.document.root.is_none() {
                    builder.document.comments.push(Comment { line: index, text });
                }
                1
            }
            LineKind::Directive(directive) => builder.directive(&lines, index, directive),
            LineKind::Node(node) => {
                builder.node(index, line, node);
                1
            }
            LineKind::Summary(summary) => {
                builder.document.summary = Some(Summary {
                    line: index,
                    directories: summary.directories,
                    files: summary.files,
                });
                1
            }
            LineKind::RootCandidate(remainder) => {
                builder.root_candidate(index, line, remainder);
                1
            }
            LineKind::Unrecognized { reason, start_col } => {
                let kind = if line.trim_start().starts_with('@') {
                    ParseErrorKind::MalformedDirective
                } else {
                    ParseErrorKind::UnrecognizedLine
                };
                builder.error(
                    ParseError::new(kind, index, reason)
                        .with_span(start_col, line.chars().count()),
                );
                1
            }
        };
    }

    let mut document = builder.document;
    resolve_structure(&mut document);
    document.errors.sort_by_key(|error| error.line);

    tracing::debug!(
        lines = lines.len(),
        nodes = document.nodes.len(),
        directives = document.directive_lines.len(),
        errors = document.errors.len(),
        "parsed ptree document"
    );
    document
}

/// Physical lines without terminators; a `\r` before `\n` is not content.
pub(crate) fn source_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

struct Builder<'a> {
    config: &'a PtreeConfig,
    document: Document,
}

impl Builder<'_> {
    /// Returns how many physical lines the directive consumed.
    fn directive(&mut self, lines: &[&str], start: usize, line: DirectiveLine) -> usize {
        let mut balance = bracket_balance(&line.value);
        let mut value = line.value;
        let mut raw_lines = vec![lines[start]];
        let mut end = start;

        while balance > 0 && end + 1 < lines.len() {
            end += 1;
            let continuation = lines[end];
            balance += bracket_balance(continuation);
            value.push('\n');
            value.push_str(continuation);
            raw_lines.push(continuation);
        }
        if balance > 0 {
            self.error(
                ParseError::new(
                    ParseErrorKind::UnclosedBracket,
                    start,
                    format!("unclosed bracket block in @{}", line.key),
                )
                .with_span(line.key_col.saturating_sub(1), lines[start].chars().count()),
            );
        }

        self.document
            .directives
            .entry(line.key.clone())
            .or_insert_with(|| value.clone());
        self.document.directive_lines.push(Directive {
            line: start,
            end_line: end,
            key: line.key,
            key_col: line.key_col,
            value,
            raw_text: raw_lines.join("\n"),
        });
        end - start + 1
    }

    fn node(&mut self, index: usize, line: &str, node: NodeLine) {
        let NodeLine {
            depth,
            connector,
            remainder,
        } = node;
        let classification = naming::classify(&remainder.name, self.config);
        self.document.nodes.push(Node {
            line: index,
            raw_text: line.to_string(),
            depth,
            connector,
            start_col: remainder.name_start,
            end_col: remainder.name_end,
            name: remainder.name,
            raw_remainder: remainder.raw,
            symlink_target: remainder.symlink_target,
            has_children: false,
            inline_metadata: remainder.metadata,
            classification,
        });
    }

    fn root_candidate(&mut self, index: usize, line: &str, remainder: Remainder) {
        if self.document.root.is_some() {
            self.error(
                ParseError::new(
                    ParseErrorKind::UnexpectedText,
                    index,
                    format!("unexpected text {:?}: the root is already set", remainder.name),
                )
                .with_span(remainder.name_start, remainder.name_end),
            );
            return;
        }
        let kind = if remainder.name.ends_with(META_MARKER) {
            RootKind::Label
        } else {
            RootKind::Path
        };
        self.document.root = Some(Root {
            line: index,
            raw_text: line.to_string(),
            kind,
            start_col: remainder.name_start,
            end_col: remainder.name_end,
            classification: naming::classify_root(&remainder.name),
            value: remainder.name,
            symlink_target: remainder.symlink_target,
            inline_metadata: remainder.metadata,
        });
    }

    fn error(&mut self, error: ParseError) {
        tracing::debug!(
            line = error.line,
            kind = ?error.kind,
            "recovered parse error: {}",
            error.message
        );
        self.document.errors.push(error);
    }
}

pub(crate) fn bracket_balance(text: &str) -> isize {
    text.chars().fold(0, |balance, c| match c {
        '[' => balance + 1,
        ']' => balance - 1,
        _ => balance,
    })
}

fn resolve_structure(document: &mut Document) {
    let depths: Vec<usize> = document.nodes.iter().map(|node| node.depth).collect();
    for (index, node) in document.nodes.iter_mut().enumerate() {
        node.has_children = depths
            .get(index + 1)
            .is_some_and(|&next| next == node.depth + 1);

        let limit = match index {
            0 => 0,
            _ => depths[index - 1] + 1,
        };
        if node.depth > limit {
            let error = ParseError::new(
                ParseErrorKind::DepthJump,
                node.line,
                format!(
                    "depth jumps to {} where at most {} is possible",
                    node.depth, limit
                ),
            )
            .with_span(node.start_col, node.end_col);
            document.errors.push(error);
        }
    }
}
