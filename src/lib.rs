//! # ptree
//!
//! A parser, linter, fixer and formatter for ptree: the plain-text notation used to draw a
//! directory tree.
//!
//! ```text
//! @ptree: default
//! @style: unicode
//!
//! PTREE-1.0.0//
//! ├── src/
//! │   └── main.rs  # entry point
//! └── readme.md
//! ```
//!
//! File Layout
//!
//!     src/ptree
//!       ├── lexing       Line classifier: raw line -> LineKind
//!       ├── building     Document builder with error recovery
//!       ├── ast          Document model (root, nodes, directives, errors)
//!       ├── naming       Entity classifier and the compiled NAME_TYPE registry
//!       ├── config       Typed configuration and its merge rules
//!       ├── validation   Rule table PT000..PT015 and diagnostics
//!       ├── fixing       Idempotent mechanical fixer
//!       └── formatting   Canonical printer
//!
//! Every stage is a pure function over an immutable snapshot: parse once, then validate, fix or
//! format from that snapshot. Fixed or formatted text is always re-parsed from scratch.

#![allow(rustdoc::invalid_html_tags)]

pub mod ptree;

pub use ptree::building::{parse, parse_with_config};
pub use ptree::config::PtreeConfig;
pub use ptree::fixing::{fix, fix_text, FixResult};
pub use ptree::formatting::{format, format_text};
pub use ptree::validation::{validate, Diagnostic, Severity};
