//! Rule table
//!
//!     Every rule has a code, a name and a default per profile. Configuration (`RULES`, keyed by
//!     code or name) can enable, disable or re-level any rule; what it leaves unset falls back to
//!     the profile default. Declaration order is the tie-break order for diagnostics that share a
//!     line.
//!
//!         code    name                default     spec
//!         PT000   parse-error         error       error
//!         PT001   root-marker         warning     error
//!         PT002   directory-marker    error       error
//!         PT003   no-spaces           warning     error
//!         PT004   name-type           error       error
//!         PT005   version-delimiter   error       error
//!         PT006   extension-case      warning     error
//!         PT007   numeral-prefix      error       error
//!         PT008   mixed-delimiters    error       error
//!         PT009   sibling-order       off (info)  warning
//!         PT010   spec-header         -           error
//!         PT011   spec-style          -           error
//!         PT012   spec-version        -           error
//!         PT013   spec-name-type      -           error
//!         PT014   spec-delimiters     -           error
//!         PT015   spec-root-label     -           error
//!
//!     Rules marked `-` exist only under the spec profile; no configuration turns them on
//!     elsewhere.
use std::collections::BTreeMap;

use super::Severity;
use crate::ptree::config::{Profile, PtreeConfig, RuleOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    ParseError,
    RootMarker,
    DirectoryMarker,
    NoSpaces,
    NameType,
    VersionDelimiter,
    ExtensionCase,
    NumeralPrefix,
    MixedDelimiters,
    SiblingOrder,
    SpecHeader,
    SpecStyle,
    SpecVersion,
    SpecNameType,
    SpecDelimiters,
    SpecRootLabel,
}

impl RuleId {
    pub const ALL: [RuleId; 16] = [
        RuleId::ParseError,
        RuleId::RootMarker,
        RuleId::DirectoryMarker,
        RuleId::NoSpaces,
        RuleId::NameType,
        RuleId::VersionDelimiter,
        RuleId::ExtensionCase,
        RuleId::NumeralPrefix,
        RuleId::MixedDelimiters,
        RuleId::SiblingOrder,
        RuleId::SpecHeader,
        RuleId::SpecStyle,
        RuleId::SpecVersion,
        RuleId::SpecNameType,
        RuleId::SpecDelimiters,
        RuleId::SpecRootLabel,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RuleId::ParseError => "PT000",
            RuleId::RootMarker => "PT001",
            RuleId::DirectoryMarker => "PT002",
            RuleId::NoSpaces => "PT003",
            RuleId::NameType => "PT004",
            RuleId::VersionDelimiter => "PT005",
            RuleId::ExtensionCase => "PT006",
            RuleId::NumeralPrefix => "PT007",
            RuleId::MixedDelimiters => "PT008",
            RuleId::SiblingOrder => "PT009",
            RuleId::SpecHeader => "PT010",
            RuleId::SpecStyle => "PT011",
            RuleId::SpecVersion => "PT012",
            RuleId::SpecNameType => "PT013",
            RuleId::SpecDelimiters => "PT014",
            RuleId::SpecRootLabel => "PT015",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RuleId::ParseError => "parse-error",
            RuleId::RootMarker => "root-marker",
            RuleId::DirectoryMarker => "directory-marker",
            RuleId::NoSpaces => "no-spaces",
            RuleId::NameType => "name-type",
            RuleId::VersionDelimiter => "version-delimiter",
            RuleId::ExtensionCase => "extension-case",
            RuleId::NumeralPrefix => "numeral-prefix",
            RuleId::MixedDelimiters => "mixed-delimiters",
            RuleId::SiblingOrder => "sibling-order",
            RuleId::SpecHeader => "spec-header",
            RuleId::SpecStyle => "spec-style",
            RuleId::SpecVersion => "spec-version",
            RuleId::SpecNameType => "spec-name-type",
            RuleId::SpecDelimiters => "spec-delimiters",
            RuleId::SpecRootLabel => "spec-root-label",
        }
    }

    /// Look a rule up by code or name, ignoring case.
    pub fn parse(id: &str) -> Option<RuleId> {
        RuleId::ALL.into_iter().find(|rule| {
            rule.code().eq_ignore_ascii_case(id) || rule.name().eq_ignore_ascii_case(id)
        })
    }

    pub fn spec_only(self) -> bool {
        self >= RuleId::SpecHeader
    }

    fn ordinal(self) -> usize {
        self as usize
    }

    /// `(enabled, severity)` when nothing is configured
    pub fn defaults(self, profile: Profile) -> (bool, Severity) {
        match (self, profile) {
            (RuleId::SiblingOrder, Profile::Default) => (false, Severity::Info),
            (RuleId::SiblingOrder, Profile::Spec) => (true, Severity::Warning),
            (rule, Profile::Default) if rule.spec_only() => (false, Severity::Error),
            (_, Profile::Spec) => (true, Severity::Error),
            (
                RuleId::RootMarker | RuleId::NoSpaces | RuleId::ExtensionCase,
                Profile::Default,
            ) => (true, Severity::Warning),
            (_, Profile::Default) => (true, Severity::Error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRule {
    pub enabled: bool,
    pub severity: Severity,
    pub case_sensitive: bool,
}

/// The effective settings of every rule for one run
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: BTreeMap<RuleId, ResolvedRule>,
}

impl RuleTable {
    pub fn resolve(config: &PtreeConfig, profile: Profile) -> Self {
        for key in config.rules.keys() {
            if RuleId::parse(key).is_none() {
                tracing::warn!(rule = %key, "ignoring settings for unknown rule");
            }
        }

        let rules = RuleId::ALL
            .into_iter()
            .map(|rule| {
                let (enabled, severity) = rule.defaults(profile);
                let options = configured(config, rule);
                let resolved = if rule.spec_only() && profile != Profile::Spec {
                    ResolvedRule {
                        enabled: false,
                        severity,
                        case_sensitive: false,
                    }
                } else {
                    ResolvedRule {
                        enabled: options.enabled.unwrap_or(enabled),
                        severity: options.severity.unwrap_or(severity),
                        case_sensitive: options.case_sensitive.unwrap_or(false),
                    }
                };
                (rule, resolved)
            })
            .collect();
        Self { rules }
    }

    pub fn get(&self, rule: RuleId) -> ResolvedRule {
        self.rules.get(&rule).copied().unwrap_or(ResolvedRule {
            enabled: false,
            severity: Severity::Info,
            case_sensitive: false,
        })
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        self.get(rule).enabled
    }
}

/// Settings written under the rule's code, then under its name
fn configured(config: &PtreeConfig, rule: RuleId) -> RuleOptions {
    let by_code = config.rule(rule.code()).map(|setting| setting.options());
    let by_name = config.rule(rule.name()).map(|setting| setting.options());
    match (by_code, by_name) {
        (Some(code), Some(name)) => RuleOptions {
            enabled: code.enabled.or(name.enabled),
            severity: code.severity.or(name.severity),
            case_sensitive: code.case_sensitive.or(name.case_sensitive),
        },
        (Some(options), None) | (None, Some(options)) => options,
        (None, None) => RuleOptions::default(),
    }
}

/// Sort key for diagnostics: line, then rule declaration order
pub(crate) fn ordering_key(line: usize, rule: RuleId) -> (usize, usize) {
    (line, rule.ordinal())
}
