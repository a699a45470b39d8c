//! Typed configuration consumed by the engine
//!
//!     The engine never reads files. It receives a [`PtreeConfig`]: the built-in defaults merged
//!     with whatever overlays a loader (see the `ptree-config` crate) found.
//!
//! Merge Rules
//!
//!     [`PtreeConfig::merge`] applies a [`ConfigOverlay`] leaf by leaf:
//!
//!         - profile, style, FILE_EXTENSION_SPLIT: replaced when the overlay sets them
//!         - NAME_TYPES: replaced per name-type id
//!         - ENTITY_NAME_TYPES: replaced per entity (the list is the leaf)
//!         - RULES: merged per rule id, field by field (`enabled`, `severity`, options)
//!
//!     Map keys are normalized to upper case, so `pt009` and `PT009` address the same rule and
//!     `snake_type` the same name type as `SNAKE_TYPE`. Loaders that lowercase keys stay usable.
mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ptree::naming::Entity;
use crate::ptree::validation::Severity;

/// Named bundle of rule defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Default,
    Spec,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Default => "default",
            Profile::Spec => "spec",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Profile::Default),
            "spec" => Some(Profile::Spec),
            _ => None,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connector glyph set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Unicode,
    Ascii,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Unicode => "unicode",
            Style::Ascii => "ascii",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "unicode" => Some(Style::Unicode),
            "ascii" => Some(Style::Ascii),
            _ => None,
        }
    }
}

/// Where a file name is split into stem and extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtensionSplit {
    #[default]
    #[serde(rename = "firstDot", alias = "firstdot", alias = "first_dot")]
    FirstDot,
    #[serde(rename = "lastDot", alias = "lastdot", alias = "last_dot")]
    LastDot,
}

/// A naming convention: pattern over the bare name plus its delimiter rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTypeDef {
    pub pattern: String,
    #[serde(default, with = "delimiter")]
    pub word_delimiter: Option<char>,
    #[serde(default)]
    pub allowed_version_delimiters: Vec<char>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default, alias = "counterExamples")]
    pub counter_examples: Vec<String>,
}

impl NameTypeDef {
    pub fn new(pattern: impl Into<String>, word_delimiter: Option<char>) -> Self {
        Self {
            pattern: pattern.into(),
            word_delimiter,
            allowed_version_delimiters: Vec::new(),
            examples: Vec::new(),
            counter_examples: Vec::new(),
        }
    }

    pub fn with_version_delimiters(mut self, delimiters: &[char]) -> Self {
        self.allowed_version_delimiters = delimiters.to_vec();
        self
    }

    pub fn with_examples(mut self, examples: &[&str], counter_examples: &[&str]) -> Self {
        self.examples = examples.iter().map(|s| s.to_string()).collect();
        self.counter_examples = counter_examples.iter().map(|s| s.to_string()).collect();
        self
    }

    /// UniRule_1: a version suffix must not reuse the word delimiter.
    ///
    /// Without a word delimiter both `-` and `_` are fine. With one, the delimiter must differ
    /// from it and, when the allowed set is non-empty, be listed there.
    pub fn accepts_version_delimiter(&self, delimiter: char) -> bool {
        match self.word_delimiter {
            None => true,
            Some(word) if word == delimiter => false,
            Some(_) => {
                self.allowed_version_delimiters.is_empty()
                    || self.allowed_version_delimiters.contains(&delimiter)
            }
        }
    }
}

/// `word_delimiter` is written as a one-character string; `""`, `"none"` or null mean none.
mod delimiter {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<char>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(c) => serializer.serialize_char(*c),
            None => serializer.serialize_str("none"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<char>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Some(c)),
            _ => Err(D::Error::custom(format!(
                "word_delimiter must be a single character, got {raw:?}"
            ))),
        }
    }
}

/// Per-rule settings as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// `PT009 = true`
    Toggle(bool),
    /// `PT003 = "error"`: enabled with that severity
    Level(Severity),
    Options(RuleOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// PT009: compare names case-sensitively
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "caseSensitive")]
    pub case_sensitive: Option<bool>,
}

impl RuleSetting {
    pub fn options(&self) -> RuleOptions {
        match self {
            RuleSetting::Toggle(enabled) => RuleOptions {
                enabled: Some(*enabled),
                ..RuleOptions::default()
            },
            RuleSetting::Level(severity) => RuleOptions {
                enabled: Some(true),
                severity: Some(*severity),
                ..RuleOptions::default()
            },
            RuleSetting::Options(options) => options.clone(),
        }
    }

    /// Field-wise merge; fields set in `other` win.
    pub fn merge(&self, other: &RuleSetting) -> RuleSetting {
        let base = self.options();
        let over = other.options();
        RuleSetting::Options(RuleOptions {
            enabled: over.enabled.or(base.enabled),
            severity: over.severity.or(base.severity),
            case_sensitive: over.case_sensitive.or(base.case_sensitive),
        })
    }
}

/// The configuration object the engine runs with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PtreeConfig {
    pub profile: Profile,
    /// Explicit style; `None` defers to the document's `@style` directive
    pub style: Option<Style>,
    #[serde(rename = "FILE_EXTENSION_SPLIT")]
    pub file_extension_split: ExtensionSplit,
    #[serde(rename = "NAME_TYPES")]
    pub name_types: BTreeMap<String, NameTypeDef>,
    #[serde(rename = "ENTITY_NAME_TYPES")]
    pub entity_name_types: BTreeMap<Entity, Vec<String>>,
    #[serde(rename = "RULES")]
    pub rules: BTreeMap<String, RuleSetting>,
}

impl Default for PtreeConfig {
    /// Built-in NAME_TYPES and ENTITY_NAME_TYPES, profile `default`, no rule overrides
    fn default() -> Self {
        Self {
            profile: Profile::Default,
            style: None,
            file_extension_split: ExtensionSplit::FirstDot,
            name_types: builtin::name_types(),
            entity_name_types: builtin::entity_name_types(),
            rules: BTreeMap::new(),
        }
    }
}

impl PtreeConfig {
    /// A configuration without any naming registry: naming rules have nothing to check.
    pub fn empty() -> Self {
        Self {
            name_types: BTreeMap::new(),
            entity_name_types: BTreeMap::new(),
            ..Self::default()
        }
    }

    /// Defaults with the `spec` profile selected
    pub fn spec() -> Self {
        Self {
            profile: Profile::Spec,
            ..Self::default()
        }
    }

    /// Apply an overlay on top of this configuration (see the module docs for the rules).
    pub fn merge(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(profile) = overlay.profile {
            self.profile = profile;
        }
        if overlay.style.is_some() {
            self.style = overlay.style;
        }
        if let Some(split) = overlay.file_extension_split {
            self.file_extension_split = split;
        }
        for (id, def) in overlay.name_types {
            self.name_types.insert(id.to_ascii_uppercase(), def);
        }
        for (entity, ids) in overlay.entity_name_types {
            let ids = ids.iter().map(|id| id.to_ascii_uppercase()).collect();
            self.entity_name_types.insert(entity, ids);
        }
        for (id, setting) in overlay.rules {
            let id = id.to_ascii_uppercase();
            let merged = match self.rules.get(&id) {
                Some(base) => base.merge(&setting),
                None => setting,
            };
            self.rules.insert(id, merged);
        }
        self
    }

    /// Defaults merged with a JSON overlay
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let overlay: ConfigOverlay = serde_json::from_str(json)?;
        Ok(Self::default().merge(overlay))
    }

    /// Rule settings for a rule code, regardless of the key's case
    pub fn rule(&self, code: &str) -> Option<&RuleSetting> {
        self.rules
            .get(code)
            .or_else(|| self.rules.get(&code.to_ascii_uppercase()))
    }
}

/// A partial configuration, as read from one source
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigOverlay {
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub style: Option<Style>,
    #[serde(
        default,
        rename = "FILE_EXTENSION_SPLIT",
        alias = "file_extension_split"
    )]
    pub file_extension_split: Option<ExtensionSplit>,
    #[serde(default, rename = "NAME_TYPES", alias = "name_types")]
    pub name_types: BTreeMap<String, NameTypeDef>,
    #[serde(default, rename = "ENTITY_NAME_TYPES", alias = "entity_name_types")]
    pub entity_name_types: BTreeMap<Entity, Vec<String>>,
    #[serde(default, rename = "RULES", alias = "rules")]
    pub rules: BTreeMap<String, RuleSetting>,
}
