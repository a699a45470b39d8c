//! Entity classification
//!
//!     Maps a raw name to its [`Entity`] and decomposes it into the parts naming rules work on.
//!
//!         PTREE-1.0.0//        META (ROOT when it is the root line), bare `PTREE`, version `1.0.0`
//!         src/                 DIR, bare `src`
//!         II_chapter/          NUMERAL `II` + DIR `chapter`
//!         (index)-readme.md    index file, FILE `readme` + EXT `md`
//!         archive.tar.gz       FILE `archive` + EXT `tar`, EXT `gz` (firstDot)
//!         lib-2.1.0.tar.gz     FILE `lib`, version `2.1.0`, EXT `tar`, EXT `gz`
//!
//!     The bare name is what NAME_TYPE patterns see: markers, numeral prefix, index prefix,
//!     leading hidden dot, extension and version suffix all removed.
//!
//!     Classification is a pure function of `(name, split strategy)`.
pub mod registry;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ptree::config::{ExtensionSplit, PtreeConfig};

pub use registry::{CompiledNameType, NameTypeError, NameTypeRegistry};

/// Trailing marker of labels and meta entries
pub const META_MARKER: &str = "//";
/// Trailing marker of directories
pub const DIR_MARKER: char = '/';
/// Prefix flagging an index file
pub const INDEX_PREFIX: &str = "(index)";

static NUMERAL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([IVXLCDM]+)_(.+)$").unwrap());

static CANONICAL_ROMAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})$").unwrap()
});

static STEM_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<bare>.*?[^-_.])(?P<delim>[-_])(?P<version>v?\d+(?:\.\d+)+)$").unwrap()
});

static FILE_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<bare>.*?[^-_.])(?P<delim>[-_])(?P<version>v?\d+(?:\.\d+)+)(?P<ext>(?:\.[A-Za-z][A-Za-z0-9]*)*)$",
    )
    .unwrap()
});

static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)(?:-(?:0|[1-9]\d*|\d*[A-Za-z-][0-9A-Za-z-]*)(?:\.(?:0|[1-9]\d*|\d*[A-Za-z-][0-9A-Za-z-]*))*)?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$",
    )
    .unwrap()
});

/// What a name denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Entity {
    #[serde(alias = "root")]
    Root,
    #[serde(alias = "dir")]
    Dir,
    #[serde(alias = "file")]
    File,
    #[serde(alias = "ext")]
    Ext,
    #[serde(alias = "meta")]
    Meta,
    #[serde(alias = "numeral")]
    Numeral,
}

impl Entity {
    pub const ALL: [Entity; 6] = [
        Entity::Root,
        Entity::Dir,
        Entity::File,
        Entity::Ext,
        Entity::Meta,
        Entity::Numeral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Root => "ROOT",
            Entity::Dir => "DIR",
            Entity::File => "FILE",
            Entity::Ext => "EXT",
            Entity::Meta => "META",
            Entity::Numeral => "NUMERAL",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trailing `<delimiter><version>` suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSuffix {
    pub delimiter: char,
    pub version: String,
}

/// The decomposition of one name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub entity: Entity,
    /// Name without markers and extension (version suffix included)
    pub stem: Option<String>,
    /// Full extension without the leading dot, e.g. `tar.gz`
    pub extension: Option<String>,
    /// Extension split into its EXT segments
    pub extension_segments: Vec<String>,
    pub numeral_prefix: Option<String>,
    pub is_index_file: bool,
    pub hidden: bool,
    pub version: Option<VersionSuffix>,
    /// What NAME_TYPE patterns are matched against
    pub bare_name: String,
}

impl Classification {
    fn new(entity: Entity) -> Self {
        Self {
            entity,
            stem: None,
            extension: None,
            extension_segments: Vec::new(),
            numeral_prefix: None,
            is_index_file: false,
            hidden: false,
            version: None,
            bare_name: String::new(),
        }
    }

    /// Whether the name carries a directory or meta marker
    pub fn is_container(&self) -> bool {
        matches!(self.entity, Entity::Dir | Entity::Meta | Entity::Root)
    }
}

/// Classify a node name with the configured extension split strategy.
pub fn classify(name: &str, config: &PtreeConfig) -> Classification {
    classify_with_split(name, config.file_extension_split)
}

/// Classify a node name.
pub fn classify_with_split(name: &str, split: ExtensionSplit) -> Classification {
    if let Some(base) = name.strip_suffix(META_MARKER) {
        return container(Entity::Meta, base);
    }

    let (numeral, rest) = match NUMERAL_PREFIX.captures(name) {
        Some(captures) => {
            let numeral = captures.get(1).map(|m| m.as_str().to_string());
            let rest = captures.get(2).map_or(name, |m| m.as_str());
            (numeral, rest)
        }
        None => (None, name),
    };

    let mut classification = if let Some(base) = rest.strip_suffix(DIR_MARKER) {
        container(Entity::Dir, base)
    } else if let Some(indexed) = rest.strip_prefix(INDEX_PREFIX) {
        let indexed = indexed.strip_prefix(['-', '_']).unwrap_or(indexed);
        let mut index_file = match indexed.strip_prefix('.') {
            // `(index).md`: an extension and nothing else
            Some(extension) if !extension.is_empty() => {
                let mut only_extension = Classification::new(Entity::File);
                only_extension.stem = Some(String::new());
                set_extension(&mut only_extension, extension);
                only_extension
            }
            _ => file(indexed, split),
        };
        index_file.is_index_file = true;
        index_file
    } else {
        file(rest, split)
    };
    classification.numeral_prefix = numeral;
    classification
}

/// Classify the value of a root line.
pub fn classify_root(value: &str) -> Classification {
    let base = value
        .strip_suffix(META_MARKER)
        .or_else(|| value.strip_suffix(DIR_MARKER))
        .unwrap_or(value);
    container(Entity::Root, base)
}

fn container(entity: Entity, base: &str) -> Classification {
    let mut classification = Classification::new(entity);
    let (hidden, body) = strip_hidden(base);
    classification.hidden = hidden;
    classification.stem = Some(base.to_string());
    match STEM_VERSION.captures(body) {
        Some(captures) => {
            classification.bare_name = captures["bare"].to_string();
            classification.version = version_suffix(&captures);
        }
        None => classification.bare_name = body.to_string(),
    }
    classification
}

fn file(name: &str, split: ExtensionSplit) -> Classification {
    let mut classification = Classification::new(Entity::File);
    let (hidden, body) = strip_hidden(name);
    classification.hidden = hidden;

    if let Some(captures) = FILE_VERSION.captures(body) {
        let ext = &captures["ext"];
        let stem_len = body.len() - ext.len();
        classification.stem = Some(body[..stem_len].to_string());
        classification.bare_name = captures["bare"].to_string();
        classification.version = version_suffix(&captures);
        if let Some(extension) = ext.strip_prefix('.') {
            set_extension(&mut classification, extension);
        }
        return classification;
    }

    let parts = match split {
        ExtensionSplit::FirstDot => body.split_once('.'),
        ExtensionSplit::LastDot => body.rsplit_once('.'),
    };
    match parts {
        Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
            classification.stem = Some(stem.to_string());
            classification.bare_name = stem.to_string();
            set_extension(&mut classification, extension);
        }
        _ => {
            classification.stem = Some(body.to_string());
            classification.bare_name = body.to_string();
        }
    }
    classification
}

fn set_extension(classification: &mut Classification, extension: &str) {
    classification.extension = Some(extension.to_string());
    classification.extension_segments = extension
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
}

fn strip_hidden(name: &str) -> (bool, &str) {
    match name.strip_prefix('.') {
        Some(rest) if !rest.is_empty() && !rest.starts_with('.') => (true, rest),
        _ => (false, name),
    }
}

fn version_suffix(captures: &regex::Captures<'_>) -> Option<VersionSuffix> {
    let delimiter = captures["delim"].chars().next()?;
    Some(VersionSuffix {
        delimiter,
        version: captures["version"].to_string(),
    })
}

/// Whether a numeral prefix is a well-formed Roman numeral (`IV`, not `IIII`).
pub fn is_canonical_roman(numeral: &str) -> bool {
    !numeral.is_empty() && CANONICAL_ROMAN.is_match(numeral)
}

/// Semantic Versioning 2.0.0 check
pub fn is_semver(version: &str) -> bool {
    SEMVER.is_match(version)
}

/// A bare name that uses both `-` and `_` as word delimiters.
pub fn has_mixed_delimiters(bare_name: &str) -> bool {
    bare_name.contains('-') && bare_name.contains('_')
}
