//! Configuration loader for the ptree toolchain.
//!
//! `defaults/ptree.default.toml` is embedded so every consumer starts from the same baseline.
//! Callers layer their own files on top via [`Loader`]; the merged tree is deserialized into a
//! [`ConfigOverlay`] and applied over [`PtreeConfig::default`], which carries the built-in
//! NAME_TYPE registry.
//!
//! File formats follow the file extension (`.toml`, `.json`, `.yaml`, ...).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use std::path::Path;

pub use ptree::ptree::config::{ConfigOverlay, PtreeConfig};

const DEFAULT_TOML: &str = include_str!("../defaults/ptree.default.toml");

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer configuration text in a known format.
    pub fn with_str(mut self, contents: &str, format: FileFormat) -> Self {
        self.builder = self.builder.add_source(File::from_str(contents, format));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and merge the result over the engine defaults.
    pub fn build(self) -> Result<PtreeConfig, ConfigError> {
        let overlay: ConfigOverlay = self.builder.build()?.try_deserialize()?;
        let config = PtreeConfig::default().merge(overlay);
        tracing::debug!(
            profile = %config.profile,
            name_types = config.name_types.len(),
            rules = config.rules.len(),
            "loaded ptree configuration"
        );
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PtreeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptree::ptree::config::{ExtensionSplit, Profile, Style};
    use ptree::ptree::naming::Entity;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.profile, Profile::Default);
        assert_eq!(config.file_extension_split, ExtensionSplit::FirstDot);
        assert_eq!(config.style, None);
        assert!(config.name_types.contains_key("SNAKE_TYPE"));
        assert_eq!(config, PtreeConfig::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("profile", "spec")
            .expect("override to apply")
            .set_override("style", "ascii")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.profile, Profile::Spec);
        assert_eq!(config.style, Some(Style::Ascii));
    }

    #[test]
    fn layers_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            r#"
FILE_EXTENSION_SPLIT = "lastDot"

[NAME_TYPES.UPPER_ONLY]
pattern = "^[A-Z]+$"
word_delimiter = "none"

[ENTITY_NAME_TYPES]
DIR = ["UPPER_ONLY"]

[RULES]
PT009 = {{ enabled = true, case_sensitive = true }}
PT003 = "error"
"#
        )
        .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.file_extension_split, ExtensionSplit::LastDot);
        assert_eq!(config.name_types["UPPER_ONLY"].pattern, "^[A-Z]+$");
        assert_eq!(config.entity_name_types[&Entity::Dir], vec!["UPPER_ONLY"]);
        // Other entities keep their built-in lists
        assert!(config.entity_name_types.contains_key(&Entity::File));
        let pt009 = config.rule("PT009").expect("PT009 configured").options();
        assert_eq!(pt009.enabled, Some(true));
        assert_eq!(pt009.case_sensitive, Some(true));
    }

    #[test]
    fn layers_json_text() {
        let config = Loader::new()
            .with_str(r#"{ "RULES": { "PT001": false } }"#, FileFormat::Json)
            .build()
            .expect("config to build");
        assert_eq!(
            config.rule("PT001").and_then(|setting| setting.options().enabled),
            Some(false)
        );
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/definitely/not/here/ptree.toml").build();
        assert!(result.is_err());
        let optional = Loader::new()
            .with_optional_file("/definitely/not/here/ptree.toml")
            .build();
        assert!(optional.is_ok());
    }

    #[test]
    fn rejects_unknown_profile() {
        let result = Loader::new().set_override("profile", "strict").and_then(Loader::build);
        assert!(result.is_err());
    }
}
