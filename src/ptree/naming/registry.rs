//! Compiled NAME_TYPE registry
//!
//!     Compiles the configured patterns once per validation run and answers "which of an
//!     entity's allowed name types does this bare name match". Patterns that fail to compile are
//!     reported and left out: a name can never match them, which surfaces as a naming diagnostic
//!     rather than an abort.
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use super::Entity;
use crate::ptree::config::{NameTypeDef, PtreeConfig};

/// A NAME_TYPE whose pattern compiled
#[derive(Debug, Clone)]
pub struct CompiledNameType {
    pub id: String,
    pub regex: Regex,
    pub def: NameTypeDef,
}

impl CompiledNameType {
    pub fn is_match(&self, bare_name: &str) -> bool {
        self.regex.is_match(bare_name)
    }
}

/// A NAME_TYPE definition that cannot be used as configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTypeError {
    InvalidPattern { id: String, message: String },
    /// Reported by [`NameTypeRegistry::self_check`]
    RejectsExample { id: String, example: String },
    AcceptsCounterExample { id: String, example: String },
}

impl fmt::Display for NameTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameTypeError::InvalidPattern { id, message } => {
                write!(f, "NAME_TYPE {} has an invalid pattern: {}", id, message)
            }
            NameTypeError::RejectsExample { id, example } => {
                write!(f, "NAME_TYPE {} rejects its example {:?}", id, example)
            }
            NameTypeError::AcceptsCounterExample { id, example } => {
                write!(f, "NAME_TYPE {} accepts its counter-example {:?}", id, example)
            }
        }
    }
}

impl std::error::Error for NameTypeError {}

#[derive(Debug, Clone, Default)]
pub struct NameTypeRegistry {
    types: BTreeMap<String, CompiledNameType>,
    entities: BTreeMap<Entity, Vec<String>>,
    problems: Vec<NameTypeError>,
}

impl NameTypeRegistry {
    pub fn compile(config: &PtreeConfig) -> Self {
        let mut registry = Self {
            entities: config.entity_name_types.clone(),
            ..Self::default()
        };
        for (id, def) in &config.name_types {
            match Regex::new(&def.pattern) {
                Ok(regex) => {
                    registry.types.insert(
                        id.clone(),
                        CompiledNameType {
                            id: id.clone(),
                            regex,
                            def: def.clone(),
                        },
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        name_type = %id,
                        error = %err,
                        "ignoring NAME_TYPE with invalid pattern"
                    );
                    registry.problems.push(NameTypeError::InvalidPattern {
                        id: id.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }
        registry
    }

    pub fn get(&self, id: &str) -> Option<&CompiledNameType> {
        self.types.get(id)
    }

    /// Ids allowed for `entity`; `None` when the entity is unconstrained.
    pub fn allowed(&self, entity: Entity) -> Option<&[String]> {
        self.entities.get(&entity).map(Vec::as_slice)
    }

    /// The entity's allowed name types that match `bare_name`.
    ///
    /// `None` when the entity has no ENTITY_NAME_TYPES entry. Ids without a usable definition
    /// never match.
    pub fn matching(&self, entity: Entity, bare_name: &str) -> Option<Vec<&CompiledNameType>> {
        let allowed = self.allowed(entity)?;
        Some(
            allowed
                .iter()
                .filter_map(|id| self.types.get(id))
                .filter(|name_type| name_type.is_match(bare_name))
                .collect(),
        )
    }

    /// Problems found while compiling
    pub fn problems(&self) -> &[NameTypeError] {
        &self.problems
    }

    /// Verify every definition against its own examples and counter-examples.
    pub fn self_check(&self) -> Vec<NameTypeError> {
        let mut errors = self.problems.clone();
        for (id, name_type) in &self.types {
            for example in &name_type.def.examples {
                if !name_type.is_match(example) {
                    errors.push(NameTypeError::RejectsExample {
                        id: id.clone(),
                        example: example.clone(),
                    });
                }
            }
            for example in &name_type.def.counter_examples {
                if name_type.is_match(example) {
                    errors.push(NameTypeError::AcceptsCounterExample {
                        id: id.clone(),
                        example: example.clone(),
                    });
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_consistent() {
        let registry = NameTypeRegistry::compile(&PtreeConfig::default());
        assert_eq!(registry.self_check(), vec![]);
    }

    #[test]
    fn test_matching_by_entity() {
        let registry = NameTypeRegistry::compile(&PtreeConfig::default());
        let ids = |entity, name| -> Vec<String> {
            registry
                .matching(entity, name)
                .unwrap_or_default()
                .iter()
                .map(|t| t.id.clone())
                .collect()
        };
        assert!(ids(Entity::Dir, "src").contains(&"SNAKE_TYPE".to_string()));
        assert!(ids(Entity::Dir, "my.project.name").is_empty());
        assert_eq!(ids(Entity::File, "my.project.name"), vec!["DOT_TYPE"]);
        assert_eq!(registry.matching(Entity::Numeral, "IV").map(|m| m.len()), None);
    }

    #[test]
    fn test_invalid_pattern_is_reported_not_fatal() {
        let mut config = PtreeConfig::empty();
        config
            .name_types
            .insert("BROKEN".to_string(), NameTypeDef::new("([a-z", None));
        config
            .entity_name_types
            .insert(Entity::Dir, vec!["BROKEN".to_string(), "MISSING".to_string()]);
        let registry = NameTypeRegistry::compile(&config);

        assert!(matches!(
            registry.problems(),
            [NameTypeError::InvalidPattern { id, .. }] if id == "BROKEN"
        ));
        assert_eq!(registry.matching(Entity::Dir, "src").map(|m| m.len()), Some(0));
    }

    #[test]
    fn test_self_check_flags_bad_examples() {
        let mut config = PtreeConfig::empty();
        config.name_types.insert(
            "LOWER".to_string(),
            NameTypeDef::new("^[a-z]+$", None).with_examples(&["Upper"], &["lower"]),
        );
        let errors = NameTypeRegistry::compile(&config).self_check();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "NAME_TYPE LOWER rejects its example \"Upper\""
        );
    }
}
