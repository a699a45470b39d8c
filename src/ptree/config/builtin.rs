//! Built-in naming registry
//!
//! Patterns match bare names: markers, extensions and version suffixes are already gone.
use std::collections::BTreeMap;

use super::NameTypeDef;
use crate::ptree::naming::Entity;

pub const SCREAM_TYPE: &str = "SCREAM_TYPE";
pub const HIGH_TYPE: &str = "HIGH_TYPE";
pub const CAMEL_TYPE: &str = "CAMEL_TYPE";
pub const PASCAL_TYPE: &str = "PASCAL_TYPE";
pub const SNAKE_TYPE: &str = "SNAKE_TYPE";
pub const KEBAB_TYPE: &str = "KEBAB_TYPE";
pub const DOT_TYPE: &str = "DOT_TYPE";
pub const EXT_TYPE: &str = "EXT_TYPE";

pub fn name_types() -> BTreeMap<String, NameTypeDef> {
    let definitions = [
        (
            SCREAM_TYPE,
            NameTypeDef::new(r"^[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*$", Some('_'))
                .with_version_delimiters(&['-'])
                .with_examples(
                    &["PTREE", "MY_PROJECT", "README"],
                    &["my_project", "My_Project", "MY-PROJECT"],
                ),
        ),
        (
            HIGH_TYPE,
            NameTypeDef::new(r"^[A-Z][A-Z0-9]*(?:-[A-Z0-9]+)*$", Some('-'))
                .with_version_delimiters(&['_'])
                .with_examples(&["PTREE", "MY-PROJECT"], &["my-project", "MY_PROJECT"]),
        ),
        (
            CAMEL_TYPE,
            NameTypeDef::new(r"^[a-z][a-z0-9]*(?:[A-Z][a-z0-9]*)*$", None)
                .with_version_delimiters(&['-', '_'])
                .with_examples(
                    &["main", "myProject", "getHTTP"],
                    &["MyProject", "my_project", "my-project"],
                ),
        ),
        (
            PASCAL_TYPE,
            NameTypeDef::new(r"^[A-Z][a-z0-9]*(?:[A-Z][a-z0-9]*)*$", None)
                .with_version_delimiters(&['-', '_'])
                .with_examples(
                    &["Folder", "MyProject"],
                    &["myProject", "My_Project", "My-Project"],
                ),
        ),
        (
            SNAKE_TYPE,
            NameTypeDef::new(r"^[a-z][a-z0-9]*(?:_[a-z0-9]+)*$", Some('_'))
                .with_version_delimiters(&['-'])
                .with_examples(
                    &["src", "my_module", "v2_api"],
                    &["MyModule", "my-module", "my__module"],
                ),
        ),
        (
            KEBAB_TYPE,
            NameTypeDef::new(r"^[a-z][a-z0-9]*(?:-[a-z0-9]+)*$", Some('-'))
                .with_version_delimiters(&['_'])
                .with_examples(&["readme", "my-app"], &["my_app", "MyApp", "my--app"]),
        ),
        (
            DOT_TYPE,
            NameTypeDef::new(r"^[a-z0-9]+(?:\.[a-z0-9]+)+$", Some('.'))
                .with_version_delimiters(&['-', '_'])
                .with_examples(&["my.project.name", "jquery.min"], &["my_project", "plain"]),
        ),
        (
            EXT_TYPE,
            NameTypeDef::new(r"^[a-z0-9]+$", None)
                .with_examples(&["md", "rs", "gz", "mp4"], &["TXT", "Md", "tar.gz"]),
        ),
    ];
    definitions
        .into_iter()
        .map(|(id, def)| (id.to_string(), def))
        .collect()
}

pub fn entity_name_types() -> BTreeMap<Entity, Vec<String>> {
    let containers = [SNAKE_TYPE, KEBAB_TYPE, CAMEL_TYPE, PASCAL_TYPE, SCREAM_TYPE, HIGH_TYPE];
    let ids = |list: &[&str]| list.iter().map(|id| id.to_string()).collect::<Vec<_>>();

    let mut files = ids(&containers);
    files.push(DOT_TYPE.to_string());

    BTreeMap::from([
        (
            Entity::Root,
            ids(&[SCREAM_TYPE, HIGH_TYPE, PASCAL_TYPE, KEBAB_TYPE, SNAKE_TYPE]),
        ),
        (Entity::Dir, ids(&containers)),
        (Entity::File, files),
        (Entity::Ext, ids(&[EXT_TYPE])),
        (
            Entity::Meta,
            ids(&[SCREAM_TYPE, HIGH_TYPE, PASCAL_TYPE, SNAKE_TYPE, KEBAB_TYPE]),
        ),
    ])
}
