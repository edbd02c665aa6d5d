#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mappet
//!
//! Declarative object mapping for `serde_json` values.
//!
//! A [`Schema`] lists, in order, where each destination field comes from in
//! the source, with an optional per-entry modifier and filter. [`create_mapper`]
//! turns a schema and [`MapperOptions`] into a [`Mapper`], a reusable and
//! stateless transformation from one source value to one result value.
//!
//! ```
//! use mappet::{create_mapper, MapperOptions, Schema, SchemaEntry};
//! use serde_json::json;
//!
//! let schema: Schema = [
//!     SchemaEntry::new("firstName", "first_name"),
//!     SchemaEntry::new("cardNumber", "card.number"),
//! ]
//! .into_iter()
//! .collect();
//! let mapper = create_mapper(schema, MapperOptions::default()).unwrap();
//!
//! let result = mapper
//!     .map(&json!({"first_name": "Michal", "card": {"number": "4444"}}))
//!     .unwrap();
//! assert_eq!(result, json!({"firstName": "Michal", "cardNumber": "4444"}));
//! ```

/// YAML/JSON schema definitions compiled against a registry.
pub mod dsl;
/// Mapper factory and the per-entry mapping loop.
pub mod mapper;
/// Built-in modifiers and filters.
pub mod modifiers;
/// Mapper options: strict mode, greedy mode and error name.
pub mod options;
/// Named modifiers and filters for declarative schemas.
pub mod registry;
/// Schema entries, path specs and the modifier/filter aliases.
pub mod schema;

pub use dsl::{MappingDsl, SchemaDefinition};
pub use mapper::{Mapper, create_mapper};
pub use options::MapperOptions;
pub use registry::Registry;
pub use schema::{Filter, Modifier, PathSpec, Schema, SchemaEntry};

pub use mappet_path::{Path, Segment};

use thiserror::Error;

/// Errors that can occur while building or running a mapper
#[derive(Error, Debug)]
pub enum Error {
    /// Strict mode hit an unfiltered entry whose source path resolved to nothing
    #[error("{name}: {path} not found")]
    MissingField { name: String, path: String },

    /// A schema entry has an unusable shape
    #[error("Malformed schema entry #{index}: {reason}")]
    MalformedSchemaEntry { index: usize, reason: String },

    /// A modifier rejected its input
    #[error("Modifier failed for '{path}': {message}")]
    Modifier { path: String, message: String },

    #[error("DSL parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Path(#[from] mappet_path::Error),
}

impl Error {
    /// Build a missing-field error for the named mapper.
    pub fn missing_field(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingField {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a malformed-entry error for the entry at `index`.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedSchemaEntry {
            index,
            reason: reason.into(),
        }
    }

    /// Build a modifier error; the mapper fills in the path.
    pub fn modifier(message: impl Into<String>) -> Self {
        Self::Modifier {
            path: String::new(),
            message: message.into(),
        }
    }

    /// Attach `path` to a modifier error that does not carry one yet.
    #[must_use]
    pub fn at_path(self, path: &str) -> Self {
        match self {
            Self::Modifier {
                path: existing,
                message,
            } if existing.is_empty() => Self::Modifier {
                path: path.to_string(),
                message,
            },
            other => other,
        }
    }
}

/// Crate-local result type for mapping operations.
pub type Result<T> = std::result::Result<T, Error>;
