//! Declarative schema DSL
//!
//! Schemas can be written as YAML or JSON documents and compiled against a
//! [`Registry`] into a [`Mapper`]:
//!
//! ```yaml
//! name: users
//! strict_mode: true
//! entries:
//!   - destination: firstName
//!     source: first_name
//!     modifier:
//!       op: uppercase
//!   - destination: gift.message
//!     source: giftMessage
//!     include:
//!       op: source
//!       path: isGift
//!       condition:
//!         op: truthy
//! ```

use crate::mapper::Mapper;
use crate::modifiers;
use crate::options::{DEFAULT_NAME, MapperOptions};
use crate::registry::Registry;
use crate::schema::{Filter, Modifier, Schema, SchemaEntry};
use crate::{Error, Result};
use mappet_path::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A complete declarative schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaDefinition {
    /// Mapper name used in strict-mode errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub strict_mode: bool,

    #[serde(default)]
    pub greedy_mode: bool,

    /// Entries in application order
    #[serde(default)]
    pub entries: Vec<EntryDefinition>,
}

/// One declarative schema entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryDefinition {
    pub destination: String,

    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<ModifierDefinition>,

    /// Filter deciding whether the entry is written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Condition>,
}

/// Modifier operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ModifierDefinition {
    Uppercase,
    Lowercase,
    Trim,
    NullIfEmpty,

    /// Always produce `value`
    Constant { value: Value },

    /// Replace `null` with `value`
    Default { value: Value },

    /// Reformat a date, `chrono` format specifiers
    DateFormat { from: String, to: String },

    /// Apply modifiers left to right
    Chain { modifiers: Vec<ModifierDefinition> },

    /// Apply a modifier to every array element
    Each { modifier: Box<ModifierDefinition> },

    /// Registered modifier (or mapper)
    Named { name: String },
}

/// Inclusion condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    NotNull,
    Truthy,
    Equals { value: Value },

    /// String value matches a regular expression
    Matches { pattern: String },

    /// Evaluate `condition` against the value at `path` in the source
    Source { path: String, condition: Box<Condition> },

    And { conditions: Vec<Condition> },
    Or { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },

    /// Registered filter
    Named { name: String },
}

/// DSL parser
pub struct MappingDsl;

impl MappingDsl {
    /// Parse a schema definition from YAML
    ///
    /// # Errors
    ///
    /// Returns an error when YAML parsing fails.
    pub fn parse(yaml: &str) -> Result<SchemaDefinition> {
        serde_yaml::from_str(yaml).map_err(|e| {
            let location = e
                .location()
                .map(|l| format!(" at line {}, column {}", l.line(), l.column()))
                .unwrap_or_default();
            Error::Parse(format!("Failed to parse DSL: {e}{location}"))
        })
    }

    /// Parse a schema definition from JSON
    ///
    /// # Errors
    ///
    /// Returns an error when JSON parsing fails.
    pub fn parse_json(json: &str) -> Result<SchemaDefinition> {
        serde_json::from_str(json).map_err(|e| {
            Error::Parse(format!(
                "Failed to parse DSL: {e} at line {}, column {}",
                e.line(),
                e.column()
            ))
        })
    }

    /// Parse a schema definition from a file; `.json` files are read as
    /// JSON, everything else as YAML
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn parse_file(path: &std::path::Path) -> Result<SchemaDefinition> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "parsing schema definition");
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Serialize a schema definition to YAML
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_yaml(definition: &SchemaDefinition) -> Result<String> {
        serde_yaml::to_string(definition)
            .map_err(|e| Error::Parse(format!("Failed to serialize: {e}")))
    }
}

impl SchemaDefinition {
    /// Mapper options described by this definition
    #[must_use]
    pub fn options(&self) -> MapperOptions {
        MapperOptions {
            strict_mode: self.strict_mode,
            greedy_mode: self.greedy_mode,
            name: self.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string()),
        }
    }

    /// Build the schema, resolving names against `registry`
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSchemaEntry`] for unknown names, invalid
    /// patterns, or unparsable condition paths.
    pub fn schema(&self, registry: &Registry) -> Result<Schema> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let mut compiled =
                    SchemaEntry::new(entry.destination.as_str(), entry.source.as_str());
                if let Some(modifier) = &entry.modifier {
                    let modifier = build_modifier(modifier, registry)
                        .map_err(|reason| Error::malformed(index, reason))?;
                    compiled = compiled.with_modifier(modifier);
                }
                if let Some(condition) = &entry.include {
                    let filter = build_filter(condition, registry)
                        .map_err(|reason| Error::malformed(index, reason))?;
                    compiled = compiled.with_filter(filter);
                }
                Ok(compiled)
            })
            .collect()
    }

    /// Compile into a [`Mapper`]
    ///
    /// # Errors
    ///
    /// Returns an error when any entry is malformed.
    pub fn compile(&self, registry: &Registry) -> Result<Mapper> {
        Mapper::new(self.schema(registry)?, self.options())
    }
}

fn build_modifier(
    definition: &ModifierDefinition,
    registry: &Registry,
) -> std::result::Result<Modifier, String> {
    Ok(match definition {
        ModifierDefinition::Uppercase => modifiers::uppercase(),
        ModifierDefinition::Lowercase => modifiers::lowercase(),
        ModifierDefinition::Trim => modifiers::trim(),
        ModifierDefinition::NullIfEmpty => modifiers::null_if_empty(),
        ModifierDefinition::Constant { value } => modifiers::constant(value.clone()),
        ModifierDefinition::Default { value } => modifiers::default_to(value.clone()),
        ModifierDefinition::DateFormat { from, to } => modifiers::date_format(from, to),
        ModifierDefinition::Chain { modifiers: steps } => modifiers::chain(
            steps
                .iter()
                .map(|step| build_modifier(step, registry))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        ),
        ModifierDefinition::Each { modifier } => {
            modifiers::each(build_modifier(modifier, registry)?)
        }
        ModifierDefinition::Named { name } => registry
            .modifier(name)
            .ok_or_else(|| format!("unknown modifier '{name}'"))?,
    })
}

fn build_filter(
    condition: &Condition,
    registry: &Registry,
) -> std::result::Result<Filter, String> {
    Ok(match condition {
        Condition::NotNull => modifiers::not_null(),
        Condition::Truthy => modifiers::is_truthy(),
        Condition::Equals { value } => modifiers::equals(value.clone()),
        Condition::Matches { pattern } => {
            modifiers::matches(pattern).map_err(|e| e.to_string())?
        }
        Condition::Source { path, condition } => {
            let path = Path::parse(path).map_err(|e| format!("include: {e}"))?;
            modifiers::on_source(path, build_filter(condition, registry)?)
        }
        Condition::And { conditions } => modifiers::all(build_filters(conditions, registry)?),
        Condition::Or { conditions } => modifiers::any(build_filters(conditions, registry)?),
        Condition::Not { condition } => modifiers::not(build_filter(condition, registry)?),
        Condition::Named { name } => registry
            .filter(name)
            .ok_or_else(|| format!("unknown filter '{name}'"))?,
    })
}

fn build_filters(
    conditions: &[Condition],
    registry: &Registry,
) -> std::result::Result<Vec<Filter>, String> {
    conditions
        .iter()
        .map(|condition| build_filter(condition, registry))
        .collect()
}
