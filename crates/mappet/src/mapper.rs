//! Mapper factory and runtime

use crate::modifiers;
use crate::options::MapperOptions;
use crate::schema::{Filter, Modifier, Schema};
use crate::{Error, Result};
use mappet_path::Path;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

static NULL: Value = Value::Null;

/// Schema entry with parsed paths and resolved defaults
struct CompiledEntry {
    destination: Path,
    source: Path,

    /// Source path as the schema author wrote it, for error messages
    source_text: String,

    modifier: Modifier,
    filter: Filter,
}

/// A reusable transformation from one source value to one result value.
///
/// Cloning is cheap; clones share the compiled schema. Running a mapper
/// never mutates the source and keeps no state between calls, so a mapper
/// can be shared across threads as long as its modifiers and filters are.
#[derive(Clone)]
pub struct Mapper {
    entries: Arc<[CompiledEntry]>,
    options: Arc<MapperOptions>,
}

/// Build a [`Mapper`] from a schema and options.
///
/// # Errors
///
/// Returns [`Error::MalformedSchemaEntry`] if any destination or source path
/// cannot be parsed, or if a destination addresses the root.
pub fn create_mapper(schema: Schema, options: MapperOptions) -> Result<Mapper> {
    Mapper::new(schema, options)
}

impl Mapper {
    /// See [`create_mapper`].
    ///
    /// # Errors
    ///
    /// Returns an error when a schema entry is malformed.
    pub fn new(schema: Schema, options: MapperOptions) -> Result<Self> {
        let entries = schema
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let destination = entry
                    .destination()
                    .resolve()
                    .map_err(|e| Error::malformed(index, format!("destination: {e}")))?;
                if destination.is_root() {
                    return Err(Error::malformed(index, "destination path is empty"));
                }
                let source = entry
                    .source()
                    .resolve()
                    .map_err(|e| Error::malformed(index, format!("source: {e}")))?;

                Ok(CompiledEntry {
                    destination,
                    source,
                    source_text: entry.source().to_string(),
                    modifier: entry
                        .modifier_fn()
                        .cloned()
                        .unwrap_or_else(modifiers::identity),
                    filter: entry.filter_fn().cloned().unwrap_or_else(modifiers::accept),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            name = %options.name,
            entries = entries.len(),
            strict = options.strict_mode,
            greedy = options.greedy_mode,
            "created mapper"
        );

        Ok(Self {
            entries: entries.into(),
            options: Arc::new(options),
        })
    }

    /// Map `source` into a new result value.
    ///
    /// Entries run in schema order: resolve the source path, ask the filter,
    /// check strictness, apply the modifier, write the destination. A value
    /// missing from the source is seen by filters and modifiers as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] in strict mode when an entry that was
    /// not filtered out resolves to nothing, and [`Error::Modifier`] (or
    /// whatever a nested mapper raised) when a modifier fails. No partial
    /// result is returned.
    pub fn map(&self, source: &Value) -> Result<Value> {
        let mut result = self.initial_result(source);

        for entry in self.entries.iter() {
            let resolved = mappet_path::get(source, &entry.source);
            let value = resolved.unwrap_or(&NULL);

            if !(entry.filter)(value, source) {
                trace!(source = %entry.source_text, "entry filtered out");
                continue;
            }

            if self.options.strict_mode && resolved.is_none() {
                debug!(name = %self.options.name, source = %entry.source_text, "required field missing");
                return Err(Error::missing_field(&self.options.name, &entry.source_text));
            }

            let modified =
                (entry.modifier)(value, source).map_err(|e| e.at_path(&entry.source_text))?;
            mappet_path::set(&mut result, &entry.destination, modified);
        }

        Ok(result)
    }

    /// Empty object, or the source's top-level fields in greedy mode.
    fn initial_result(&self, source: &Value) -> Value {
        if !self.options.greedy_mode {
            return Value::Object(Map::new());
        }
        match source {
            Value::Object(fields) => Value::Object(fields.clone()),
            other => {
                debug!(
                    name = %self.options.name,
                    kind = modifiers::kind(other),
                    "greedy mode needs an object source, starting empty"
                );
                Value::Object(Map::new())
            }
        }
    }

    /// Use this mapper as a modifier inside another schema.
    ///
    /// The outer source is ignored; the entry's value is mapped.
    #[must_use]
    pub fn as_modifier(&self) -> Modifier {
        let mapper = self.clone();
        modifiers::modifier_from(move |value, _| mapper.map(value))
    }

    /// Modifier mapping every element of an array with this mapper.
    #[must_use]
    pub fn each(&self) -> Modifier {
        modifiers::each(self.as_modifier())
    }

    #[must_use]
    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.options.name
    }

    /// Number of schema entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("options", &self.options)
            .field("entries", &self.entries.len())
            .finish()
    }
}
