//! Schema definition
//!
//! A schema is an ordered list of entries, each one saying where a
//! destination field comes from in the source. Entries are applied in
//! declaration order, so when two destinations overlap the later one wins.

use mappet_path::Path;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Per-entry value transform, called as `(value, source)`
pub type Modifier = Arc<dyn Fn(&Value, &Value) -> crate::Result<Value> + Send + Sync>;

/// Per-entry inclusion predicate, called as `(value, source)`
pub type Filter = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// A path as given by the schema author
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    /// Dot/bracket notation, parsed when the mapper is built
    Text(String),

    /// Pre-built segment path
    Path(Path),
}

impl PathSpec {
    /// Parse into a [`Path`].
    ///
    /// # Errors
    ///
    /// Returns an error if the text form is not a valid path, or if an
    /// explicit path holds an index above [`mappet_path::MAX_INDEX`].
    pub fn resolve(&self) -> mappet_path::Result<Path> {
        match self {
            PathSpec::Text(text) => Path::parse(text),
            PathSpec::Path(path) => {
                path.validate()?;
                Ok(path.clone())
            }
        }
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSpec::Text(text) => f.write_str(text),
            PathSpec::Path(path) => write!(f, "{path}"),
        }
    }
}

impl From<&str> for PathSpec {
    fn from(text: &str) -> Self {
        PathSpec::Text(text.to_string())
    }
}

impl From<String> for PathSpec {
    fn from(text: String) -> Self {
        PathSpec::Text(text)
    }
}

impl From<Path> for PathSpec {
    fn from(path: Path) -> Self {
        PathSpec::Path(path)
    }
}

/// One mapping directive: `(destination, source, modifier?, filter?)`
#[derive(Clone)]
pub struct SchemaEntry {
    destination: PathSpec,
    source: PathSpec,
    modifier: Option<Modifier>,
    filter: Option<Filter>,
}

impl SchemaEntry {
    /// Copy the value at `source` to `destination` unchanged.
    pub fn new(destination: impl Into<PathSpec>, source: impl Into<PathSpec>) -> Self {
        Self {
            destination: destination.into(),
            source: source.into(),
            modifier: None,
            filter: None,
        }
    }

    /// Transform the value before it is written.
    #[must_use]
    pub fn modifier(
        self,
        modifier: impl Fn(&Value, &Value) -> crate::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.with_modifier(Arc::new(modifier))
    }

    /// Only write the entry when `filter` accepts the value.
    #[must_use]
    pub fn filter(self, filter: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        self.with_filter(Arc::new(filter))
    }

    /// Shared-modifier variant of [`SchemaEntry::modifier`].
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    /// Shared-filter variant of [`SchemaEntry::filter`].
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn destination(&self) -> &PathSpec {
        &self.destination
    }

    #[must_use]
    pub fn source(&self) -> &PathSpec {
        &self.source
    }

    #[must_use]
    pub fn modifier_fn(&self) -> Option<&Modifier> {
        self.modifier.as_ref()
    }

    #[must_use]
    pub fn filter_fn(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }
}

impl fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("destination", &self.destination)
            .field("source", &self.source)
            .field("has_modifier", &self.modifier.is_some())
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

impl<D, S> From<(D, S)> for SchemaEntry
where
    D: Into<PathSpec>,
    S: Into<PathSpec>,
{
    fn from((destination, source): (D, S)) -> Self {
        Self::new(destination, source)
    }
}

/// Ordered collection of schema entries
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, builder style.
    #[must_use]
    pub fn entry(mut self, entry: impl Into<SchemaEntry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    /// Append an entry.
    pub fn push(&mut self, entry: impl Into<SchemaEntry>) -> &mut Self {
        self.entries.push(entry.into());
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaEntry> {
        self.entries.iter()
    }
}

impl From<Vec<SchemaEntry>> for Schema {
    fn from(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }
}

impl<E: Into<SchemaEntry>> FromIterator<E> for Schema {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for Schema {
    type Item = SchemaEntry;
    type IntoIter = std::vec::IntoIter<SchemaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SchemaEntry;
    type IntoIter = std::slice::Iter<'a, SchemaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
