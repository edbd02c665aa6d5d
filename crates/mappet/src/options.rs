//! Mapper options

use serde::{Deserialize, Serialize};

/// Name used in error messages when none is configured.
pub const DEFAULT_NAME: &str = "Mappet";

/// Options controlling how a mapper treats its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperOptions {
    /// Fail instead of writing `null` when a source path resolves to nothing
    pub strict_mode: bool,

    /// Start the result from a copy of the source's top-level fields
    pub greedy_mode: bool,

    /// Label used in strict-mode error messages
    pub name: String,
}

impl MapperOptions {
    /// Default options: lenient, non-greedy, named `Mappet`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    #[must_use]
    pub fn with_greedy_mode(mut self, greedy_mode: bool) -> Self {
        self.greedy_mode = greedy_mode;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            strict_mode: false,
            greedy_mode: false,
            name: DEFAULT_NAME.to_string(),
        }
    }
}
