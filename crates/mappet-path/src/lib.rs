#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mappet-path
//!
//! Deep-path access for `serde_json` values.
//!
//! A [`Path`] addresses a possibly nested location inside a tree of objects
//! and arrays. Paths are written in dot/bracket notation (`"a.b[1].c"`,
//! `"meta[\"x.y\"]"`) or built from explicit [`Segment`]s. [`get`] resolves a
//! path without touching the tree, [`set`] writes through it and creates the
//! containers it needs on the way.

/// Reading and writing values through a path.
pub mod access;
/// Path and segment types plus the dot/bracket parser.
pub mod path;

pub use access::{get, get_mut, set};
pub use path::{MAX_INDEX, Path, Segment};

use thiserror::Error;

/// Errors that can occur when parsing paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-local result type for path operations.
pub type Result<T> = std::result::Result<T, Error>;
