//! Resolution of the sources the compiler requests while compiling.

use crate::sources::{FsReader, LazySources, Source, SourceReader};
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// Name of the directory third party sources are resolved from.
pub const DEPENDENCIES_DIR: &str = "node_modules";

/// Outcome of a single import lookup.
///
/// Serializes to the shape solc expects from an import callback: `{"contents": ...}` or
/// `{"error": ...}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportResult {
    Found(Source),
    NotFound { path: String },
}

impl ImportResult {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the content if the import was found.
    pub fn into_source(self) -> Option<Source> {
        match self {
            Self::Found(source) => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

impl fmt::Display for ImportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(source) => write!(f, "found ({} bytes)", source.content.len()),
            Self::NotFound { path } => write!(f, "File \"{path}\" not found"),
        }
    }
}

impl Serialize for ImportResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Found(source) => map.serialize_entry("contents", source.content.as_str())?,
            Self::NotFound { .. } => map.serialize_entry("error", &self.to_string())?,
        }
        map.end()
    }
}

/// Answers the compiler's requests for sources it could not find in its input.
///
/// Implementations are called synchronously, possibly many times during a single compilation,
/// and report failure through [ImportResult::NotFound] instead of an error.
pub trait ImportCallback {
    fn load(&self, path: &str) -> ImportResult;
}

impl<F: Fn(&str) -> ImportResult> ImportCallback for F {
    fn load(&self, path: &str) -> ImportResult {
        (self)(path)
    }
}

/// Resolves imports against the project's sources first, then the dependencies directory.
#[derive(Debug)]
pub struct ImportResolver<'a, R = FsReader> {
    sources: &'a LazySources<R>,
    dependencies: PathBuf,
}

impl<'a, R: SourceReader> ImportResolver<'a, R> {
    pub fn new(sources: &'a LazySources<R>, dependencies: impl Into<PathBuf>) -> Self {
        Self { sources, dependencies: dependencies.into() }
    }

    /// Looks up `path` in the file map, then under the dependencies directory.
    pub fn resolve(&self, path: &str) -> ImportResult {
        if self.sources.contains(path) {
            match self.sources.get(path) {
                Ok(Some(source)) => return ImportResult::Found(source.clone()),
                Ok(None) => {}
                Err(err) => {
                    warn!(%err, "failed to read source");
                    return ImportResult::not_found(path);
                }
            }
        }

        let dependency = self.dependencies.join(path);
        if dependency.is_file() {
            match Source::read(&dependency) {
                Ok(source) => return ImportResult::Found(source),
                Err(err) => warn!(%err, "failed to read dependency"),
            }
        }

        trace!(path, "import not found");
        ImportResult::not_found(path)
    }
}

impl<R: SourceReader> ImportCallback for ImportResolver<'_, R> {
    fn load(&self, path: &str) -> ImportResult {
        self.resolve(path)
    }
}
