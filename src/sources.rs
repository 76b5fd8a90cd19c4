//! Source files and the lazily loaded file map handed to the import resolver.

use crate::error::SolcIoError;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// An ordered list of files and their source
pub type Sources = BTreeMap<PathBuf, Source>;

/// Content of a solidity file
///
/// This contains the actual source code of a file
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Source {
    /// Content of the file
    ///
    /// This is an `Arc` because the same content is handed to the compiler input and kept in
    /// the file map.
    pub content: Arc<String>,
}

impl Source {
    /// Creates a new instance of [Source] with the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: Arc::new(content.into()) }
    }

    /// Reads the file's content as is, line endings included.
    #[instrument(level = "debug", skip_all, err)]
    pub fn read(file: impl AsRef<Path>) -> Result<Self, SolcIoError> {
        let file = file.as_ref();
        trace!(file=%file.display());
        let content = fs::read_to_string(file).map_err(|err| SolcIoError::new(err, file))?;
        Ok(Self::new(content))
    }
}

impl AsRef<str> for Source {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

/// Loads the content of a source file, see [LazySources].
pub trait SourceReader {
    fn read(&self, path: &Path) -> Result<Source, SolcIoError>;
}

impl<F: Fn(&Path) -> Result<Source, SolcIoError>> SourceReader for F {
    fn read(&self, path: &Path) -> Result<Source, SolcIoError> {
        (self)(path)
    }
}

/// Reads sources from disk, relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsReader {
    root: PathBuf,
}

impl FsReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceReader for FsReader {
    fn read(&self, path: &Path) -> Result<Source, SolcIoError> {
        Source::read(self.root.join(path))
    }
}

/// A read-only map of source files whose content is loaded on first access.
///
/// Every key is read at most once through the [SourceReader]; later lookups return the cached
/// [Source]. Keys that are never looked up are never read.
pub struct LazySources<R = FsReader> {
    reader: R,
    entries: BTreeMap<PathBuf, OnceCell<Source>>,
}

impl<R: SourceReader> LazySources<R> {
    pub fn new<I, T>(files: I, reader: R) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PathBuf>,
    {
        let entries = files.into_iter().map(|file| (file.into(), OnceCell::new())).collect();
        Self { reader, entries }
    }

    /// Returns `true` if `path` is one of the map's keys. Does not load the file.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    /// Returns the content of `path`, reading it on first access.
    ///
    /// Returns `Ok(None)` if `path` is not a key of this map.
    pub fn get(&self, path: impl AsRef<Path>) -> Result<Option<&Source>, SolcIoError> {
        let path = path.as_ref();
        let Some(entry) = self.entries.get(path) else { return Ok(None) };
        entry
            .get_or_try_init(|| {
                debug!(file = %path.display(), "loading source");
                self.reader.read(path)
            })
            .map(Some)
    }

    /// Returns `true` if the content of `path` has already been read.
    pub fn is_loaded(&self, path: impl AsRef<Path>) -> bool {
        self.entries.get(path.as_ref()).map(|entry| entry.get().is_some()).unwrap_or_default()
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// All keys of the map, in order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> fmt::Debug for LazySources<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(path, entry)| (path, entry.get().is_some())))
            .finish()
    }
}
