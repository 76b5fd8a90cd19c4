use crate::{
    artifacts::{output_selection::OutputFields, Settings},
    error::{Result, SolcError},
    resolver::DEPENDENCIES_DIR,
    sources::{FsReader, LazySources},
    utils,
};
use std::path::{Path, PathBuf};

/// Name of the project's compiler settings file, relative to the root.
pub const SETTINGS_FILE: &str = "solc.json";

/// Where to find all files of a project
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectPathsConfig {
    /// Project root
    pub root: PathBuf,
    /// The compiler settings file, replaces the default settings if present
    pub settings: PathBuf,
    /// Where third party sources are resolved from
    pub dependencies: PathBuf,
    /// Directories that are never searched for sources, relative to the root
    pub excluded: Vec<PathBuf>,
}

impl ProjectPathsConfig {
    /// The layout of a project rooted at `root`: `solc.json` settings, `node_modules`
    /// dependencies, and the `test` and `tmp` directories excluded from discovery.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            settings: root.join(SETTINGS_FILE),
            dependencies: root.join(DEPENDENCIES_DIR),
            excluded: vec![PathBuf::from("test"), PathBuf::from("tmp")],
            root,
        }
    }

    /// Returns the current working dir as project root.
    pub fn current() -> Result<Self> {
        let root = std::env::current_dir().map_err(|err| SolcError::io(err, "."))?;
        Ok(Self::new(root))
    }

    #[must_use]
    pub fn with_settings(mut self, settings: impl Into<PathBuf>) -> Self {
        self.settings = settings.into();
        self
    }

    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl Into<PathBuf>) -> Self {
        self.dependencies = dependencies.into();
        self
    }

    #[must_use]
    pub fn with_excluded<I, P>(mut self, excluded: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.excluded = excluded.into_iter().map(Into::into).collect();
        self
    }

    /// Returns all source files of the project, relative to the root.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn discover(&self) -> Result<LazySources> {
        let files = utils::source_files(&self.root, &self.excluded)?;
        debug!(files = files.len(), "discovered sources");
        Ok(LazySources::new(files, FsReader::new(&self.root)))
    }

    /// The compiler settings for this project with `fields` selected.
    ///
    /// Reads the settings file if there is one, otherwise starts from [Settings::default].
    pub fn settings(&self, fields: &OutputFields) -> Result<Settings> {
        let settings = if self.settings.is_file() {
            debug!(file = %self.settings.display(), "reading settings");
            Settings::read(&self.settings)?
        } else {
            Settings::default()
        };
        Ok(settings.with_selected_outputs(fields))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
