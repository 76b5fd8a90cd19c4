//! Compiles a single source file of a project.
//!
//! Compiling happens in a few steps:
//!
//! 1. the project's sources are discovered, their content is only read once needed
//! 2. the settings are assembled from the project's settings file and the selected outputs
//! 3. the target file is handed to the [Compiler], imports are answered by an
//!    [ImportResolver] backed by the discovered sources and the dependencies directory
//! 4. the output of the requested contract is picked from the compiler's output
//!
//! If the compiler reports an error, step 4 is skipped and only the diagnostics are returned.

use crate::{
    artifacts::{output_selection::OutputFields, CompilerOutput, Error, Settings, SolcInput},
    compilers::{Compiler, Solc},
    config::ProjectPathsConfig,
    error::{Result, SolcError},
    resolver::ImportResolver,
    sources::{LazySources, SourceReader},
    utils,
};
use std::path::Path;

/// The outcome of compiling a single contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOutcome {
    /// Source unit name of the compiled file
    pub file: String,
    /// Name of the requested contract
    pub contract: String,
    /// All diagnostics the compiler reported, in order
    pub errors: Vec<Error>,
    /// The contract's output, `None` if the compiler reported an error
    pub output: Option<serde_json::Value>,
}

impl CompileOutcome {
    /// Whether the compiler reported an error.
    pub fn has_error(&self) -> bool {
        self.errors.iter().any(Error::is_error)
    }
}

/// Compiles files of the project at [ProjectPathsConfig::root] with a [Compiler].
#[derive(Clone, Debug)]
pub struct ProjectCompiler<C = Solc> {
    paths: ProjectPathsConfig,
    compiler: C,
}

impl<C: Compiler> ProjectCompiler<C> {
    pub fn new(paths: ProjectPathsConfig, compiler: C) -> Self {
        Self { paths, compiler }
    }

    pub fn paths(&self) -> &ProjectPathsConfig {
        &self.paths
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Compiles `source` (relative to the project root) and returns the output of `contract`.
    ///
    /// The contract defaults to the file stem of `source`. Only the outputs in `fields` are
    /// requested; if empty the project's settings decide.
    #[instrument(skip_all, fields(source = %source.as_ref().display()))]
    pub fn compile(
        &self,
        source: impl AsRef<Path>,
        contract: Option<&str>,
        fields: &OutputFields,
    ) -> Result<CompileOutcome> {
        let sources = self.paths.discover()?;
        let settings = self.paths.settings(fields)?;
        self.compile_with(&sources, source.as_ref(), contract, settings)
    }

    /// Same as [Self::compile] but with already discovered sources and assembled settings.
    pub fn compile_with<R: SourceReader>(
        &self,
        sources: &LazySources<R>,
        source: &Path,
        contract: Option<&str>,
        settings: Settings,
    ) -> Result<CompileOutcome> {
        let file = utils::source_unit_name(source);
        let content = sources
            .get(&file)?
            .ok_or_else(|| SolcError::SourceNotFound(file.clone()))?
            .clone();
        let contract = match contract {
            Some(contract) => contract.to_string(),
            None => contract_name(&file),
        };
        debug!(%file, %contract, "compiling");

        let input = SolcInput::new(&file, content, settings);
        let resolver = ImportResolver::new(sources, &self.paths.dependencies);
        let output = self.compiler.compile_standard(&input, &resolver)?;
        let output: CompilerOutput = serde_json::from_str(&output)?;
        trace!(errors = output.errors.len(), contracts = output.contracts.len(), "compiled");

        if output.has_error() {
            debug!("compiler reported errors, skipping contract lookup");
            return Ok(CompileOutcome { file, contract, errors: output.errors, output: None });
        }

        let Some(selected) = output.find(&file, &contract).cloned() else {
            debug!(available = ?output.contract_names(&file).collect::<Vec<_>>());
            return Err(SolcError::UnknownContract { contract, file });
        };
        Ok(CompileOutcome { file, contract, errors: output.errors, output: Some(selected) })
    }
}

/// The name a contract in `file` is assumed to have: the file's stem.
fn contract_name(file: &str) -> String {
    Path::new(file).file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}
