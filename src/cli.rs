//! The `ethtools` command line.

use crate::{
    artifacts::{output_selection::OutputFields, settings::EvmVersion},
    compile::{CompileOutcome, ProjectCompiler},
    compilers::{solc::SOLC, Compiler},
    config::ProjectPathsConfig,
    error::Result,
    format::OutputFormat,
};
use clap::{Args, Parser, Subcommand};
use std::{io, io::Write, path::PathBuf};

/// Ethereum development tools
#[derive(Debug, Parser)]
#[command(name = "ethtools", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile contract
    Compile(CompileArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CompileArgs {
    /// Compilation target: tangerineWhistle, spuriousDragon, byzantium, constantinople or
    /// petersburg
    #[arg(short, long, default_value_t = EvmVersion::default())]
    pub target: EvmVersion,

    /// Comma separated output selection. Defaults to the project's selection
    #[arg(short, long = "select", value_name = "FIELDS")]
    pub selection: Option<OutputFields>,

    /// Output format: JSON, JSON-MIN, RAW, MODULE or CJS
    #[arg(short, long, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Path to the solc executable
    #[arg(long, env = "ETHTOOLS_SOLC", default_value = SOLC)]
    pub solc: PathBuf,

    /// Project root, defaults to the current directory
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Contract source filepath, relative to the project root
    pub source: PathBuf,

    /// Contract to compile, defaults to the source's file name without extension
    pub contract: Option<String>,
}

impl CompileArgs {
    pub fn paths(&self) -> Result<ProjectPathsConfig> {
        match &self.root {
            Some(root) => Ok(ProjectPathsConfig::new(root)),
            None => ProjectPathsConfig::current(),
        }
    }

    /// Compiles the contract with `compiler` and reports the outcome.
    ///
    /// Diagnostics and failures go to `stderr`, the formatted output to `stdout`. Returns the
    /// exit code: 1 if anything failed or the compiler reported an error, 0 otherwise.
    pub fn run<C: Compiler>(
        &self,
        compiler: C,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        color: bool,
    ) -> io::Result<u8> {
        info!(evm_version = %self.target, format = %self.format, "compile");
        let outcome = match self.compile(compiler) {
            Ok(outcome) => outcome,
            Err(err) => {
                if !err.is_domain() {
                    debug!(?err, "compilation failed");
                }
                writeln!(stderr, "error: {err}")?;
                return Ok(1);
            }
        };

        for diagnostic in &outcome.errors {
            writeln!(stderr, "{diagnostic}")?;
        }
        let Some(output) = outcome.output.as_ref().filter(|_| !outcome.has_error()) else {
            return Ok(1);
        };

        match self.format.format(output, color) {
            Ok(formatted) => {
                writeln!(stdout, "{formatted}")?;
                Ok(0)
            }
            Err(err) => {
                writeln!(stderr, "error: {err}")?;
                Ok(1)
            }
        }
    }

    fn compile<C: Compiler>(&self, compiler: C) -> Result<CompileOutcome> {
        let project = ProjectCompiler::new(self.paths()?, compiler);
        let selection = self.selection.clone().unwrap_or_default();
        project.compile(&self.source, self.contract.as_deref(), &selection)
    }
}
