use super::Compiler;
use crate::{
    artifacts::{Remapping, SolcInput},
    error::{Result, SolcError},
    resolver::{ImportCallback, ImportResult},
    sources::{Source, Sources},
    utils,
};
use std::{
    collections::BTreeSet,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Output, Stdio},
};

/// The name of the `solc` binary on the system
pub const SOLC: &str = "solc";

/// Abstraction over `solc` command line utility
///
/// Supports sync solc execution of standard json input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solc {
    /// Path to the `solc` executable
    pub solc: PathBuf,
}

impl Solc {
    /// A new instance which points to `solc`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { solc: path.into() }
    }

    /// Runs `solc --standard-json` on `input` and returns the raw output.
    #[instrument(name = "compile", level = "debug", skip_all)]
    pub fn compile_output(&self, input: &SolcInput) -> Result<Vec<u8>> {
        let mut cmd = self.configure_cmd();
        cmd.arg("--standard-json");

        let mut child = cmd.spawn().map_err(self.map_io_err())?;
        debug!("spawned");

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SolcError::msg("failed to open stdin of solc"))?;
        let mut stdin = io::BufWriter::new(stdin);
        serde_json::to_writer(&mut stdin, input)?;
        stdin.flush().map_err(self.map_io_err())?;
        // closes stdin, solc only starts compiling once it sees EOF
        drop(stdin);
        debug!("wrote JSON input to stdin");

        let output = child.wait_with_output().map_err(self.map_io_err())?;
        debug!(%output.status, "finished");

        compile_output(output)
    }

    fn configure_cmd(&self) -> Command {
        let mut cmd = Command::new(&self.solc);
        cmd.stdin(Stdio::piped()).stderr(Stdio::piped()).stdout(Stdio::piped());
        cmd
    }

    fn map_io_err(&self) -> impl FnOnce(io::Error) -> SolcError + '_ {
        move |err| SolcError::io(err, &self.solc)
    }
}

impl Compiler for Solc {
    fn compile_standard(
        &self,
        input: &SolcInput,
        callback: &dyn ImportCallback,
    ) -> Result<String> {
        let mut input = input.clone();
        gather_imports(&mut input.sources, &input.settings.remappings(), callback);
        let output = self.compile_output(&input)?;
        String::from_utf8(output).map_err(|_| SolcError::InvalidUtf8)
    }
}

/// Adds every source transitively imported by `sources` that `callback` can provide.
///
/// solc is run as a separate process and cannot ask for missing sources while compiling, so the
/// requests it would make are answered upfront. Imports are resolved to source unit names the
/// way solc does it, `remappings` included, see [utils::resolve_import_path]. Commented out
/// imports are ignored. Imports the callback cannot find are left out, solc reports them as
/// missing.
pub fn gather_imports(
    sources: &mut Sources,
    remappings: &[Remapping],
    callback: &dyn ImportCallback,
) {
    let mut pending: Vec<(String, Source)> = sources
        .iter()
        .map(|(path, source)| (utils::source_unit_name(path), source.clone()))
        .collect();
    let mut seen: BTreeSet<String> = pending.iter().map(|(name, _)| name.clone()).collect();

    while let Some((importer, source)) = pending.pop() {
        let code = utils::strip_comments(&source.content);
        for import in utils::find_import_paths(&code) {
            let name = utils::resolve_import_path(&importer, import.as_str(), remappings);
            if !seen.insert(name.clone()) {
                continue;
            }
            match callback.load(&name) {
                ImportResult::Found(imported) => {
                    trace!(%importer, import = %name, "resolved import");
                    sources.insert(PathBuf::from(&name), imported.clone());
                    pending.push((name, imported));
                }
                not_found => debug!(%importer, %not_found, "unresolved import"),
            }
        }
    }
}

fn compile_output(output: Output) -> Result<Vec<u8>> {
    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(SolcError::solc_output(&output))
    }
}
