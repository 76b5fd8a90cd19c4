//! Runs the `compile` command end to end against a mocked compiler.

use clap::Parser;
use ethtools::{
    cli::{Cli, Commands, CompileArgs},
    compilers::solc::gather_imports,
    Compiler, ImportCallback, ImportResolver, ImportResult, ProjectPathsConfig, Result, SolcInput,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::{cell::RefCell, fs, path::Path};
use tempfile::TempDir;

/// Replies with a fixed standard json output and records every request.
#[derive(Default)]
struct MockCompiler {
    output: Value,
    /// imports to request from the callback before answering
    imports: Vec<&'static str>,
    inputs: RefCell<Vec<SolcInput>>,
    resolved: RefCell<Vec<ImportResult>>,
}

impl MockCompiler {
    fn new(output: Value) -> Self {
        Self { output, ..Default::default() }
    }
}

impl Compiler for MockCompiler {
    fn compile_standard(
        &self,
        input: &SolcInput,
        callback: &dyn ImportCallback,
    ) -> Result<String> {
        self.inputs.borrow_mut().push(input.clone());
        for import in &self.imports {
            self.resolved.borrow_mut().push(callback.load(import));
        }
        Ok(self.output.to_string())
    }
}

struct Run {
    code: u8,
    stdout: String,
    stderr: String,
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let root = tempfile::Builder::new().prefix("ethtools").tempdir().unwrap();
    for (path, content) in files {
        let path = root.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    root
}

fn args(root: &Path, args: &[&str]) -> CompileArgs {
    let root = root.to_str().unwrap();
    let cli = Cli::try_parse_from(["ethtools", "compile", "--root", root].iter().chain(args))
        .unwrap();
    let Commands::Compile(args) = cli.command;
    args
}

fn run(compiler: &MockCompiler, args: &CompileArgs) -> Run {
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let code = args.run(compiler, &mut stdout, &mut stderr, false).unwrap();
    Run {
        code,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

fn contract_a() -> Value {
    json!({
        "abi": [],
        "evm": { "bytecode": { "object": "6080604052" } }
    })
}

#[test]
fn compiles_contract_named_after_file() {
    let root = project(&[("A.sol", "contract A {}")]);
    let compiler = MockCompiler::new(json!({
        "contracts": { "A.sol": { "A": contract_a() } },
        "sources": { "A.sol": { "id": 0 } }
    }));

    let out = run(&compiler, &args(root.path(), &["-f", "JSON-MIN", "A.sol"]));

    assert_eq!(out.code, 0, "{}", out.stderr);
    assert_eq!(out.stderr, "");
    assert_eq!(out.stdout, format!("{}\n", serde_json::to_string(&contract_a()).unwrap()));

    let inputs = compiler.inputs.borrow();
    let input = serde_json::to_value(&inputs[0]).unwrap();
    assert_eq!(input["language"], json!("Solidity"));
    assert_eq!(input["sources"], json!({ "A.sol": { "content": "contract A {}" } }));
    assert_eq!(input["settings"]["optimizer"], json!({ "enabled": false, "runs": 200 }));
    assert_eq!(
        input["settings"]["outputSelection"]["*"]["*"],
        json!([
            "abi",
            "devdoc",
            "userdoc",
            "evm.libraries",
            "evm.bytecode",
            "evm.deployedBytecode",
            "evm.methodIdentifiers",
            "evm.gasEstimates"
        ])
    );
}

#[test]
fn compiler_error_fails_without_result() {
    let root = project(&[("A.sol", "contract A {")]);
    let compiler = MockCompiler::new(json!({
        "errors": [{
            "type": "ParserError",
            "component": "general",
            "severity": "error",
            "message": "Expected '}' but got end of source",
            "formattedMessage": "ParserError: Expected '}' but got end of source"
        }]
    }));

    let out = run(&compiler, &args(root.path(), &["A.sol"]));

    assert_eq!(out.code, 1);
    assert_eq!(out.stdout, "");
    assert!(out.stderr.contains("\u{1b}[31mERROR"), "{:?}", out.stderr);
    assert!(out.stderr.contains("]: ParserError: Expected '}' but got end of source"));
}

#[test]
fn warnings_are_printed_with_result() {
    let root = project(&[("A.sol", "contract A {}")]);
    let compiler = MockCompiler::new(json!({
        "errors": [{ "severity": "warning", "message": "Unused variable" }],
        "contracts": { "A.sol": { "A": { "abi": [] } } }
    }));

    let out = run(&compiler, &args(root.path(), &["A.sol"]));

    assert_eq!(out.code, 0);
    assert!(out.stderr.contains("\u{1b}[33mWARNING"), "{:?}", out.stderr);
    assert!(out.stderr.contains("]: Unused variable"));
    assert_eq!(out.stdout, "{\n  \"abi\": []\n}\n");
}

#[test]
fn unknown_contract_is_reported() {
    let root = project(&[("A.sol", "contract A {}")]);
    let compiler = MockCompiler::new(json!({ "contracts": { "A.sol": { "A": contract_a() } } }));

    let out = run(&compiler, &args(root.path(), &["A.sol", "B"]));

    assert_eq!(out.code, 1);
    assert_eq!(out.stdout, "");
    assert_eq!(out.stderr, "error: Not a contract \"B\" in \"A.sol\"\n");
}

#[test]
fn missing_source_is_reported() {
    let root = project(&[("A.sol", "contract A {}"), ("test/B.sol", "contract B {}")]);
    let compiler = MockCompiler::new(json!({}));

    // excluded from discovery
    let out = run(&compiler, &args(root.path(), &["test/B.sol"]));

    assert_eq!(out.code, 1);
    assert_eq!(out.stderr, "error: Source file \"test/B.sol\" not found\n");
    assert!(compiler.inputs.borrow().is_empty());
}

#[test]
fn selection_overrides_settings_file() {
    let root = project(&[
        ("contracts/Token.sol", "contract Token {}"),
        (
            "solc.json",
            r#"{ "optimizer": { "enabled": true, "runs": 1000 }, "evmVersion": "byzantium" }"#,
        ),
    ]);
    let compiler = MockCompiler::new(json!({
        "contracts": { "contracts/Token.sol": { "Token": { "abi": [] } } }
    }));

    let args = args(root.path(), &["-s", "abi, evm.bytecode", "contracts/Token.sol"]);
    let out = run(&compiler, &args);

    assert_eq!(out.code, 0, "{}", out.stderr);
    let settings = serde_json::to_value(&compiler.inputs.borrow()[0].settings).unwrap();
    assert_eq!(
        settings,
        json!({
            "optimizer": { "enabled": true, "runs": 1000 },
            "evmVersion": "byzantium",
            "outputSelection": { "*": { "*": ["abi", "evm.bytecode"] } }
        })
    );
}

#[test]
fn malformed_settings_file_fails() {
    let root = project(&[("A.sol", "contract A {}"), ("solc.json", "{ optimizer")]);
    let compiler = MockCompiler::new(json!({}));

    let out = run(&compiler, &args(root.path(), &["A.sol"]));

    assert_eq!(out.code, 1);
    assert!(out.stderr.starts_with("error: failed to parse settings file"), "{}", out.stderr);
    assert!(compiler.inputs.borrow().is_empty());
}

#[test]
fn imports_are_resolved_from_project_and_dependencies() {
    let root = project(&[
        ("A.sol", "import \"./lib/Math.sol\";\ncontract A {}"),
        ("lib/Math.sol", "library Math {}"),
        ("node_modules/@oz/contracts/Ownable.sol", "contract Ownable {}"),
    ]);
    let mut compiler = MockCompiler::new(json!({ "contracts": { "A.sol": { "A": {} } } }));
    compiler.imports = vec!["lib/Math.sol", "@oz/contracts/Ownable.sol", "lib/Missing.sol"];

    let out = run(&compiler, &args(root.path(), &["A.sol"]));

    assert_eq!(out.code, 0, "{}", out.stderr);
    let resolved = compiler.resolved.borrow();
    assert_eq!(resolved[0], ImportResult::Found(ethtools::Source::new("library Math {}")));
    assert_eq!(resolved[1], ImportResult::Found(ethtools::Source::new("contract Ownable {}")));
    assert_eq!(resolved[2].to_string(), "File \"lib/Missing.sol\" not found");
}

#[test]
fn gathers_remapped_imports_verbatim() {
    let root = project(&[
        ("A.sol", "// import \"./Old.sol\";\r\nimport \"@oz/Ownable.sol\";\r\ncontract A {}\r\n"),
        ("Old.sol", "contract Old {}"),
        ("lib/oz/Ownable.sol", "contract Ownable {}\r\n"),
        ("solc.json", r#"{ "remappings": ["@oz/=lib/oz/"] }"#),
    ]);
    let paths = ProjectPathsConfig::new(root.path());
    let sources = paths.discover().unwrap();
    let settings = paths.settings(&Default::default()).unwrap();
    let resolver = ImportResolver::new(&sources, &paths.dependencies);

    let content = sources.get("A.sol").unwrap().unwrap().clone();
    let mut input = SolcInput::new("A.sol", content, settings);
    gather_imports(&mut input.sources, &input.settings.remappings(), &resolver);

    let units: Vec<_> = input.sources.keys().map(|path| path.to_str().unwrap()).collect();
    assert_eq!(units, vec!["A.sol", "lib/oz/Ownable.sol"]);
    assert_eq!(
        input.sources[Path::new("lib/oz/Ownable.sol")].content.as_str(),
        fs::read_to_string(root.path().join("lib/oz/Ownable.sol")).unwrap()
    );
    assert!(input.sources[Path::new("A.sol")].content.ends_with("contract A {}\r\n"));
    assert!(!sources.is_loaded("Old.sol"));
}

#[test]
fn renders_module() {
    let root = project(&[("A.sol", "contract A {}")]);
    let compiler = MockCompiler::new(json!({ "contracts": { "A.sol": { "A": contract_a() } } }));

    let out = run(&compiler, &args(root.path(), &["--format", "module", "A.sol"]));

    assert_eq!(out.code, 0, "{}", out.stderr);
    assert_eq!(
        out.stdout,
        "export const abi = [];

export const evm = {
  bytecode: {
    object: '6080604052'
  }
}
"
    );
}
