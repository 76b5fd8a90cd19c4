//! Bindings for the standard json `outputSelection` setting.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Contract level output selection: contract name (or `*`) → output fields.
pub type ContractOutputSelection = BTreeMap<String, Vec<String>>;

/// Represents the selected output of files and contracts.
///
/// The first level key is the file name and the second level key is the contract name. An
/// empty contract name is used for outputs that are not tied to a contract but to the whole
/// source file like the AST. A star as contract name refers to all contracts in the file.
/// Similarly, a star as a file name matches all files.
///
/// ```json
/// {
///   "*": {
///     "*": ["abi", "evm.bytecode"]
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSelection(pub BTreeMap<String, ContractOutputSelection>);

impl OutputSelection {
    /// Selects `fields` for all contracts of all files.
    pub fn with_fields<I, T>(fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let fields = fields.into_iter().map(|field| field.to_string()).collect();
        let contracts = BTreeMap::from([("*".to_string(), fields)]);
        Self(BTreeMap::from([("*".to_string(), contracts)]))
    }

    /// Selects every output of every contract: `{"*": {"*": ["*"]}}`.
    pub fn complete() -> Self {
        Self::with_fields([OutputField::All])
    }
}

impl AsRef<BTreeMap<String, ContractOutputSelection>> for OutputSelection {
    fn as_ref(&self) -> &BTreeMap<String, ContractOutputSelection> {
        &self.0
    }
}

/// A contract output the compiler can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputField {
    /// `*`, every output
    All,
    Abi,
    Metadata,
    DevDoc,
    UserDoc,
    StorageLayout,
    Ir,
    IrAst,
    IrOptimized,
    IrOptimizedAst,
    Assembly,
    LegacyAssembly,
    Bytecode,
    BytecodeObject,
    BytecodeOpcodes,
    BytecodeSourceMap,
    BytecodeLinkReferences,
    BytecodeGeneratedSources,
    BytecodeFunctionDebugData,
    DeployedBytecode,
    DeployedBytecodeObject,
    DeployedBytecodeOpcodes,
    DeployedBytecodeSourceMap,
    DeployedBytecodeLinkReferences,
    DeployedBytecodeGeneratedSources,
    DeployedBytecodeImmutableReferences,
    DeployedBytecodeFunctionDebugData,
    MethodIdentifiers,
    GasEstimates,
    Libraries,
    EwasmWast,
    EwasmWasm,
}

impl OutputField {
    pub const VARIANTS: &'static [Self] = &[
        Self::All,
        Self::Abi,
        Self::Metadata,
        Self::DevDoc,
        Self::UserDoc,
        Self::StorageLayout,
        Self::Ir,
        Self::IrAst,
        Self::IrOptimized,
        Self::IrOptimizedAst,
        Self::Assembly,
        Self::LegacyAssembly,
        Self::Bytecode,
        Self::BytecodeObject,
        Self::BytecodeOpcodes,
        Self::BytecodeSourceMap,
        Self::BytecodeLinkReferences,
        Self::BytecodeGeneratedSources,
        Self::BytecodeFunctionDebugData,
        Self::DeployedBytecode,
        Self::DeployedBytecodeObject,
        Self::DeployedBytecodeOpcodes,
        Self::DeployedBytecodeSourceMap,
        Self::DeployedBytecodeLinkReferences,
        Self::DeployedBytecodeGeneratedSources,
        Self::DeployedBytecodeImmutableReferences,
        Self::DeployedBytecodeFunctionDebugData,
        Self::MethodIdentifiers,
        Self::GasEstimates,
        Self::Libraries,
        Self::EwasmWast,
        Self::EwasmWasm,
    ];

    /// The outputs requested when neither the project nor the command line select any.
    pub const DEFAULTS: &'static [Self] = &[
        Self::Abi,
        Self::DevDoc,
        Self::UserDoc,
        Self::Libraries,
        Self::Bytecode,
        Self::DeployedBytecode,
        Self::MethodIdentifiers,
        Self::GasEstimates,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "*",
            Self::Abi => "abi",
            Self::Metadata => "metadata",
            Self::DevDoc => "devdoc",
            Self::UserDoc => "userdoc",
            Self::StorageLayout => "storageLayout",
            Self::Ir => "ir",
            Self::IrAst => "irAst",
            Self::IrOptimized => "irOptimized",
            Self::IrOptimizedAst => "irOptimizedAst",
            Self::Assembly => "evm.assembly",
            Self::LegacyAssembly => "evm.legacyAssembly",
            Self::Bytecode => "evm.bytecode",
            Self::BytecodeObject => "evm.bytecode.object",
            Self::BytecodeOpcodes => "evm.bytecode.opcodes",
            Self::BytecodeSourceMap => "evm.bytecode.sourceMap",
            Self::BytecodeLinkReferences => "evm.bytecode.linkReferences",
            Self::BytecodeGeneratedSources => "evm.bytecode.generatedSources",
            Self::BytecodeFunctionDebugData => "evm.bytecode.functionDebugData",
            Self::DeployedBytecode => "evm.deployedBytecode",
            Self::DeployedBytecodeObject => "evm.deployedBytecode.object",
            Self::DeployedBytecodeOpcodes => "evm.deployedBytecode.opcodes",
            Self::DeployedBytecodeSourceMap => "evm.deployedBytecode.sourceMap",
            Self::DeployedBytecodeLinkReferences => "evm.deployedBytecode.linkReferences",
            Self::DeployedBytecodeGeneratedSources => "evm.deployedBytecode.generatedSources",
            Self::DeployedBytecodeImmutableReferences => "evm.deployedBytecode.immutableReferences",
            Self::DeployedBytecodeFunctionDebugData => "evm.deployedBytecode.functionDebugData",
            Self::MethodIdentifiers => "evm.methodIdentifiers",
            Self::GasEstimates => "evm.gasEstimates",
            Self::Libraries => "evm.libraries",
            Self::EwasmWast => "ewasm.wast",
            Self::EwasmWasm => "ewasm.wasm",
        }
    }
}

impl fmt::Display for OutputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::VARIANTS
            .iter()
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown output field \"{s}\""))
    }
}

/// A comma separated list of [OutputField]s, as accepted on the command line.
///
/// Whitespace around the commas is ignored and an empty (or blank) list selects nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputFields(pub Vec<OutputField>);

impl OutputFields {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for OutputFields {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.split(',').map(str::parse).collect::<Result<_, _>>().map(Self)
    }
}

impl fmt::Display for OutputFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(field.as_str())?;
        }
        Ok(())
    }
}
