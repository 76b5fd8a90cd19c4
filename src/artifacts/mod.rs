//! Solc standard json input and output types

use crate::sources::{Source, Sources};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, path::PathBuf};

pub mod error;
pub use error::{Error, Severity, SourceLocation};

pub mod output_selection;
pub mod remappings;
pub use remappings::Remapping;
pub mod settings;
pub use settings::Settings;

/// file -> (contract name -> T)
pub type FileToContractsMap<T> = BTreeMap<String, BTreeMap<String, T>>;

/// The language of a [SolcInput].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolcLanguage {
    #[default]
    Solidity,
}

impl fmt::Display for SolcLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solidity => f.write_str("Solidity"),
        }
    }
}

/// Input type `solc` expects.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SolcInput {
    pub language: SolcLanguage,
    pub sources: Sources,
    pub settings: Settings,
}

impl SolcInput {
    /// Creates the input for compiling the single source unit `name`.
    pub fn new(name: impl Into<PathBuf>, source: Source, settings: Settings) -> Self {
        Self {
            language: SolcLanguage::Solidity,
            sources: Sources::from([(name.into(), source)]),
            settings,
        }
    }
}

/// Output type `solc` produces
///
/// Contract outputs are kept as raw json: they are only ever selected and rendered, never
/// interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOutput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Error>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub contracts: FileToContractsMap<serde_json::Value>,
}

impl CompilerOutput {
    /// Whether the output contains a compiler error
    pub fn has_error(&self) -> bool {
        self.errors.iter().any(|err| err.severity.is_error())
    }

    /// Finds the output of the contract `name` in the source unit `file`.
    pub fn find(&self, file: &str, name: &str) -> Option<&serde_json::Value> {
        self.contracts.get(file)?.get(name)
    }

    /// Names of all contracts of the source unit `file`.
    pub fn contract_names(&self, file: &str) -> impl Iterator<Item = &str> + '_ {
        self.contracts
            .get(file)
            .into_iter()
            .flat_map(|contracts| contracts.keys())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn serializes_single_source_input() {
        let input = SolcInput::new(
            "contracts/A.sol",
            Source::new("contract A {}"),
            Settings::default(),
        );
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["language"], json!("Solidity"));
        assert_eq!(value["sources"], json!({ "contracts/A.sol": { "content": "contract A {}" } }));
        assert_eq!(value["settings"]["optimizer"], json!({ "enabled": false, "runs": 200 }));
    }

    #[test]
    fn can_deserialize_output() {
        let output: CompilerOutput = serde_json::from_value(json!({
            "errors": [{ "severity": "warning", "message": "unused variable" }],
            "sources": { "A.sol": { "id": 0 } },
            "contracts": { "A.sol": { "A": { "abi": [] }, "B": { "abi": [] } } }
        }))
        .unwrap();

        assert!(!output.has_error());
        assert_eq!(output.find("A.sol", "A"), Some(&json!({ "abi": [] })));
        assert_eq!(output.find("A.sol", "C"), None);
        assert_eq!(output.contract_names("A.sol").collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(output.contract_names("B.sol").count(), 0);
    }

    #[test]
    fn can_deserialize_empty_output() {
        let output: CompilerOutput = serde_json::from_str("{}").unwrap();
        assert_eq!(output, CompilerOutput::default());
    }
}
