use super::{
    output_selection::{OutputField, OutputFields, OutputSelection},
    Remapping,
};
use crate::error::{Result, SolcError};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, fs, path::Path, str::FromStr};

/// Compiler settings of a standard json input.
///
/// Only the optimizer and the output selection are interpreted, every other key is kept as is
/// and handed to the compiler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<Optimizer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_selection: Option<OutputSelection>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Settings {
    /// Reads settings from a json file.
    ///
    /// The file's content is used as is, it is not merged with [Settings::default].
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| SolcError::io(err, path))?;
        serde_json::from_str(&content)
            .map_err(|err| SolcError::Settings { path: path.to_path_buf(), err })
    }

    /// Applies the output fields requested on the command line.
    ///
    /// Non-empty `fields` replace the whole output selection with `{"*": {"*": fields}}`.
    /// Otherwise a missing output selection is set to select everything.
    pub fn select_outputs(&mut self, fields: &OutputFields) {
        if !fields.is_empty() {
            self.output_selection = Some(OutputSelection::with_fields(&fields.0));
        } else if self.output_selection.is_none() {
            self.output_selection = Some(OutputSelection::complete());
        }
    }

    /// The `remappings` handed to the compiler.
    ///
    /// Entries that are not valid remappings are skipped here, the compiler still receives them
    /// as they are and reports them.
    pub fn remappings(&self) -> Vec<Remapping> {
        let Some(entries) = self.other.get("remappings").and_then(|value| value.as_array())
        else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| match entry.as_str().map(str::parse::<Remapping>) {
                Some(Ok(remapping)) => Some(remapping),
                Some(Err(err)) => {
                    warn!(%err, "ignoring remapping");
                    None
                }
                None => {
                    warn!(%entry, "ignoring remapping that is not a string");
                    None
                }
            })
            .collect()
    }

    /// Consumes the type and returns a [Settings::select_outputs] version
    pub fn with_selected_outputs(mut self, fields: &OutputFields) -> Self {
        self.select_outputs(fields);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            optimizer: Some(Optimizer::default()),
            output_selection: Some(OutputSelection::with_fields(OutputField::DEFAULTS)),
            other: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimizer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Optimize for how many times you intend to run the code.
    ///
    /// Lower values will optimize more for initial deployment cost, higher values will optimize
    /// more for high-frequency usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<usize>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self { enabled: Some(false), runs: Some(200), other: BTreeMap::new() }
    }
}

/// EVM versions a contract can be compiled for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvmVersion {
    TangerineWhistle,
    SpuriousDragon,
    Byzantium,
    Constantinople,
    #[default]
    Petersburg,
}

impl EvmVersion {
    pub const VARIANTS: &'static [Self] = &[
        Self::TangerineWhistle,
        Self::SpuriousDragon,
        Self::Byzantium,
        Self::Constantinople,
        Self::Petersburg,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TangerineWhistle => "tangerineWhistle",
            Self::SpuriousDragon => "spuriousDragon",
            Self::Byzantium => "byzantium",
            Self::Constantinople => "constantinople",
            Self::Petersburg => "petersburg",
        }
    }
}

impl fmt::Display for EvmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvmVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tangerineWhistle" => Ok(Self::TangerineWhistle),
            "spuriousDragon" => Ok(Self::SpuriousDragon),
            "byzantium" => Ok(Self::Byzantium),
            // older releases of the tool spelled it this way
            "constantinople" | "constantinopole" => Ok(Self::Constantinople),
            "petersburg" => Ok(Self::Petersburg),
            s => Err(format!("Unknown target \"{s}\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{mkfiles, tempdir};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_settings() {
        let settings = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            settings,
            json!({
                "optimizer": { "enabled": false, "runs": 200 },
                "outputSelection": {
                    "*": {
                        "*": [
                            "abi",
                            "devdoc",
                            "userdoc",
                            "evm.libraries",
                            "evm.bytecode",
                            "evm.deployedBytecode",
                            "evm.methodIdentifiers",
                            "evm.gasEstimates"
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn keeps_unknown_settings() {
        let raw = json!({
            "optimizer": { "enabled": true, "runs": 1000, "details": { "yul": true } },
            "evmVersion": "byzantium",
            "remappings": ["@oz/=node_modules/@openzeppelin/"]
        });
        let settings: Settings = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(settings.optimizer.as_ref().unwrap().runs, Some(1000));
        assert!(settings.output_selection.is_none());
        assert_eq!(serde_json::to_value(&settings).unwrap(), raw);
    }

    #[test]
    fn reads_remappings() {
        let settings: Settings = serde_json::from_value(json!({
            "remappings": ["@oz/=lib/oz/", "broken", 42, "lib/v4:@oz/=lib/v4/oz/"]
        }))
        .unwrap();
        let remappings: Vec<_> = settings.remappings().iter().map(|r| r.to_string()).collect();
        assert_eq!(remappings, vec!["@oz/=lib/oz/", "lib/v4:@oz/=lib/v4/oz/"]);

        assert!(Settings::default().remappings().is_empty());
    }

    #[test]
    fn selected_outputs_replace_selection() {
        let fields: OutputFields = "abi,evm.bytecode".parse().unwrap();
        let settings = Settings::default().with_selected_outputs(&fields);
        assert_eq!(
            serde_json::to_value(settings.output_selection).unwrap(),
            json!({ "*": { "*": ["abi", "evm.bytecode"] } })
        );
    }

    #[test]
    fn missing_selection_selects_everything() {
        let mut settings: Settings = serde_json::from_value(json!({})).unwrap();
        settings.select_outputs(&OutputFields::default());
        assert_eq!(settings.output_selection, Some(OutputSelection::complete()));

        // an existing selection is kept
        let mut settings = Settings::default();
        settings.select_outputs(&OutputFields::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reports_malformed_settings_file() {
        let tmp_dir = tempdir("settings").unwrap();
        mkfiles(tmp_dir.path(), &["solc.json"], "{ \"optimizer\": ");
        let err = Settings::read(&tmp_dir.path().join("solc.json")).unwrap_err();
        assert!(matches!(err, SolcError::Settings { .. }), "{err:?}");
        assert!(err.to_string().contains("solc.json"));
    }

    #[test]
    fn can_parse_evm_versions() {
        for version in EvmVersion::VARIANTS {
            assert_eq!(version.as_str().parse::<EvmVersion>().unwrap(), *version);
        }
        assert_eq!("constantinopole".parse::<EvmVersion>().unwrap(), EvmVersion::Constantinople);
        assert_eq!("london".parse::<EvmVersion>().unwrap_err(), "Unknown target \"london\"");
        assert_eq!(EvmVersion::default(), EvmVersion::Petersburg);
    }
}
