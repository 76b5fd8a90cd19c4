use std::{fmt, str::FromStr};

/// The solidity compiler can only reference files that exist locally on your computer.
/// So importing directly from GitHub (as an example) is not possible.
///
/// Let's imagine you want to use OpenZeppelin's amazing library of smart contracts,
/// `@openzeppelin/contracts/token/ERC20/ERC20.sol` lives in `lib/oz/token/ERC20/ERC20.sol`.
/// With the remapping `@openzeppelin/contracts/=lib/oz/` the import resolves to the latter.
///
/// A remapping can be restricted to imports of source units starting with `context`, written
/// as `context:name=path`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Remapping {
    pub context: Option<String>,
    pub name: String,
    pub path: String,
}

impl Remapping {
    /// Whether this remapping applies to `path` imported by the source unit `importer`.
    pub fn matches(&self, importer: &str, path: &str) -> bool {
        self.context.as_deref().map_or(true, |context| importer.starts_with(context))
            && path.starts_with(&self.name)
    }

    fn context_len(&self) -> usize {
        self.context.as_ref().map_or(0, String::len)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, thiserror::Error)]
pub enum RemappingError {
    #[error("invalid remapping format, found `{0}`, expected `<key>=<value>`")]
    InvalidRemapping(String),
    #[error("remapping key can't be empty, found `{0}`, expected `<key>=<value>`")]
    EmptyRemappingKey(String),
    #[error("remapping value must be a path, found `{0}`, expected `<key>=<value>`")]
    EmptyRemappingValue(String),
}

impl FromStr for Remapping {
    type Err = RemappingError;

    fn from_str(remapping: &str) -> Result<Self, Self::Err> {
        let (name, path) = remapping
            .split_once('=')
            .ok_or_else(|| RemappingError::InvalidRemapping(remapping.to_string()))?;
        let (context, name) = match name.split_once(':') {
            Some(("", name)) => (None, name),
            Some((context, name)) => (Some(context.to_string()), name),
            None => (None, name),
        };
        if name.trim().is_empty() {
            return Err(RemappingError::EmptyRemappingKey(remapping.to_string()));
        }
        if path.trim().is_empty() {
            return Err(RemappingError::EmptyRemappingValue(remapping.to_string()));
        }
        Ok(Self { context, name: name.to_string(), path: path.to_string() })
    }
}

impl fmt::Display for Remapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{context}:")?;
        }
        write!(f, "{}={}", self.name, self.path)
    }
}

/// Applies the remapping that fits the import of `path` by `importer` best, the way solc picks
/// it: the longest context wins, then the longest prefix, then the last one listed.
///
/// Returns `path` unchanged if no remapping matches.
pub fn remap(remappings: &[Remapping], importer: &str, path: &str) -> String {
    let best = remappings
        .iter()
        .filter(|remapping| remapping.matches(importer, path))
        .max_by_key(|remapping| (remapping.context_len(), remapping.name.len()));
    match best {
        Some(remapping) => {
            trace!(%remapping, path, "remapped import");
            format!("{}{}", remapping.path, &path[remapping.name.len()..])
        }
        None => path.to_string(),
    }
}
