//! Utility functions

use crate::{
    artifacts::{remappings, Remapping},
    error::Result,
};
use glob::{MatchOptions, Pattern};
use once_cell::sync::Lazy;
use path_slash::PathExt;
use regex::{Match, Regex};
use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

/// A regex that matches the import path and identifier of a solidity import
/// statement with the named groups "p1" to "p4".
// Adapted from <https://github.com/nomiclabs/hardhat/blob/cced766c65b25d3d0beb39ef847246ac9618bdd9/packages/hardhat-core/src/internal/solidity/parse.ts#L100>
pub static RE_SOL_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+(?:(?:"(?P<p1>[^"]*)"|'(?P<p2>[^']*)')(?:\s+as\s+\w+)?|(?:(?:\w+(?:\s+as\s+\w+)?|\*\s+as\s+\w+|\{\s*(?:\w+(?:\s+as\s+\w+)?(?:\s*,\s*)?)+\s*\})\s+from\s+(?:"(?P<p3>[^"]*)"|'(?P<p4>[^']*)')))\s*;"#).unwrap()
});

/// The glob every discovered source has to match, relative to the project root.
pub const SOURCES_GLOB: &str = "**/*.sol";

static SOURCES_PATTERN: Lazy<Pattern> = Lazy::new(|| Pattern::new(SOURCES_GLOB).unwrap());

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Returns all path parts from any solidity import statement in a string,
/// `import "./contracts/Contract.sol";` -> `"./contracts/Contract.sol"`.
///
/// See also <https://docs.soliditylang.org/en/v0.8.9/grammar.html>
pub fn find_import_paths(contract: &str) -> impl Iterator<Item = Match<'_>> {
    RE_SOL_IMPORT.captures_iter(contract).filter_map(|cap| {
        cap.name("p1")
            .or_else(|| cap.name("p2"))
            .or_else(|| cap.name("p3"))
            .or_else(|| cap.name("p4"))
    })
}

/// Blanks out `//` and `/* */` comments of a solidity source so commented out imports are not
/// found by [find_import_paths]. Newlines are kept and comments inside string literals are left
/// alone.
pub fn strip_comments(source: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Code,
        Line,
        Block,
        Str(char),
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek()) {
                ('/', Some('/')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Line;
                }
                ('/', Some('*')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                ('"' | '\'', _) => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::Line if c == '\n' => {
                out.push(c);
                state = State::Code;
            }
            State::Block if c == '*' && chars.peek() == Some(&'/') => {
                chars.next();
                out.push_str("  ");
                state = State::Code;
            }
            State::Line | State::Block => out.push(if c == '\n' { '\n' } else { ' ' }),
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || c == '\n' {
                    state = State::Code;
                }
            }
        }
    }
    out
}

/// Returns the set of source files under `root` that match [`SOURCES_GLOB`], relative to `root`.
///
/// Directories listed in `excluded` (relative to `root`) and hidden entries are skipped without
/// being descended into. Symlinks are followed. Any error encountered while walking the
/// directory is returned as is.
pub fn source_files(root: &Path, excluded: &[PathBuf]) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(root, entry, excluded));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else { continue };
        if SOURCES_PATTERN.matches_with(&relative.to_slash_lossy(), GLOB_OPTIONS) {
            trace!(file = %relative.display(), "discovered source");
            files.insert(relative.to_path_buf());
        }
    }

    Ok(files)
}

fn is_skipped(root: &Path, entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    if entry.file_name().to_str().map(|name| name.starts_with('.')).unwrap_or_default() {
        return true;
    }
    entry
        .path()
        .strip_prefix(root)
        .map(|relative| excluded.iter().any(|dir| relative.starts_with(dir)))
        .unwrap_or_default()
}

/// Returns the name solc uses for the source at `path`: a normalized path with forward slashes.
pub fn source_unit_name(path: &Path) -> String {
    clean_solidity_path(path).to_slash_lossy().into_owned()
}

/// Resolves an `import` found in the source unit `importer` to the imported source unit name.
///
/// Like solc, only imports starting with `./` or `../` are relative to the importing unit, every
/// other import path is already a source unit name. `remappings` are applied to the result.
pub fn resolve_import_path(importer: &str, import: &str, remappings: &[Remapping]) -> String {
    let name = if import.starts_with("./") || import.starts_with("../") {
        let dir = Path::new(importer).parent().unwrap_or_else(|| Path::new(""));
        source_unit_name(&dir.join(import))
    } else {
        import.to_string()
    };
    remappings::remap(remappings, importer, &name)
}

// Removes `.` components and collapses `..` into the preceding normal component, leaving
// leading `..` untouched.
fn clean_solidity_path(original_path: &Path) -> PathBuf {
    let mut new_path = Vec::new();

    for component in original_path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(..) => {
                new_path.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(..)) = new_path.last() {
                    new_path.pop();
                } else {
                    new_path.push(component);
                }
            }
        }
    }

    new_path.iter().collect()
}

/// Creates a new named tempdir.
#[cfg(test)]
pub(crate) fn tempdir(name: &str) -> std::io::Result<tempfile::TempDir> {
    tempfile::Builder::new().prefix(name).tempdir()
}

/// Creates each of `paths` under `root`, writing `content` into the files.
#[cfg(test)]
pub(crate) fn mkfiles(root: &Path, paths: &[&str], content: &str) {
    for path in paths {
        let path = root.join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
}
