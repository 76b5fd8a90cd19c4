//! Compile a solidity contract with `solc` and render the selected outputs.
//!
//! The crate discovers the project's sources, exposes them to the compiler through a lazily
//! loaded file map and an import resolver, merges the project's compiler settings and hands a
//! single standard-json request to a [`Compiler`]. The per-contract output can then be rendered
//! with an [`OutputFormat`].

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

pub mod artifacts;
pub use artifacts::{
    output_selection::{OutputField, OutputFields, OutputSelection},
    settings::{EvmVersion, Optimizer, Settings},
    CompilerOutput, Error, Remapping, Severity, SolcInput, SolcLanguage,
};

pub mod cli;

mod compile;
pub use compile::{CompileOutcome, ProjectCompiler};

pub mod compilers;
pub use compilers::{Compiler, Solc};

mod config;
pub use config::ProjectPathsConfig;

pub mod error;
pub use error::{Result, SolcError, SolcIoError};

mod format;
pub use format::OutputFormat;

pub mod resolver;
pub use resolver::{ImportCallback, ImportResolver, ImportResult};

pub mod sources;
pub use sources::{FsReader, LazySources, Source, SourceReader, Sources};

pub mod utils;
