//! The compiler seam: anything that turns a standard json input into standard json output.

use crate::{artifacts::SolcInput, error::Result, resolver::ImportCallback};

pub mod solc;
pub use solc::Solc;

/// A compiler speaking solc's standard json protocol.
pub trait Compiler {
    /// Compiles `input` and returns the raw standard json output.
    ///
    /// `callback` answers requests for sources that are imported but not part of `input`.
    fn compile_standard(&self, input: &SolcInput, callback: &dyn ImportCallback)
        -> Result<String>;
}

impl<C: Compiler + ?Sized> Compiler for &C {
    fn compile_standard(
        &self,
        input: &SolcInput,
        callback: &dyn ImportCallback,
    ) -> Result<String> {
        (**self).compile_standard(input, callback)
    }
}

impl<C: Compiler + ?Sized> Compiler for Box<C> {
    fn compile_standard(
        &self,
        input: &SolcInput,
        callback: &dyn ImportCallback,
    ) -> Result<String> {
        (**self).compile_standard(input, callback)
    }
}
