//! Document-to-task compilation.
//!
//! A single structured model call decomposes a document into engineering
//! tasks. Unlike the other model-backed steps there is no fallback: an
//! unparseable reply is an error carrying the raw output.

mod domain;
mod service;

pub use domain::{CompilationOutput, CompiledTask, Complexity};
pub use service::{CompileError, DocumentCompiler};
