//! The crate's closed error taxonomy. Policy *queries* never fail — they
//! return a [`crate::Decision`] value, and "denied" is a normal outcome, not
//! an error. Everything here is raised by the loader.

use thiserror::Error;

/// Errors that can occur while loading a policy document. Query functions
/// (`connection_check`, `ownership_check`, `transmission_check`) never
/// return this type.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy document failed structural parsing. Carries the source
    /// file name and the line number the parser was at when it gave up.
    #[error("invalid policy document in {file}: +{line}")]
    InvalidDocument {
        /// Source file name (or a synthetic label for in-memory documents).
        file: String,
        /// Line number the parser was at.
        line: u64,
    },

    /// The policy document could not be read, for a reason other than the
    /// file not existing (a missing file is not an error: spec.md §4.5
    /// point 5 treats it as an empty document).
    #[error("failed to read policy document: {0}")]
    IoError(#[from] std::io::Error),

    /// Allocation failed while building the policy set. This variant exists
    /// for API-taxonomy parity with the C source's `-ENOMEM` paths; no code
    /// in this crate actually constructs it, since a Rust allocator failure
    /// aborts the process instead of unwinding into a `Result`.
    #[error("out of memory while loading policy")]
    OutOfMemory,
}
