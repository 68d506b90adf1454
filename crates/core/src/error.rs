//! Terminal parse errors.
//!
//! Almost every anomaly is recovered and reported as a [`Diagnostic`]
//! alongside a partial tree; only conditions that leave the parser with
//! nothing useful to return surface as a [`ParseError`].
//!
//! [`Diagnostic`]: rtf_toolchain_diagnostics::Diagnostic

use thiserror::Error;

/// An error that aborts parsing entirely.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The document header declares no character set, so document text
    /// cannot be decoded.
    #[error("no character encoding declared in the document header")]
    MissingEncoding,

    /// The input could not be read.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
