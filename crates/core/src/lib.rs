//! RTF toolchain core library.
//!
//! Provides parsing, re-emission, and rendering of RTF (Rich Text Format)
//! documents. The main entry points are [`parse_bytes`] / [`parse_path`]
//! for parsing, [`emit_rtf`] for writing a tree back out, and the
//! [`render`] module for HTML de-encapsulation and table extraction.

#![warn(missing_docs)]

/// Character-set detection from the RTF header.
pub mod encoding;
/// Terminal parse errors.
pub mod error;
/// RTF grammar: lexer, parser, AST, emitter, and related utilities.
pub mod grammar;
/// Renderers that turn a parse tree into an output document.
pub mod render;

use std::io::Read;
use std::path::Path;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Parser
pub use grammar::parser::{
    parse_bytes, parse_bytes_with, EofPolicy, ParseOptions, ParseResult, MAX_DEPTH,
};

// AST
pub use grammar::ast::{strip_spans, Group, Node};

// Emitter
pub use grammar::emit::{emit_rtf, EmitConfig, LineEnding};

// Errors
pub use error::ParseError;

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{codes, Diagnostic, Severity, Span};

// Renderers
pub use render::Renderer;

// Serialization helpers
pub use grammar::dump::to_pretty_json;

/// Parse an RTF document from any reader, buffering it fully first.
pub fn parse_reader(mut reader: impl Read) -> Result<ParseResult, ParseError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes(&buf)
}

/// Parse an RTF document from a file.
pub fn parse_path(path: impl AsRef<Path>) -> Result<ParseResult, ParseError> {
    let buf = std::fs::read(path)?;
    parse_bytes(&buf)
}
