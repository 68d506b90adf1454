/// RTF parse tree types.
pub mod ast;
/// Byte cursor with bounded-probe seek support.
pub mod cursor;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for the parse tree.
pub mod dump;
/// RTF emitter — converts a parse tree back to RTF bytes.
pub mod emit;
/// RTF token matchers operating on raw bytes.
pub mod lexer;
/// RTF parser — recursive descent over the token matchers.
pub mod parser;
