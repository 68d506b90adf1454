//! Re-exports from the diagnostics crate, so downstream code can name
//! diagnostic types through the core crate alone.

pub use rtf_toolchain_diagnostics::{codes, explain, Diagnostic, Severity, Span};
