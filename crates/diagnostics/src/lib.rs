//! Diagnostics for the RTF toolchain.
//!
//! Provides [`Diagnostic`], [`Severity`], and [`Span`] used to report
//! recovered parse anomalies and renderer warnings as structured data
//! alongside the parse tree, rather than as side-channel log lines.
//! Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error — the input is invalid.
    Error,
    /// Warning — the input may produce unexpected results.
    Warn,
    /// Informational note.
    Info,
}

/// Byte span in the source input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first byte (0-based).
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// A diagnostic message produced by the parser or a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"RTF1003"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the source input that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form
    /// strings. `BTreeMap` keeps serialized key order deterministic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code,
    /// if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    match id {
        codes::PARSER_MALFORMED_GROUP => Some(
            "A group start ('{') was expected but not found. The parser \
             recovered by treating the remaining content as an 'unknown' \
             group without consuming a start token.",
        ),
        codes::PARSER_MALFORMED_CONTROL_WORD => Some(
            "A backslash introduced what should have been a control word, \
             but the following bytes did not form a valid control name. A \
             placeholder node named 'missing' was recorded and parsing \
             continued after the backslash.",
        ),
        codes::PARSER_UNEXPECTED_EOF => Some(
            "The input ended while one or more groups were still open. The \
             open groups were implicitly closed; the resulting tree is \
             partial but usable.",
        ),
        codes::PARSER_INVALID_BIN_LENGTH => Some(
            "The parameter of a \\bin control word, after 32-bit \
             two's-complement adjustment, names more bytes than remain in \
             the input. The binary payload was skipped.",
        ),
        codes::PARSER_UNSUPPORTED_CODE_PAGE => Some(
            "The document declared a code page for which no codec is \
             available. Text was decoded with the windows-1252 fallback, \
             which may garble non-ASCII characters.",
        ),
        codes::PARSER_NESTING_TOO_DEEP => Some(
            "Groups were nested deeper than the parser's recursion limit, \
             which usually indicates a pathological or corrupt document. \
             The over-deep content was flattened into the enclosing group.",
        ),
        codes::RENDER_NOT_FROM_HTML => Some(
            "The document does not carry \\fromhtml1, so it was probably \
             not produced by RTF-encapsulating HTML (e.g. by an email \
             client). The HTML de-encapsulator may not be the right \
             renderer for it.",
        ),
        codes::RENDER_STRAY_IGNORABLE => Some(
            "An ignorable-destination marker (\\*) appeared somewhere other \
             than immediately inside a group start, where it has no defined \
             meaning. It was skipped.",
        ),
        _ => None,
    }
}
