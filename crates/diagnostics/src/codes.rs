//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Parser codes are RTF1xxx, renderer codes RTF2xxx.

/// Expected a group start (`{`) that was not present; the remaining content
/// was adopted into a synthesized `unknown` group.
pub const PARSER_MALFORMED_GROUP: &str = "RTF1001";

/// A control word probe failed to match at a position where one was expected;
/// a placeholder node was recorded and parsing continued.
pub const PARSER_MALFORMED_CONTROL_WORD: &str = "RTF1002";

/// Input ended while one or more groups were still open; the open groups were
/// implicitly closed and a partial tree returned.
pub const PARSER_UNEXPECTED_EOF: &str = "RTF1003";

/// The two's-complement adjusted `\bin` length exceeds the remaining input;
/// the binary payload was skipped.
pub const PARSER_INVALID_BIN_LENGTH: &str = "RTF1004";

/// The document declared a code page with no available codec; decoding fell
/// back to windows-1252.
pub const PARSER_UNSUPPORTED_CODE_PAGE: &str = "RTF1005";

/// A group nested deeper than the parser's recursion limit; the subtree was
/// flattened into its parent.
pub const PARSER_NESTING_TOO_DEEP: &str = "RTF1006";

/// The document does not declare `\fromhtml1`, so it was probably not
/// produced by HTML encapsulation.
pub const RENDER_NOT_FROM_HTML: &str = "RTF2001";

/// An ignorable-destination marker (`\*`) appeared outside a group start.
pub const RENDER_STRAY_IGNORABLE: &str = "RTF2002";
