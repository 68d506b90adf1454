//! RTF parser — recursive descent over the token matchers in
//! [`lexer`](super::lexer).
//!
//! The parser is recovery-first: anomalies in the input produce
//! [`Diagnostic`] records and a best-effort tree rather than an abort. The
//! only terminal failures are an undeclared character set and I/O errors on
//! the façade entry points in the crate root.

use encoding_rs::Encoding;

use super::ast::{Group, Node};
use super::cursor::Cursor;
use super::lexer::{
    classify, decode, match_control_symbol, match_control_word, match_group_end,
    match_group_start, match_plain_text, TokKind,
};
use crate::encoding;
use crate::error::ParseError;
use rtf_toolchain_diagnostics::{codes, Diagnostic, Severity, Span};

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Maximum group nesting depth. Content nested deeper is flattened into the
/// enclosing group with a [`codes::PARSER_NESTING_TOO_DEEP`] diagnostic.
pub const MAX_DEPTH: usize = 200;

/// How to treat input that ends while groups are still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Implicitly close the open groups and note the fact at info level.
    /// Truncated documents are common in the wild (mail gateways cut
    /// attachments), so this is the default.
    #[default]
    Implicit,
    /// Report the truncation as an error-severity diagnostic. The partial
    /// tree is still returned.
    Strict,
}

/// Knobs for a single parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Treatment of input ending inside an open group.
    pub eof_policy: EofPolicy,
}

/// Result of parsing an RTF document.
#[derive(Debug, serde::Serialize)]
pub struct ParseResult {
    /// The document root group, named after its first control word
    /// (`"rtf1"` for well-formed documents).
    pub root: Group,
    /// Name of the codec used to decode document text (e.g.
    /// `"windows-1252"`).
    pub encoding: String,
    /// The resolved codec itself, for re-encoding on emission.
    #[serde(skip)]
    pub codec: &'static Encoding,
    /// Diagnostics (errors, warnings, info) produced during parsing.
    pub diagnostics: Vec<Diagnostic>,
    /// True when the input ended while groups were still open.
    pub truncated: bool,
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse an in-memory RTF document with default options.
pub fn parse_bytes(buf: &[u8]) -> Result<ParseResult, ParseError> {
    parse_bytes_with(buf, &ParseOptions::default())
}

/// Parse an in-memory RTF document.
pub fn parse_bytes_with(buf: &[u8], options: &ParseOptions) -> Result<ParseResult, ParseError> {
    let mut diags = Vec::new();
    let enc = encoding::sniff(buf, &mut diags)?;
    let mut parser = Parser {
        cur: Cursor::new(buf),
        enc,
        eof_policy: options.eof_policy,
        diags,
        truncated: false,
    };
    let root = parser.parse_group(1);
    Ok(ParseResult {
        root,
        encoding: enc.name().to_string(),
        codec: enc,
        diagnostics: parser.diags,
        truncated: parser.truncated,
    })
}

// ─── Parser Implementation ─────────────────────────────────────────────────

struct Parser<'a> {
    cur: Cursor<'a>,
    enc: &'static Encoding,
    eof_policy: EofPolicy,
    diags: Vec<Diagnostic>,
    truncated: bool,
}

impl Parser<'_> {
    /// Parse one group at the given nesting depth. The cursor is expected to
    /// sit on the opening brace; when it does not, the group is synthesized
    /// as `unknown`/not-`known` and parsing proceeds to the next `}` anyway.
    fn parse_group(&mut self, depth: usize) -> Group {
        let start = self.cur.tell();
        let (known, ignorable) = match match_group_start(&mut self.cur) {
            Some(m) => (true, m.ignorable),
            None => {
                self.diags.push(Diagnostic::warn(
                    codes::PARSER_MALFORMED_GROUP,
                    format!("expected a group start at byte {start}"),
                    Some(Span::empty(start)),
                ));
                (false, false)
            }
        };

        let mut children: Vec<Node> = Vec::new();
        let mut tail = String::new();
        let mut closed = false;

        while !self.cur.is_at_end() {
            let pos = self.cur.tell();
            let window = self.cur.peek(2);
            match classify(window, self.cur.is_escaped_at(pos)) {
                TokKind::GroupStart => {
                    if depth >= MAX_DEPTH {
                        // Consume the brace and keep collecting into this
                        // group; the matching `}` then closes this group.
                        let _ = match_group_start(&mut self.cur);
                        self.diags.push(Diagnostic::warn(
                            codes::PARSER_NESTING_TOO_DEEP,
                            format!("group nesting exceeds {MAX_DEPTH} levels, flattening"),
                            Some(Span::empty(pos)),
                        ));
                    } else {
                        children.push(Node::Group(self.parse_group(depth + 1)));
                    }
                }

                TokKind::GroupEnd => {
                    if let Some(m) = match_group_end(&mut self.cur) {
                        tail = m.tail;
                        closed = true;
                        break;
                    }
                    // classify guarantees an unescaped `}`; unreachable, but
                    // guarantee forward progress regardless.
                    self.cur.seek_by(1);
                }

                TokKind::ControlWord => match match_control_word(&mut self.cur) {
                    Some(m) => {
                        let bin_data = if m.name == "bin" {
                            self.read_bin_payload(m.parameter, pos)
                        } else {
                            Vec::new()
                        };
                        children.push(Node::ControlWord {
                            name: m.name,
                            parameter: m.parameter,
                            bin_data,
                            tail: m.tail,
                            span: Span::new(pos, self.cur.tell()),
                        });
                    }
                    None => {
                        self.diags.push(Diagnostic::warn(
                            codes::PARSER_MALFORMED_CONTROL_WORD,
                            format!("malformed control word at byte {pos}"),
                            Some(Span::empty(pos)),
                        ));
                        // Record a placeholder and resume after the backslash.
                        self.cur.seek_by(1);
                        children.push(Node::ControlWord {
                            name: "missing".to_string(),
                            parameter: None,
                            bin_data: Vec::new(),
                            tail: String::new(),
                            span: Span::new(pos, self.cur.tell()),
                        });
                    }
                },

                TokKind::ControlSymbol => match match_control_symbol(&mut self.cur, self.enc) {
                    Some(m) => children.push(Node::ControlSymbol {
                        symbol: m.symbol,
                        text: m.text,
                        hex: m.hex,
                        span: Span::new(pos, self.cur.tell()),
                    }),
                    None => {
                        // A lone backslash at end of input.
                        self.diags.push(Diagnostic::warn(
                            codes::PARSER_MALFORMED_CONTROL_WORD,
                            format!("dangling backslash at byte {pos}"),
                            Some(Span::empty(pos)),
                        ));
                        self.cur.seek_by(1);
                    }
                },

                TokKind::PlainText => match match_plain_text(&mut self.cur, self.enc) {
                    Some(m) => {
                        // A run of bare CR/LF decodes to nothing; the cursor
                        // advance is the point.
                        if !m.text.is_empty() {
                            children.push(Node::Text {
                                text: m.text,
                                span: Span::new(pos, self.cur.tell()),
                            });
                        }
                    }
                    None => {
                        // An escaped structural byte: consume it as literal
                        // text so the loop always makes progress.
                        let raw = self.cur.read(1);
                        let text = decode(self.enc, raw);
                        children.push(Node::Text {
                            text,
                            span: Span::new(pos, self.cur.tell()),
                        });
                    }
                },
            }
        }

        if !closed {
            self.note_eof(depth);
        }

        Group {
            name: adopt_name(&children),
            known,
            ignorable,
            children,
            tail,
            span: Span::new(start, self.cur.tell()),
        }
    }

    /// Collect the raw payload after a `\bin` control word. The length is
    /// the parameter reinterpreted as an unsigned 32-bit value, matching
    /// writers that emit lengths above `i32::MAX` as negative numbers.
    fn read_bin_payload(&mut self, parameter: Option<i64>, word_start: usize) -> Vec<u8> {
        let raw = parameter.unwrap_or(0);
        let len = (raw as u32) as usize;
        if len == 0 {
            return Vec::new();
        }
        if len > self.cur.remaining() {
            self.diags.push(
                Diagnostic::error(
                    codes::PARSER_INVALID_BIN_LENGTH,
                    format!(
                        "\\bin payload of {len} bytes exceeds the {} bytes remaining",
                        self.cur.remaining()
                    ),
                    Some(Span::new(word_start, self.cur.tell())),
                )
                .with_context(ctx! {
                    "declared" => raw.to_string(),
                    "adjusted" => len.to_string(),
                    "remaining" => self.cur.remaining().to_string(),
                }),
            );
            return Vec::new();
        }
        let payload = self.cur.read(len).to_vec();
        // Payload bytes are opaque: a trailing backslash in them must not
        // escape the byte that follows.
        self.cur.set_escape_barrier(self.cur.tell());
        payload
    }

    /// Note that input ended inside one or more open groups. Reported once
    /// per parse, at the innermost group.
    fn note_eof(&mut self, depth: usize) {
        if self.truncated {
            return;
        }
        self.truncated = true;
        let severity = match self.eof_policy {
            EofPolicy::Implicit => Severity::Info,
            EofPolicy::Strict => Severity::Error,
        };
        self.diags.push(Diagnostic::new(
            codes::PARSER_UNEXPECTED_EOF,
            severity,
            format!("input ended with {depth} group(s) still open"),
            Some(Span::empty(self.cur.tell())),
        ));
    }
}

/// A group is named after its first control-word child, parameter included:
/// `{\rtf1 ...}` is the group `rtf1`, `{\fonttbl ...}` the group `fonttbl`.
fn adopt_name(children: &[Node]) -> String {
    if let Some(Node::ControlWord {
        name, parameter, ..
    }) = children.first()
    {
        match parameter {
            Some(p) => format!("{name}{p}"),
            None => name.clone(),
        }
    } else {
        "unknown".to_string()
    }
}
