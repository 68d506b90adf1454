//! RTF emitter — converts a parse tree back into RTF bytes.
//!
//! Emission is structure-driven: groups re-open and re-close their braces,
//! control words re-emit their name, parameter, and preserved delimiter
//! tail, and `\bin` payloads are written byte-for-byte. A tree produced by
//! the parser therefore round-trips to an equivalent document; the only
//! intentional divergences are recovery placeholders and the optional
//! line-ending normalization below.

use encoding_rs::{Encoding, WINDOWS_1252};

use crate::grammar::ast::{Group, Node};

// ── Configuration ───────────────────────────────────────────────────────

/// Treatment of CR/LF runs preserved in node tails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Write tails exactly as they appeared in the source.
    #[default]
    Preserve,
    /// Normalize every CR/LF run in tails to a single `\n`.
    Lf,
    /// Normalize every CR/LF run in tails to a single `\r\n`.
    CrLf,
}

/// Configuration for the RTF emitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitConfig {
    /// Line-ending normalization for preserved tails.
    pub line_ending: LineEnding,
    /// Codec for document text, normally the one the parse reported.
    /// `None` encodes with windows-1252.
    pub encoding: Option<&'static Encoding>,
}

// ── Public API ──────────────────────────────────────────────────────────

/// Emit RTF bytes from a parse tree.
pub fn emit_rtf(root: &Group, config: &EmitConfig) -> Vec<u8> {
    let enc = config.encoding.unwrap_or(WINDOWS_1252);
    let mut out = Vec::new();
    emit_group(&mut out, root, config, enc);
    out
}

// ── Emission ────────────────────────────────────────────────────────────

fn emit_group(out: &mut Vec<u8>, group: &Group, config: &EmitConfig, enc: &'static Encoding) {
    // A synthesized group has no braces in the source; re-emitting some
    // would change the document structure.
    if group.known {
        out.push(b'{');
        if group.ignorable {
            out.extend_from_slice(b"\\*");
        }
    }
    for child in &group.children {
        emit_node(out, child, config, enc);
    }
    if group.known {
        out.push(b'}');
    }
    push_tail(out, &group.tail, config.line_ending);
}

fn emit_node(out: &mut Vec<u8>, node: &Node, config: &EmitConfig, enc: &'static Encoding) {
    match node {
        Node::Group(g) => emit_group(out, g, config, enc),

        Node::ControlWord {
            name,
            parameter,
            bin_data,
            tail,
            ..
        } => {
            out.push(b'\\');
            out.extend_from_slice(name.as_bytes());
            if let Some(p) = parameter {
                out.extend_from_slice(p.to_string().as_bytes());
            }
            push_tail(out, tail, config.line_ending);
            // Payload bytes are opaque; normalization never touches them.
            out.extend_from_slice(bin_data);
        }

        Node::ControlSymbol {
            symbol, text, hex, ..
        } => {
            out.push(b'\\');
            if *hex {
                out.push(b'\'');
                out.extend_from_slice(symbol.as_bytes());
            } else {
                encode_into(out, text, enc);
            }
        }

        Node::Text { text, .. } => encode_into(out, text, enc),
    }
}

fn push_tail(out: &mut Vec<u8>, tail: &str, line_ending: LineEnding) {
    match line_ending {
        LineEnding::Preserve => out.extend_from_slice(tail.as_bytes()),
        LineEnding::Lf | LineEnding::CrLf => {
            let nl: &[u8] = if line_ending == LineEnding::Lf {
                b"\n"
            } else {
                b"\r\n"
            };
            let mut chars = tail.chars().peekable();
            while let Some(c) = chars.next() {
                if c == '\r' || c == '\n' {
                    out.extend_from_slice(nl);
                    while matches!(chars.peek(), Some('\r' | '\n')) {
                        chars.next();
                    }
                } else {
                    out.push(c as u8);
                }
            }
        }
    }
}

fn encode_into(out: &mut Vec<u8>, text: &str, enc: &'static Encoding) {
    let (bytes, _, _) = enc.encode(text);
    out.extend_from_slice(&bytes);
}
