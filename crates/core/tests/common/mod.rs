//! Shared test helpers for `rtf_toolchain_core` integration tests.

#![allow(unreachable_pub)]

use rtf_toolchain_core::grammar::ast::{Group, Node};
use rtf_toolchain_core::grammar::parser::{parse_bytes, ParseResult};

/// Parse a document that the test expects to parse (the encoding is
/// declared), panicking otherwise.
#[allow(dead_code)]
pub fn parse_ok(input: &[u8]) -> ParseResult {
    parse_bytes(input).unwrap_or_else(|e| {
        panic!(
            "parse failed for {:?}: {e}",
            String::from_utf8_lossy(input)
        )
    })
}

/// Find the first descendant group with the given name, depth-first.
#[allow(dead_code)]
pub fn find_group<'a>(root: &'a Group, name: &str) -> Option<&'a Group> {
    for child in &root.children {
        if let Node::Group(g) = child {
            if g.name == name {
                return Some(g);
            }
            if let Some(found) = find_group(g, name) {
                return Some(found);
            }
        }
    }
    None
}

/// Collect every text leaf of a group, in document order, concatenated.
#[allow(dead_code)]
pub fn collect_text(group: &Group) -> String {
    let mut out = String::new();
    for child in &group.children {
        match child {
            Node::Group(g) => out.push_str(&collect_text(g)),
            Node::Text { text, .. } => out.push_str(text),
            Node::ControlSymbol { text, .. } => out.push_str(text),
            Node::ControlWord { .. } => {}
        }
    }
    out
}

/// Collect diagnostic codes from a parse result.
#[allow(dead_code)]
pub fn extract_diag_codes(result: &ParseResult) -> Vec<String> {
    result
        .diagnostics
        .iter()
        .map(|d| d.id.to_string())
        .collect()
}
