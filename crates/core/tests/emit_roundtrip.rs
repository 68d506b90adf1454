//! Round-trip tests for the RTF emitter.
//!
//! Gold-standard guarantee: `parse(emit(parse(input)))` produces the same
//! tree as `parse(input)` (ignoring spans, which shift after re-emission),
//! and for well-formed input the emitted bytes equal the source bytes.

mod common;

use rtf_toolchain_core::grammar::ast::strip_spans;
use rtf_toolchain_core::grammar::emit::{emit_rtf, EmitConfig, LineEnding};

use common::parse_ok;

/// Assert that re-emission reproduces the input byte-for-byte.
fn assert_bytes_roundtrip(input: &[u8]) {
    let res = parse_ok(input);
    let config = EmitConfig {
        line_ending: LineEnding::Preserve,
        encoding: Some(res.codec),
    };
    let emitted = emit_rtf(&res.root, &config);
    assert_eq!(
        emitted,
        input,
        "\n--- Byte round-trip failed ---\nInput:\n{}\nEmitted:\n{}\n",
        String::from_utf8_lossy(input),
        String::from_utf8_lossy(&emitted)
    );
}

/// Assert that emit + re-parse produces a semantically identical tree.
/// Holds even for inputs the parser had to repair.
fn assert_tree_roundtrip(input: &[u8]) {
    let res1 = parse_ok(input);
    let config = EmitConfig {
        line_ending: LineEnding::Preserve,
        encoding: Some(res1.codec),
    };
    let emitted = emit_rtf(&res1.root, &config);
    let res2 = parse_ok(&emitted);
    assert_eq!(
        strip_spans(&res1.root),
        strip_spans(&res2.root),
        "\n--- Tree round-trip failed ---\nInput:\n{}\nEmitted:\n{}\n",
        String::from_utf8_lossy(input),
        String::from_utf8_lossy(&emitted)
    );
}

// ── Byte-exact round-trips on well-formed documents ─────────────────────

#[test]
fn minimal_document() {
    assert_bytes_roundtrip(br"{\rtf1\ansi\deff0 hello}");
}

#[test]
fn header_tables_and_body() {
    assert_bytes_roundtrip(
        br"{\rtf1\ansi\ansicpg1252\deff0{\fonttbl{\f0\fswiss Helvetica;}}{\colortbl;\red255\green0\blue0;}\f0\pard Body text.\par}",
    );
}

#[test]
fn ignorable_destinations() {
    assert_bytes_roundtrip(br"{\rtf1\ansi{\*\generator Riched20;}{\*\mmathPr x}done}");
}

#[test]
fn escapes_and_symbols() {
    assert_bytes_roundtrip(br"{\rtf1\ansi \{a\} \\ \~ \_ caf\'e9}");
}

#[test]
fn negative_parameters() {
    assert_bytes_roundtrip(br"{\rtf1\ansi\li-720\fi-360 indented}");
}

#[test]
fn bin_payload_bytes() {
    assert_bytes_roundtrip(b"{\\rtf1\\ansi\\bin6 \\x{}\x01\x02 after}");
}

#[test]
fn group_tails_with_semicolons_and_newlines() {
    assert_bytes_roundtrip(b"{\\rtf1\\ansi{\\colortbl;\\red0\\green0\\blue0;};\r\n\\par\r\ndone}");
}

#[test]
fn crlf_between_control_words() {
    assert_bytes_roundtrip(b"{\\rtf1\\ansi\\par\r\n\\pard\r\ntext}");
}

// ── Tree-level round-trips on repaired input ────────────────────────────

#[test]
fn truncated_document_tree_roundtrip() {
    assert_tree_roundtrip(br"{\rtf1\ansi{\b still open");
}

#[test]
fn missing_opening_brace_tree_roundtrip() {
    assert_tree_roundtrip(br"\rtf1\ansi stray}");
}

#[test]
fn non_ascii_text_tree_roundtrip() {
    let mut input = Vec::from(&br"{\rtf1\ansi\ansicpg1251 "[..]);
    input.extend_from_slice(&[0xcf, 0xf0, 0xe8, 0xe2, 0xe5, 0xf2]);
    input.push(b'}');
    assert_tree_roundtrip(&input);
    // With the document codec supplied, this also holds byte-for-byte.
    assert_bytes_roundtrip(&input);
}

// ── Normalization ───────────────────────────────────────────────────────

#[test]
fn crlf_normalization_to_lf() {
    let res = parse_ok(b"{\\rtf1\\ansi\\par\r\ntext}");
    let out = emit_rtf(
        &res.root,
        &EmitConfig {
            line_ending: LineEnding::Lf,
            encoding: Some(res.codec),
        },
    );
    assert_eq!(out, b"{\\rtf1\\ansi\\par\ntext}");
}

#[test]
fn lf_normalization_to_crlf() {
    let res = parse_ok(b"{\\rtf1\\ansi\\par\ntext}");
    let out = emit_rtf(
        &res.root,
        &EmitConfig {
            line_ending: LineEnding::CrLf,
            encoding: Some(res.codec),
        },
    );
    assert_eq!(out, b"{\\rtf1\\ansi\\par\r\ntext}");
}

#[test]
fn normalized_output_reparses_to_the_same_tree() {
    let input: &[u8] = b"{\\rtf1\\ansi\\par\r\nline one\r\n\\par line two}";
    let res1 = parse_ok(input);
    let out = emit_rtf(
        &res1.root,
        &EmitConfig {
            line_ending: LineEnding::Lf,
            encoding: Some(res1.codec),
        },
    );
    let res2 = parse_ok(&out);
    // CR/LF runs live only in tails, which carry no structure.
    assert_eq!(
        strip_spans_text(&res1),
        strip_spans_text(&res2)
    );
}

fn strip_spans_text(res: &rtf_toolchain_core::grammar::parser::ParseResult) -> String {
    common::collect_text(&res.root)
}
