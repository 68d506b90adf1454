//! Fuzz smoke tests for the RTF parser.
//!
//! Random, adversarial, and edge-case inputs are fed to the parser to verify
//! it never panics, always terminates, and upholds basic structural
//! invariants on every tree it returns.
//!
//! No external crate dependencies are used — a simple deterministic PRNG
//! provides reproducible randomness.

mod common;

use rtf_toolchain_core::grammar::ast::{Group, Node};
use rtf_toolchain_core::grammar::emit::{emit_rtf, EmitConfig, LineEnding};
use rtf_toolchain_core::grammar::parser::{parse_bytes, ParseResult};

// ─── Simple deterministic PRNG (LCG) ────────────────────────────────────────

struct SimpleRng(u64);

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range(&mut self, max: usize) -> usize {
        (self.next() as usize) % max
    }

    fn gen_bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next() as u8).collect()
    }
}

// ─── Invariant checking ─────────────────────────────────────────────────────

fn check_spans(group: &Group, input_len: usize) {
    assert!(group.span.start <= group.span.end);
    assert!(group.span.end <= input_len);
    for node in &group.children {
        match node {
            Node::Group(g) => check_spans(g, input_len),
            Node::ControlWord { span, .. }
            | Node::ControlSymbol { span, .. }
            | Node::Text { span, .. } => {
                assert!(span.start <= span.end);
                assert!(span.end <= input_len);
            }
        }
    }
}

/// Assert structural invariants on any `ParseResult`, regardless of input.
fn assert_invariants(result: &ParseResult, input: &[u8]) {
    check_spans(&result.root, input.len());

    for diag in &result.diagnostics {
        if let Some(span) = diag.span {
            assert!(span.start <= span.end);
            assert!(span.end <= input.len());
        }
    }

    // Re-emission of whatever tree came back must not panic either.
    let _ = emit_rtf(
        &result.root,
        &EmitConfig {
            line_ending: LineEnding::Preserve,
            encoding: Some(result.codec),
        },
    );
}

/// Parse arbitrary bytes; a `MissingEncoding` error is an acceptable
/// outcome, a panic never is.
fn parse_and_check(input: &[u8]) {
    if let Ok(result) = parse_bytes(input) {
        assert_invariants(&result, input);
    }
}

/// Wrap a fuzzed body in a header that always sniffs, so the parser proper
/// gets exercised rather than the encoding gate.
fn with_header(body: &[u8]) -> Vec<u8> {
    let mut input = Vec::from(&br"{\rtf1\ansi "[..]);
    input.extend_from_slice(body);
    input
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[test]
fn random_bytes_never_panic() {
    let mut rng = SimpleRng::new(0x5eed);
    for _ in 0..200 {
        let len = rng.gen_range(300);
        let body = rng.gen_bytes(len);
        parse_and_check(&with_header(&body));
    }
}

#[test]
fn random_bytes_without_header_never_panic() {
    let mut rng = SimpleRng::new(0xface);
    for _ in 0..200 {
        let len = rng.gen_range(300);
        parse_and_check(&rng.gen_bytes(len));
    }
}

#[test]
fn random_structural_soup_never_panics() {
    // Heavily weighted toward the bytes the grammar cares about.
    const ALPHABET: &[u8] = b"{}\\\\''ab01 \r\n;*-";
    let mut rng = SimpleRng::new(0xbeef);
    for _ in 0..500 {
        let len = rng.gen_range(200);
        let body: Vec<u8> = (0..len)
            .map(|_| ALPHABET[rng.gen_range(ALPHABET.len())])
            .collect();
        parse_and_check(&with_header(&body));
    }
}

#[test]
fn adversarial_fixed_inputs() {
    let cases: &[&[u8]] = &[
        b"",
        b"{",
        b"}",
        b"\\",
        br"{\rtf1\ansi",
        br"{\rtf1\ansi\",
        br"{\rtf1\ansi\'",
        br"{\rtf1\ansi\'z",
        br"{\rtf1\ansi\bin",
        br"{\rtf1\ansi\bin99999999",
        b"{\\rtf1\\ansi\\bin10 ab",
        br"{\rtf1\ansi\-\_\~\:\|\*",
        br"{\rtf1\ansi{{{{}}}}}",
        b"{\\rtf1\\ansi\r\n\r\n\r\n}",
        br"{\rtf1\ansi\foo-}",
        br"}}}{\rtf1\ansi}",
    ];
    for case in cases {
        parse_and_check(case);
    }
}

#[test]
fn deep_nesting_terminates() {
    let mut input = Vec::from(&br"{\rtf1\ansi "[..]);
    for _ in 0..5000 {
        input.push(b'{');
    }
    parse_and_check(&input);
}

#[test]
fn pathological_backslash_runs_terminate() {
    let mut input = Vec::from(&br"{\rtf1\ansi "[..]);
    input.extend(std::iter::repeat(b'\\').take(2000));
    input.push(b'}');
    parse_and_check(&input);
}

#[test]
fn long_control_words_and_parameters_terminate() {
    let mut input = Vec::from(&br"{\rtf1\ansi "[..]);
    for _ in 0..50 {
        input.push(b'\\');
        input.extend(std::iter::repeat(b'q').take(100));
        input.extend(std::iter::repeat(b'7').take(40));
    }
    input.push(b'}');
    parse_and_check(&input);
}
