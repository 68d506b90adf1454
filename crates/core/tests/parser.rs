//! Integration tests for the RTF parser: structural properties on whole
//! documents, recovery behavior, and encoding resolution.

mod common;

use rtf_toolchain_core::grammar::ast::Node;
use rtf_toolchain_core::grammar::parser::{parse_bytes, parse_bytes_with, EofPolicy, ParseOptions};
use rtf_toolchain_core::ParseError;
use rtf_toolchain_diagnostics::{codes, Severity};

use common::{collect_text, extract_diag_codes, find_group, parse_ok};

// ── Root and structure ──────────────────────────────────────────────────

#[test]
fn well_formed_root_is_named_rtf1() {
    let r = parse_ok(br"{\rtf1\ansi\deff0{\fonttbl{\f0\fswiss Helvetica;}}\f0\pard Hello.\par}");
    assert_eq!(r.root.name, "rtf1");
    assert!(r.root.known);
    assert!(!r.root.ignorable);
    assert!(!r.truncated);
}

#[test]
fn groups_nest_in_document_order() {
    let r = parse_ok(br"{\rtf1\ansi{\fonttbl{\f0 Arial;}{\f1 Times;}}}");
    let fonttbl = find_group(&r.root, "fonttbl").expect("fonttbl group");
    let subgroups: Vec<&str> = fonttbl
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Group(g) => Some(g.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(subgroups, ["f0", "f1"]);
}

#[test]
fn ignorable_destination_marker_is_captured() {
    let r = parse_ok(br"{\rtf1\ansi{\*\generator Riched20 10.0;}body}");
    let generator = find_group(&r.root, "generator").expect("generator group");
    assert!(generator.ignorable);
    // The root itself is not ignorable.
    assert!(!r.root.ignorable);
}

#[test]
fn text_crossing_probe_windows_stays_one_leaf() {
    // Far longer than one probe window; must reassemble into one text node.
    let mut input = Vec::from(&b"{\\rtf1\\ansi "[..]);
    let body: String = std::iter::repeat('y').take(1000).collect();
    input.extend_from_slice(body.as_bytes());
    input.push(b'}');
    let r = parse_ok(&input);
    let leaves: Vec<&str> = r
        .root
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(leaves, [body.as_str()]);
}

#[test]
fn newlines_between_tokens_are_structurally_invisible() {
    let r = parse_ok(b"{\\rtf1\\ansi\r\nfirst\r\nsecond}");
    assert_eq!(collect_text(&r.root), "firstsecond");
}

#[test]
fn control_word_tails_absorb_trailing_semicolons() {
    let r = parse_ok(br"{\rtf1\ansi{\colortbl;\red0\green0\blue0;}}");
    let colortbl = find_group(&r.root, "colortbl").expect("colortbl group");
    // The semicolons live in control-word tails, not in text leaves.
    assert_eq!(collect_text(colortbl), "");
    match &colortbl.children[0] {
        Node::ControlWord { name, tail, .. } => {
            assert_eq!(name, "colortbl");
            assert_eq!(tail, ";");
        }
        other => panic!("unexpected node {other:?}"),
    }
}

// ── Escaping ────────────────────────────────────────────────────────────

#[test]
fn escaped_braces_and_backslashes_are_literal() {
    let r = parse_ok(br"{\rtf1\ansi \{literal\} and \\ done}");
    assert_eq!(collect_text(&r.root), "{literal} and \\ done");
    assert!(!r.truncated);
}

#[test]
fn double_backslash_before_brace_keeps_brace_structural() {
    // \\ is a literal backslash, so the following { opens a real group.
    let r = parse_ok(br"{\rtf1\ansi \\{\b x}}");
    assert!(find_group(&r.root, "b").is_some());
}

// ── Encoding ────────────────────────────────────────────────────────────

#[test]
fn ansicpg_selects_the_declared_code_page() {
    // 0xcf 0xf0 under windows-1251 is the Cyrillic "Пр".
    let mut input = Vec::from(&br"{\rtf1\ansi\ansicpg1251 "[..]);
    input.extend_from_slice(&[0xcf, 0xf0]);
    input.push(b'}');
    let r = parse_ok(&input);
    assert_eq!(r.encoding, "windows-1251");
    assert_eq!(collect_text(&r.root), "\u{41f}\u{440}");
}

#[test]
fn mac_charset_resolves_to_macintosh() {
    let r = parse_ok(br"{\rtf1\mac hello}");
    assert_eq!(r.encoding, "macintosh");
}

#[test]
fn undeclared_charset_is_a_hard_error() {
    let err = parse_bytes(br"{\rtf1 hello}").unwrap_err();
    assert!(matches!(err, ParseError::MissingEncoding));
}

#[test]
fn unsupported_code_page_degrades_with_warning() {
    let r = parse_ok(br"{\rtf1\ansicpg437 hi}");
    assert_eq!(r.encoding, "windows-1252");
    assert!(extract_diag_codes(&r).contains(&codes::PARSER_UNSUPPORTED_CODE_PAGE.to_string()));
}

// ── Brace balance and EOF ───────────────────────────────────────────────

#[test]
fn balanced_braces_produce_no_eof_diagnostic() {
    let r = parse_ok(br"{\rtf1\ansi{\b bold}{\i italic}}");
    assert!(!r.truncated);
    assert!(!extract_diag_codes(&r).contains(&codes::PARSER_UNEXPECTED_EOF.to_string()));
}

#[test]
fn open_groups_at_eof_are_implicitly_closed() {
    let r = parse_ok(br"{\rtf1\ansi{\b bold text");
    assert!(r.truncated);
    // Reported exactly once, at info level by default.
    let eof: Vec<_> = r
        .diagnostics
        .iter()
        .filter(|d| d.id == codes::PARSER_UNEXPECTED_EOF)
        .collect();
    assert_eq!(eof.len(), 1);
    assert_eq!(eof[0].severity, Severity::Info);
    // The partial tree is usable down to the leaf text.
    let b = find_group(&r.root, "b").expect("partial bold group");
    assert_eq!(collect_text(b), "bold text");
}

#[test]
fn strict_policy_makes_truncation_an_error() {
    let opts = ParseOptions {
        eof_policy: EofPolicy::Strict,
    };
    let r = parse_bytes_with(br"{\rtf1\ansi open", &opts).unwrap();
    let eof = r
        .diagnostics
        .iter()
        .find(|d| d.id == codes::PARSER_UNEXPECTED_EOF)
        .expect("eof diagnostic");
    assert_eq!(eof.severity, Severity::Error);
}

#[test]
fn stray_content_without_opening_brace_is_recovered() {
    let r = parse_ok(br"\rtf1\ansi hello}");
    assert!(!r.root.known);
    assert_eq!(r.root.name, "rtf1");
    assert!(extract_diag_codes(&r).contains(&codes::PARSER_MALFORMED_GROUP.to_string()));
}

// ── Binary payloads ─────────────────────────────────────────────────────

#[test]
fn bin_payload_is_read_raw_and_parsing_resumes() {
    let r = parse_ok(b"{\\rtf1\\ansi\\bin5 ABCDE\\par tail}");
    let payload = r
        .root
        .children
        .iter()
        .find_map(|n| match n {
            Node::ControlWord { name, bin_data, .. } if name == "bin" => Some(bin_data.clone()),
            _ => None,
        })
        .expect("bin control word");
    assert_eq!(payload, b"ABCDE");
    assert_eq!(collect_text(&r.root), "tail");
    assert!(!r.truncated);
}

#[test]
fn bin_with_braces_in_payload_keeps_balance() {
    let r = parse_ok(b"{\\rtf1\\ansi\\bin3 {}}after}");
    assert!(!r.truncated);
    assert_eq!(collect_text(&r.root), "after");
}

#[test]
fn oversized_bin_length_is_diagnosed_and_skipped() {
    let r = parse_ok(b"{\\rtf1\\ansi\\bin100 short}");
    assert!(extract_diag_codes(&r).contains(&codes::PARSER_INVALID_BIN_LENGTH.to_string()));
}

// ── Spans ───────────────────────────────────────────────────────────────

#[test]
fn spans_cover_the_source_bytes() {
    let input: &[u8] = br"{\rtf1\ansi hello}";
    let r = parse_ok(input);
    assert_eq!(r.root.span.start, 0);
    assert_eq!(r.root.span.end, input.len());
    for node in &r.root.children {
        let span = match node {
            Node::Group(g) => g.span,
            Node::ControlWord { span, .. }
            | Node::ControlSymbol { span, .. }
            | Node::Text { span, .. } => *span,
        };
        assert!(span.start <= span.end);
        assert!(span.end <= input.len());
    }
}
