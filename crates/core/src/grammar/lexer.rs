//! RTF token grammar: byte-level matchers for the five token kinds.
//!
//! Control-word and control-symbol syntax is pure ASCII, while payload text
//! may be in an arbitrary single- or double-byte code page. Matching
//! therefore operates on raw bytes and decodes only at the leaves — eagerly
//! decoding every byte would break on multi-byte sequences that happen to
//! contain ASCII control bytes.
//!
//! Every matcher reads a bounded probe window sized to the largest possible
//! token of its kind, and on success seeks to exactly the end of the match;
//! on failure it seeks back to the pre-probe position. This lets the parser
//! try token kinds in sequence without consuming input speculatively.

use encoding_rs::Encoding;

use super::cursor::Cursor;

/// Probe window for plain-text runs. Text longer than one window is
/// accumulated across repeated probes.
pub const PROBE_LEN: usize = 42;

/// Probe window for the maximal control word:
/// backslash + 32 letters + sign + 10 digits + delimiter.
pub const CONTROL_WORD_PROBE: usize = 1 + 32 + 1 + 10 + 1;

/// Longest permitted control name.
pub const MAX_NAME_LEN: usize = 32;

/// Longest permitted parameter digit run.
pub const MAX_PARAM_DIGITS: usize = 10;

/// Classification of the token starting at the cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokKind {
    /// `{`, optionally followed by the ignorable marker `\*`.
    GroupStart,
    /// `}` plus its whitespace/semicolon tail.
    GroupEnd,
    /// `\name` with optional signed parameter.
    ControlWord,
    /// `\X` where X is a single non-letter, non-digit byte.
    ControlSymbol,
    /// A run of bytes with no structural meaning.
    PlainText,
}

/// Classify a non-empty lookahead window. Two bytes are sufficient to
/// disambiguate the leading control characters; the fixed precedence is
/// group-start, group-end, control-word, control-symbol, plain-text.
///
/// `escaped` tells whether the first window byte is preceded by an odd run
/// of backslashes, in which case it has no structural meaning.
pub fn classify(window: &[u8], escaped: bool) -> TokKind {
    match window[0] {
        b'{' if !escaped => TokKind::GroupStart,
        b'}' if !escaped => TokKind::GroupEnd,
        b'\\' if !escaped => match window.get(1) {
            Some(c) if c.is_ascii_alphabetic() => TokKind::ControlWord,
            // A digit cannot start a control name; route to the control-word
            // matcher anyway so its failure produces the recovery placeholder.
            Some(c) if c.is_ascii_digit() => TokKind::ControlWord,
            // Anything else (including a second backslash) is a symbol; a
            // lone trailing backslash is recovered in the symbol builder.
            _ => TokKind::ControlSymbol,
        },
        _ => TokKind::PlainText,
    }
}

// ── Group delimiters ────────────────────────────────────────────────────

/// A matched group start.
#[derive(Debug)]
pub struct GroupStartMatch {
    /// True when the opening brace was immediately followed by `\*`.
    pub ignorable: bool,
}

/// Match `{` with an optional `\*` ignorable-destination marker.
pub fn match_group_start(cur: &mut Cursor<'_>) -> Option<GroupStartMatch> {
    let start = cur.tell();
    if cur.is_escaped_at(start) {
        return None;
    }
    let w = cur.read(3);
    if w.first() != Some(&b'{') {
        cur.seek_to(start);
        return None;
    }
    let ignorable = w.len() == 3 && w[1] == b'\\' && w[2] == b'*';
    cur.seek_to(start + if ignorable { 3 } else { 1 });
    Some(GroupStartMatch { ignorable })
}

/// A matched group end.
#[derive(Debug)]
pub struct GroupEndMatch {
    /// Trailing whitespace/semicolons after the closing brace, kept for
    /// exact round-trip rendering.
    pub tail: String,
}

/// Match `}` and consume its trailing whitespace/semicolon tail.
pub fn match_group_end(cur: &mut Cursor<'_>) -> Option<GroupEndMatch> {
    let start = cur.tell();
    if cur.is_escaped_at(start) {
        return None;
    }
    let w = cur.read(1);
    if w != b"}" {
        cur.seek_to(start);
        return None;
    }
    let mut tail = String::new();
    while let Some(&b) = cur.peek(1).first() {
        if matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b';') {
            tail.push(b as char);
            cur.seek_by(1);
        } else {
            break;
        }
    }
    Some(GroupEndMatch { tail })
}

// ── Control words ───────────────────────────────────────────────────────

/// A matched control word (before any `\bin` payload handling).
#[derive(Debug)]
pub struct ControlWordMatch {
    /// The 1–32 letter control name.
    pub name: String,
    /// Optional signed decimal parameter.
    pub parameter: Option<i64>,
    /// Consumed delimiter space plus the trailing whitespace/semicolon run.
    pub tail: String,
}

/// Match `\name[-]N?<delim>` against the maximal control-word window.
///
/// The delimiter is a single space (consumed, recorded in `tail`), any other
/// non-letter/non-digit byte (left in place for the next token), or end of
/// input. Trailing whitespace and semicolons after the delimiter are folded
/// into the tail, kept only for exact round-trip rendering — except after
/// `\bin`, whose payload starts immediately after the delimiter and may
/// itself begin with such bytes.
pub fn match_control_word(cur: &mut Cursor<'_>) -> Option<ControlWordMatch> {
    let start = cur.tell();
    if cur.is_escaped_at(start) {
        return None;
    }
    let w = cur.read(CONTROL_WORD_PROBE);
    if w.first() != Some(&b'\\') {
        cur.seek_to(start);
        return None;
    }

    let mut i = 1;
    while i < w.len() && w[i].is_ascii_alphabetic() && i - 1 < MAX_NAME_LEN {
        i += 1;
    }
    if i == 1 {
        cur.seek_to(start);
        return None;
    }
    if i < w.len() && w[i].is_ascii_alphabetic() {
        // 33rd letter: no delimiter alternative matches, the word is invalid.
        cur.seek_to(start);
        return None;
    }
    let name = String::from_utf8_lossy(&w[1..i]).into_owned();

    let mut parameter = None;
    let minus = i < w.len() && w[i] == b'-';
    let digits_start = i + usize::from(minus);
    let mut k = digits_start;
    while k < w.len() && w[k].is_ascii_digit() && k - digits_start < MAX_PARAM_DIGITS {
        k += 1;
    }
    if k > digits_start {
        if k < w.len() && w[k].is_ascii_digit() {
            // 11th digit: invalid.
            cur.seek_to(start);
            return None;
        }
        let text = String::from_utf8_lossy(&w[i..k]);
        // 10 digits with a sign always fit an i64.
        parameter = text.parse::<i64>().ok();
        i = k;
    }

    let mut tail = String::new();
    let mut end = start + i;
    if w.get(i) == Some(&b' ') {
        tail.push(' ');
        end += 1;
    }
    cur.seek_to(end);

    if name != "bin" {
        while let Some(&b) = cur.peek(1).first() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b';') {
                tail.push(b as char);
                cur.seek_by(1);
            } else {
                break;
            }
        }
    }

    Some(ControlWordMatch {
        name,
        parameter,
        tail,
    })
}

// ── Control symbols ─────────────────────────────────────────────────────

/// A matched control symbol.
#[derive(Debug)]
pub struct ControlSymbolMatch {
    /// The literal symbol byte, or the two hex digits of the `\'hh` form.
    pub symbol: String,
    /// The decoded character under the document codec.
    pub text: String,
    /// True for the escaped-hex form `\'hh`.
    pub hex: bool,
}

/// Match `\X` for a single non-letter, non-digit X, or the escaped-hex form
/// `\'hh` whose byte is decoded through `enc`.
pub fn match_control_symbol(
    cur: &mut Cursor<'_>,
    enc: &'static Encoding,
) -> Option<ControlSymbolMatch> {
    let start = cur.tell();
    if cur.is_escaped_at(start) {
        return None;
    }
    let w = cur.read(2);
    if w.first() != Some(&b'\\') || w.len() < 2 || w[1].is_ascii_alphanumeric() {
        cur.seek_to(start);
        return None;
    }

    if w[1] == b'\'' {
        let hex = cur.read(2);
        if hex.len() == 2 && hex.iter().all(u8::is_ascii_hexdigit) {
            let byte = hex_pair_to_byte(hex[0], hex[1]);
            return Some(ControlSymbolMatch {
                symbol: String::from_utf8_lossy(hex).into_owned(),
                text: decode(enc, &[byte]),
                hex: true,
            });
        }
        // Not followed by two hex digits: fall back to a plain `'` symbol.
        cur.seek_to(start + 2);
        return Some(ControlSymbolMatch {
            symbol: "'".into(),
            text: "'".into(),
            hex: false,
        });
    }

    let text = decode(enc, &w[1..2]);
    Some(ControlSymbolMatch {
        symbol: text.clone(),
        text,
        hex: false,
    })
}

// ── Plain text ──────────────────────────────────────────────────────────

/// A matched plain-text run.
#[derive(Debug)]
pub struct PlainTextMatch {
    /// Decoded text, reassembled across probe windows; CR/LF never appear.
    pub text: String,
}

/// Match a maximal run of bytes that are none of `\`, `{`, `}`, CR, LF.
///
/// The run is accumulated across repeated probe windows: the matcher keeps
/// reading as long as a window is completely filled by text (or interrupted
/// only by structurally-insignificant CR/LF), and stops when a structural
/// byte or end of input appears. Raw bytes are collected first and decoded
/// once at the end, so multi-byte code-page sequences that straddle a window
/// boundary decode correctly.
pub fn match_plain_text(cur: &mut Cursor<'_>, enc: &'static Encoding) -> Option<PlainTextMatch> {
    let start = cur.tell();
    let mut raw: Vec<u8> = Vec::new();

    loop {
        let window_start = cur.tell();
        let w = cur.read(PROBE_LEN);
        if w.is_empty() {
            break;
        }

        let mut i = 0;
        while i < w.len() && (w[i] == b'\r' || w[i] == b'\n') {
            i += 1;
        }
        let run_start = i;
        while i < w.len() && !matches!(w[i], b'\\' | b'{' | b'}' | b'\r' | b'\n') {
            i += 1;
        }

        if i == 0 {
            // The window opens with a structural byte: nothing to consume.
            cur.seek_to(window_start);
            break;
        }

        raw.extend_from_slice(&w[run_start..i]);

        match w.get(i) {
            Some(b'\\' | b'{' | b'}') => {
                // Give the structural byte back to the next token.
                cur.seek_to(window_start + i);
                break;
            }
            Some(_) => {
                // CR/LF mid-window: park on it, the next probe skips it.
                cur.seek_to(window_start + i);
            }
            None => {
                cur.seek_to(window_start + i);
                if w.len() < PROBE_LEN {
                    break;
                }
                // Window filled entirely: more text may follow.
            }
        }
    }

    if cur.tell() == start {
        return None;
    }
    Some(PlainTextMatch {
        text: decode(enc, &raw),
    })
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Decode bytes through the document codec, without BOM handling.
pub fn decode(enc: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _) = enc.decode_without_bom_handling(bytes);
    text.into_owned()
}

fn hex_pair_to_byte(h1: u8, h2: u8) -> u8 {
    (hex_digit_value(h1) << 4) | hex_digit_value(h2)
}

fn hex_digit_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'A'..=b'F' => b - b'A' + 10,
        b'a'..=b'f' => b - b'a' + 10,
        _ => unreachable!("hex_digit_value called with non-hex byte: {}", b),
    }
}
