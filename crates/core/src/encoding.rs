//! Character-set detection from the RTF header.
//!
//! The character set is declared by control words near the start of the
//! document (`\ansi`, `\ansicpg1251`, `\mac`, `\pc`, `\pca`), but those
//! words can only be found by tokenizing, and tokenizing text needs a
//! codec. The circle is broken by sniffing: the first few dozen bytes are
//! scanned under a provisional windows-1252 codec, which is safe because
//! control-word syntax is pure ASCII.

use encoding_rs::{Encoding, WINDOWS_1252};
use rtf_toolchain_diagnostics::{codes, Diagnostic, Span};

use crate::error::ParseError;
use crate::grammar::cursor::Cursor;
use crate::grammar::lexer::{
    classify, match_control_symbol, match_control_word, match_group_end, match_group_start,
    match_plain_text, TokKind,
};

/// Number of leading bytes scanned for character-set declarations. Large
/// enough for `{\rtf1\ansi\ansicpg1252` plus a generous margin.
pub const SNIFF_LEN: usize = 48;

/// Detect the document encoding from the header.
///
/// Only control words that are immediate children of the root group are
/// considered. A code-page word (`\ansicpg N`) wins over the bare character
/// set keywords; among keywords, the first one found wins. A declared code
/// page with no available codec degrades to windows-1252 with an
/// [`codes::PARSER_UNSUPPORTED_CODE_PAGE`] warning.
///
/// Returns [`ParseError::MissingEncoding`] when the header declares nothing.
pub fn sniff(buf: &[u8], diags: &mut Vec<Diagnostic>) -> Result<&'static Encoding, ParseError> {
    let window = &buf[..buf.len().min(SNIFF_LEN)];
    let mut cur = Cursor::new(window);
    let mut depth = 0usize;

    let mut ansicpg: Option<(i64, Span)> = None;
    let mut keyword: Option<(i64, Span)> = None;

    while !cur.is_at_end() {
        let pos = cur.tell();
        let w = cur.peek(2);
        let kind = classify(w, cur.is_escaped_at(pos));
        let advanced = match kind {
            TokKind::GroupStart => {
                let m = match_group_start(&mut cur).is_some();
                if m {
                    depth += 1;
                }
                m
            }
            TokKind::GroupEnd => {
                let m = match_group_end(&mut cur).is_some();
                if m {
                    depth = depth.saturating_sub(1);
                }
                m
            }
            TokKind::ControlWord => match match_control_word(&mut cur) {
                Some(m) => {
                    // depth 0 covers inputs missing their opening brace,
                    // which the parser recovers into a synthesized root.
                    if depth <= 1 {
                        let span = Span::new(pos, cur.tell());
                        // Keyword character sets map to code pages; the
                        // explicit \ansicpg wins regardless of word order.
                        match (m.name.as_str(), m.parameter) {
                            ("ansicpg", Some(cp)) => {
                                if ansicpg.is_none() {
                                    ansicpg = Some((cp, span));
                                }
                            }
                            ("ansi", _) => keyword = keyword.or(Some((1252, span))),
                            ("mac", _) => keyword = keyword.or(Some((10000, span))),
                            ("pc", _) => keyword = keyword.or(Some((437, span))),
                            ("pca", _) => keyword = keyword.or(Some((850, span))),
                            _ => {}
                        }
                    }
                    true
                }
                None => false,
            },
            TokKind::ControlSymbol => match_control_symbol(&mut cur, WINDOWS_1252).is_some(),
            TokKind::PlainText => match_plain_text(&mut cur, WINDOWS_1252).is_some(),
        };
        if !advanced {
            // Sniffing never diagnoses; the real parse will.
            cur.seek_by(1);
        }
    }

    let (cp, span) = ansicpg.or(keyword).ok_or(ParseError::MissingEncoding)?;
    let clamped = u16::try_from(cp).ok();
    if let Some(enc) = clamped.and_then(codepage::to_encoding) {
        return Ok(enc);
    }
    diags.push(
        Diagnostic::warn(
            codes::PARSER_UNSUPPORTED_CODE_PAGE,
            format!("no codec for code page {cp}, falling back to windows-1252"),
            Some(span),
        )
        .with_context(std::collections::BTreeMap::from([
            ("requested".to_string(), cp.to_string()),
            ("used".to_string(), WINDOWS_1252.name().to_string()),
        ])),
    );
    Ok(WINDOWS_1252)
}
