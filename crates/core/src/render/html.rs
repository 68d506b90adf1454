//! HTML de-encapsulation.
//!
//! Email clients that transport HTML bodies over RTF wrap the markup in
//! formatting control words (MS-OXRTFEX). De-encapsulation is the reverse:
//! text and selected control words are written out, formatting-table groups
//! are dropped, and the `\htmlrtf` toggle suppresses the RTF-only spans
//! between its on and off switches.

use std::io::{self, Write};

use rtf_toolchain_diagnostics::{codes, Diagnostic};

use crate::grammar::ast::{Group, Node};
use crate::render::Renderer;

/// Destination groups that carry formatting tables rather than content.
const IGNORE_GROUPS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "generator",
    "formatConverter",
    "pntext",
    "pntxta",
    "pntxtb",
];

/// Renders encapsulated HTML out of an RTF tree.
#[derive(Debug, Default)]
pub struct HtmlDecapsulator {
    ignore_rtf: bool,
    saw_fromhtml: bool,
    warnings: Vec<Diagnostic>,
}

impl HtmlDecapsulator {
    /// Create a de-encapsulator with a clean toggle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings collected during the last [`render`](Renderer::render) call.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    fn render_group(&mut self, group: &Group, out: &mut dyn Write) -> io::Result<()> {
        for item in &group.children {
            match item {
                Node::Group(g) => {
                    let skip = g
                        .destination()
                        .map_or(false, |d| IGNORE_GROUPS.contains(&d));
                    if !skip {
                        self.render_group(g, out)?;
                    }
                }
                Node::ControlWord {
                    name,
                    parameter,
                    span,
                    ..
                } => match name.as_str() {
                    "par" | "line" => {
                        if !self.ignore_rtf {
                            out.write_all(b"\n")?;
                        }
                    }
                    "tab" => {
                        if !self.ignore_rtf {
                            out.write_all(b"\t")?;
                        }
                    }
                    "fromhtml" => {
                        if *parameter == Some(1) {
                            self.saw_fromhtml = true;
                        } else {
                            self.warnings.push(Diagnostic::warn(
                                codes::RENDER_NOT_FROM_HTML,
                                "\\fromhtml without parameter 1, this RTF part was \
                                 not generated from HTML",
                                Some(*span),
                            ));
                        }
                    }
                    // \htmlrtf and \htmlrtf1 switch suppression on,
                    // \htmlrtf0 switches it off.
                    "htmlrtf" => match parameter {
                        None | Some(1) => self.ignore_rtf = true,
                        Some(0) => self.ignore_rtf = false,
                        Some(_) => {}
                    },
                    _ => {}
                },
                Node::ControlSymbol { text, span, .. } => {
                    if !self.ignore_rtf {
                        self.render_symbol(text, *span, out)?;
                    }
                }
                Node::Text { text, .. } => {
                    if !self.ignore_rtf {
                        out.write_all(text.as_bytes())?;
                    }
                }
            }
        }
        Ok(())
    }

    fn render_symbol(
        &mut self,
        text: &str,
        span: rtf_toolchain_diagnostics::Span,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        match text {
            // Obsolete formula character used by Word 5.1 for Macintosh.
            "|" => Ok(()),
            // Non-breaking space.
            "~" => out.write_all("\u{a0}".as_bytes()),
            // Optional hyphen.
            "-" => Ok(()),
            // Non-breaking hyphen.
            "_" => out.write_all("\u{2011}".as_bytes()),
            // Subentry in an index entry.
            ":" => Ok(()),
            "*" => {
                self.warnings.push(Diagnostic::warn(
                    codes::RENDER_STRAY_IGNORABLE,
                    "ignorable control symbol outside a group start",
                    Some(span),
                ));
                Ok(())
            }
            // Anything else, typically a character escaped as \'hh.
            other => out.write_all(other.as_bytes()),
        }
    }
}

impl Renderer for HtmlDecapsulator {
    fn render(&mut self, tree: &Group, out: &mut dyn io::Write) -> io::Result<()> {
        self.ignore_rtf = false;
        self.saw_fromhtml = false;
        self.warnings.clear();
        self.render_group(tree, out)?;
        if !self.saw_fromhtml {
            self.warnings.push(Diagnostic::warn(
                codes::RENDER_NOT_FROM_HTML,
                "document does not declare \\fromhtml1, it was probably not \
                 generated from HTML",
                Some(tree.span),
            ));
        }
        Ok(())
    }
}
