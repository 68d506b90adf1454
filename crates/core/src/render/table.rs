//! Table extraction.
//!
//! Walks the row/cell control words of an RTF table (`\trowd`, `\cellx`,
//! `\cell`, `\row`) and produces HTML `<table>` markup. Cell geometry is
//! carried in twips (1/1440 inch) as absolute right-edge coordinates, so
//! each width is the difference from the previous `\cellx`; widths, indents,
//! and border flags queue up during the row prelude and are consumed as the
//! cells are emitted.

use std::collections::VecDeque;
use std::io::{self, Write};

use rtf_toolchain_diagnostics::{codes, Diagnostic};

use crate::grammar::ast::{Group, Node};
use crate::render::Renderer;

/// Twips per inch.
const TWIPS_PER_INCH: f64 = 1440.0;

/// Destinations worth descending into when hunting for table structure.
/// Groups with no destination word may wrap table content and are always
/// descended.
const IMPORTANT_GROUPS: &[&str] = &["trowd", "intbl", "animtext", "line", "cell", "row"];

/// Extracts RTF tables into HTML `<table>` markup.
#[derive(Debug, Default)]
pub struct RtfTableExtractor {
    cell_widths: VecDeque<f64>,
    cell_coords: VecDeque<i64>,
    left_indent: VecDeque<String>,
    text_align: String,
    border_top: VecDeque<u32>,
    border_right: VecDeque<u32>,
    border_bottom: VecDeque<u32>,
    border_left: VecDeque<u32>,
    inside_cell: bool,
    cell_start_written: bool,
    warnings: Vec<Diagnostic>,
}

impl RtfTableExtractor {
    /// Create an extractor with empty style queues.
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
                Node::Group(g) => match g.destination() {
                    Some(d) if !IMPORTANT_GROUPS.contains(&d) => {}
                    _ => self.render_group(g, out)?,
                },
                Node::ControlWord {
                    name, parameter, ..
                } => self.control_word(name, *parameter, out)?,
                Node::ControlSymbol { text, span, .. } => match text.as_str() {
                    "|" | "-" | ":" => {}
                    "~" => out.write_all("\u{a0}".as_bytes())?,
                    "_" => out.write_all("\u{2011}".as_bytes())?,
                    "*" => self.warnings.push(Diagnostic::warn(
                        codes::RENDER_STRAY_IGNORABLE,
                        "ignorable control symbol outside a group start",
                        Some(*span),
                    )),
                    other => out.write_all(other.as_bytes())?,
                },
                Node::Text { text, .. } => {
                    if !self.inside_cell {
                        self.open_cell(out)?;
                        self.inside_cell = true;
                        self.cell_start_written = true;
                    }
                    out.write_all(text.as_bytes())?;
                }
            }
        }
        Ok(())
    }

    fn control_word(
        &mut self,
        name: &str,
        parameter: Option<i64>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        match name {
            "trowd" => out.write_all(b"\n    <table><tr>"),
            "row" => out.write_all(b"</tr></table>"),
            "tab" => out.write_all(b"&nbsp;&nbsp;&nbsp;&nbsp;"),
            "line" | "par" => out.write_all(b"<br>"),
            "pard" => {
                self.text_align.clear();
                Ok(())
            }
            "cellx" => {
                self.queue_cell_width(parameter.unwrap_or(0));
                Ok(())
            }
            "li" => {
                let indent = fmt_inches(parameter.unwrap_or(0) as f64 / TWIPS_PER_INCH);
                self.left_indent.push_back(format!("text-indent: {indent}in; "));
                Ok(())
            }
            "ql" => {
                self.text_align = "text-align: left; ".to_string();
                Ok(())
            }
            "qr" => {
                self.text_align = "text-align: right; ".to_string();
                Ok(())
            }
            "qc" => {
                self.text_align = "text-align: center; ".to_string();
                Ok(())
            }
            "clbrdrt" => {
                self.border_top.push_back(1);
                Ok(())
            }
            "clbrdrr" => {
                self.border_right.push_back(1);
                Ok(())
            }
            "clbrdrb" => {
                self.border_bottom.push_back(1);
                Ok(())
            }
            "clbrdrl" => {
                self.border_left.push_back(1);
                Ok(())
            }
            "cell" => self.close_cell(out),
            _ => Ok(()),
        }
    }

    /// `\cellx` gives the cell's absolute right edge; the width is measured
    /// from the previous edge in the row.
    fn queue_cell_width(&mut self, right_edge: i64) {
        let offset = if self.cell_widths.is_empty() {
            0
        } else {
            self.cell_coords.back().copied().unwrap_or(0)
        };
        let width = (right_edge - offset) as f64 / TWIPS_PER_INCH;
        self.cell_coords.push_back(right_edge);
        self.cell_widths.push_back(width.abs());
    }

    fn border_width_style(&mut self) -> String {
        let t = self.border_top.pop_front().unwrap_or(0);
        let r = self.border_right.pop_front().unwrap_or(0);
        let b = self.border_bottom.pop_front().unwrap_or(0);
        let l = self.border_left.pop_front().unwrap_or(0);
        format!("border-width: {t}px {r}px {b}px {l}px;")
    }

    fn open_cell(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let border_opt = self.border_width_style();
        let mut width_opt = String::new();
        if let Some(w) = self.cell_widths.pop_front() {
            let w = fmt_inches(w);
            width_opt = format!("min-width: {w}in; max-width: {w}in; ");
            self.cell_coords.pop_front();
        }
        let li_opt = self.left_indent.pop_front().unwrap_or_default();
        let align_opt = self.text_align.clone();
        write!(
            out,
            "\n        <td style=\"{width_opt}{li_opt}{align_opt}{border_opt}\"><pre>"
        )
    }

    fn close_cell(&mut self, out: &mut dyn Write) -> io::Result<()> {
        self.inside_cell = false;
        if self.cell_start_written {
            self.cell_start_written = false;
            return out.write_all(b"</pre></td>");
        }
        // An empty cell: no text ever opened it, so emit the whole cell
        // here, consuming its queued geometry.
        let border_opt = self.border_width_style();
        let mut style = String::new();
        if let Some(w) = self.cell_widths.pop_front() {
            let w = fmt_inches(w);
            style = format!(" style=\"min-width: {w}in; max-width: {w}in; {border_opt}\" ");
            self.cell_coords.pop_front();
        }
        write!(out, "\n        <td{style}><pre></pre></td>")
    }
}

impl Renderer for RtfTableExtractor {
    fn render(&mut self, tree: &Group, out: &mut dyn io::Write) -> io::Result<()> {
        *self = Self::default();
        self.render_group(tree, out)
    }
}

/// Format an inch value rounded to three decimals, without trailing zeros.
fn fmt_inches(v: f64) -> String {
    let s = format!("{:.3}", v.abs());
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}
