mod render;

use std::fs;
use std::io::Write;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rtf_toolchain_core::grammar::{
    dump::to_pretty_json,
    emit::{emit_rtf, EmitConfig, LineEnding},
    parser::{parse_bytes_with, EofPolicy, ParseOptions, ParseResult},
};
use rtf_toolchain_core::render::{html::HtmlDecapsulator, table::RtfTableExtractor, Renderer};
use rtf_toolchain_diagnostics::{self as diag, Diagnostic, Severity};

use crate::render::{print_summary, render_diagnostics, Format};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "rtf",
    version,
    about = "RTF toolchain — parse, check, de-encapsulate, and re-emit Rich Text Format files"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── File analysis commands ──────────────────────────────────────
    /// Parse an RTF file and print its tree.
    Parse {
        file: String,
        /// Treat input ending inside an open group as an error.
        #[arg(long)]
        strict_eof: bool,
    },

    /// Syntax-check an RTF file.
    Check {
        file: String,
        /// Treat input ending inside an open group as an error.
        #[arg(long)]
        strict_eof: bool,
    },

    // ── File transformation ─────────────────────────────────────────
    /// De-encapsulate HTML from an RTF file (MS-OXRTFEX email bodies).
    Decap {
        file: String,
        /// Write the HTML to this file instead of stdout.
        #[arg(long, short = 'o')]
        out: Option<String>,
    },

    /// Extract RTF tables as HTML table markup.
    Table {
        file: String,
        /// Write the HTML to this file instead of stdout.
        #[arg(long, short = 'o')]
        out: Option<String>,
    },

    /// Re-emit an RTF file from its parse tree.
    Format {
        file: String,
        /// Write re-emitted output back to the file (in-place).
        #[arg(long, short, conflicts_with = "check")]
        write: bool,
        /// Check if the file re-emits byte-identically (exit 1 if not). For CI.
        #[arg(long, conflicts_with = "write")]
        check: bool,
        /// Line-ending treatment for preserved whitespace.
        #[arg(long, value_enum, default_value_t = LineEndingStyle::Preserve)]
        line_ending: LineEndingStyle,
    },

    // ── Reference / informational ───────────────────────────────────
    /// Explain a diagnostic ID (e.g. RTF1003).
    Explain { id: String },
}

/// Line-ending treatment for the `format` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LineEndingStyle {
    /// Keep CR/LF runs exactly as they appeared in the source.
    Preserve,
    /// Normalize CR/LF runs to a single LF.
    Lf,
    /// Normalize CR/LF runs to CRLF.
    Crlf,
}

impl From<LineEndingStyle> for LineEnding {
    fn from(s: LineEndingStyle) -> Self {
        match s {
            LineEndingStyle::Preserve => LineEnding::Preserve,
            LineEndingStyle::Lf => LineEnding::Lf,
            LineEndingStyle::Crlf => LineEnding::CrLf,
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Parse { file, strict_eof } => cmd_parse(&file, strict_eof, format)?,
        Cmd::Check { file, strict_eof } => cmd_check(&file, strict_eof, format)?,
        Cmd::Decap { file, out } => cmd_decap(&file, out.as_deref(), format)?,
        Cmd::Table { file, out } => cmd_table(&file, out.as_deref(), format)?,
        Cmd::Format {
            file,
            write,
            check,
            line_ending,
        } => cmd_format(&file, write, check, line_ending, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn parse_file(file: &str, strict_eof: bool) -> Result<(Vec<u8>, ParseResult)> {
    let input = fs::read(file).with_context(|| format!("failed to read '{file}'"))?;
    let opts = ParseOptions {
        eof_policy: if strict_eof {
            EofPolicy::Strict
        } else {
            EofPolicy::Implicit
        },
    };
    let res = parse_bytes_with(&input, &opts).with_context(|| format!("failed to parse '{file}'"))?;
    Ok((input, res))
}

fn cmd_parse(file: &str, strict_eof: bool, format: Format) -> Result<()> {
    let (input, res) = parse_file(file, strict_eof)?;

    match format {
        Format::Json => {
            // Single valid JSON object to stdout.
            let out = serde_json::json!({
                "tree": res.root,
                "encoding": res.encoding,
                "truncated": res.truncated,
                "diagnostics": res.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Tree to stdout, diagnostics to stderr.
            println!("{}", to_pretty_json(&res.root));
            if !res.diagnostics.is_empty() {
                let source = String::from_utf8_lossy(&input);
                render_diagnostics(&source, file, &res.diagnostics, format);
                print_summary(&res.diagnostics);
            }
        }
    }

    exit_on_errors(&res.diagnostics);
    Ok(())
}

fn cmd_check(file: &str, strict_eof: bool, format: Format) -> Result<()> {
    let (input, res) = parse_file(file, strict_eof)?;
    let ok = !res
        .diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error));

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "encoding": res.encoding,
                "truncated": res.truncated,
                "diagnostics": res.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            let source = String::from_utf8_lossy(&input);
            render_diagnostics(&source, file, &res.diagnostics, format);
            print_summary(&res.diagnostics);
            if ok {
                eprintln!("syntax ok");
            }
        }
    }

    exit_on_errors(&res.diagnostics);
    Ok(())
}

fn cmd_decap(file: &str, out_path: Option<&str>, format: Format) -> Result<()> {
    let (input, res) = parse_file(file, false)?;

    let mut renderer = HtmlDecapsulator::new();
    let mut html = Vec::new();
    renderer.render(&res.root, &mut html)?;

    let mut diagnostics = res.diagnostics;
    diagnostics.extend(renderer.warnings().iter().cloned());

    emit_rendered(file, &input, &html, &diagnostics, out_path, format, "html")?;
    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_table(file: &str, out_path: Option<&str>, format: Format) -> Result<()> {
    let (input, res) = parse_file(file, false)?;

    let mut renderer = RtfTableExtractor::new();
    let mut html = Vec::new();
    renderer.render(&res.root, &mut html)?;

    let mut diagnostics = res.diagnostics;
    diagnostics.extend(renderer.warnings().iter().cloned());

    emit_rendered(file, &input, &html, &diagnostics, out_path, format, "html")?;
    exit_on_errors(&diagnostics);
    Ok(())
}

/// Deliver renderer output: to a file when requested, to stdout otherwise.
/// Diagnostics go to stderr in pretty mode and into the JSON envelope in
/// JSON mode.
fn emit_rendered(
    file: &str,
    input: &[u8],
    rendered: &[u8],
    diagnostics: &[Diagnostic],
    out_path: Option<&str>,
    format: Format,
    key: &str,
) -> Result<()> {
    match out_path {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("failed to write '{path}'"))?;
            match format {
                Format::Json => {
                    let out = serde_json::json!({
                        "written": path,
                        "diagnostics": diagnostics,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => {
                    let source = String::from_utf8_lossy(input);
                    render_diagnostics(&source, file, diagnostics, format);
                    print_summary(diagnostics);
                    eprintln!("wrote {path}");
                }
            }
        }
        None => match format {
            Format::Json => {
                let out = serde_json::json!({
                    (key): String::from_utf8_lossy(rendered),
                    "diagnostics": diagnostics,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Format::Pretty => {
                std::io::stdout().write_all(rendered)?;
                let source = String::from_utf8_lossy(input);
                render_diagnostics(&source, file, diagnostics, format);
                print_summary(diagnostics);
            }
        },
    }
    Ok(())
}

fn cmd_format(
    file: &str,
    write: bool,
    check: bool,
    line_ending: LineEndingStyle,
    format: Format,
) -> Result<()> {
    let (input, res) = parse_file(file, false)?;

    // Surface parse diagnostics so the user knows if the input has issues.
    if !res.diagnostics.is_empty() {
        let source = String::from_utf8_lossy(&input);
        render_diagnostics(&source, file, &res.diagnostics, format);
        print_summary(&res.diagnostics);
    }

    let config = EmitConfig {
        line_ending: line_ending.into(),
        encoding: Some(res.codec),
    };
    let emitted = emit_rtf(&res.root, &config);

    let unchanged = emitted == input;

    if check {
        status_message(format, unchanged, "round-trips byte-identically", "differs on re-emission", file);
        if !unchanged {
            process::exit(1);
        }
    } else if write {
        if !unchanged {
            fs::write(file, &emitted)?;
        }
        status_message(format, !unchanged, "rewritten", "already canonical", file);
    } else {
        // Default: emitted document to stdout.
        std::io::stdout().write_all(&emitted)?;
    }

    Ok(())
}

/// Emit a status message for --check / --write in the appropriate format.
fn status_message(format: Format, condition: bool, if_true: &str, if_false: &str, file: &str) {
    let msg = if condition { if_true } else { if_false };
    match format {
        Format::Json => {
            let out = serde_json::json!({ "status": msg, "file": file });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("status JSON serialization cannot fail")
            );
        }
        Format::Pretty => {
            eprintln!("{}: {}", msg, file);
        }
    }
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output — write to stdout, not stderr.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}
