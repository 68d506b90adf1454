//! Renderers that turn a parse tree into an output document.
//!
//! A renderer walks the tree and writes to any [`io::Write`] sink. Renderers
//! that can detect suspicious input collect [`Diagnostic`]s while walking;
//! callers read them back after [`Renderer::render`] returns.
//!
//! [`Diagnostic`]: rtf_toolchain_diagnostics::Diagnostic

/// HTML de-encapsulation for RTF produced by email clients.
pub mod html;
/// Byte-level RTF re-emission behind the renderer interface.
pub mod rtf;
/// Extraction of RTF tables into HTML `<table>` markup.
pub mod table;

use std::io;

use crate::grammar::ast::Group;

/// A tree-to-document renderer.
pub trait Renderer {
    /// Render the tree rooted at `tree` into `out`.
    fn render(&mut self, tree: &Group, out: &mut dyn io::Write) -> io::Result<()>;
}
