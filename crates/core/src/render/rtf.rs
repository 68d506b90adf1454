//! RTF re-emission behind the [`Renderer`] interface.
//!
//! Thin wrapper over [`emit_rtf`](crate::grammar::emit::emit_rtf), so the
//! CLI and library callers can treat "write the document back out" the same
//! way as the other renderers.

use std::io;

use crate::grammar::ast::Group;
use crate::grammar::emit::{emit_rtf, EmitConfig};
use crate::render::Renderer;

/// Re-emits a parse tree as RTF bytes.
#[derive(Debug, Default)]
pub struct RtfRoundTripper {
    config: EmitConfig,
}

impl RtfRoundTripper {
    /// Create a round-tripper with the given emit configuration.
    pub fn new(config: EmitConfig) -> Self {
        Self { config }
    }
}

impl Renderer for RtfRoundTripper {
    fn render(&mut self, tree: &Group, out: &mut dyn io::Write) -> io::Result<()> {
        out.write_all(&emit_rtf(tree, &self.config))
    }
}
