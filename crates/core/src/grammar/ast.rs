use serde::{Deserialize, Serialize};
use rtf_toolchain_diagnostics::Span;

/// A parsed RTF group: `{` ... `}` and everything between.
///
/// The document root is itself a group (conventionally `{\rtf1 ...}`). The
/// group's `name` is adopted from its first control-word child, so the root
/// is named `rtf1` for well-formed documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    /// Name adopted from the first control-word child, with the parameter
    /// appended (e.g. `"rtf1"`, `"fonttbl"`). `"unknown"` when the group has
    /// no control-word first child or no start token was found.
    pub name: String,
    /// False when the parser synthesized this group without finding an
    /// opening brace.
    pub known: bool,
    /// True when the opening brace was followed by the `\*` marker, flagging
    /// an ignorable destination.
    pub ignorable: bool,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Whitespace/semicolon run after the closing brace, preserved for
    /// byte-exact re-emission.
    pub tail: String,
    /// Source span from the opening brace through the end of the tail.
    pub span: Span,
}

/// A node in the RTF parse tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Node {
    /// A nested group.
    Group(Group),
    /// A control word (e.g. `\par`, `\ansicpg1252`, `\bin`).
    ControlWord {
        /// The 1–32 letter control name, without backslash or parameter.
        name: String,
        /// Optional signed decimal parameter.
        #[serde(skip_serializing_if = "Option::is_none")]
        parameter: Option<i64>,
        /// Raw payload bytes following a `\bin` word; empty otherwise.
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        bin_data: Vec<u8>,
        /// Consumed delimiter space plus the trailing whitespace/semicolon
        /// run, preserved for byte-exact re-emission.
        tail: String,
        /// Source span of the whole word including tail and payload.
        span: Span,
    },
    /// A control symbol (e.g. `\~`, `\{`, or the escaped-hex form `\'hh`).
    ControlSymbol {
        /// The symbol byte as written, or the two hex digits for `\'hh`.
        symbol: String,
        /// The character the symbol stands for under the document codec.
        text: String,
        /// True for the `\'hh` form.
        hex: bool,
        /// Source span of the symbol.
        span: Span,
    },
    /// A run of document text with no structural bytes.
    Text {
        /// Decoded text; CR/LF outside `\bin` payloads never appear here.
        text: String,
        /// Source span of the raw byte run.
        span: Span,
    },
}

impl Group {
    /// The name of this group's first control-word child without its
    /// parameter, or `None` when the first child is not a control word.
    /// `{\*\generator ...}` and `{\fonttbl ...}` both answer their
    /// destination name here.
    pub fn destination(&self) -> Option<&str> {
        for child in &self.children {
            match child {
                Node::ControlWord { name, .. } => return Some(name),
                // The text a lexer-level CR/LF skip can leave empty never
                // reaches the tree, so any other node kind means "no name".
                _ => return None,
            }
        }
        None
    }
}

/// Strip all spans from a tree for comparison (used in round-trip tests).
///
/// Sets every span to the sentinel `Span { start: 0, end: 0 }`.
pub fn strip_spans(group: &Group) -> Group {
    let sentinel = Span::new(0, 0);
    Group {
        name: group.name.clone(),
        known: group.known,
        ignorable: group.ignorable,
        children: group.children.iter().map(strip_node_spans).collect(),
        tail: group.tail.clone(),
        span: sentinel,
    }
}

fn strip_node_spans(node: &Node) -> Node {
    let sentinel = Span::new(0, 0);
    match node {
        Node::Group(g) => Node::Group(strip_spans(g)),
        Node::ControlWord {
            name,
            parameter,
            bin_data,
            tail,
            ..
        } => Node::ControlWord {
            name: name.clone(),
            parameter: *parameter,
            bin_data: bin_data.clone(),
            tail: tail.clone(),
            span: sentinel,
        },
        Node::ControlSymbol {
            symbol, text, hex, ..
        } => Node::ControlSymbol {
            symbol: symbol.clone(),
            text: text.clone(),
            hex: *hex,
            span: sentinel,
        },
        Node::Text { text, .. } => Node::Text {
            text: text.clone(),
            span: sentinel,
        },
    }
}
