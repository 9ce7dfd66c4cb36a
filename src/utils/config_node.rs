//! Reader and writer for the nested `Name { key = value }` text format
//! used by the beacon file.
//!
//! A document is a sequence of values and nodes:
//!
//! ```text
//! Beacons
//! {
//!     Beacon
//!     {
//!         name = KSC
//!         lat = 28.5
//!     }
//! }
//! ```
//!
//! The opening brace may sit on the node name's line or on the next
//! one. `//` starts a comment that runs to the end of the line. Values
//! are split at the first `=` and trimmed, so a value may itself
//! contain `=`.

use crate::error::SyntaxError;
use std::fmt;

/// A named node holding ordered key/value pairs and child nodes.
///
/// Keys are not unique; [`ConfigNode::get_value`] returns the first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigNode {
    pub name: String,
    values: Vec<(String, String)>,
    nodes: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Creates an empty node.
    pub fn new(name: impl Into<String>) -> ConfigNode {
        ConfigNode {
            name: name.into(),
            values: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Parses a whole document. The returned node is an unnamed root
    /// whose children are the top-level nodes of the document. A
    /// leading byte-order mark is ignored.
    pub fn parse(text: &str) -> Result<ConfigNode, SyntaxError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut parser = Parser::default();
        for (index, line) in text.lines().enumerate() {
            parser.feed_line(index + 1, line)?;
        }
        parser.finish()
    }

    /// Appends a value. Values are written verbatim, so check text that
    /// did not come from this crate with [`is_writable_value`] first.
    pub fn add_value(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.push((key.into(), value.to_string()));
    }

    pub fn add_node(&mut self, node: ConfigNode) {
        self.nodes.push(node);
    }

    /// First value stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child nodes called `name`, in document order.
    pub fn get_nodes<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> + 'a {
        self.nodes.iter().filter(move |node| node.name == name)
    }

    /// All child nodes, in document order.
    pub fn nodes(&self) -> &[ConfigNode] {
        &self.nodes
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "\t".repeat(depth);
        writeln!(f, "{}{}", indent, self.name)?;
        writeln!(f, "{}{{", indent)?;
        for (key, value) in &self.values {
            writeln!(f, "{}\t{} = {}", indent, key, value)?;
        }
        for node in &self.nodes {
            node.write_indented(f, depth + 1)?;
        }
        writeln!(f, "{}}}", indent)
    }
}

/// Writes the node itself (name and braces), tab-indented.
impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Whether `value` reads back unchanged after being written: no braces,
/// no `//`, no line breaks and no surrounding whitespace.
pub fn is_writable_value(value: &str) -> bool {
    !value.contains(|c: char| matches!(c, '{' | '}' | '\n' | '\r'))
        && !value.contains("//")
        && value.trim() == value
}

//---------------------------------------------------------------
// Private functions
//---------------------------------------------------------------

#[derive(Default)]
struct Parser {
    root: ConfigNode,
    /// Open nodes with the line each was opened on.
    open: Vec<(ConfigNode, usize)>,
    /// A bare word that becomes a node name if `{` follows.
    pending_name: Option<String>,
}

impl Parser {
    fn current(&mut self) -> &mut ConfigNode {
        match self.open.last_mut() {
            Some((node, _)) => node,
            None => &mut self.root,
        }
    }

    fn feed_line(&mut self, line_no: usize, line: &str) -> Result<(), SyntaxError> {
        let mut rest = match line.find("//") {
            Some(i) => &line[..i],
            None => line,
        };
        while let Some(i) = rest.find(|c: char| c == '{' || c == '}') {
            self.feed_segment(&rest[..i]);
            if rest[i..].starts_with('{') {
                let name = self.pending_name.take().unwrap_or_default();
                self.open.push((ConfigNode::new(name), line_no));
            } else {
                self.pending_name = None;
                let (node, _) = self
                    .open
                    .pop()
                    .ok_or_else(|| SyntaxError::at(line_no, "unexpected `}` with no open node"))?;
                self.current().add_node(node);
            }
            rest = &rest[i + 1..];
        }
        self.feed_segment(rest);
        Ok(())
    }

    fn feed_segment(&mut self, segment: &str) {
        let segment = segment.trim();
        if segment.is_empty() {
            return;
        }
        if let Some((key, value)) = segment.split_once('=') {
            self.pending_name = None;
            self.current().add_value(key.trim(), value.trim());
        } else {
            self.pending_name = Some(segment.to_string());
        }
    }

    fn finish(mut self) -> Result<ConfigNode, SyntaxError> {
        if let Some((node, line_no)) = self.open.pop() {
            return Err(SyntaxError::at(
                line_no,
                format!("node `{}` is never closed", node.name),
            ));
        }
        Ok(self.root)
    }
}
