//! HTML5 serializer for the arena DOM.
//!
//! Follows the HTML5 serialization rules:
//!
//! - Void elements never get end tags
//! - Text content is escaped
//! - Attribute values are escaped and double-quoted
//! - Raw text elements (script, style) are not escaped
//! - RCDATA elements (title, textarea) escape only `&` and `<`
//! - Foreign content (SVG/MathML) can use self-closing syntax
//! - `<template>` writes its contents fragment

use std::fmt::Write;

use indextree::NodeId;

use crate::dom::Dom;
use crate::node::{ElementData, Namespace, NodeKind};

/// Options for HTML serialization.
#[derive(Clone, Debug)]
pub struct SerializeOptions {
    /// Whether to pretty-print with indentation (default: false for minified output)
    pub pretty: bool,
    /// Indentation string for pretty-printing (default: "  ")
    pub indent: String,
    /// Whether to sort attributes alphabetically (default: false, which
    /// keeps insertion order)
    pub sort_attributes: bool,
    /// Whether to escape `</script` sequences in script content (default: true)
    pub escape_script_end_tags: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
            sort_attributes: false,
            escape_script_end_tags: true,
        }
    }
}

impl SerializeOptions {
    /// Create new default options (minified output).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty-printing with default indentation.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Set a custom indentation string (implies pretty-printing).
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self.pretty = true;
        self
    }

    /// Enable sorting attributes alphabetically.
    pub fn sort_attributes(mut self) -> Self {
        self.sort_attributes = true;
        self
    }

    /// Disable escaping `</script` in script content (not recommended).
    pub fn no_escape_script_end_tags(mut self) -> Self {
        self.escape_script_end_tags = false;
        self
    }
}

/// Serialize `node` and its subtree.
///
/// A document writes its doctype (if one was parsed) and its children; a
/// fragment writes only its children.
pub fn serialize(dom: &Dom, node: NodeId, opts: &SerializeOptions) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(dom, &mut out, opts);
    ser.write_node(node);
    out
}

/// HTML5 void elements - these never have end tags.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements - content is not escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// RCDATA elements - only `&` and `<` are escaped.
const RCDATA_ELEMENTS: &[&str] = &["title", "textarea"];

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

fn is_rcdata_element(tag: &str) -> bool {
    RCDATA_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

struct Serializer<'a, W: Write> {
    dom: &'a Dom,
    out: &'a mut W,
    options: &'a SerializeOptions,
    depth: usize,
}

impl<'a, W: Write> Serializer<'a, W> {
    fn new(dom: &'a Dom, out: &'a mut W, options: &'a SerializeOptions) -> Self {
        Self {
            dom,
            out,
            options,
            depth: 0,
        }
    }

    fn write_indent(&mut self) {
        if self.options.pretty {
            for _ in 0..self.depth {
                let _ = write!(self.out, "{}", self.options.indent);
            }
        }
    }

    fn write_newline(&mut self) {
        if self.options.pretty {
            let _ = writeln!(self.out);
        }
    }

    /// Escape text content for normal HTML elements.
    fn write_text_escaped(&mut self, text: &str) {
        for c in text.chars() {
            let _ = match c {
                '&' => self.out.write_str("&amp;"),
                '<' => self.out.write_str("&lt;"),
                '>' => self.out.write_str("&gt;"),
                _ => self.out.write_char(c),
            };
        }
    }

    /// Escape text content for RCDATA elements (only & and <).
    fn write_rcdata_escaped(&mut self, text: &str) {
        for c in text.chars() {
            let _ = match c {
                '&' => self.out.write_str("&amp;"),
                '<' => self.out.write_str("&lt;"),
                _ => self.out.write_char(c),
            };
        }
    }

    /// Write raw text content, optionally escaping script end tags.
    fn write_raw_text(&mut self, text: &str, tag: &str) {
        if self.options.escape_script_end_tags && tag.eq_ignore_ascii_case("script") {
            // Match on bytes so that the slice indices below stay on the
            // original string's char boundaries
            const PATTERN: &[u8] = b"</script";
            let bytes = text.as_bytes();
            let mut last_end = 0;
            let mut i = 0;

            while i + PATTERN.len() <= bytes.len() {
                if bytes[i..i + PATTERN.len()].eq_ignore_ascii_case(PATTERN) {
                    let _ = self.out.write_str(&text[last_end..i]);
                    // keep the original case of the tag name
                    let _ = write!(self.out, "<\\/{}", &text[i + 2..i + PATTERN.len()]);
                    last_end = i + PATTERN.len();
                    i = last_end;
                } else {
                    i += 1;
                }
            }
            let _ = self.out.write_str(&text[last_end..]);
        } else {
            let _ = self.out.write_str(text);
        }
    }

    /// Escape attribute value and write it double-quoted.
    fn write_attr_value_escaped(&mut self, text: &str) {
        for c in text.chars() {
            let _ = match c {
                '&' => self.out.write_str("&amp;"),
                '<' => self.out.write_str("&lt;"),
                '>' => self.out.write_str("&gt;"),
                '"' => self.out.write_str("&quot;"),
                _ => self.out.write_char(c),
            };
        }
    }

    fn write_attr(&mut self, name: &str, value: &str) {
        let _ = write!(self.out, " {}=\"", name);
        self.write_attr_value_escaped(value);
        let _ = self.out.write_str("\"");
    }

    fn write_children(&mut self, parent: NodeId) {
        let dom = self.dom;
        for child in dom.children(parent) {
            self.write_node(child);
        }
    }

    fn write_node(&mut self, node: NodeId) {
        let dom = self.dom;
        match dom.kind(node) {
            NodeKind::Document => {
                if let Some(doctype) = &dom.doctype {
                    let _ = write!(self.out, "<!DOCTYPE {}>", doctype);
                    self.write_newline();
                }
                self.write_children(node);
            }
            NodeKind::DocumentFragment => self.write_children(node),
            NodeKind::Element(elem) => self.write_element(node, elem),
            NodeKind::Text(text) => {
                // Whitespace-only text is kept: it can be significant
                // between inline elements and in <pre>
                self.write_indent();
                self.write_text_escaped(text);
                if self.options.pretty && !text.is_empty() {
                    self.write_newline();
                }
            }
            NodeKind::Comment(text) => {
                self.write_indent();
                // `--` would close the comment early
                let safe_text = text.replace("--", "- -");
                let _ = write!(self.out, "<!--{}-->", safe_text);
                self.write_newline();
            }
        }
    }

    fn write_element(&mut self, node: NodeId, elem: &ElementData) {
        let dom = self.dom;
        let tag = elem.tag.as_ref();
        let is_void = is_void_element(tag);
        let is_raw = is_raw_text_element(tag);
        let is_rcdata = is_rcdata_element(tag);
        let is_foreign = elem.ns != Namespace::Html;

        // Template contents come first; a template's own child list is
        // normally empty
        let children: Vec<NodeId> = elem
            .template_contents
            .into_iter()
            .flat_map(|contents| dom.children(contents))
            .chain(dom.children(node))
            .collect();

        // Opening tag
        self.write_indent();
        let _ = write!(self.out, "<{}", tag);

        if self.options.sort_attributes {
            let mut attrs: Vec<_> = elem.attrs.iter().collect();
            attrs.sort_by_key(|(k, _)| *k);
            for (name, value) in attrs {
                self.write_attr(name, value);
            }
        } else {
            for (name, value) in elem.attrs.iter() {
                self.write_attr(name, value);
            }
        }

        if is_void {
            let _ = self.out.write_str(">");
            self.write_newline();
            return;
        }

        if is_foreign && children.is_empty() {
            let _ = self.out.write_str("/>");
            self.write_newline();
            return;
        }

        let _ = self.out.write_str(">");

        if children.is_empty() {
            let _ = write!(self.out, "</{}>", tag);
            self.write_newline();
            return;
        }

        let all_text = children
            .iter()
            .all(|&c| matches!(dom.kind(c), NodeKind::Text(_)));

        if is_raw || is_rcdata {
            for &child in &children {
                if let NodeKind::Text(text) = dom.kind(child) {
                    if is_raw {
                        self.write_raw_text(text, tag);
                    } else {
                        self.write_rcdata_escaped(text);
                    }
                }
            }
            let _ = write!(self.out, "</{}>", tag);
            self.write_newline();
        } else if all_text {
            for &child in &children {
                if let NodeKind::Text(text) = dom.kind(child) {
                    self.write_text_escaped(text);
                }
            }
            let _ = write!(self.out, "</{}>", tag);
            self.write_newline();
        } else {
            self.write_newline();
            self.depth += 1;
            for child in children {
                self.write_node(child);
            }
            self.depth -= 1;
            self.write_indent();
            let _ = write!(self.out, "</{}>", tag);
            self.write_newline();
        }
    }
}

// =============================================================================
// Convenience methods on Dom
// =============================================================================

impl Dom {
    /// Serialize the whole tree with default options.
    pub fn to_html(&self) -> String {
        serialize(self, self.root, &SerializeOptions::default())
    }

    /// Serialize the whole tree, pretty-printed.
    pub fn to_html_pretty(&self) -> String {
        serialize(self, self.root, &SerializeOptions::default().pretty())
    }

    /// Serialize the whole tree with custom options.
    pub fn to_html_with_options(&self, opts: &SerializeOptions) -> String {
        serialize(self, self.root, opts)
    }

    /// Serialize one node and its subtree with default options.
    pub fn node_to_html(&self, node: NodeId) -> String {
        serialize(self, node, &SerializeOptions::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
