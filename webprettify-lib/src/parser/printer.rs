//! Renders a parsed document back to HTML, one node per line.

use crate::dom::dom_tree::{self, Handle, NodeData};
use std::fmt::Write;

/// A list of void (self-closing) elements in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements the parser reads as raw text; their text is written unescaped.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Elements whose content is written verbatim, on the tag's own line.
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Renders the entire Document, DOCTYPE included.
///
/// # Arguments
///
/// * `document` - The parsed document.
/// * `indent_width` - Number of spaces per nesting level.
pub fn render_document(document: &dom_tree::Document, indent_width: usize) -> String {
    let mut printer = Printer {
        out: String::new(),
        unit: " ".repeat(indent_width),
    };
    if let Some(doctype) = &*document.doctype.borrow() {
        printer.doctype(doctype);
    }
    printer.node(&document.root, 0, false);
    printer.out
}

struct Printer {
    out: String,
    unit: String,
}

impl Printer {
    fn line(&mut self, depth: usize, content: &str) {
        for _ in 0..depth {
            self.out.push_str(&self.unit);
        }
        self.out.push_str(content);
        self.out.push('\n');
    }

    fn doctype(&mut self, doctype: &dom_tree::Doctype) {
        let mut line = format!("<!DOCTYPE {}", doctype.name);
        if !doctype.public_id.is_empty() {
            let _ = write!(line, " PUBLIC \"{}\"", doctype.public_id);
            if !doctype.system_id.is_empty() {
                let _ = write!(line, " \"{}\"", doctype.system_id);
            }
        } else if !doctype.system_id.is_empty() {
            let _ = write!(line, " SYSTEM \"{}\"", doctype.system_id);
        }
        line.push('>');
        self.line(0, &line);
    }

    /// Recursively renders `handle` at `depth`.
    fn node(&mut self, handle: &Handle, depth: usize, raw_text: bool) {
        let node = handle.borrow();
        match &node.data {
            NodeData::DocumentRoot => {
                for child in &node.children {
                    self.node(child, depth, false);
                }
            }
            NodeData::Element(elem) => {
                let tag = elem.tag.as_str();
                let open = open_tag(elem);
                if VOID_ELEMENTS.contains(&tag) {
                    self.line(depth, &format!("{}/>", &open[..open.len() - 1]));
                } else if PREFORMATTED_ELEMENTS.contains(&tag) {
                    let mut inline = open;
                    for child in &node.children {
                        render_inline(child, &mut inline);
                    }
                    let _ = write!(inline, "</{}>", tag);
                    self.line(depth, &inline);
                } else {
                    self.line(depth, &open);
                    let raw = RAW_TEXT_ELEMENTS.contains(&tag);
                    for child in &node.children {
                        self.node(child, depth + 1, raw);
                    }
                    self.line(depth, &format!("</{}>", tag));
                }
            }
            NodeData::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    if raw_text {
                        self.line(depth, text);
                    } else {
                        self.line(depth, &escape_text(text));
                    }
                }
            }
            NodeData::Comment(text) => self.line(depth, &format!("<!--{}-->", text)),
            NodeData::ProcessingInstruction { target, data } => {
                self.line(depth, &format!("<?{} {}>", target, data))
            }
        }
    }
}

fn open_tag(elem: &dom_tree::ElementNode) -> String {
    let mut open = format!("<{}", elem.tag);
    for (key, value) in &elem.attributes {
        let _ = write!(open, " {}=\"{}\"", key, escape_attribute(value));
    }
    open.push('>');
    open
}

/// Serializes a subtree without adding or removing any whitespace.
fn render_inline(handle: &Handle, out: &mut String) {
    let node = handle.borrow();
    match &node.data {
        NodeData::DocumentRoot => {}
        NodeData::Element(elem) => {
            out.push_str(&open_tag(elem));
            if !VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                for child in &node.children {
                    render_inline(child, out);
                }
                let _ = write!(out, "</{}>", elem.tag);
            }
        }
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Comment(text) => {
            let _ = write!(out, "<!--{}-->", text);
        }
        NodeData::ProcessingInstruction { target, data } => {
            let _ = write!(out, "<?{} {}>", target, data);
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
