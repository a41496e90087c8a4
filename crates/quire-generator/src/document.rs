//! Renderable documents.
//!
//! Themes return anything implementing [`Document`]; the pipeline only asks it
//! to serialize itself with the configured indentation. [`Html`] is a small
//! element tree for themes that do not bring their own markup library.

use quire_core::Indentation;

use crate::error::SerializeError;

/// A document that can be turned into bytes.
pub trait Document: Send {
    /// Serialize using `indentation`, or compactly when `None`.
    fn render(&self, indentation: Option<Indentation>) -> Result<String, SerializeError>;
}

impl Document for String {
    fn render(&self, _indentation: Option<Indentation>) -> Result<String, SerializeError> {
        Ok(self.clone())
    }
}

/// A node in an [`Html`] tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Escaped on output.
    Text(String),
    /// Written verbatim, e.g. pre-rendered content bodies.
    Raw(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// An HTML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    #[must_use]
    pub fn raw(self, html: impl Into<String>) -> Self {
        self.child(Node::Raw(html.into()))
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// Only text children: kept on one line even when indenting.
    fn is_inline(&self) -> bool {
        self.children.iter().all(|c| matches!(c, Node::Text(_)))
    }

    fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push('>');
    }

    fn write(&self, out: &mut String, indentation: Option<Indentation>, depth: usize) {
        let pad = indentation.map(|i| i.at_depth(depth));
        if let Some(pad) = &pad {
            out.push_str(pad);
        }
        self.write_open_tag(out);
        if self.is_void() {
            if pad.is_some() {
                out.push('\n');
            }
            return;
        }

        if self.is_inline() || pad.is_none() {
            for child in &self.children {
                write_node(child, out, None, 0);
            }
        } else {
            out.push('\n');
            for child in &self.children {
                write_node(child, out, indentation, depth + 1);
            }
            if let Some(pad) = &pad {
                out.push_str(pad);
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
        if pad.is_some() {
            out.push('\n');
        }
    }
}

fn write_node(node: &Node, out: &mut String, indentation: Option<Indentation>, depth: usize) {
    match node {
        Node::Element(element) => element.write(out, indentation, depth),
        Node::Text(text) | Node::Raw(text) => {
            let text = match node {
                Node::Text(_) => escape(text),
                _ => text.clone(),
            };
            match indentation {
                Some(indentation) => {
                    out.push_str(&indentation.at_depth(depth));
                    out.push_str(&text);
                    out.push('\n');
                }
                None => out.push_str(&text),
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A complete HTML document with a doctype.
#[derive(Debug, Clone, PartialEq)]
pub struct Html {
    root: Element,
}

impl Html {
    /// Wrap an `<html>` root element.
    pub fn new(root: Element) -> Self {
        Self { root }
    }
}

impl Document for Html {
    fn render(&self, indentation: Option<Indentation>) -> Result<String, SerializeError> {
        let mut out = String::from("<!DOCTYPE html>");
        if indentation.is_some() {
            out.push('\n');
        }
        self.root.write(&mut out, indentation, 0);
        Ok(out)
    }
}
