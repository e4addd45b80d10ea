//! Markup tree
//!
//! Components render to a small element tree built with a fluent API, the
//! same shape as a layout builder:
//!
//! ```rust
//! use folio_app::markup::{div, span};
//!
//! let tree = div()
//!     .class("App-links")
//!     .style("opacity", "1")
//!     .child(span().class("App-link").text("EMAIL"));
//!
//! assert_eq!(
//!     tree.to_html(),
//!     r#"<div class="App-links" style="opacity: 1"><span class="App-link">EMAIL</span></div>"#
//! );
//! ```
//!
//! Inline styles keep insertion order so output is stable between renders.

use indexmap::IndexMap;
use smallvec::SmallVec;

/// A node in the markup tree
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Element(element) => {
                for child in &element.children {
                    child.write_text(out);
                }
            }
            Node::Text(text) => out.push_str(text),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

/// An HTML element with classes, attributes and inline style
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    tag: &'static str,
    classes: SmallVec<[String; 4]>,
    attrs: IndexMap<&'static str, String>,
    style: IndexMap<&'static str, String>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: SmallVec::new(),
            attrs: IndexMap::new(),
            style: IndexMap::new(),
            children: Vec::new(),
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn class(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.classes.contains(&name) {
            self.classes.push(name);
        }
        self
    }

    /// Add a class only when `enabled`
    pub fn class_if(self, enabled: bool, name: impl Into<String>) -> Self {
        if enabled {
            self.class(name)
        } else {
            self
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.insert(name, value.into());
        self
    }

    /// Set an inline style property, replacing any earlier value
    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.style.insert(property, value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|class| class == name)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of every descendant
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_text(&mut out);
        }
        out
    }

    /// First element in document order carrying `class`, self included
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.child_elements()
            .find_map(|child| child.find_by_class(class))
    }

    /// Every element carrying `class`, in document order
    pub fn find_all_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect_by_class(class, found);
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);

        if !self.classes.is_empty() {
            write_attr(out, "class", &self.classes.join(" "));
        }
        for (name, value) in &self.attrs {
            write_attr(out, name, value);
        }
        if !self.style.is_empty() {
            let style = self
                .style
                .iter()
                .map(|(property, value)| format!("{}: {}", property, value))
                .collect::<Vec<_>>()
                .join("; ");
            write_attr(out, "style", &style);
        }
        out.push('>');

        for child in &self.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}

pub fn div() -> Element {
    Element::new("div")
}

pub fn span() -> Element {
    Element::new("span")
}

pub fn anchor(href: impl Into<String>) -> Element {
    Element::new("a").attr("href", href)
}

pub fn header() -> Element {
    Element::new("header")
}

pub fn main() -> Element {
    Element::new("main")
}

pub fn footer() -> Element {
    Element::new("footer")
}

pub fn heading(level: u8) -> Element {
    let tag = match level {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        _ => "h4",
    };
    Element::new(tag)
}
