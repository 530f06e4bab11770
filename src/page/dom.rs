//! Minimal element tree that page controllers mutate before serializing to HTML.

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add `class` if absent, remove it if present. Returns whether it is now set.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if let Some(pos) = self.classes.iter().position(|c| c == class) {
            self.classes.remove(pos);
            false
        } else {
            self.classes.push(class.to_string());
            true
        }
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) => e.find_by_id_mut(id),
            Node::Text(_) => None,
        })
    }

    /// First descendant (or self) carrying `class`.
    pub fn find_by_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) => e.find_by_class_mut(class),
            Node::Text(_) => None,
        })
    }

    /// All descendants (and self) carrying `class`, in document order.
    pub fn find_all_by_class<'a>(&'a self, class: &str, out: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            out.push(self);
        }
        for c in self.child_elements() {
            c.find_all_by_class(class, out);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, 0);
        out
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}<{}", self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", html_escape(id));
        }
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", html_escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, html_escape(value));
        }
        out.push('>');

        let inline = self.children.iter().all(|n| matches!(n, Node::Text(_)));
        if inline {
            for n in &self.children {
                if let Node::Text(t) = n {
                    out.push_str(&html_escape(t));
                }
            }
        } else {
            out.push('\n');
            for n in &self.children {
                match n {
                    Node::Element(e) => e.write_html(out, depth + 1),
                    Node::Text(t) => {
                        let _ = writeln!(out, "{indent}  {}", html_escape(t));
                    }
                }
            }
            out.push_str(&indent);
        }
        let _ = writeln!(out, "</{}>", self.tag);
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for n in &el.children {
        match n {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_class_twice_restores() {
        let mut el = Element::div().with_class("talk-abstract");
        assert!(el.toggle_class("expanded"));
        assert!(el.has_class("expanded"));
        assert!(!el.toggle_class("expanded"));
        assert_eq!(el.classes, vec!["talk-abstract".to_string()]);
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let el = Element::new("a")
            .with_attr("href", "x?a=1&b=\"2\"")
            .with_text("<b>Tom & Jerry</b>");
        assert_eq!(
            el.to_html(),
            "<a href=\"x?a=1&amp;b=&quot;2&quot;\">&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</a>\n"
        );
    }

    #[test]
    fn find_by_id_descends() {
        let mut root = Element::div()
            .with_child(Element::div().with_child(Element::new("span").with_id("deep")));
        root.find_by_id_mut("deep").unwrap().set_text("found");
        assert_eq!(root.find_by_id("deep").unwrap().text_content(), "found");
        assert!(root.find_by_id("missing").is_none());
    }

    #[test]
    fn set_attr_replaces_existing_value() {
        let mut a = Element::new("a").with_attr("href", "#");
        a.set_attr("href", "https://example.org");
        assert_eq!(a.attr("href"), Some("https://example.org"));
        assert_eq!(a.attrs.len(), 1);
    }
}
