use std::{cell::RefCell, fmt::Write as _, rc::Rc};

use crate::{
    foundation::error::{ConfettiError, ConfettiResult},
    stage::{backend::Stage, stylesheet::STYLE_MARKER_ATTR},
};

/// Handle to an element of a [`MemoryStage`]. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Debug)]
struct Element {
    tag: String,
    classes: Vec<String>,
    props: Vec<(String, String)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug)]
struct Document {
    elements: Vec<Element>,
    body: NodeId,
    stylesheet: Option<String>,
    stylesheet_installs: usize,
}

impl Document {
    fn get(&self, id: NodeId) -> ConfettiResult<&Element> {
        self.elements
            .get(id.0)
            .ok_or_else(|| ConfettiError::stage(format!("unknown node {}", id.0)))
    }

    fn get_mut(&mut self, id: NodeId) -> ConfettiResult<&mut Element> {
        self.elements
            .get_mut(id.0)
            .ok_or_else(|| ConfettiError::stage(format!("unknown node {}", id.0)))
    }
}

/// In-process element tree implementing [`Stage`].
///
/// Cloning yields another handle to the same tree, so a test can keep one handle while
/// an explosion owns the other.
#[derive(Clone, Debug)]
pub struct MemoryStage {
    doc: Rc<RefCell<Document>>,
}

impl Default for MemoryStage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStage {
    /// Empty document with a `body` element.
    pub fn new() -> Self {
        let body = Element {
            tag: "body".to_string(),
            classes: Vec::new(),
            props: Vec::new(),
            children: Vec::new(),
            parent: None,
        };
        Self {
            doc: Rc::new(RefCell::new(Document {
                elements: vec![body],
                body: NodeId(0),
                stylesheet: None,
                stylesheet_installs: 0,
            })),
        }
    }

    /// The document body.
    pub fn body(&self) -> NodeId {
        self.doc.borrow().body
    }

    /// Create a `div` appended to the body, ready to host an explosion.
    pub fn create_container(&self) -> ConfettiResult<NodeId> {
        let node = self.create_element("div")?;
        self.append_child(&self.body(), &node)?;
        Ok(node)
    }

    /// Children of `node`, in order. Unknown nodes have none.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.doc
            .borrow()
            .get(node)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    /// Parent of `node`, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.doc.borrow().get(node).ok().and_then(|e| e.parent)
    }

    /// Current value of a style property.
    pub fn property(&self, node: NodeId, name: &str) -> Option<String> {
        let doc = self.doc.borrow();
        let el = doc.get(node).ok()?;
        el.props
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    /// Class list of `node`.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.doc
            .borrow()
            .get(node)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    /// Tag name of `node`.
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.doc.borrow().get(node).ok().map(|e| e.tag.clone())
    }

    /// Total number of elements ever created, body included.
    pub fn elements_created(&self) -> usize {
        self.doc.borrow().elements.len()
    }

    /// Installed stylesheet text.
    pub fn stylesheet(&self) -> Option<String> {
        self.doc.borrow().stylesheet.clone()
    }

    /// How many times a stylesheet was installed.
    pub fn stylesheet_installs(&self) -> usize {
        self.doc.borrow().stylesheet_installs
    }

    /// Serialize `node` and its subtree as HTML.
    pub fn render_node(&self, node: NodeId) -> ConfettiResult<String> {
        let doc = self.doc.borrow();
        let mut out = String::new();
        write_element(&doc, node, 0, &mut out)?;
        Ok(out)
    }

    /// Serialize the whole document, stylesheet included.
    pub fn to_html(&self) -> ConfettiResult<String> {
        let doc = self.doc.borrow();
        let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        if let Some(css) = &doc.stylesheet {
            let _ = writeln!(out, "<style {STYLE_MARKER_ATTR}>{css}</style>");
        }
        out.push_str("</head>\n");
        write_element(&doc, doc.body, 0, &mut out)?;
        out.push_str("</html>\n");
        Ok(out)
    }
}

fn write_element(doc: &Document, id: NodeId, depth: usize, out: &mut String) -> ConfettiResult<()> {
    let el = doc.get(id)?;
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}<{}", el.tag);
    if !el.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape_attr(&el.classes.join(" ")));
    }
    if !el.props.is_empty() {
        let style = el
            .props
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        let _ = write!(out, " style=\"{}\"", escape_attr(&style));
    }
    if el.children.is_empty() {
        let _ = writeln!(out, "></{}>", el.tag);
        return Ok(());
    }
    out.push_str(">\n");
    for child in &el.children {
        write_element(doc, *child, depth + 1, out)?;
    }
    let _ = writeln!(out, "{indent}</{}>", el.tag);
    Ok(())
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Stage for MemoryStage {
    type Node = NodeId;

    fn create_element(&self, tag: &str) -> ConfettiResult<NodeId> {
        let mut doc = self.doc.borrow_mut();
        let id = NodeId(doc.elements.len());
        doc.elements.push(Element {
            tag: tag.to_string(),
            classes: Vec::new(),
            props: Vec::new(),
            children: Vec::new(),
            parent: None,
        });
        Ok(id)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> ConfettiResult<()> {
        if parent == child {
            return Err(ConfettiError::stage("cannot append a node to itself"));
        }
        let mut doc = self.doc.borrow_mut();
        doc.get(*parent)?;
        let old_parent = doc.get(*child)?.parent;
        if let Some(old) = old_parent {
            doc.get_mut(old)?.children.retain(|c| c != child);
        }
        doc.get_mut(*child)?.parent = Some(*parent);
        doc.get_mut(*parent)?.children.push(*child);
        Ok(())
    }

    fn clear_children(&self, node: &NodeId) -> ConfettiResult<()> {
        let mut doc = self.doc.borrow_mut();
        let children = std::mem::take(&mut doc.get_mut(*node)?.children);
        for child in children {
            doc.get_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn add_class(&self, node: &NodeId, class: &str) -> ConfettiResult<()> {
        let mut doc = self.doc.borrow_mut();
        let el = doc.get_mut(*node)?;
        if !el.classes.iter().any(|c| c == class) {
            el.classes.push(class.to_string());
        }
        Ok(())
    }

    fn set_property(&self, node: &NodeId, name: &str, value: &str) -> ConfettiResult<()> {
        let mut doc = self.doc.borrow_mut();
        let el = doc.get_mut(*node)?;
        match el.props.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.props.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn has_stylesheet(&self) -> bool {
        self.doc.borrow().stylesheet.is_some()
    }

    fn install_stylesheet(&self, css: &str) -> ConfettiResult<()> {
        let mut doc = self.doc.borrow_mut();
        doc.stylesheet = Some(css.to_string());
        doc.stylesheet_installs += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/memory.rs"]
mod tests;
