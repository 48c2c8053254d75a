// src/dom.rs

use chrono::{DateTime, Local};

use crate::constants::{BODY_ID, CONTAINER_ID, FORM_ID, GLYPH_EXPANDED, INPUT_ID, TOGGLE_ID};

/// Handle to an element in the page tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The slice of page behavior the chat widget needs. `PageDom` is the
/// production implementation; tests may substitute their own tree.
pub trait Dom {
    fn element_by_id(&self, id: &str) -> Option<NodeId>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn has_id(&self, node: NodeId, id: &str) -> bool;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    fn append_child(&mut self, parent: NodeId, classes: &[&str], text: &str) -> NodeId;
    fn text(&self, node: NodeId) -> String;
    fn set_text(&mut self, node: NodeId, text: &str);
    fn value(&self, node: NodeId) -> String;
    fn set_value(&mut self, node: NodeId, value: &str);
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    /// Adds the class if absent, removes it if present. Returns whether the
    /// class is present afterwards.
    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool;
    fn scroll_to_bottom(&mut self, node: NodeId);
}

#[derive(Debug, Clone)]
struct Element {
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    scroll_top: usize,
    created: DateTime<Local>,
}

impl Element {
    fn new(id: Option<&str>, classes: &[&str], parent: Option<NodeId>) -> Self {
        Element {
            id: id.map(|s| s.to_string()),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: String::new(),
            value: String::new(),
            parent,
            children: Vec::new(),
            scroll_top: 0,
            created: Local::now(),
        }
    }
}

/// Retained in-memory element tree backing the host shell.
#[derive(Debug, Clone)]
pub struct PageDom {
    elements: Vec<Element>,
}

impl PageDom {
    pub fn new() -> Self {
        PageDom {
            elements: vec![Element::new(None, &[], None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn create_element(&mut self, parent: NodeId, id: Option<&str>, classes: &[&str]) -> NodeId {
        let node = NodeId(self.elements.len());
        self.elements.push(Element::new(id, classes, Some(parent)));
        self.get_mut(parent).children.push(node);
        node
    }

    /// Builds the scaffold the widget binds to: a container holding the
    /// toggle control, the message list and the input form.
    pub fn chat_page() -> Self {
        let mut page = PageDom::new();
        let root = page.root();
        let container = page.create_element(root, Some(CONTAINER_ID), &[]);
        let toggle = page.create_element(container, Some(TOGGLE_ID), &[]);
        page.set_text(toggle, GLYPH_EXPANDED);
        page.create_element(container, Some(BODY_ID), &[]);
        let form = page.create_element(container, Some(FORM_ID), &[]);
        page.create_element(form, Some(INPUT_ID), &[]);
        page
    }

    pub fn scroll_top(&self, node: NodeId) -> usize {
        self.get(node).scroll_top
    }

    pub fn created_at(&self, node: NodeId) -> DateTime<Local> {
        self.get(node).created
    }

    fn get(&self, node: NodeId) -> &Element {
        &self.elements[node.0]
    }

    fn get_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.elements[node.0]
    }
}

impl Default for PageDom {
    fn default() -> Self {
        PageDom::new()
    }
}

impl Dom for PageDom {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|el| el.id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).parent
    }

    fn has_id(&self, node: NodeId, id: &str) -> bool {
        self.get(node).id.as_deref() == Some(id)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).children.clone()
    }

    fn append_child(&mut self, parent: NodeId, classes: &[&str], text: &str) -> NodeId {
        let node = self.create_element(parent, None, classes);
        self.get_mut(node).text = text.to_string();
        node
    }

    fn text(&self, node: NodeId) -> String {
        self.get(node).text.clone()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.get_mut(node).text = text.to_string();
    }

    fn value(&self, node: NodeId) -> String {
        self.get(node).value.clone()
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        self.get_mut(node).value = value.to_string();
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node).classes.iter().any(|c| c == class)
    }

    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let el = self.get_mut(node);
        if let Some(pos) = el.classes.iter().position(|c| c == class) {
            el.classes.remove(pos);
            false
        } else {
            el.classes.push(class.to_string());
            true
        }
    }

    fn scroll_to_bottom(&mut self, node: NodeId) {
        let el = self.get_mut(node);
        el.scroll_top = el.children.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_page_wires_the_scaffold() {
        let page = PageDom::chat_page();

        let container = page.element_by_id(CONTAINER_ID).unwrap();
        let toggle = page.element_by_id(TOGGLE_ID).unwrap();
        let body = page.element_by_id(BODY_ID).unwrap();
        let form = page.element_by_id(FORM_ID).unwrap();
        let input = page.element_by_id(INPUT_ID).unwrap();

        assert_eq!(page.parent(toggle), Some(container));
        assert_eq!(page.parent(body), Some(container));
        assert_eq!(page.parent(input), Some(form));
        assert_eq!(page.text(toggle), GLYPH_EXPANDED);
    }

    #[test]
    fn element_by_id_misses_unknown_ids() {
        let page = PageDom::chat_page();
        assert!(page.element_by_id("sidebar").is_none());
    }

    #[test]
    fn toggle_class_round_trips() {
        let mut page = PageDom::chat_page();
        let container = page.element_by_id(CONTAINER_ID).unwrap();

        assert!(page.toggle_class(container, "minimized"));
        assert!(page.has_class(container, "minimized"));
        assert!(!page.toggle_class(container, "minimized"));
        assert!(!page.has_class(container, "minimized"));
    }

    #[test]
    fn children_preserve_append_order() {
        let mut page = PageDom::chat_page();
        let body = page.element_by_id(BODY_ID).unwrap();

        page.append_child(body, &["msg", "user"], "first");
        page.append_child(body, &["msg", "bot"], "second");

        let texts: Vec<String> = page
            .children(body)
            .into_iter()
            .map(|n| page.text(n))
            .collect();
        assert_eq!(texts, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn scroll_tracks_the_newest_child() {
        let mut page = PageDom::chat_page();
        let body = page.element_by_id(BODY_ID).unwrap();

        page.append_child(body, &["msg", "user"], "hello");
        page.scroll_to_bottom(body);
        assert_eq!(page.scroll_top(body), 1);

        page.append_child(body, &["msg", "bot"], "hi there");
        page.scroll_to_bottom(body);
        assert_eq!(page.scroll_top(body), 2);
    }
}
