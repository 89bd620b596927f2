//! In-memory page document.
//!
//! An arena of element and text nodes rooted at `<body>`. Components never hold
//! references into the arena; they hold [`NodeId`]s and look elements up on
//! every action, so a node removed from the tree is observed as disconnected
//! rather than dangling.
//!
//! Removing a node (or replacing an element's children) frees the whole
//! subtree. Freed slots are reused by later nodes under a new generation, so
//! the arena stays as large as the live tree and a stale [`NodeId`] resolves
//! to nothing instead of to the slot's new occupant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Handle to a node in a [`Document`]
///
/// Valid until the node is removed; after that it never matches another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Arena slot of the node
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// How many nodes occupied the slot before this one
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}

/// An element's presentation attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    value: String,
    display: Option<String>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            value: String::new(),
            display: None,
        }
    }

    /// Lowercase tag name
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The `id` attribute
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Class list in insertion order
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the class list contains `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class; returns `false` if it was already present
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    /// Remove a class; returns `false` if it was absent
    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        before != self.classes.len()
    }

    /// Attribute value
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the attribute is present (boolean attributes like `required`)
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Current form value (inputs, selects, textareas)
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the form value
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Inline `display` style, if set
    #[must_use]
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Set or clear the inline `display` style
    pub fn set_display(&mut self, display: Option<&str>) {
        self.display = display.map(str::to_string);
    }

    /// Whether the element is hidden by an inline `display: none`
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.display.as_deref() == Some("none")
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Child of an [`ElementBuilder`]
#[derive(Debug, Clone)]
enum Child {
    Element(ElementBuilder),
    Text(String),
}

/// Declarative description of an element subtree, materialised by
/// [`Document::append`]
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    element: Element,
    children: Vec<Child>,
}

impl ElementBuilder {
    /// Start an element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            element: Element::new(tag),
            children: Vec::new(),
        }
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add one or more whitespace-separated classes
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.element.add_class(class);
        }
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.element.set_attr(name, value);
        if name == "value" {
            self.element.set_value(value);
        }
        self
    }

    /// Set the form value without an attribute
    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        self.element.set_value(value);
        self
    }

    /// Append a text child
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.children.push(Child::Text(text.to_string()));
        self
    }

    /// Append an element child
    #[must_use]
    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(Child::Element(child));
        self
    }
}

/// The page document
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty `<body>`
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node {
                    parent: None,
                    children: Vec::new(),
                    kind: NodeKind::Element(Element::new("body")),
                }),
            }],
            free: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    /// The `<body>` element
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Number of live nodes, text nodes included
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of arena slots ever allocated
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let node = Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        };
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    /// Release `root` and every node below it
    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index)
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            stack.extend(node.children);
        }
    }

    /// Materialise `builder` as the last child of `parent`
    ///
    /// Returns the id of the new element, or `None` when `parent` is not an
    /// element of this document.
    pub fn append(&mut self, parent: NodeId, builder: ElementBuilder) -> Option<NodeId> {
        self.element(parent)?;
        Some(self.build(parent, builder))
    }

    fn build(&mut self, parent: NodeId, builder: ElementBuilder) -> NodeId {
        let id = self.push_node(parent, NodeKind::Element(builder.element));
        for child in builder.children {
            match child {
                Child::Element(element) => {
                    self.build(id, element);
                },
                Child::Text(text) => {
                    self.push_node(id, NodeKind::Text(text));
                },
            }
        }
        id
    }

    /// Append a text node as the last child of `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        self.element(parent)?;
        Some(self.push_node(parent, NodeKind::Text(text.to_string())))
    }

    /// Remove and free every child of `node`
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(children) = self.node_mut(node).map(|n| std::mem::take(&mut n.children)) else {
            return;
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Replace the children of `node` with a single text node
    ///
    /// A lone text child is rewritten in place.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        let only_child = match self.node(node).map(|n| n.children.as_slice()) {
            Some([child]) => Some(*child),
            _ => None,
        };
        if let Some(Node {
            kind: NodeKind::Text(existing),
            ..
        }) = only_child.and_then(|child| self.node_mut(child))
        {
            if existing.as_str() != text {
                text.clone_into(existing);
            }
            return;
        }
        self.clear_children(node);
        self.push_node(node, NodeKind::Text(text.to_string()));
    }

    /// Remove `node` and its subtree from the document
    ///
    /// Returns `false` when the node is not in the document. The body cannot be
    /// removed.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if node == self.body {
            return false;
        }
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|child| *child != node);
        }
        self.free_subtree(node);
        true
    }

    /// Whether `node` is reachable from the body
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// Parent of `node`
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    /// Element children of `node`
    #[must_use]
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|child| self.element(*child).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Next element sibling of `node`
    #[must_use]
    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = &self.node(parent)?.children;
        let position = siblings.iter().position(|sibling| *sibling == node)?;
        siblings[position + 1..]
            .iter()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    /// Element data for `node` (`None` for text nodes and unknown ids)
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.node(node)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    /// Mutable element data for `node`
    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(node)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    /// Concatenated text of the subtree rooted at `node`
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(node, &mut text);
        text
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.node(node) else {
            return;
        };
        match &n.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &n.children {
                    self.collect_text(*child, out);
                }
            },
        }
    }

    /// Descendant elements of `root` (excluding `root`) matching `predicate`,
    /// in document order
    pub fn select_within<F>(&self, root: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self
            .node(root)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if let NodeKind::Element(element) = &node.kind {
                if predicate(element) {
                    found.push(id);
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    /// Connected elements matching `predicate`, in document order
    pub fn select<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        self.select_within(self.body, predicate)
    }

    /// Connected elements carrying `class`, in document order
    #[must_use]
    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.select(|element| element.has_class(class))
    }

    /// First descendant of `root` carrying `class`
    #[must_use]
    pub fn first_by_class_within(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.select_within(root, |element| element.has_class(class))
            .into_iter()
            .next()
    }

    /// First connected element with the given `id` attribute
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.select(|element| element.id() == Some(id))
            .into_iter()
            .next()
    }

    /// First descendant of `root` with the given `id` attribute
    #[must_use]
    pub fn element_by_id_within(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.select_within(root, |element| element.id() == Some(id))
            .into_iter()
            .next()
    }

    /// Serialise the subtree rooted at `node` as HTML-like markup
    #[must_use]
    pub fn render(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.render_into(node, &mut out);
        out
    }

    fn render_into(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.node(node) else {
            return;
        };
        match &n.kind {
            NodeKind::Text(text) => out.push_str(&escape(text)),
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attributes {
                    if name == "class" || name == "style" {
                        continue;
                    }
                    out.push_str(&format!(" {name}=\"{}\"", escape(value)));
                }
                if !element.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", element.classes.join(" ")));
                }
                if let Some(display) = &element.display {
                    out.push_str(&format!(" style=\"display: {display}\""));
                }
                out.push('>');
                for child in &n.children {
                    self.render_into(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            },
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
