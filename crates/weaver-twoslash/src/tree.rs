//! Document tree for highlighted code blocks.
//!
//! A block is a [`Root`] holding [`Node`]s: elements with a tag, a property bag and
//! ordered children, and text leaves. Concatenating the text leaves in document
//! order yields the block's source text; splicing must keep it that way.
//!
//! Nodes carry no parent pointers. A node's position is a path of child indices
//! from the root, captured while walking the tree.

use std::collections::BTreeMap;

use smol_str::SmolStr;

/// Attribute name holding the class list.
pub const CLASS: &str = "class";

/// Value of a single element property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Boolean attribute, rendered bare when true.
    Bool(bool),
    Text(SmolStr),
    /// Space separated list, used for `class`.
    List(Vec<SmolStr>),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(SmolStr::new(value))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(SmolStr::from(value))
    }
}

impl From<SmolStr> for PropertyValue {
    fn from(value: SmolStr) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<SmolStr>> for PropertyValue {
    fn from(value: Vec<SmolStr>) -> Self {
        Self::List(value)
    }
}

/// Property bag keyed by HTML attribute name.
pub type Properties = BTreeMap<SmolStr, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: SmolStr,
    pub properties: Properties,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    /// Append class names to the element's class list.
    pub fn with_class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let added = classes.into_iter().map(Into::into);
        match self.properties.get_mut(CLASS) {
            Some(PropertyValue::List(list)) => list.extend(added),
            _ => {
                self.properties
                    .insert(SmolStr::new_static(CLASS), PropertyValue::List(added.collect()));
            }
        }
        self
    }

    pub fn with_property(
        mut self,
        name: impl Into<SmolStr>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Text value of a property, if it holds one.
    pub fn property_text(&self, name: &str) -> Option<&str> {
        match self.properties.get(name) {
            Some(PropertyValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn class_names(&self) -> &[SmolStr] {
        match self.properties.get(CLASS) {
            Some(PropertyValue::List(list)) => list,
            _ => &[],
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_names().iter().any(|class| class == name)
    }

    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        collect_text(&self.children, &mut buffer);
        buffer
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Element(_) => None,
        }
    }

    /// Length of the node's own content: characters for text, child count for
    /// elements. This is the unit a match range is expressed in.
    pub fn content_len(&self) -> usize {
        match self {
            Self::Text(value) => value.chars().count(),
            Self::Element(element) => element.children.len(),
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Element(element) => element.text_content(),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Untagged top-level container of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    pub children: Vec<Node>,
}

impl Root {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Node at `path`. The empty path is the root itself, which is not a [`Node`].
    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(*first)?;
        for index in rest {
            match node {
                Node::Element(element) => node = element.children.get(*index)?,
                Node::Text(_) => return None,
            }
        }
        Some(node)
    }

    /// Children of the container at `path`; `None` when the path ends at text.
    pub fn children(&self, path: &[usize]) -> Option<&Vec<Node>> {
        if path.is_empty() {
            return Some(&self.children);
        }
        match self.node(path)? {
            Node::Element(element) => Some(&element.children),
            Node::Text(_) => None,
        }
    }

    pub fn children_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut children = &mut self.children;
        for index in path {
            match children.get_mut(*index)? {
                Node::Element(element) => children = &mut element.children,
                Node::Text(_) => return None,
            }
        }
        Some(children)
    }

    /// Content length of the node at `path`, counting the root's children for the
    /// empty path.
    pub fn content_len(&self, path: &[usize]) -> Option<usize> {
        if path.is_empty() {
            return Some(self.children.len());
        }
        self.node(path).map(Node::content_len)
    }

    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        collect_text(&self.children, &mut buffer);
        buffer
    }

    pub fn into_children(self) -> Vec<Node> {
        self.children
    }
}

impl From<Vec<Node>> for Root {
    fn from(children: Vec<Node>) -> Self {
        Self { children }
    }
}

fn collect_text(nodes: &[Node], buffer: &mut String) {
    for node in nodes {
        match node {
            Node::Text(value) => buffer.push_str(value),
            Node::Element(element) => collect_text(&element.children, buffer),
        }
    }
}

/// Byte offset of the `index`th character, clamped to the end of `value`.
pub(crate) fn char_to_byte(value: &str, index: usize) -> usize {
    value
        .char_indices()
        .nth(index)
        .map_or(value.len(), |(offset, _)| offset)
}
