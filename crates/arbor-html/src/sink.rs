//! The DOM adapter the tree builder writes through.

use std::fmt::Debug;

use arbor_dom::{DoctypeData, DomTree, ElementData, Namespace, NodeId, NodeType, QuirksMode};

use crate::token::Attribute;

/// Node storage driven by the tree builder.
///
/// Handles are opaque and `Copy`; the tree builder keeps them on its stacks
/// and never inspects the nodes behind them except through this trait.
pub trait TreeSink {
    /// Reference to a node owned by the sink.
    type Handle: Copy + Eq + Debug;

    /// The Document node.
    fn document(&self) -> Self::Handle;

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Creates a detached element. `attributes` may contain duplicate names;
    /// the first occurrence wins. HTML `<template>` elements get a contents
    /// fragment reachable through [`template_contents`](Self::template_contents).
    fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> Self::Handle;

    /// Creates a detached comment node.
    fn create_comment(&mut self, data: &str) -> Self::Handle;

    /// Creates a detached text node.
    fn create_text(&mut self, data: &str) -> Self::Handle;

    /// Appends `child` to `parent`, removing it from any previous parent.
    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle);

    /// Inserts `child` into `parent` before `reference`, removing it from any
    /// previous parent.
    fn insert_before(&mut self, parent: Self::Handle, child: Self::Handle, reference: Self::Handle);

    /// Parent of `node`, if attached.
    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Removes `node` from its parent.
    fn detach(&mut self, node: Self::Handle);

    /// Moves all children of `from` to the end of `to`.
    fn reparent_children(&mut self, from: Self::Handle, to: Self::Handle);

    /// The text node that would immediately precede a node inserted into
    /// `parent` before `reference` (or at the end when `reference` is
    /// `None`), so adjacent character data can be merged.
    fn text_before(
        &self,
        parent: Self::Handle,
        reference: Option<Self::Handle>,
    ) -> Option<Self::Handle>;

    /// Appends `data` to an existing text node.
    fn append_text_data(&mut self, text: Self::Handle, data: &str);

    /// Adds an attribute to an element unless one with that name exists.
    fn set_attribute_if_absent(&mut self, node: Self::Handle, name: &str, value: &str);

    /// Appends a DocumentType node to the Document.
    fn append_doctype(&mut self, name: &str, public_id: &str, system_id: &str);

    /// The contents fragment of a `<template>` element. For any other node
    /// the node itself is returned.
    fn template_contents(&self, template: Self::Handle) -> Self::Handle;

    /// Sets the document's quirks mode.
    fn set_quirks_mode(&mut self, mode: QuirksMode);
}

impl TreeSink for DomTree {
    type Handle = NodeId;

    fn document(&self) -> NodeId {
        self.root()
    }

    fn create_element(&mut self, name: &str, namespace: Namespace, attributes: &[Attribute]) -> NodeId {
        let mut data = ElementData::with_namespace(name, namespace);
        for attr in attributes {
            let _ = data
                .attrs
                .entry(attr.name.clone())
                .or_insert_with(|| attr.value.clone());
        }
        self.alloc_element(data)
    }

    fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeType::Comment(data.to_string()))
    }

    fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(NodeType::Text(data.to_string()))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        Self::append_child(self, parent, child);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        Self::insert_before(self, parent, child, reference);
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Self::parent(self, node)
    }

    fn detach(&mut self, node: NodeId) {
        Self::detach(self, node);
    }

    fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        self.move_children(from, to);
    }

    fn text_before(&self, parent: NodeId, reference: Option<NodeId>) -> Option<NodeId> {
        let previous = match reference {
            Some(reference) => self.prev_sibling(reference),
            None => self.last_child(parent),
        }?;
        self.as_text(previous).map(|_| previous)
    }

    fn append_text_data(&mut self, text: NodeId, data: &str) {
        self.append_text(text, data);
    }

    fn set_attribute_if_absent(&mut self, node: NodeId, name: &str, value: &str) {
        Self::set_attribute_if_absent(self, node, name, value);
    }

    fn append_doctype(&mut self, name: &str, public_id: &str, system_id: &str) {
        let doctype = self.alloc(NodeType::Doctype(DoctypeData {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }));
        Self::append_child(self, NodeId::ROOT, doctype);
    }

    fn template_contents(&self, template: NodeId) -> NodeId {
        Self::template_contents(self, template).unwrap_or(template)
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        Self::set_quirks_mode(self, mode);
    }
}
