//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows
//! downwards; the topmost node on the stack is the first one added to the
//! stack, and the bottommost node of the stack is the most recently added
//! node in the stack."
//!
//! Here the vector's first entry is the topmost node (the `<html>` element)
//! and the last entry is the current node.

use arbor_dom::Namespace;

use super::tag_sets::{IMPLIED_END, IMPLIED_END_THOROUGH};

/// One entry of the stack: the node plus what the tree builder needs to know
/// about it without asking the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenElement<H> {
    /// The element.
    pub handle: H,
    /// Local name, after any foreign tag-name adjustment.
    pub name: String,
    /// Element namespace.
    pub namespace: Namespace,
    /// MathML `annotation-xml` whose `encoding` made it an HTML integration point.
    pub annotation_html: bool,
}

impl<H> OpenElement<H> {
    /// An HTML element entry.
    #[must_use]
    pub fn html(handle: H, name: impl Into<String>) -> Self {
        Self::new(handle, name, Namespace::Html)
    }

    /// An entry for an element in `namespace`.
    #[must_use]
    pub fn new(handle: H, name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            handle,
            name: name.into(),
            namespace,
            annotation_html: false,
        }
    }

    /// True for an HTML element named `name`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.name == name
    }

    /// True for an HTML element whose name is in `names`.
    #[must_use]
    pub fn is_one_of(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.name.as_str())
    }

    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    #[must_use]
    pub fn is_html_integration_point(&self) -> bool {
        self.annotation_html
            || super::tag_sets::is_svg_html_integration_point(self.namespace, &self.name)
    }
}

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
///
/// The scopes used by "has an element in ... scope" queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": default plus `ol`, `ul`.
    ListItem,
    /// "has an element in button scope": default plus `button`.
    Button,
    /// "has an element in table scope": `html`, `table`, `template`.
    Table,
    /// "has an element in select scope": everything except `optgroup`, `option`.
    Select,
}

impl Scope {
    /// Every scope, for callers that need to check them all.
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::ListItem,
        Self::Button,
        Self::Table,
        Self::Select,
    ];

    /// True if an element with this name and namespace terminates the scope.
    #[must_use]
    pub fn is_boundary(self, namespace: Namespace, name: &str) -> bool {
        match self {
            Self::Default => default_scope_boundary(namespace, name),
            Self::ListItem => {
                default_scope_boundary(namespace, name)
                    || (namespace == Namespace::Html && matches!(name, "ol" | "ul"))
            }
            Self::Button => {
                default_scope_boundary(namespace, name)
                    || (namespace == Namespace::Html && name == "button")
            }
            Self::Table => {
                namespace == Namespace::Html && matches!(name, "html" | "table" | "template")
            }
            Self::Select => !(namespace == Namespace::Html && matches!(name, "optgroup" | "option")),
        }
    }
}

/// "The stack of open elements is said to have a particular element in scope
/// when it has that element in the specific scope consisting of the following
/// element types: applet, caption, html, table, td, th, marquee, object,
/// template, MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, MathML
/// annotation-xml, SVG foreignObject, SVG desc, SVG title"
fn default_scope_boundary(namespace: Namespace, name: &str) -> bool {
    match namespace {
        Namespace::Html => matches!(
            name,
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object" | "template"
        ),
        Namespace::MathMl => {
            matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
        }
        Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
    }
}

/// The stack of open elements.
#[derive(Debug, Clone)]
pub struct OpenElementsStack<H> {
    entries: Vec<OpenElement<H>>,
}

impl<H> Default for OpenElementsStack<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<'a, H> IntoIterator for &'a OpenElementsStack<H> {
    type Item = &'a OpenElement<H>;
    type IntoIter = std::slice::Iter<'a, OpenElement<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<H: Copy + Eq> OpenElementsStack<H> {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from the topmost (`<html>`) to the current node.
    pub fn iter(&self) -> std::slice::Iter<'_, OpenElement<H>> {
        self.entries.iter()
    }

    /// Entry at `index`, counted from the topmost node.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OpenElement<H>> {
        self.entries.get(index)
    }

    /// Push an element onto the stack; it becomes the current node.
    pub fn push(&mut self, entry: OpenElement<H>) {
        self.entries.push(entry);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<OpenElement<H>> {
        self.entries.pop()
    }

    /// Insert an entry at `index`, shifting later entries toward the current node.
    pub fn insert(&mut self, index: usize, entry: OpenElement<H>) {
        self.entries.insert(index, entry);
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> OpenElement<H> {
        self.entries.remove(index)
    }

    /// Pop everything above the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<&OpenElement<H>> {
        self.entries.last()
    }

    /// Tag name of the current node.
    #[must_use]
    pub fn current_tag_name(&self) -> Option<&str> {
        self.current().map(|entry| entry.name.as_str())
    }

    /// True if the current node is the HTML element `name`.
    #[must_use]
    pub fn current_is(&self, name: &str) -> bool {
        self.current().is_some_and(|entry| entry.is(name))
    }

    /// True if the current node is an HTML element named in `names`.
    #[must_use]
    pub fn current_is_one_of(&self, names: &[&str]) -> bool {
        self.current().is_some_and(|entry| entry.is_one_of(names))
    }

    /// The topmost entry, the `<html>` element once parsing is underway.
    #[must_use]
    pub fn html_element(&self) -> Option<&OpenElement<H>> {
        self.entries.first()
    }

    /// Index of the entry holding `handle`.
    #[must_use]
    pub fn position(&self, handle: H) -> Option<usize> {
        self.entries.iter().rposition(|entry| entry.handle == handle)
    }

    /// True if `handle` is on the stack.
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.position(handle).is_some()
    }

    /// True if an HTML element named `name` is anywhere on the stack.
    #[must_use]
    pub fn contains_tag(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.is(name))
    }

    /// Index of the last HTML element named `name`.
    #[must_use]
    pub fn last_index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().rposition(|entry| entry.is(name))
    }

    /// Replace the entry holding `old` with `new`, keeping its position.
    pub fn replace(&mut self, old: H, new: OpenElement<H>) -> bool {
        match self.position(old) {
            Some(index) => {
                self.entries[index] = new;
                true
            }
            None => false,
        }
    }

    /// Remove the entry holding `handle`, wherever it is.
    pub fn remove_node(&mut self, handle: H) -> bool {
        match self.position(handle) {
            Some(index) => {
                let _ = self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// "pop elements from the stack of open elements until an element with
    /// the same tag name as the token has been popped from the stack"
    ///
    /// Returns the number of entries popped; nothing is popped if no HTML
    /// element named `name` is open.
    pub fn pop_until_tag_name_popped(&mut self, name: &str) -> usize {
        self.pop_until_popped(&[name])
    }

    /// Pop until an HTML element whose name is in `names` has been popped.
    pub fn pop_until_popped(&mut self, names: &[&str]) -> usize {
        match self.entries.iter().rposition(|entry| entry.is_one_of(names)) {
            Some(index) => {
                let popped = self.entries.len() - index;
                self.entries.truncate(index);
                popped
            }
            None => 0,
        }
    }

    /// Pop until the entry holding `handle` has been popped.
    pub fn pop_until_node_popped(&mut self, handle: H) -> usize {
        match self.position(handle) {
            Some(index) => {
                let popped = self.entries.len() - index;
                self.entries.truncate(index);
                popped
            }
            None => 0,
        }
    }

    /// Pop while the current node is not an HTML element in `names`.
    ///
    /// Used by "clear the stack back to a table context" and friends.
    pub fn clear_back_to(&mut self, names: &[&str]) {
        while let Some(entry) = self.current() {
            if entry.is_one_of(names) {
                break;
            }
            let _ = self.entries.pop();
        }
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// Pops implied-end elements, leaving `excluded` in place if it is the
    /// current node.
    pub fn generate_implied_end_tags(&mut self, excluded: Option<&str>) {
        while let Some(entry) = self.current() {
            if !entry.is_one_of(IMPLIED_END) || excluded.is_some_and(|name| entry.is(name)) {
                break;
            }
            let _ = self.entries.pop();
        }
    }

    /// "generate all implied end tags thoroughly"
    pub fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.current_is_one_of(IMPLIED_END_THOROUGH) {
            let _ = self.entries.pop();
        }
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// Walks from the current node toward the top: true as soon as an HTML
    /// element named `name` is found, false as soon as a boundary element of
    /// `scope` is found first.
    #[must_use]
    pub fn has_in_scope(&self, name: &str, scope: Scope) -> bool {
        self.has_matching_in_scope(|entry| entry.is(name), scope)
    }

    /// Like [`has_in_scope`](Self::has_in_scope) for any of several names.
    #[must_use]
    pub fn has_any_in_scope(&self, names: &[&str], scope: Scope) -> bool {
        self.has_matching_in_scope(|entry| entry.is_one_of(names), scope)
    }

    /// Scope query for one specific node rather than a tag name.
    #[must_use]
    pub fn has_node_in_scope(&self, handle: H, scope: Scope) -> bool {
        self.has_matching_in_scope(|entry| entry.handle == handle, scope)
    }

    fn has_matching_in_scope(&self, target: impl Fn(&OpenElement<H>) -> bool, scope: Scope) -> bool {
        for entry in self.entries.iter().rev() {
            if target(entry) {
                return true;
            }
            if scope.is_boundary(entry.namespace, &entry.name) {
                return false;
            }
        }
        false
    }
}
