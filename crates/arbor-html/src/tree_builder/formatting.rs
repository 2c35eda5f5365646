//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."

use super::open_elements::OpenElementsStack;
use crate::token::Attribute;

/// The tag a formatting element was created from, kept so the element can
/// be recreated during reconstruction or adoption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingTag {
    /// Tag name.
    pub name: String,
    /// Attributes as they appeared on the start tag.
    pub attributes: Vec<Attribute>,
}

impl FormattingTag {
    /// A tag snapshot.
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// "same tag name, namespace, and attributes as element. For these
    /// purposes, the attributes must be compared as they were when the
    /// elements were created by the parser; two elements have the same
    /// attributes if all their parsed attributes can be paired such that the
    /// two attributes in each pair have identical names, namespaces, and
    /// values (the order of the attributes does not matter)."
    ///
    /// All formatting elements are HTML elements, so namespaces always match.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .all(|attr| other.attributes.contains(attr))
    }
}

/// An entry in the list: a formatting element or a scope marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingEntry<H> {
    /// A formatting element and the tag it was created from.
    Element {
        /// The element.
        handle: H,
        /// The start tag snapshot.
        tag: FormattingTag,
    },
    /// "inserted when entering applet, object, marquee, template, td, th, and
    /// caption elements, and are used to prevent formatting from 'leaking'
    /// into applet, object, marquee, template, td, th, and caption elements."
    Marker,
}

impl<H: Copy + Eq> FormattingEntry<H> {
    /// The element handle, or `None` for a marker.
    #[must_use]
    pub const fn handle(&self) -> Option<H> {
        match self {
            Self::Element { handle, .. } => Some(*handle),
            Self::Marker => None,
        }
    }
}

/// The list of active formatting elements.
#[derive(Debug, Clone)]
pub struct ActiveFormattingElements<H> {
    entries: Vec<FormattingEntry<H>>,
}

impl<H> Default for ActiveFormattingElements<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<'a, H> IntoIterator for &'a ActiveFormattingElements<H> {
    type Item = &'a FormattingEntry<H>;
    type IntoIter = std::slice::Iter<'a, FormattingEntry<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// "Noah's Ark": at most this many identical entries per marker segment.
const NOAHS_ARK_LIMIT: usize = 3;

impl<H: Copy + Eq> ActiveFormattingElements<H> {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> std::slice::Iter<'_, FormattingEntry<H>> {
        self.entries.iter()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattingEntry<H>> {
        self.entries.get(index)
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if
    /// there are no markers, that have the same tag name, namespace, and
    /// attributes as element, then remove the earliest such element from the
    /// list of active formatting elements."
    pub fn push(&mut self, handle: H, tag: FormattingTag) {
        let matching: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .rev()
            .take_while(|(_, entry)| !matches!(entry, FormattingEntry::Marker))
            .filter(|(_, entry)| {
                matches!(entry, FormattingEntry::Element { tag: existing, .. } if existing.same_as(&tag))
            })
            .map(|(index, _)| index)
            .collect();

        if matching.len() >= NOAHS_ARK_LIMIT
            && let Some(&earliest) = matching.last()
        {
            let _ = self.entries.remove(earliest);
        }

        self.entries.push(FormattingEntry::Element { handle, tag });
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub fn insert_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "Remove entries until a marker has been removed."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    /// Index of the last element named `name` between the end of the list
    /// and the last marker.
    #[must_use]
    pub fn last_element_after_marker(&self, name: &str) -> Option<usize> {
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element { tag, .. } if tag.name == name => return Some(index),
                FormattingEntry::Element { .. } => {}
            }
        }
        None
    }

    /// Index of the entry holding `handle`.
    #[must_use]
    pub fn position(&self, handle: H) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.handle() == Some(handle))
    }

    /// True if `handle` is in the list.
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.position(handle).is_some()
    }

    /// The tag snapshot for the entry at `index`.
    #[must_use]
    pub fn tag_at(&self, index: usize) -> Option<&FormattingTag> {
        match self.entries.get(index)? {
            FormattingEntry::Element { tag, .. } => Some(tag),
            FormattingEntry::Marker => None,
        }
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> FormattingEntry<H> {
        self.entries.remove(index)
    }

    /// Remove the entry holding `handle`, if any.
    pub fn remove_handle(&mut self, handle: H) {
        if let Some(index) = self.position(handle) {
            let _ = self.entries.remove(index);
        }
    }

    /// Insert an element entry at `index`.
    pub fn insert(&mut self, index: usize, handle: H, tag: FormattingTag) {
        self.entries
            .insert(index, FormattingEntry::Element { handle, tag });
    }

    /// Point the entry at `index` at a new element, keeping its tag.
    pub fn replace_handle(&mut self, index: usize, new: H) {
        if let Some(FormattingEntry::Element { handle, .. }) = self.entries.get_mut(index) {
            *handle = new;
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// The rewind phase of "reconstruct the active formatting elements":
    /// returns the index of the first entry that must be recreated, or
    /// `None` when nothing needs reconstructing.
    ///
    /// "1. If there are no entries in the list of active formatting elements,
    /// then there is nothing to reconstruct; stop this algorithm.
    /// 2. If the last (most recently added) entry in the list of active
    /// formatting elements is a marker, or if it is an element that is in the
    /// stack of open elements, then there is nothing to reconstruct"
    #[must_use]
    pub fn reconstruction_start(&self, open: &OpenElementsStack<H>) -> Option<usize> {
        let is_settled = |entry: &FormattingEntry<H>| match entry {
            FormattingEntry::Marker => true,
            FormattingEntry::Element { handle, .. } => open.contains(*handle),
        };

        if is_settled(self.entries.last()?) {
            return None;
        }

        // Rewind: "If there are no entries before entry in the list of active
        // formatting elements, then jump to the step labeled create." Advance
        // past the first marker or open element found.
        let start = self
            .entries
            .iter()
            .rposition(is_settled)
            .map_or(0, |index| index + 1);
        Some(start)
    }

    /// The create phase: for each entry from `start` to the end, call
    /// `create` with its tag and store the returned handle in the entry.
    ///
    /// "Create: Insert an HTML element for the token for which the element
    /// entry was created, to obtain new element. Replace the entry for entry
    /// in the list with an entry for new element."
    pub fn reconstruct_from<F>(&mut self, start: usize, mut create: F)
    where
        F: FnMut(&FormattingTag) -> H,
    {
        for entry in self.entries.iter_mut().skip(start) {
            if let FormattingEntry::Element { handle, tag } = entry {
                *handle = create(tag);
            }
        }
    }
}
