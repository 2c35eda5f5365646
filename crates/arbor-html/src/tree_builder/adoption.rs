//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
//!
//! Repairs mis-nested formatting end tags such as `<b><p></b>` by cloning
//! the formatting element below the furthest block.

use arbor_dom::Namespace;
use log::trace;

use super::TreeConstructor;
use super::open_elements::{OpenElement, Scope};
use super::tag_sets::is_special;
use crate::error::ParseErrorCode;
use crate::sink::TreeSink;
use crate::token::Token;

/// "Outer loop: If outer loop counter is greater than or equal to 8, then
/// return."
const OUTER_LOOP_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of
/// active formatting elements, then remove node from the list of active
/// formatting elements."
const INNER_LOOP_LIMIT: usize = 3;

impl<S: TreeSink> TreeConstructor<S> {
    /// Run the adoption agency algorithm for an end tag named `subject`.
    pub(crate) fn adoption_agency(&mut self, subject: &str, token: &Token) {
        // "If the current node is an HTML element whose tag name is subject,
        // and the current node is not in the list of active formatting
        // elements, then pop the current node off the stack of open elements
        // and return."
        if let Some(current) = self.open_elements.current()
            && current.is(subject)
            && !self.active_formatting.contains(current.handle)
        {
            let _ = self.open_elements.pop();
            return;
        }

        for outer in 0..OUTER_LOOP_LIMIT {
            // "Let formatting element be the last element in the list of
            // active formatting elements that: is between the end of the list
            // and the last marker in the list, if any, or the start of the
            // list otherwise, and has the tag name subject. If there is no
            // such element, then return and instead act as described in the
            // "any other end tag" entry above."
            let Some(fe_index) = self.active_formatting.last_element_after_marker(subject) else {
                self.any_other_end_tag(subject, token);
                return;
            };
            let Some(formatting_element) = self
                .active_formatting
                .get(fe_index)
                .and_then(|entry| entry.handle())
            else {
                return;
            };

            let Some(fe_stack_index) = self.open_elements.position(formatting_element) else {
                self.parse_error(ParseErrorCode::FormattingElementNotOpen, token);
                let _ = self.active_formatting.remove(fe_index);
                return;
            };

            if !self
                .open_elements
                .has_node_in_scope(formatting_element, Scope::Default)
            {
                self.parse_error(ParseErrorCode::FormattingElementNotInScope, token);
                return;
            }

            if self.open_elements.current().map(|entry| entry.handle) != Some(formatting_element) {
                self.parse_error(ParseErrorCode::MisnestedEndTag, token);
            }

            // "Let furthest block be the topmost node in the stack of open
            // elements that is lower in the stack than formatting element,
            // and is an element in the special category."
            let furthest = (fe_stack_index + 1..self.open_elements.len()).find(|&index| {
                self.open_elements
                    .get(index)
                    .is_some_and(|entry| is_special(entry.namespace, &entry.name))
            });

            // "If there is no furthest block, then the UA must first pop all
            // the nodes from the bottom of the stack of open elements, from
            // the current node up to and including formatting element, then
            // remove formatting element from the list of active formatting
            // elements, and finally return."
            let Some(fb_index) = furthest else {
                self.open_elements.truncate(fe_stack_index);
                let _ = self.active_formatting.remove(fe_index);
                return;
            };

            let Some(furthest_block) = self.open_elements.get(fb_index).map(|entry| entry.handle)
            else {
                return;
            };
            let Some(common_ancestor) = fe_stack_index
                .checked_sub(1)
                .and_then(|index| self.open_elements.get(index))
                .cloned()
            else {
                return;
            };
            trace!(
                "adoption agency pass {outer} for </{subject}>: furthest block {}, common ancestor {}",
                self.open_elements.get(fb_index).map_or("", |entry| entry.name.as_str()),
                common_ancestor.name
            );

            let mut bookmark = fe_index;
            let mut node_index = fb_index;
            let mut last_node = furthest_block;
            let mut inner = 0;
            loop {
                inner += 1;
                // "Let node be the element immediately above node in the
                // stack of open elements"
                node_index -= 1;
                let Some(node) = self.open_elements.get(node_index).map(|entry| entry.handle) else {
                    break;
                };
                if node == formatting_element {
                    break;
                }

                let mut afe_index = self.active_formatting.position(node);
                if inner > INNER_LOOP_LIMIT
                    && let Some(index) = afe_index
                {
                    let _ = self.active_formatting.remove(index);
                    if index < bookmark {
                        bookmark -= 1;
                    }
                    afe_index = None;
                }

                // "If node is not in the list of active formatting elements,
                // then remove node from the stack of open elements and
                // continue."
                let Some(afe_index) = afe_index else {
                    let _ = self.open_elements.remove(node_index);
                    continue;
                };

                // "Create an element for the token for which the element node
                // was created, in the HTML namespace, with common ancestor as
                // the intended parent; replace the entry for node in the list
                // of active formatting elements with an entry for the new
                // element, replace the entry for node in the stack of open
                // elements with an entry for the new element, and let node be
                // the new element."
                let Some(tag) = self.active_formatting.tag_at(afe_index).cloned() else {
                    break;
                };
                let new = self
                    .sink
                    .create_element(&tag.name, Namespace::Html, &tag.attributes);
                self.active_formatting.replace_handle(afe_index, new);
                let _ = self
                    .open_elements
                    .replace(node, OpenElement::html(new, tag.name));

                if last_node == furthest_block {
                    bookmark = afe_index + 1;
                }
                self.sink.append_child(new, last_node);
                last_node = new;
            }

            // "Insert whatever last node ended up being in the appropriate
            // place for inserting a node, but using common ancestor as the
            // override target."
            let place = self.appropriate_place(Some(&common_ancestor));
            self.insert_at(place, last_node);

            let Some(fe_afe_index) = self.active_formatting.position(formatting_element) else {
                return;
            };
            let Some(tag) = self.active_formatting.tag_at(fe_afe_index).cloned() else {
                return;
            };

            // "Create an element for the token for which formatting element
            // was created, in the HTML namespace, with furthest block as the
            // intended parent. Take all of the child nodes of furthest block
            // and append them to the element created in the last step.
            // Append that new element to furthest block."
            let new = self
                .sink
                .create_element(&tag.name, Namespace::Html, &tag.attributes);
            self.sink.reparent_children(furthest_block, new);
            self.sink.append_child(furthest_block, new);

            // "Remove formatting element from the list of active formatting
            // elements, and insert the new element into the list of active
            // formatting elements at the position of the aforementioned
            // bookmark."
            let _ = self.active_formatting.remove(fe_afe_index);
            if fe_afe_index < bookmark {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting.len());
            let name = tag.name.clone();
            self.active_formatting.insert(bookmark, new, tag);

            // "Remove formatting element from the stack of open elements, and
            // insert the new element into the stack of open elements
            // immediately below the position of furthest block in that stack."
            let _ = self.open_elements.remove_node(formatting_element);
            let Some(fb_position) = self.open_elements.position(furthest_block) else {
                return;
            };
            self.open_elements
                .insert(fb_position + 1, OpenElement::html(new, name));
        }
    }
}
