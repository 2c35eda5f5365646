//! Text dump of a parsed tree in the html5lib tree-construction test format.
//!
//! ```text
//! | <!DOCTYPE html>
//! | <html>
//! |   <head>
//! |   <body>
//! |     <p>
//! |       class="intro"
//! |       "Hello"
//! ```

use std::fmt::Write as _;

use arbor_dom::{DomTree, Namespace, NodeId, NodeType};

use crate::foreign_content::foreign_attribute;

/// Dump every child of the Document.
#[must_use]
pub fn dump_tree(tree: &DomTree) -> String {
    dump_children(tree, tree.root())
}

/// Dump the children of `parent`, e.g. the root of a parsed fragment.
#[must_use]
pub fn dump_children(tree: &DomTree, parent: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(parent) {
        write_node(tree, child, 0, &mut out);
    }
    out
}

fn write_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = format!("| {}", "  ".repeat(depth));
    match &node.node_type {
        NodeType::Document | NodeType::DocumentFragment => {}
        NodeType::Doctype(doctype) => {
            if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                let _ = writeln!(out, "{prefix}<!DOCTYPE {}>", doctype.name);
            } else {
                let _ = writeln!(
                    out,
                    "{prefix}<!DOCTYPE {} \"{}\" \"{}\">",
                    doctype.name, doctype.public_id, doctype.system_id
                );
            }
        }
        NodeType::Element(data) => {
            match data.namespace.prefix() {
                Some(ns) => {
                    let _ = writeln!(out, "{prefix}<{ns} {}>", data.tag_name);
                }
                None => {
                    let _ = writeln!(out, "{prefix}<{}>", data.tag_name);
                }
            }

            let foreign = data.namespace != Namespace::Html;
            let mut attrs: Vec<(String, &str)> = data
                .attrs
                .iter()
                .map(|(name, value)| (display_attribute_name(name, foreign), value.as_str()))
                .collect();
            attrs.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, value) in attrs {
                let _ = writeln!(out, "{prefix}  {name}=\"{value}\"");
            }

            if let Some(contents) = data.template_contents {
                let _ = writeln!(out, "{prefix}  content");
                for &child in tree.children(contents) {
                    write_node(tree, child, depth + 2, out);
                }
            }
        }
        NodeType::Text(text) => {
            let _ = writeln!(out, "{prefix}\"{text}\"");
        }
        NodeType::Comment(comment) => {
            let _ = writeln!(out, "{prefix}<!-- {comment} -->");
        }
    }
    for &child in tree.children(id) {
        write_node(tree, child, depth + 1, out);
    }
}

/// Namespaced attributes on foreign elements print as `prefix name`.
fn display_attribute_name(name: &str, foreign: bool) -> String {
    match foreign_attribute(name).filter(|_| foreign) {
        Some(attr) => match attr.prefix {
            Some(prefix) => format!("{prefix} {}", attr.local_name),
            None => attr.local_name.to_string(),
        },
        None => name.to_string(),
    }
}
