//! Tests for the DOM tree mutations used by tree construction.

use arbor_dom::{DomTree, ElementData, Namespace, NodeId, NodeType, QuirksMode};

fn element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc_element(ElementData::new(tag))
}

/// A `div` under the document with children `a`, `b`, `c`.
fn three_children(tree: &mut DomTree) -> (NodeId, [NodeId; 3]) {
    let parent = element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let kids = [element(tree, "a"), element(tree, "b"), element(tree, "c")];
    for kid in kids {
        tree.append_child(parent, kid);
    }
    (parent, kids)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_clears_links() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_first_and_last_child() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.remove_child(parent, a);
    tree.remove_child(parent, c);

    assert_eq!(tree.children(parent), &[b]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_child_of_other_parent_is_noop() {
    let mut tree = DomTree::new();
    let (parent, [a, ..]) = three_children(&mut tree);

    tree.remove_child(NodeId::ROOT, a);

    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.children(parent).len(), 3);
}

// ========== append_child / insert_before ==========

#[test]
fn test_append_child_moves_attached_node() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);
    let other = element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert_eq!(tree.parent(b), Some(other));
    assert_eq!(tree.prev_sibling(b), None);
}

#[test]
fn test_insert_before_first_and_middle() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    let first = element(&mut tree, "x");
    tree.insert_before(parent, first, a);
    let middle = element(&mut tree, "y");
    tree.insert_before(parent, middle, c);

    assert_eq!(tree.children(parent), &[first, a, b, middle, c]);
    assert_eq!(tree.prev_sibling(first), None);
    assert_eq!(tree.prev_sibling(a), Some(first));
    assert_eq!(tree.next_sibling(b), Some(middle));
    assert_eq!(tree.prev_sibling(c), Some(middle));
}

#[test]
fn test_insert_before_reorders_existing_child() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.insert_before(parent, c, a);

    assert_eq!(tree.children(parent), &[c, a, b]);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.prev_sibling(a), Some(c));
}

#[test]
fn test_insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);
    let stray = element(&mut tree, "stray");
    let new = element(&mut tree, "new");

    tree.insert_before(parent, new, stray);

    assert_eq!(tree.children(parent), &[a, b, c, new]);
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_after_existing() {
    let mut tree = DomTree::new();
    let (from, [a, b, c]) = three_children(&mut tree);
    let to = element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, to);
    let existing = element(&mut tree, "i");
    tree.append_child(to, existing);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, a, b, c]);
    assert_eq!(tree.prev_sibling(a), Some(existing));
    assert!([a, b, c].iter().all(|&n| tree.parent(n) == Some(to)));
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = DomTree::new();
    let from = element(&mut tree, "div");
    let to = element(&mut tree, "span");

    tree.move_children(from, to);

    assert!(tree.children(to).is_empty());
}

// ========== handles from another tree ==========

#[test]
fn test_foreign_handles_are_ignored() {
    let mut small = DomTree::new();
    let (parent, kids) = three_children(&mut small);

    let mut big = DomTree::new();
    for _ in 0..10 {
        let _ = element(&mut big, "p");
    }
    let stranger = NodeId(big.len() - 1);
    assert!(!small.contains(stranger));

    small.append_child(stranger, kids[0]);
    small.append_child(parent, stranger);
    small.insert_before(stranger, kids[1], kids[2]);
    small.insert_before(parent, stranger, kids[0]);
    small.remove_child(stranger, kids[0]);
    small.move_children(stranger, parent);
    small.move_children(parent, stranger);
    small.detach(stranger);

    assert_eq!(small.children(parent), kids);
    assert_eq!(small.parent(kids[0]), Some(parent));
}

// ========== element data ==========

#[test]
fn test_set_attribute_if_absent_keeps_first_value() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, "body");

    tree.set_attribute_if_absent(body, "class", "a");
    tree.set_attribute_if_absent(body, "class", "b");
    tree.set_attribute_if_absent(body, "id", "main");

    let attrs = &tree.as_element(body).unwrap().attrs;
    assert_eq!(attrs.get("class").map(String::as_str), Some("a"));
    let names: Vec<_> = attrs.keys().map(String::as_str).collect();
    assert_eq!(names, ["class", "id"]);
}

#[test]
fn test_template_gets_contents_fragment() {
    let mut tree = DomTree::new();
    let template = element(&mut tree, "template");
    let svg_template = tree.alloc_element(ElementData::with_namespace("template", Namespace::Svg));

    let contents = tree.template_contents(template).expect("template contents");
    assert!(matches!(
        tree.get(contents).unwrap().node_type,
        NodeType::DocumentFragment
    ));
    assert_eq!(tree.template_contents(svg_template), None);
}

#[test]
fn test_append_text_extends_node() {
    let mut tree = DomTree::new();
    let text = tree.alloc(NodeType::Text("Hello".to_string()));

    tree.append_text(text, ", world");

    assert_eq!(tree.as_text(text), Some("Hello, world"));
}

#[test]
fn test_document_element_and_body() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let html = element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = element(&mut tree, "head");
    let frameset = element(&mut tree, "frameset");
    tree.append_child(html, head);
    tree.append_child(html, frameset);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(frameset));
    assert!(tree.is_descendant_of(frameset, NodeId::ROOT));
    assert_eq!(tree.ancestors(head).collect::<Vec<_>>(), [html, NodeId::ROOT]);
}

#[test]
fn test_serializes_to_json() {
    let mut tree = DomTree::new();
    tree.set_quirks_mode(QuirksMode::LimitedQuirks);
    let p = element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, p);

    let json = serde_json::to_value(&tree).unwrap();

    assert_eq!(json["quirks_mode"], "LimitedQuirks");
    assert_eq!(json["nodes"][1]["node_type"]["Element"]["tag_name"], "p");
    assert_eq!(json["nodes"][1]["parent"], 0);
}
