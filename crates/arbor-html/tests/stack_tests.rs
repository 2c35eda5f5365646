//! Stack of open elements and list of active formatting elements, tested
//! directly with plain integer handles.

use arbor_dom::Namespace;
use arbor_html::{
    ActiveFormattingElements, Attribute, FormattingEntry, FormattingTag, OpenElement,
    OpenElementsStack, Scope,
};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

fn stack(names: &[&str]) -> OpenElementsStack<usize> {
    let mut stack = OpenElementsStack::new();
    for (handle, name) in names.iter().enumerate() {
        stack.push(OpenElement::html(handle, *name));
    }
    stack
}

fn tag(name: &str) -> FormattingTag {
    FormattingTag::new(name, Vec::new())
}

// ========== Scopes ==========

#[test]
fn test_default_scope_stops_at_table() {
    let stack = stack(&["html", "body", "p", "table", "tr"]);
    assert!(!stack.has_in_scope("p", Scope::Default));
    assert!(stack.has_in_scope("tr", Scope::Default));
    assert!(stack.has_in_scope("table", Scope::Default));
}

#[test]
fn test_button_scope_stops_at_button() {
    let stack = stack(&["html", "body", "p", "button", "span"]);
    assert!(stack.has_in_scope("p", Scope::Default));
    assert!(!stack.has_in_scope("p", Scope::Button));
}

#[test]
fn test_list_item_scope_stops_at_lists() {
    let stack = stack(&["html", "body", "li", "ul", "span"]);
    assert!(stack.has_in_scope("li", Scope::Default));
    assert!(!stack.has_in_scope("li", Scope::ListItem));
}

#[test]
fn test_table_scope_ignores_default_boundaries() {
    let stack = stack(&["html", "body", "table", "tbody", "tr", "td", "object"]);
    assert!(stack.has_in_scope("tbody", Scope::Table));
    assert!(!stack.has_in_scope("tbody", Scope::Default));
}

#[test]
fn test_select_scope_only_passes_options() {
    let with_options = stack(&["html", "body", "select", "optgroup", "option"]);
    assert!(with_options.has_in_scope("select", Scope::Select));

    let with_div = stack(&["html", "body", "select", "div"]);
    assert!(!with_div.has_in_scope("select", Scope::Select));
}

#[test]
fn test_foreign_boundaries() {
    let mut stack = stack(&["html", "body", "p"]);
    stack.push(OpenElement::new(3, "svg", Namespace::Svg));
    stack.push(OpenElement::new(4, "foreignObject", Namespace::Svg));
    assert!(!stack.has_in_scope("p", Scope::Default));

    let mut stack = self::stack(&["html", "body", "p"]);
    stack.push(OpenElement::new(3, "math", Namespace::MathMl));
    stack.push(OpenElement::new(4, "mi", Namespace::MathMl));
    assert!(!stack.has_in_scope("p", Scope::Button));
}

#[test]
fn test_foreign_element_does_not_match_html_name() {
    let mut stack = stack(&["html", "body"]);
    stack.push(OpenElement::new(2, "title", Namespace::Svg));
    assert!(!stack.has_in_scope("title", Scope::Default));
    assert!(!stack.current_is("title"));
}

#[test]
fn test_has_node_in_scope() {
    let stack = stack(&["html", "body", "b", "td", "i"]);
    assert!(stack.has_node_in_scope(4, Scope::Default));
    assert!(!stack.has_node_in_scope(2, Scope::Default));
}

// ========== Popping ==========

#[test]
fn test_pop_until_tag_name_popped() {
    let mut stack = stack(&["html", "body", "div", "p", "span"]);
    assert_eq!(stack.pop_until_tag_name_popped("p"), 2);
    assert_eq!(stack.current_tag_name(), Some("div"));
    assert_eq!(stack.pop_until_tag_name_popped("table"), 0);
    assert_eq!(stack.len(), 3);
}

#[test]
fn test_generate_implied_end_tags() {
    let mut stack = stack(&["html", "body", "ul", "li", "p"]);
    stack.generate_implied_end_tags(Some("li"));
    assert_eq!(stack.current_tag_name(), Some("li"));
    stack.generate_implied_end_tags(None);
    assert_eq!(stack.current_tag_name(), Some("ul"));
}

#[test]
fn test_generate_implied_end_tags_thoroughly() {
    let mut stack = stack(&["html", "body", "table", "tbody", "tr", "td", "p"]);
    stack.generate_implied_end_tags(None);
    assert_eq!(stack.current_tag_name(), Some("td"));
    stack.generate_all_implied_end_tags_thoroughly();
    assert_eq!(stack.current_tag_name(), Some("table"));
}

#[test]
fn test_clear_back_to_table_context() {
    let mut stack = stack(&["html", "body", "table", "caption", "b"]);
    stack.clear_back_to(&["table", "template", "html"]);
    assert_eq!(stack.current_tag_name(), Some("table"));
}

#[test]
fn test_remove_and_replace_node() {
    let mut stack = stack(&["html", "body", "a", "div"]);
    assert!(stack.remove_node(2));
    assert!(!stack.contains(2));
    assert!(stack.replace(3, OpenElement::html(9, "div")));
    assert_eq!(stack.position(9), Some(2));
    assert!(!stack.replace(42, OpenElement::html(10, "p")));
}

/// Tag names for generated stacks; `mark` never appears in them.
#[derive(Debug, Clone)]
struct StackNames(Vec<&'static str>);

impl Arbitrary for StackNames {
    fn arbitrary(g: &mut Gen) -> Self {
        const NAMES: &[&str] = &[
            "div", "p", "span", "table", "td", "button", "ul", "li", "select", "option", "b",
        ];
        let len = usize::arbitrary(g) % 8;
        Self(
            (0..len)
                .filter_map(|_| g.choose(NAMES).copied())
                .collect(),
        )
    }
}

#[quickcheck]
fn prop_pop_until_removes_the_only_occurrence(below: StackNames, above: StackNames) -> bool {
    let mut names = vec!["html", "body"];
    names.extend(&below.0);
    let index = names.len();
    names.push("mark");
    names.extend(&above.0);

    let mut stack = stack(&names);
    let popped = stack.pop_until_tag_name_popped("mark");
    popped == names.len() - index
        && stack.len() == index
        && !stack.contains_tag("mark")
        && Scope::ALL
            .iter()
            .all(|&scope| !stack.has_in_scope("mark", scope))
}

#[quickcheck]
fn prop_current_node_is_always_in_scope(names: StackNames) -> bool {
    let mut all = vec!["html", "body"];
    all.extend(&names.0);
    let stack = stack(&all);
    let current = stack.len() - 1;
    [Scope::Default, Scope::ListItem, Scope::Button, Scope::Table]
        .iter()
        .all(|&scope| stack.has_node_in_scope(current, scope))
}

// ========== Active formatting elements ==========

#[test]
fn test_noahs_ark_removes_earliest_duplicate() {
    let mut list = ActiveFormattingElements::new();
    for handle in 0..4 {
        list.push(handle, tag("b"));
    }
    assert_eq!(list.len(), 3);
    assert!(!list.contains(0));
    assert!(list.contains(3));
}

#[test]
fn test_noahs_ark_compares_attributes() {
    let mut list = ActiveFormattingElements::new();
    let red = FormattingTag::new("font", vec![Attribute::new("color", "red")]);
    let blue = FormattingTag::new("font", vec![Attribute::new("color", "blue")]);
    for handle in 0..3 {
        list.push(handle, red.clone());
    }
    list.push(3, blue);
    assert_eq!(list.len(), 4);
}

#[test]
fn test_attribute_order_does_not_matter() {
    let first = FormattingTag::new(
        "a",
        vec![Attribute::new("href", "x"), Attribute::new("id", "y")],
    );
    let second = FormattingTag::new(
        "a",
        vec![Attribute::new("id", "y"), Attribute::new("href", "x")],
    );
    assert!(first.same_as(&second));
    assert!(!first.same_as(&tag("a")));
}

#[test]
fn test_noahs_ark_counts_only_after_last_marker() {
    let mut list = ActiveFormattingElements::new();
    for handle in 0..3 {
        list.push(handle, tag("i"));
    }
    list.insert_marker();
    for handle in 3..6 {
        list.push(handle, tag("i"));
    }
    assert_eq!(list.len(), 7);
    list.push(6, tag("i"));
    assert_eq!(list.len(), 7);
    assert!(list.contains(0));
    assert!(!list.contains(3));
}

#[test]
fn test_clear_to_last_marker() {
    let mut list = ActiveFormattingElements::new();
    list.push(0, tag("b"));
    list.insert_marker();
    list.push(1, tag("i"));
    list.push(2, tag("u"));
    list.clear_to_last_marker();
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(0), Some(&FormattingEntry::Element { handle: 0, tag: tag("b") }));
}

#[test]
fn test_last_element_after_marker_stops_at_marker() {
    let mut list = ActiveFormattingElements::new();
    list.push(0, tag("a"));
    list.insert_marker();
    list.push(1, tag("b"));
    assert_eq!(list.last_element_after_marker("b"), Some(2));
    assert_eq!(list.last_element_after_marker("a"), None);
}

#[test]
fn test_reconstruction_start() {
    let open = stack(&["html", "body", "b"]);
    let mut list = ActiveFormattingElements::new();
    assert_eq!(list.reconstruction_start(&open), None);

    list.push(2, tag("b"));
    assert_eq!(list.reconstruction_start(&open), None);

    list.push(10, tag("i"));
    list.push(11, tag("u"));
    assert_eq!(list.reconstruction_start(&open), Some(1));

    list.insert_marker();
    assert_eq!(list.reconstruction_start(&open), None);
}

#[test]
fn test_reconstruct_from_replaces_handles() {
    let open = stack(&["html", "body"]);
    let mut list = ActiveFormattingElements::new();
    list.push(10, tag("b"));
    list.push(11, tag("i"));
    let start = list.reconstruction_start(&open).expect("needs reconstruction");
    assert_eq!(start, 0);

    let mut created = Vec::new();
    let mut next = 100;
    list.reconstruct_from(start, |tag| {
        created.push(tag.name.clone());
        next += 1;
        next
    });
    assert_eq!(created, ["b", "i"]);
    assert!(list.contains(101));
    assert!(list.contains(102));
    assert!(!list.contains(10));
}

/// A generated sequence of formatting pushes and markers.
#[derive(Debug, Clone)]
struct Pushes(Vec<Option<(&'static str, bool)>>);

impl Arbitrary for Pushes {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 24;
        Self(
            (0..len)
                .map(|_| {
                    if u8::arbitrary(g) % 8 == 0 {
                        None
                    } else {
                        let name = g.choose(&["b", "i", "font"]).copied().unwrap_or("b");
                        Some((name, bool::arbitrary(g)))
                    }
                })
                .collect(),
        )
    }
}

#[quickcheck]
fn prop_noahs_ark_holds_per_segment(pushes: Pushes) -> bool {
    let mut list = ActiveFormattingElements::new();
    for (handle, push) in pushes.0.into_iter().enumerate() {
        match push {
            Some((name, with_class)) => {
                let attributes = if with_class {
                    vec![Attribute::new("class", "x")]
                } else {
                    Vec::new()
                };
                list.push(handle, FormattingTag::new(name, attributes));
            }
            None => list.insert_marker(),
        }
    }

    let mut segment: Vec<&FormattingTag> = Vec::new();
    for entry in &list {
        match entry {
            FormattingEntry::Marker => segment.clear(),
            FormattingEntry::Element { tag, .. } => {
                if segment.iter().filter(|seen| seen.same_as(tag)).count() >= 3 {
                    return false;
                }
                segment.push(tag);
            }
        }
    }
    true
}
