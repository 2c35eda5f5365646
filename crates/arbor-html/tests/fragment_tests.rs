//! Fragment parsing: markup parsed in the context of an element.

mod common;

use arbor_dom::{DomTree, Namespace};
use arbor_html::{
    FragmentContext, InsertionMode, Token, TokenizerState, TreeBuilderError, TreeBuilderOptions,
    TreeConstructor, dump_children, parse_fragment,
};
use common::{child_tags, parse_fragment_in, text_content};

#[test]
fn test_fragment_in_div() {
    let (tree, root) = parse_fragment_in("<p>a<p>b", FragmentContext::html("div"));
    assert_eq!(child_tags(&tree, root), ["p", "p"]);
    assert_eq!(text_content(&tree, root), "ab");
}

#[test]
fn test_fragment_has_no_implied_head_or_body() {
    let (tree, root) = parse_fragment_in("hello", FragmentContext::html("div"));
    assert_eq!(dump_children(&tree, root), "| \"hello\"\n");
}

#[test]
fn test_fragment_in_table_row() {
    let (tree, root) = parse_fragment_in("<td>x</td><td>y", FragmentContext::html("tr"));
    assert_eq!(child_tags(&tree, root), ["td", "td"]);
}

#[test]
fn test_fragment_in_table_body() {
    let (tree, root) = parse_fragment_in("<tr><td>x</td></tr>", FragmentContext::html("tbody"));
    assert_eq!(child_tags(&tree, root), ["tr"]);
}

#[test]
fn test_fragment_in_select() {
    let (tree, root) = parse_fragment_in("<option>a<option>b", FragmentContext::html("select"));
    assert_eq!(child_tags(&tree, root), ["option", "option"]);
}

#[test]
fn test_fragment_in_template() {
    let (tree, root) = parse_fragment_in("<td>x", FragmentContext::html("template"));
    assert_eq!(child_tags(&tree, root), ["td"]);
}

#[test]
fn test_fragment_in_title_is_rcdata() {
    let (tree, root) = parse_fragment_in("a<b>c", FragmentContext::html("title"));
    assert!(child_tags(&tree, root).is_empty());
    assert_eq!(text_content(&tree, root), "a<b>c");
}

#[test]
fn test_fragment_in_svg_context() {
    let context = FragmentContext::new("svg", Namespace::Svg);
    let (tree, root) = parse_fragment_in("<path/><lineargradient/>", context);
    assert_eq!(
        dump_children(&tree, root),
        "| <svg path>\n| <svg linearGradient>\n"
    );
}

#[test]
fn test_fragment_html_end_tag_is_ignored() {
    let (tree, root) = parse_fragment_in("a</html>b", FragmentContext::html("div"));
    assert_eq!(tree.children(root).len(), 1);
    assert_eq!(text_content(&tree, root), "ab");
}

#[test]
fn test_fragment_form_context_sets_form_pointer() {
    let (tree, root) = parse_fragment_in("<form><input>", FragmentContext::html("form"));
    assert_eq!(child_tags(&tree, root), ["input"]);
}

#[test]
fn test_initial_tokenizer_state_for_context() {
    let cases = [
        ("title", Some(TokenizerState::Rcdata)),
        ("textarea", Some(TokenizerState::Rcdata)),
        ("style", Some(TokenizerState::Rawtext)),
        ("script", Some(TokenizerState::ScriptData)),
        ("plaintext", Some(TokenizerState::Plaintext)),
        ("noscript", None),
        ("div", None),
    ];
    for (name, expected) in cases {
        let builder = TreeConstructor::new_fragment(
            DomTree::new(),
            FragmentContext::html(name),
            TreeBuilderOptions::default(),
        )
        .expect("valid context");
        assert_eq!(builder.initial_tokenizer_state(), expected, "context <{name}>");
    }
}

#[test]
fn test_initial_mode_from_context() {
    let cases = [
        ("td", InsertionMode::InBody),
        ("tr", InsertionMode::InRow),
        ("table", InsertionMode::InTable),
        ("select", InsertionMode::InSelect),
        ("colgroup", InsertionMode::InColumnGroup),
        ("template", InsertionMode::InTemplate),
        ("head", InsertionMode::InBody),
        ("frameset", InsertionMode::InFrameset),
        ("html", InsertionMode::BeforeHead),
    ];
    for (name, expected) in cases {
        let builder = TreeConstructor::new_fragment(
            DomTree::new(),
            FragmentContext::html(name),
            TreeBuilderOptions::default(),
        )
        .expect("valid context");
        assert_eq!(builder.insertion_mode(), expected, "context <{name}>");
    }
}

#[test]
fn test_empty_context_name_is_rejected() {
    let result = TreeConstructor::new_fragment(
        DomTree::new(),
        FragmentContext::html(""),
        TreeBuilderOptions::default(),
    );
    assert!(matches!(
        result,
        Err(TreeBuilderError::InvalidFragmentContext(_))
    ));
}

#[test]
fn test_parse_fragment_from_tokens() {
    let tokens = vec![
        Token::start_tag("li"),
        Token::text("one"),
        Token::start_tag("li"),
        Token::text("two"),
    ];
    let (tree, root, errors) =
        parse_fragment(tokens, FragmentContext::html("ul"), TreeBuilderOptions::default())
            .expect("fragment parsed");
    assert_eq!(child_tags(&tree, root), ["li", "li"]);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}
