//! The token-at-a-time driver: batching, tokenizer directives, options and
//! contract errors.

mod common;

use arbor_dom::DomTree;
use arbor_html::{
    InsertionMode, ParseErrorCode, Token, TokenizerState, TreeBuilderError, TreeBuilderOptions,
    TreeConstructor, dump_tree, parse_document,
};
use common::tokenize;

fn build(tokens: Vec<Token>) -> String {
    let mut builder = TreeConstructor::new(DomTree::new());
    builder.process_tokens(tokens).expect("tokens processed");
    let (tree, _) = builder.finish().expect("parse finished");
    dump_tree(&tree)
}

/// Split every character token into one token per character.
fn split_characters(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .flat_map(|token| match token {
            Token::Character { data } => data.chars().map(Token::text).collect(),
            other => vec![other],
        })
        .collect()
}

#[test]
fn test_character_batching_does_not_change_tree() {
    let html = "<!DOCTYPE html><table>ab <tr><td>x y</td></tr></table>\
                <p>hello <b>world</b> <pre>\ncode</pre>";
    let batched = build(tokenize(html));
    let split = build(split_characters(tokenize(html)));
    assert_eq!(batched, split);
    assert!(batched.contains("\"ab \""));
}

#[test]
fn test_token_after_stop_is_rejected() {
    let mut builder = TreeConstructor::new(DomTree::new());
    assert_eq!(builder.process_token(Token::EndOfFile), Ok(None));
    assert!(builder.is_stopped());
    assert_eq!(
        builder.process_token(Token::text("late")),
        Err(TreeBuilderError::TokenAfterStop { token_index: 1 })
    );
}

#[test]
fn test_reprocess_limit() {
    let options = TreeBuilderOptions {
        max_reprocess: 1,
        ..TreeBuilderOptions::default()
    };
    let mut builder = TreeConstructor::with_options(DomTree::new(), options);
    assert_eq!(
        builder.process_token(Token::start_tag("p")),
        Err(TreeBuilderError::ReprocessLimit {
            token_index: 0,
            count: 2,
            mode: InsertionMode::BeforeHtml,
        })
    );
}

#[test]
fn test_default_reprocess_limit_is_never_hit() {
    let html = "<table><tr><td><select><option>a<td>b</table></body></html>x<frameset>";
    let tree = parse_document(tokenize(html));
    assert!(tree.is_ok());
}

#[test]
fn test_tokenizer_directives() {
    let cases = [
        ("title", Some(TokenizerState::Rcdata)),
        ("textarea", Some(TokenizerState::Rcdata)),
        ("style", Some(TokenizerState::Rawtext)),
        ("xmp", Some(TokenizerState::Rawtext)),
        ("iframe", Some(TokenizerState::Rawtext)),
        ("noembed", Some(TokenizerState::Rawtext)),
        ("noscript", None),
        ("script", Some(TokenizerState::ScriptData)),
        ("plaintext", Some(TokenizerState::Plaintext)),
        ("div", None),
    ];
    for (name, expected) in cases {
        let mut builder = TreeConstructor::new(DomTree::new());
        builder
            .process_tokens([Token::doctype("html"), Token::start_tag("body")])
            .expect("prefix processed");
        let directive = builder
            .process_token(Token::start_tag(name))
            .expect("token processed");
        assert_eq!(directive, expected, "<{name}>");
    }
}

#[test]
fn test_noscript_directive_with_scripting() {
    let options = TreeBuilderOptions::default().with_scripting(true);
    let mut builder = TreeConstructor::with_options(DomTree::new(), options);
    let directive = builder
        .process_token(Token::start_tag("noscript"))
        .expect("token processed");
    assert_eq!(directive, Some(TokenizerState::Rawtext));
    assert_eq!(builder.insertion_mode(), InsertionMode::Text);
}

#[test]
fn test_text_mode_restores_original_mode() {
    let mut builder = TreeConstructor::new(DomTree::new());
    builder
        .process_tokens([
            Token::doctype("html"),
            Token::start_tag("title"),
        ])
        .expect("tokens processed");
    assert_eq!(builder.insertion_mode(), InsertionMode::Text);
    assert_eq!(builder.state().original_insertion_mode, Some(InsertionMode::InHead));

    builder
        .process_tokens([Token::text("T"), Token::end_tag("title")])
        .expect("tokens processed");
    assert_eq!(builder.insertion_mode(), InsertionMode::InHead);
    assert_eq!(builder.state().original_insertion_mode, None);
}

#[test]
fn test_allows_cdata_in_foreign_content() {
    let mut builder = TreeConstructor::new(DomTree::new());
    builder
        .process_tokens([Token::doctype("html"), Token::start_tag("body")])
        .expect("tokens processed");
    assert!(!builder.allows_cdata());

    let _ = builder
        .process_token(Token::start_tag("svg"))
        .expect("token processed");
    assert!(builder.allows_cdata());

    let _ = builder
        .process_token(Token::end_tag("svg"))
        .expect("token processed");
    assert!(!builder.allows_cdata());
}

#[test]
fn test_self_closing_non_void_is_reported() {
    let mut builder = TreeConstructor::new(DomTree::new());
    builder
        .process_tokens([
            Token::doctype("html"),
            Token::start_tag("div").self_closing(),
            Token::start_tag("br").self_closing(),
        ])
        .expect("tokens processed");
    let codes: Vec<_> = builder.errors().iter().map(|error| error.code).collect();
    assert_eq!(
        codes,
        [ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus]
    );
    assert_eq!(builder.errors()[0].tag.as_deref(), Some("div"));
    assert_eq!(builder.errors()[0].token_index, 1);
}

#[test]
fn test_error_collection_disabled() {
    let options = TreeBuilderOptions::default().with_error_collection(false);
    let mut builder = TreeConstructor::with_options(DomTree::new(), options);
    builder
        .process_tokens([Token::start_tag("p"), Token::end_tag("span")])
        .expect("tokens processed");
    assert!(builder.errors().is_empty());
}

#[test]
fn test_parse_error_records_mode() {
    let (_, errors) = parse_document([Token::end_tag("span")]).expect("parsed");
    let first = &errors[0];
    assert_eq!(first.code, ParseErrorCode::MissingDoctype);
    assert_eq!(first.mode, InsertionMode::Initial);
    assert_eq!(first.tag.as_deref(), Some("span"));
    assert_eq!(first.to_string(), "missing-doctype at token 0 (initial) <span>");
}

#[test]
fn test_state_names_are_kebab_case() {
    assert_eq!(ParseErrorCode::EofInTemplate.to_string(), "eof-in-template");
    assert_eq!(InsertionMode::InTableText.to_string(), "in-table-text");
    let name: &'static str = InsertionMode::AfterAfterFrameset.into();
    assert_eq!(name, "after-after-frameset");
    assert_eq!(TokenizerState::ScriptData.to_string(), "script-data");
}

#[test]
fn test_errors_serialize_to_json() {
    let (_, errors) = parse_document([Token::text("x")]).expect("parsed");
    let json = serde_json::to_value(&errors[0]).expect("serializable");
    assert_eq!(json["code"], "missing-doctype");
    assert_eq!(json["mode"], "initial");
    assert_eq!(json["token_index"], 0);
    assert!(json["tag"].is_null());
}

#[test]
fn test_options_deserialize_with_defaults() {
    let options: TreeBuilderOptions =
        serde_json::from_str(r#"{ "scripting_enabled": true }"#).expect("valid options");
    assert!(options.scripting_enabled);
    assert!(!options.iframe_srcdoc);
    assert!(options.collect_errors);
    assert_eq!(options.max_reprocess, TreeBuilderOptions::default().max_reprocess);

    let json = serde_json::to_string(&TreeBuilderOptions::default()).expect("serializable");
    let back: TreeBuilderOptions = serde_json::from_str(&json).expect("round trip");
    assert_eq!(back, TreeBuilderOptions::default());
}

#[test]
fn test_finish_processes_end_of_file() {
    let mut builder = TreeConstructor::new(DomTree::new());
    builder
        .process_tokens([Token::doctype("html"), Token::start_tag("p")])
        .expect("tokens processed");
    assert!(!builder.is_stopped());
    let (tree, errors) = builder.finish().expect("parse finished");
    assert!(tree.body().is_some());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn test_template_modes_are_tracked() {
    let mut builder = TreeConstructor::new(DomTree::new());
    builder
        .process_tokens([
            Token::doctype("html"),
            Token::start_tag("template"),
            Token::start_tag("tr"),
        ])
        .expect("tokens processed");
    assert_eq!(
        builder.state().template_insertion_modes,
        [InsertionMode::InTableBody]
    );
    assert_eq!(builder.insertion_mode(), InsertionMode::InRow);
    assert_eq!(builder.open_elements().current_tag_name(), Some("tr"));
}
