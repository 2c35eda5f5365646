//! Shared helpers for the tree construction tests.
//!
//! `Lexer` is a deliberately small markup tokenizer: tags with quoted or
//! bare attributes, comments, DOCTYPEs and text. It has no character
//! references and honors the tokenizer state the tree builder asks for, so
//! `<title>`, `<script>` and friends get their raw text.

#![allow(dead_code)]

use arbor_dom::{DomTree, NodeId, NodeType};
use arbor_html::{
    Attribute, FragmentContext, ParseError, Token, TokenizerState, TreeBuilderOptions,
    TreeConstructor,
};

/// Tokenizes test markup one token at a time.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    last_start_tag: String,
    raw_text_end: Option<String>,
    plaintext: bool,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            last_start_tag: String::new(),
            raw_text_end: None,
            plaintext: false,
            done: false,
        }
    }

    /// Apply a tokenizer state requested by the tree builder.
    pub fn switch_to(&mut self, state: TokenizerState) {
        match state {
            TokenizerState::Plaintext => self.plaintext = true,
            TokenizerState::Rcdata | TokenizerState::Rawtext | TokenizerState::ScriptData => {
                self.raw_text_end = Some(self.last_start_tag.clone());
            }
        }
    }

    /// Start in a raw text state for the element `name` (fragment parsing).
    pub fn start_in(&mut self, state: TokenizerState, name: &str) {
        self.last_start_tag = name.to_string();
        self.switch_to(state);
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let rest = &self.input[self.pos..];
        if rest.is_empty() {
            self.done = true;
            return Some(Token::EndOfFile);
        }
        if self.plaintext {
            self.pos = self.input.len();
            return Some(Token::text(rest));
        }
        if let Some(end_name) = &self.raw_text_end {
            let close = format!("</{end_name}");
            let end = rest.find(&close).unwrap_or(rest.len());
            if end > 0 {
                self.pos += end;
                return Some(Token::text(&rest[..end]));
            }
            self.raw_text_end = None;
        }

        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body.find("-->").unwrap_or(body.len());
            self.pos += 4 + (end + 3).min(body.len());
            return Some(Token::comment(&body[..end]));
        }

        if rest.len() >= 9 && rest[..9].eq_ignore_ascii_case("<!doctype") {
            let end = rest.find('>').unwrap_or(rest.len());
            self.pos += (end + 1).min(rest.len());
            return Some(lex_doctype(&rest[9..end]));
        }

        if let Some(body) = rest.strip_prefix("</") {
            let end = body.find('>').unwrap_or(body.len());
            self.pos += 2 + (end + 1).min(body.len());
            let name = body[..end].trim().to_ascii_lowercase();
            return Some(Token::end_tag(name));
        }

        if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = rest.find('>').unwrap_or(rest.len());
            self.pos += (end + 1).min(rest.len());
            let token = lex_start_tag(&rest[1..end]);
            if let Token::StartTag { name, .. } = &token {
                self.last_start_tag.clone_from(name);
            }
            return Some(token);
        }

        let end = if rest.starts_with('<') {
            rest[1..].find('<').map_or(rest.len(), |i| i + 1)
        } else {
            rest.find('<').unwrap_or(rest.len())
        };
        self.pos += end;
        Some(Token::text(&rest[..end]))
    }
}

fn lex_doctype(body: &str) -> Token {
    let body = body.trim();
    let (name, rest) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    let quoted: Vec<&str> = rest.split('"').skip(1).step_by(2).collect();
    let keyword = rest.trim_start().to_ascii_uppercase();
    let (public_identifier, system_identifier) = if keyword.starts_with("PUBLIC") {
        (quoted.first().map(|s| s.to_string()), quoted.get(1).map(|s| s.to_string()))
    } else if keyword.starts_with("SYSTEM") {
        (None, quoted.first().map(|s| s.to_string()))
    } else {
        (None, None)
    };
    Token::Doctype {
        name: (!name.is_empty()).then(|| name.to_ascii_lowercase()),
        public_identifier,
        system_identifier,
        force_quirks: name.is_empty(),
    }
}

fn lex_start_tag(body: &str) -> Token {
    let (body, self_closing) = match body.strip_suffix('/') {
        Some(body) => (body, true),
        None => (body, false),
    };
    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();
    let mut attributes = Vec::new();
    let mut rest = body[name_end..].trim_start();
    while !rest.is_empty() {
        let attr_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let attr_name = rest[..attr_end].to_ascii_lowercase();
        rest = rest[attr_end..].trim_start();
        let mut value = String::new();
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            if let Some(quote) = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'') {
                let inner = &after_eq[1..];
                let close = inner.find(quote).unwrap_or(inner.len());
                value = inner[..close].to_string();
                rest = inner.get(close + 1..).unwrap_or("");
            } else {
                let close = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                value = after_eq[..close].to_string();
                rest = &after_eq[close..];
            }
        }
        attributes.push(Attribute::new(attr_name, value));
        rest = rest.trim_start();
    }
    let token = Token::start_tag_with(name, attributes);
    if self_closing { token.self_closing() } else { token }
}

/// Tokenize `html` completely, ignoring tokenizer state requests.
pub fn tokenize(html: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(html);
    std::iter::from_fn(|| lexer.next_token()).collect()
}

/// Parse a document, feeding tokenizer state requests back to the lexer.
pub fn parse_with_options(html: &str, options: TreeBuilderOptions) -> (DomTree, Vec<ParseError>) {
    let mut lexer = Lexer::new(html);
    let mut builder = TreeConstructor::with_options(DomTree::new(), options);
    while let Some(token) = lexer.next_token() {
        if let Some(state) = builder.process_token(token).expect("token processed") {
            lexer.switch_to(state);
        }
    }
    builder.finish().expect("parse finished")
}

pub fn parse_with_errors(html: &str) -> (DomTree, Vec<ParseError>) {
    parse_with_options(html, TreeBuilderOptions::default())
}

pub fn parse(html: &str) -> DomTree {
    parse_with_errors(html).0
}

/// Parse a fragment in an HTML context element; returns the tree and the
/// root whose children are the fragment.
pub fn parse_fragment_in(html: &str, context: FragmentContext) -> (DomTree, NodeId) {
    let context_name = context.name.clone();
    let mut builder =
        TreeConstructor::new_fragment(DomTree::new(), context, TreeBuilderOptions::default())
            .expect("valid context");
    let mut lexer = Lexer::new(html);
    if let Some(state) = builder.initial_tokenizer_state() {
        lexer.start_in(state, &context_name);
    }
    let root = builder.fragment_root().expect("fragment root");
    while let Some(token) = lexer.next_token() {
        if let Some(state) = builder.process_token(token).expect("token processed") {
            lexer.switch_to(state);
        }
    }
    let (dom, _) = builder.finish().expect("parse finished");
    (dom, root)
}

/// Depth-first search for the first element named `tag`.
pub fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    tree.children(from)
        .iter()
        .find_map(|&child| find_element(tree, child, tag))
}

/// Every element named `tag`, in document order.
pub fn find_all_elements(tree: &DomTree, from: NodeId, tag: &str) -> Vec<NodeId> {
    let mut found = Vec::new();
    if tree.as_element(from).is_some_and(|data| data.tag_name == tag) {
        found.push(from);
    }
    for &child in tree.children(from) {
        found.extend(find_all_elements(tree, child, tag));
    }
    found
}

/// Concatenated text of `id` and its descendants.
pub fn text_content(tree: &DomTree, id: NodeId) -> String {
    match tree.get(id).map(|node| &node.node_type) {
        Some(NodeType::Text(data)) => data.clone(),
        _ => tree
            .children(id)
            .iter()
            .map(|&child| text_content(tree, child))
            .collect(),
    }
}

/// Tag names of the element children of `id`.
pub fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.as_element(child))
        .map(|data| data.tag_name.clone())
        .collect()
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Serialize a tree back to markup. Text is written unescaped, which is
/// enough for inputs without `<` or `&` in character data.
pub fn serialize(tree: &DomTree) -> String {
    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        serialize_node(tree, child, &mut out);
    }
    out
}

fn serialize_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document | NodeType::DocumentFragment => {}
        NodeType::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            out.push('>');
        }
        NodeType::Text(text) => out.push_str(text),
        NodeType::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.tag_name);
            for (name, value) in &data.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(value);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&data.tag_name.as_str()) {
                return;
            }
            let children = data.template_contents.unwrap_or(id);
            for &child in tree.children(children) {
                serialize_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
    }
}
