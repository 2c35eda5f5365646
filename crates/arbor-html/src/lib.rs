//! HTML tree construction for the arbor parser.
//!
//! # Scope
//!
//! This crate implements the tree construction stage of the HTML parser
//! ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)):
//! it consumes tokens produced by an HTML tokenizer and builds a DOM tree
//! through a [`TreeSink`].
//!
//! - All 23 insertion modes, driven by a reprocess loop
//! - Stack of open elements with the five scope queries
//! - List of active formatting elements: markers, the Noah's Ark clause and
//!   reconstruction
//! - Adoption agency algorithm for mis-nested formatting end tags
//! - Foster parenting for content misplaced inside tables
//! - `<template>` contents and the stack of template insertion modes
//! - SVG and MathML foreign content, including integration points
//! - Quirks mode selection from the DOCTYPE
//! - Fragment parsing with a context element
//!
//! # Not Implemented
//!
//! - Tokenization. The caller feeds [`Token`]s and switches its tokenizer
//!   when [`TreeConstructor::process_token`] returns a [`TokenizerState`].
//! - Script execution and `document.write`
//! - Form-owner association of form controls
//!
//! # Example
//!
//! ```
//! use arbor_html::{Token, dump_tree, parse_document};
//!
//! let tokens = vec![
//!     Token::start_tag("p"),
//!     Token::text("Hi"),
//!     Token::EndOfFile,
//! ];
//! let (dom, _errors) = parse_document(tokens).unwrap();
//! assert!(dump_tree(&dom).contains("<body>"));
//! ```

mod dump;
mod error;
/// SVG and MathML name adjustments.
pub mod foreign_content;
mod options;
mod sink;
mod token;
/// The tree construction state machine.
pub mod tree_builder;

use arbor_dom::{DomTree, NodeId};

pub use dump::{dump_children, dump_tree};
pub use error::{ParseError, ParseErrorCode, TreeBuilderError};
pub use options::TreeBuilderOptions;
pub use sink::TreeSink;
pub use token::{Attribute, Token};
pub use tree_builder::formatting::{ActiveFormattingElements, FormattingEntry, FormattingTag};
pub use tree_builder::open_elements::{OpenElement, OpenElementsStack, Scope};
pub use tree_builder::{FragmentContext, InsertionMode, ParserState, TokenizerState, TreeConstructor};

/// Build a document from a complete token stream with default options.
///
/// Tokenizer state requests are ignored, so the stream must already be
/// tokenized with the right states. End-of-file is processed if the stream
/// does not end with it.
///
/// # Errors
///
/// Returns a [`TreeBuilderError`] if the token stream cannot be processed.
pub fn parse_document<I>(tokens: I) -> Result<(DomTree, Vec<ParseError>), TreeBuilderError>
where
    I: IntoIterator<Item = Token>,
{
    parse_document_with_options(tokens, TreeBuilderOptions::default())
}

/// [`parse_document`] with explicit options.
///
/// # Errors
///
/// Returns a [`TreeBuilderError`] if the token stream cannot be processed.
pub fn parse_document_with_options<I>(
    tokens: I,
    options: TreeBuilderOptions,
) -> Result<(DomTree, Vec<ParseError>), TreeBuilderError>
where
    I: IntoIterator<Item = Token>,
{
    let mut builder = TreeConstructor::with_options(DomTree::new(), options);
    for token in tokens {
        if builder.is_stopped() {
            break;
        }
        let _ = builder.process_token(token)?;
    }
    builder.finish()
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Parse tokens in the context of `context`. Returns the tree, the element
/// whose children are the fragment's nodes, and the parse errors.
///
/// # Errors
///
/// Returns a [`TreeBuilderError`] for an invalid context or a token stream
/// that cannot be processed.
pub fn parse_fragment<I>(
    tokens: I,
    context: FragmentContext,
    options: TreeBuilderOptions,
) -> Result<(DomTree, NodeId, Vec<ParseError>), TreeBuilderError>
where
    I: IntoIterator<Item = Token>,
{
    let mut builder = TreeConstructor::new_fragment(DomTree::new(), context, options)?;
    let root = builder
        .fragment_root()
        .ok_or_else(|| TreeBuilderError::InvalidFragmentContext(String::new()))?;
    for token in tokens {
        if builder.is_stopped() {
            break;
        }
        let _ = builder.process_token(token)?;
    }
    let (dom, errors) = builder.finish()?;
    Ok((dom, root, errors))
}
