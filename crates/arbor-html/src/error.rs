//! Parse errors and fatal tree builder errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not." Parse errors are recorded and
//! parsing continues with the recovery the insertion mode rules prescribe.
//! [`TreeBuilderError`] is reserved for misuse of the tree builder itself.

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

use crate::tree_builder::InsertionMode;

/// Tree construction parse error codes.
///
/// The standard names tokenizer errors but leaves most tree construction
/// errors unnamed; these codes follow the html5lib naming style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ParseErrorCode {
    /// DOCTYPE whose name, public or system identifier is not conforming.
    NonConformingDoctype,
    /// First token was not a DOCTYPE.
    MissingDoctype,
    /// DOCTYPE token after the initial insertion mode.
    MisplacedDoctype,
    /// Start tag that the current insertion mode does not allow.
    UnexpectedStartTag,
    /// End tag that the current insertion mode does not allow.
    UnexpectedEndTag,
    /// End tag with no matching element in scope.
    EndTagWithoutMatchingOpenElement,
    /// An element was closed while other elements were still open inside it.
    MisnestedEndTag,
    /// Non-whitespace text where only whitespace is allowed.
    UnexpectedCharacter,
    /// U+0000 NULL in text.
    UnexpectedNullCharacter,
    /// Text that will be moved in front of a table.
    FosterParentedCharacters,
    /// Element content that will be moved in front of a table.
    FosterParentedElement,
    /// Formatting end tag whose element is not on the stack of open elements.
    FormattingElementNotOpen,
    /// Formatting end tag whose element is open but not in scope.
    FormattingElementNotInScope,
    /// `<a>` start tag while another `<a>` is active.
    NestedAnchor,
    /// `<nobr>` start tag while another `<nobr>` is in scope.
    NestedNobr,
    /// `<button>` start tag while another `<button>` is in scope.
    NestedButton,
    /// Heading start tag directly inside another heading.
    NestedHeading,
    /// `<form>` start tag while a form is already open.
    NestedForm,
    /// Self-closing syntax on a start tag for a non-void HTML element.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// End of file while elements other than the allowed set are open.
    EofWithUnclosedElements,
    /// End of file inside RCDATA, RAWTEXT or script data.
    EofInText,
    /// End of file inside `<template>`.
    EofInTemplate,
    /// End of file inside `<noscript>` in `<head>`.
    EofInHeadNoscript,
    /// Content other than the allowed head elements inside `<noscript>` in `<head>`.
    DisallowedContentInNoscriptInHead,
    /// End of file inside `<frameset>`.
    EofInFrameset,
    /// Content after `</body>` or `</html>`.
    ContentAfterBody,
    /// Content inside a `<frameset>` document that is not allowed there.
    UnexpectedContentInFrameset,
    /// HTML start tag that breaks out of SVG or MathML content.
    UnexpectedHtmlElementInForeignContent,
    /// End tag in foreign content whose name does not match the current node.
    UnexpectedEndTagInForeignContent,
}

/// A recorded parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// What went wrong.
    pub code: ParseErrorCode,
    /// Zero-based index of the token, counted across all `process_token` calls.
    pub token_index: usize,
    /// Insertion mode the token was being processed in.
    pub mode: InsertionMode,
    /// Tag name involved, if any.
    pub tag: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at token {} ({})", self.code, self.token_index, self.mode)?;
        if let Some(tag) = &self.tag {
            write!(f, " <{tag}>")?;
        }
        Ok(())
    }
}

/// Contract violations: the tree builder was driven in a way no input
/// markup can cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeBuilderError {
    /// A token was fed after end-of-file was processed.
    #[error("token {token_index} received after parsing stopped")]
    TokenAfterStop {
        /// Index the token would have had.
        token_index: usize,
    },
    /// A token was reprocessed more often than the configured bound.
    #[error("token {token_index} reprocessed {count} times without being consumed (last mode: {mode})")]
    ReprocessLimit {
        /// The token's index.
        token_index: usize,
        /// Number of dispatches attempted.
        count: usize,
        /// Mode of the last dispatch.
        mode: InsertionMode,
    },
    /// A fragment context element with an empty name.
    #[error("invalid fragment context element `{0}`")]
    InvalidFragmentContext(String),
}
