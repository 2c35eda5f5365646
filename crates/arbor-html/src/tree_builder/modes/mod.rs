//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One handler per insertion mode. Handlers return
//! [`ProcessResult::Reprocess`] instead of recursing when the standard says
//! "switch the insertion mode to X and reprocess the token"; they call each
//! other directly for "process the token using the rules for X".

mod after;
mod body;
mod foreign;
mod head;
mod initial;
mod select;
mod table;
mod template;

use super::{InsertionMode, ProcessResult, TreeConstructor, run_class};
use crate::error::ParseErrorCode;
use crate::sink::TreeSink;
use crate::token::{CharClass, Token};

impl<S: TreeSink> TreeConstructor<S> {
    /// Run the rules of `mode` on `token`.
    pub(crate) fn step(&mut self, mode: InsertionMode, token: &Token) -> ProcessResult {
        match mode {
            InsertionMode::Initial => self.initial(token),
            InsertionMode::BeforeHtml => self.before_html(token),
            InsertionMode::BeforeHead => self.before_head(token),
            InsertionMode::InHead => self.in_head(token),
            InsertionMode::InHeadNoscript => self.in_head_noscript(token),
            InsertionMode::AfterHead => self.after_head(token),
            InsertionMode::InBody => self.in_body(token),
            InsertionMode::Text => self.text(token),
            InsertionMode::InTable => self.in_table(token),
            InsertionMode::InTableText => self.in_table_text(token),
            InsertionMode::InCaption => self.in_caption(token),
            InsertionMode::InColumnGroup => self.in_column_group(token),
            InsertionMode::InTableBody => self.in_table_body(token),
            InsertionMode::InRow => self.in_row(token),
            InsertionMode::InCell => self.in_cell(token),
            InsertionMode::InSelect => self.in_select(token),
            InsertionMode::InSelectInTable => self.in_select_in_table(token),
            InsertionMode::InTemplate => self.in_template(token),
            InsertionMode::AfterBody => self.after_body(token),
            InsertionMode::InFrameset => self.in_frameset(token),
            InsertionMode::AfterFrameset => self.after_frameset(token),
            InsertionMode::AfterAfterBody => self.after_after_body(token),
            InsertionMode::AfterAfterFrameset => self.after_after_frameset(token),
        }
    }

    /// True if the stack holds an HTML `<template>`.
    pub(crate) fn template_on_stack(&self) -> bool {
        self.open_elements.contains_tag("template")
    }
}

/// "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
/// LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or
/// U+0020 SPACE"
fn is_whitespace(token: &Token) -> bool {
    matches!(token, Token::Character { data } if run_class(data) == CharClass::Whitespace)
}

/// True for a start tag named `name`.
fn is_start_tag(token: &Token, name: &str) -> bool {
    matches!(token, Token::StartTag { name: tag, .. } if tag == name)
}

/// The generic parse error for a token a mode has no rule for.
fn unexpected(token: &Token) -> ParseErrorCode {
    match token {
        Token::StartTag { .. } => ParseErrorCode::UnexpectedStartTag,
        Token::EndTag { .. } => ParseErrorCode::UnexpectedEndTag,
        Token::Doctype { .. } => ParseErrorCode::MisplacedDoctype,
        _ => ParseErrorCode::UnexpectedCharacter,
    }
}
