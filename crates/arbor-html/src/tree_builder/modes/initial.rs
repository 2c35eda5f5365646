use arbor_dom::{Namespace, QuirksMode};

use super::{is_start_tag, is_whitespace};
use crate::error::ParseErrorCode;
use crate::sink::TreeSink;
use crate::token::{Attribute, Token};
use crate::tree_builder::open_elements::OpenElement;
use crate::tree_builder::quirks::{is_conforming_doctype, quirks_mode_for_doctype};
use crate::tree_builder::{InsertionMode, ProcessResult, TreeConstructor};

impl<S: TreeSink> TreeConstructor<S> {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(crate) fn initial(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "Ignore the token."
            _ if is_whitespace(token) => ProcessResult::Consumed,
            Token::Comment { data } => {
                self.insert_comment_in_document(data);
                ProcessResult::Consumed
            }
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let name = name.as_deref();
                let public_id = public_identifier.as_deref();
                let system_id = system_identifier.as_deref();
                if !is_conforming_doctype(name, public_id, system_id) {
                    self.parse_error(ParseErrorCode::NonConformingDoctype, token);
                }

                // "Append a DocumentType node to the Document node, with its
                // name set to the name given in the DOCTYPE token, or the
                // empty string if the name was missing"
                self.sink.append_doctype(
                    name.unwrap_or_default(),
                    public_id.unwrap_or_default(),
                    system_id.unwrap_or_default(),
                );

                if !self.options.iframe_srcdoc {
                    let mode = quirks_mode_for_doctype(name, public_id, system_id, *force_quirks);
                    if mode != QuirksMode::NoQuirks {
                        self.set_quirks_mode(mode);
                    }
                }

                self.switch_to(InsertionMode::BeforeHtml);
                ProcessResult::Consumed
            }
            // "If the document is not an iframe srcdoc document, then this is
            // a parse error; if the parser cannot change the mode flag is
            // false, set the Document to quirks mode."
            _ => {
                if !self.options.iframe_srcdoc {
                    self.parse_error(ParseErrorCode::MissingDoctype, token);
                    self.set_quirks_mode(QuirksMode::Quirks);
                }
                ProcessResult::Reprocess(InsertionMode::BeforeHtml)
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(crate) fn before_html(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Doctype { .. } => {
                self.parse_error(ParseErrorCode::MisplacedDoctype, token);
                ProcessResult::Consumed
            }
            Token::Comment { data } => {
                self.insert_comment_in_document(data);
                ProcessResult::Consumed
            }
            _ if is_whitespace(token) => ProcessResult::Consumed,
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                self.create_html_element(attributes);
                self.switch_to(InsertionMode::BeforeHead);
                ProcessResult::Consumed
            }
            Token::EndTag { name } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            // "Create an html element whose node document is the Document
            // object. Append it to the Document object. Put this element in
            // the stack of open elements."
            _ => {
                self.create_html_element(&[]);
                ProcessResult::Reprocess(InsertionMode::BeforeHead)
            }
        }
    }

    fn create_html_element(&mut self, attributes: &[Attribute]) {
        let document = self.sink.document();
        let html = self.sink.create_element("html", Namespace::Html, attributes);
        self.sink.append_child(document, html);
        self.open_elements.push(OpenElement::html(html, "html"));
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(crate) fn before_head(&mut self, token: &Token) -> ProcessResult {
        match token {
            _ if is_whitespace(token) => ProcessResult::Consumed,
            Token::Comment { data } => {
                self.insert_comment(data);
                ProcessResult::Consumed
            }
            Token::Doctype { .. } => {
                self.parse_error(ParseErrorCode::MisplacedDoctype, token);
                ProcessResult::Consumed
            }
            _ if is_start_tag(token, "html") => self.in_body(token),
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head = self.insert_html_element("head", attributes);
                self.state.head_element = Some(head);
                self.switch_to(InsertionMode::InHead);
                ProcessResult::Consumed
            }
            Token::EndTag { name } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            _ => {
                let head = self.insert_html_element("head", &[]);
                self.state.head_element = Some(head);
                ProcessResult::Reprocess(InsertionMode::InHead)
            }
        }
    }
}
