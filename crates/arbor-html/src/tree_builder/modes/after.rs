//! The modes after `</body>` and the frameset modes.

use super::{is_start_tag, is_whitespace, unexpected};
use crate::error::ParseErrorCode;
use crate::sink::TreeSink;
use crate::token::Token;
use crate::tree_builder::{InsertionMode, ProcessResult, TreeConstructor};

impl<S: TreeSink> TreeConstructor<S> {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(crate) fn after_body(&mut self, token: &Token) -> ProcessResult {
        match token {
            _ if is_whitespace(token) => self.in_body(token),
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                self.insert_comment_in_html(data);
                ProcessResult::Consumed
            }
            Token::Doctype { .. } => {
                self.parse_error(ParseErrorCode::MisplacedDoctype, token);
                ProcessResult::Consumed
            }
            _ if is_start_tag(token, "html") => self.in_body(token),
            Token::EndTag { name } if name == "html" => {
                if self.is_fragment() {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                } else {
                    self.switch_to(InsertionMode::AfterAfterBody);
                }
                ProcessResult::Consumed
            }
            Token::EndOfFile => self.stop_parsing(),
            _ => {
                self.parse_error(ParseErrorCode::ContentAfterBody, token);
                ProcessResult::Reprocess(InsertionMode::InBody)
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(crate) fn in_frameset(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(token) => self.insert_characters(data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MisplacedDoctype, token),
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => return self.in_body(token),
                "frameset" => {
                    let _ = self.insert_html_element(name, attributes);
                }
                "frame" => self.insert_void_element(name, attributes),
                "noframes" => return self.in_head(token),
                _ => self.parse_error(ParseErrorCode::UnexpectedContentInFrameset, token),
            },
            Token::EndTag { name } if name == "frameset" => {
                // "If the current node is the root html element, then this is
                // a parse error; ignore the token. (fragment case)"
                if self.open_elements.len() <= 1 {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    return ProcessResult::Consumed;
                }
                let _ = self.open_elements.pop();
                if !self.is_fragment() && !self.open_elements.current_is("frameset") {
                    self.switch_to(InsertionMode::AfterFrameset);
                }
            }
            Token::EndOfFile => {
                if self.open_elements.len() > 1 {
                    self.parse_error(ParseErrorCode::EofInFrameset, token);
                }
                return self.stop_parsing();
            }
            _ => self.parse_error(ParseErrorCode::UnexpectedContentInFrameset, token),
        }
        ProcessResult::Consumed
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(crate) fn after_frameset(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(token) => self.insert_characters(data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MisplacedDoctype, token),
            Token::StartTag { name, .. } if name == "html" => return self.in_body(token),
            Token::EndTag { name } if name == "html" => {
                self.switch_to(InsertionMode::AfterAfterFrameset);
            }
            Token::StartTag { name, .. } if name == "noframes" => return self.in_head(token),
            Token::EndOfFile => return self.stop_parsing(),
            _ => self.parse_error(ParseErrorCode::UnexpectedContentInFrameset, token),
        }
        ProcessResult::Consumed
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(crate) fn after_after_body(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Comment { data } => {
                self.insert_comment_in_document(data);
                ProcessResult::Consumed
            }
            Token::Doctype { .. } => self.in_body(token),
            _ if is_whitespace(token) || is_start_tag(token, "html") => self.in_body(token),
            Token::EndOfFile => self.stop_parsing(),
            _ => {
                self.parse_error(ParseErrorCode::ContentAfterBody, token);
                ProcessResult::Reprocess(InsertionMode::InBody)
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(crate) fn after_after_frameset(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Comment { data } => {
                self.insert_comment_in_document(data);
                ProcessResult::Consumed
            }
            Token::Doctype { .. } => self.in_body(token),
            _ if is_whitespace(token) || is_start_tag(token, "html") => self.in_body(token),
            Token::EndOfFile => self.stop_parsing(),
            _ if is_start_tag(token, "noframes") => self.in_head(token),
            _ => {
                self.parse_error(unexpected(token), token);
                ProcessResult::Consumed
            }
        }
    }
}
