use super::{is_start_tag, is_whitespace};
use crate::error::ParseErrorCode;
use crate::sink::TreeSink;
use crate::token::Token;
use crate::tree_builder::open_elements::OpenElement;
use crate::tree_builder::tag_sets::HEAD_CONTENT;
use crate::tree_builder::{InsertionMode, ProcessResult, TokenizerState, TreeConstructor};

impl<S: TreeSink> TreeConstructor<S> {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(crate) fn in_head(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(token) => {
                self.insert_characters(data);
                ProcessResult::Consumed
            }
            Token::Comment { data } => {
                self.insert_comment(data);
                ProcessResult::Consumed
            }
            Token::Doctype { .. } => {
                self.parse_error(ParseErrorCode::MisplacedDoctype, token);
                ProcessResult::Consumed
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.in_body(token),
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements. Acknowledge
                // the token's self-closing flag, if it is set."
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    self.insert_void_element(name, attributes);
                    ProcessResult::Consumed
                }
                "title" => self.parse_text_element(name, attributes, TokenizerState::Rcdata),
                "noscript" if self.options.scripting_enabled => {
                    self.parse_text_element(name, attributes, TokenizerState::Rawtext)
                }
                "noframes" | "style" => {
                    self.parse_text_element(name, attributes, TokenizerState::Rawtext)
                }
                "noscript" => {
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InHeadNoscript);
                    ProcessResult::Consumed
                }
                "script" => self.parse_text_element(name, attributes, TokenizerState::ScriptData),
                "template" => {
                    let _ = self.insert_html_element(name, attributes);
                    self.active_formatting.insert_marker();
                    self.state.frameset_ok = false;
                    self.switch_to(InsertionMode::InTemplate);
                    self.state
                        .template_insertion_modes
                        .push(InsertionMode::InTemplate);
                    ProcessResult::Consumed
                }
                "head" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    ProcessResult::Consumed
                }
                _ => self.leave_head(),
            },
            Token::EndTag { name } => match name.as_str() {
                "head" => {
                    let _ = self.open_elements.pop();
                    self.switch_to(InsertionMode::AfterHead);
                    ProcessResult::Consumed
                }
                "body" | "html" | "br" => self.leave_head(),
                "template" => {
                    self.close_template(token);
                    ProcessResult::Consumed
                }
                _ => {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    ProcessResult::Consumed
                }
            },
            _ => self.leave_head(),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack
    /// of open elements. Switch the insertion mode to "after head".
    /// Reprocess the token."
    fn leave_head(&mut self) -> ProcessResult {
        let _ = self.open_elements.pop();
        ProcessResult::Reprocess(InsertionMode::AfterHead)
    }

    /// The `</template>` rules of "in head".
    fn close_template(&mut self, token: &Token) {
        if !self.template_on_stack() {
            self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
            return;
        }
        self.open_elements.generate_all_implied_end_tags_thoroughly();
        if !self.open_elements.current_is("template") {
            self.parse_error(ParseErrorCode::MisnestedEndTag, token);
        }
        let _ = self.open_elements.pop_until_tag_name_popped("template");
        self.active_formatting.clear_to_last_marker();
        let _ = self.state.template_insertion_modes.pop();
        self.reset_insertion_mode();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(crate) fn in_head_noscript(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Doctype { .. } => {
                self.parse_error(ParseErrorCode::MisplacedDoctype, token);
                ProcessResult::Consumed
            }
            _ if is_start_tag(token, "html") => self.in_body(token),
            Token::EndTag { name } if name == "noscript" => {
                let _ = self.open_elements.pop();
                self.switch_to(InsertionMode::InHead);
                ProcessResult::Consumed
            }
            Token::Comment { .. } => self.in_head(token),
            _ if is_whitespace(token) => self.in_head(token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.in_head(token)
            }
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                ProcessResult::Consumed
            }
            Token::EndTag { name } if name != "br" => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            // "Parse error. Pop the current node (which will be a noscript
            // element) from the stack of open elements; the new current node
            // will be a head element. Switch the insertion mode to "in head".
            // Reprocess the token."
            _ => {
                let code = if token.is_eof() {
                    ParseErrorCode::EofInHeadNoscript
                } else {
                    ParseErrorCode::DisallowedContentInNoscriptInHead
                };
                self.parse_error(code, token);
                let _ = self.open_elements.pop();
                ProcessResult::Reprocess(InsertionMode::InHead)
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(crate) fn after_head(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(token) => {
                self.insert_characters(data);
                ProcessResult::Consumed
            }
            Token::Comment { data } => {
                self.insert_comment(data);
                ProcessResult::Consumed
            }
            Token::Doctype { .. } => {
                self.parse_error(ParseErrorCode::MisplacedDoctype, token);
                ProcessResult::Consumed
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.in_body(token),
                "body" => {
                    let _ = self.insert_html_element(name, attributes);
                    self.state.frameset_ok = false;
                    self.switch_to(InsertionMode::InBody);
                    ProcessResult::Consumed
                }
                "frameset" => {
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InFrameset);
                    ProcessResult::Consumed
                }
                // "Push the node pointed to by the head element pointer onto
                // the stack of open elements. Process the token using the
                // rules for the "in head" insertion mode. Remove the node
                // pointed to by the head element pointer from the stack of
                // open elements."
                _ if HEAD_CONTENT.contains(&name.as_str()) => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    let Some(head) = self.state.head_element else {
                        return self.in_head(token);
                    };
                    self.open_elements.push(OpenElement::html(head, "head"));
                    let result = self.in_head(token);
                    let _ = self.open_elements.remove_node(head);
                    result
                }
                "head" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    ProcessResult::Consumed
                }
                _ => self.insert_implied_body(),
            },
            Token::EndTag { name } => match name.as_str() {
                "template" => self.in_head(token),
                "body" | "html" | "br" => self.insert_implied_body(),
                _ => {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    ProcessResult::Consumed
                }
            },
            _ => self.insert_implied_body(),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn insert_implied_body(&mut self) -> ProcessResult {
        let _ = self.insert_html_element("body", &[]);
        ProcessResult::Reprocess(InsertionMode::InBody)
    }
}
