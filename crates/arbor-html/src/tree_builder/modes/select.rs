use super::unexpected;
use crate::error::ParseErrorCode;
use crate::sink::TreeSink;
use crate::token::{CharClass, Token};
use crate::tree_builder::open_elements::Scope;
use crate::tree_builder::{ProcessResult, TreeConstructor, run_class};

/// Table tags that close a select inside a table.
const SELECT_IN_TABLE_CLOSERS: &[&str] = &[
    "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
];

impl<S: TreeSink> TreeConstructor<S> {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(crate) fn in_select(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if run_class(data) == CharClass::Null => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter, token);
            }
            Token::Character { data } => self.insert_characters(data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MisplacedDoctype, token),
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => return self.in_body(token),
                "option" => {
                    self.pop_if_current("option");
                    let _ = self.insert_html_element(name, attributes);
                }
                "optgroup" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_html_element(name, attributes);
                }
                "hr" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    self.insert_void_element(name, attributes);
                }
                // "Parse error. If the stack of open elements does not have a
                // select element in select scope, ignore the token. (fragment
                // case) Otherwise: Pop elements from the stack of open
                // elements until a select element has been popped from the
                // stack. Reset the insertion mode appropriately."
                "select" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    let _ = self.close_select();
                }
                "input" | "keygen" | "textarea" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.close_select() {
                        return ProcessResult::Reprocess(self.state.insertion_mode);
                    }
                }
                "script" | "template" => return self.in_head(token),
                _ => self.parse_error(ParseErrorCode::UnexpectedStartTag, token),
            },
            Token::EndTag { name } => match name.as_str() {
                "optgroup" => {
                    // "First, if the current node is an option element, and
                    // the node immediately before it in the stack of open
                    // elements is an optgroup element, then pop the current
                    // node from the stack of open elements."
                    let len = self.open_elements.len();
                    if self.open_elements.current_is("option")
                        && len >= 2
                        && self
                            .open_elements
                            .get(len - 2)
                            .is_some_and(|entry| entry.is("optgroup"))
                    {
                        let _ = self.open_elements.pop();
                    }
                    if self.open_elements.current_is("optgroup") {
                        let _ = self.open_elements.pop();
                    } else {
                        self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    }
                }
                "option" => {
                    if self.open_elements.current_is("option") {
                        let _ = self.open_elements.pop();
                    } else {
                        self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    }
                }
                "select" => {
                    if !self.close_select() {
                        self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    }
                }
                "template" => return self.in_head(token),
                _ => self.parse_error(unexpected(token), token),
            },
            Token::EndOfFile => return self.in_body(token),
        }
        ProcessResult::Consumed
    }

    fn pop_if_current(&mut self, name: &str) {
        if self.open_elements.current_is(name) {
            let _ = self.open_elements.pop();
        }
    }

    /// Pop through the open `select` and reset the insertion mode; false if
    /// no `select` is in select scope.
    fn close_select(&mut self) -> bool {
        if !self.open_elements.has_in_scope("select", Scope::Select) {
            return false;
        }
        let _ = self.open_elements.pop_until_tag_name_popped("select");
        self.reset_insertion_mode();
        true
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(crate) fn in_select_in_table(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::StartTag { name, .. } if SELECT_IN_TABLE_CLOSERS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                let _ = self.open_elements.pop_until_tag_name_popped("select");
                self.reset_insertion_mode();
                ProcessResult::Reprocess(self.state.insertion_mode)
            }
            Token::EndTag { name } if SELECT_IN_TABLE_CLOSERS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                if !self.open_elements.has_in_scope(name, Scope::Table) {
                    return ProcessResult::Consumed;
                }
                let _ = self.open_elements.pop_until_tag_name_popped("select");
                self.reset_insertion_mode();
                ProcessResult::Reprocess(self.state.insertion_mode)
            }
            _ => self.in_select(token),
        }
    }
}
