use super::body::is_hidden_input;
use super::{is_whitespace, unexpected};
use crate::error::ParseErrorCode;
use crate::sink::TreeSink;
use crate::token::{CharClass, Token};
use crate::tree_builder::open_elements::Scope;
use crate::tree_builder::tag_sets::{
    TABLE_BODY_SCOPE_CLEAR, TABLE_CONTEXT, TABLE_ROW_SCOPE_CLEAR, TABLE_SCOPE_CLEAR,
};
use crate::tree_builder::{InsertionMode, ProcessResult, TreeConstructor, run_class};

/// Start tags that close the current cell, caption or row.
const TABLE_STRUCTURE: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// End tags ignored as parse errors inside table sections.
const TABLE_IGNORED_END: &[&str] = &[
    "body", "caption", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr",
];

impl<S: TreeSink> TreeConstructor<S> {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(crate) fn in_table(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { .. }
                if self
                    .open_elements
                    .current_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"]) =>
            {
                self.state.pending_table_characters.clear();
                self.state.original_insertion_mode = Some(self.state.insertion_mode);
                ProcessResult::Reprocess(InsertionMode::InTableText)
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
                "caption" => {
                    self.open_elements.clear_back_to(TABLE_SCOPE_CLEAR);
                    self.active_formatting.insert_marker();
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InCaption);
                    ProcessResult::Consumed
                }
                "colgroup" => {
                    self.open_elements.clear_back_to(TABLE_SCOPE_CLEAR);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InColumnGroup);
                    ProcessResult::Consumed
                }
                "col" => {
                    self.open_elements.clear_back_to(TABLE_SCOPE_CLEAR);
                    let _ = self.insert_html_element("colgroup", &[]);
                    ProcessResult::Reprocess(InsertionMode::InColumnGroup)
                }
                "tbody" | "tfoot" | "thead" => {
                    self.open_elements.clear_back_to(TABLE_SCOPE_CLEAR);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InTableBody);
                    ProcessResult::Consumed
                }
                "td" | "th" | "tr" => {
                    self.open_elements.clear_back_to(TABLE_SCOPE_CLEAR);
                    let _ = self.insert_html_element("tbody", &[]);
                    ProcessResult::Reprocess(InsertionMode::InTableBody)
                }
                // "Parse error. If the stack of open elements does not have a
                // table element in table scope, ignore the token. Otherwise:
                // Pop elements from this stack until a table element has been
                // popped from the stack. Reset the insertion mode
                // appropriately. Reprocess the token."
                "table" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    if !self.open_elements.has_in_scope("table", Scope::Table) {
                        return ProcessResult::Consumed;
                    }
                    let _ = self.open_elements.pop_until_tag_name_popped("table");
                    self.reset_insertion_mode();
                    ProcessResult::Reprocess(self.state.insertion_mode)
                }
                "style" | "script" | "template" => self.in_head(token),
                "input" if is_hidden_input(token) => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    self.insert_void_element(name, attributes);
                    ProcessResult::Consumed
                }
                "form" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    if !self.template_on_stack() && self.state.form_element.is_none() {
                        let form = self.insert_html_element(name, attributes);
                        self.state.form_element = Some(form);
                        let _ = self.open_elements.pop();
                    }
                    ProcessResult::Consumed
                }
                _ => self.foster_parent_in_body(token),
            },
            Token::EndTag { name } => match name.as_str() {
                "table" => {
                    if self.open_elements.has_in_scope("table", Scope::Table) {
                        let _ = self.open_elements.pop_until_tag_name_popped("table");
                        self.reset_insertion_mode();
                    } else {
                        self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    }
                    ProcessResult::Consumed
                }
                _ if TABLE_IGNORED_END.contains(&name.as_str()) => {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    ProcessResult::Consumed
                }
                "template" => self.in_head(token),
                _ => self.foster_parent_in_body(token),
            },
            Token::EndOfFile => self.in_body(token),
            Token::Character { .. } => self.foster_parent_in_body(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn foster_parent_in_body(&mut self, token: &Token) -> ProcessResult {
        let code = if matches!(token, Token::Character { .. }) {
            ParseErrorCode::FosterParentedCharacters
        } else {
            ParseErrorCode::FosterParentedElement
        };
        self.parse_error(code, token);
        self.state.foster_parenting = true;
        let result = self.in_body(token);
        self.state.foster_parenting = false;
        result
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(crate) fn in_table_text(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if run_class(data) == CharClass::Null => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter, token);
                ProcessResult::Consumed
            }
            Token::Character { data } => {
                self.state.pending_table_characters.push(data.clone());
                ProcessResult::Consumed
            }
            _ => {
                let pending = std::mem::take(&mut self.state.pending_table_characters);
                // "If any of the tokens in the pending table character tokens
                // list are character tokens that are not ASCII whitespace,
                // then this is a parse error: reprocess the character tokens
                // in the pending table character tokens list using the rules
                // given in the "anything else" entry in the "in table"
                // insertion mode."
                let foster = pending
                    .iter()
                    .any(|run| run_class(run) != CharClass::Whitespace);
                if foster {
                    let run = Token::text(pending.concat());
                    self.parse_error(ParseErrorCode::FosterParentedCharacters, &run);
                    self.state.foster_parenting = true;
                    for data in &pending {
                        self.in_body_characters(data, &run);
                    }
                    self.state.foster_parenting = false;
                } else {
                    for data in &pending {
                        self.insert_characters(data);
                    }
                }
                ProcessResult::Reprocess(self.take_original_insertion_mode())
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(crate) fn in_caption(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::EndTag { name } if name == "caption" => {
                if self.close_caption(token) {
                    self.switch_to(InsertionMode::InTable);
                }
                ProcessResult::Consumed
            }
            Token::StartTag { name, .. } if TABLE_STRUCTURE.contains(&name.as_str()) => {
                self.close_caption_and_reprocess(token)
            }
            Token::EndTag { name } if name == "table" => self.close_caption_and_reprocess(token),
            Token::EndTag { name }
                if TABLE_IGNORED_END.contains(&name.as_str()) =>
            {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            _ => self.in_body(token),
        }
    }

    fn close_caption_and_reprocess(&mut self, token: &Token) -> ProcessResult {
        if self.close_caption(token) {
            ProcessResult::Reprocess(InsertionMode::InTable)
        } else {
            ProcessResult::Consumed
        }
    }

    /// Close the open caption; false if none is in table scope.
    fn close_caption(&mut self, token: &Token) -> bool {
        if !self.open_elements.has_in_scope("caption", Scope::Table) {
            self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
            return false;
        }
        self.open_elements.generate_implied_end_tags(None);
        if !self.open_elements.current_is("caption") {
            self.parse_error(ParseErrorCode::MisnestedEndTag, token);
        }
        let _ = self.open_elements.pop_until_tag_name_popped("caption");
        self.active_formatting.clear_to_last_marker();
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(crate) fn in_column_group(&mut self, token: &Token) -> ProcessResult {
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
            Token::StartTag { name, .. } if name == "html" => self.in_body(token),
            Token::StartTag {
                name, attributes, ..
            } if name == "col" => {
                self.insert_void_element(name, attributes);
                ProcessResult::Consumed
            }
            Token::EndTag { name } if name == "colgroup" => {
                if self.open_elements.current_is("colgroup") {
                    let _ = self.open_elements.pop();
                    self.switch_to(InsertionMode::InTable);
                } else {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                }
                ProcessResult::Consumed
            }
            Token::EndTag { name } if name == "col" => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            Token::StartTag { name, .. } | Token::EndTag { name } if name == "template" => {
                self.in_head(token)
            }
            Token::EndOfFile => self.in_body(token),
            _ => {
                if !self.open_elements.current_is("colgroup") {
                    self.parse_error(unexpected(token), token);
                    return ProcessResult::Consumed;
                }
                let _ = self.open_elements.pop();
                ProcessResult::Reprocess(InsertionMode::InTable)
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(crate) fn in_table_body(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::StartTag {
                name, attributes, ..
            } if name == "tr" => {
                self.open_elements.clear_back_to(TABLE_BODY_SCOPE_CLEAR);
                let _ = self.insert_html_element(name, attributes);
                self.switch_to(InsertionMode::InRow);
                ProcessResult::Consumed
            }
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                self.open_elements.clear_back_to(TABLE_BODY_SCOPE_CLEAR);
                let _ = self.insert_html_element("tr", &[]);
                ProcessResult::Reprocess(InsertionMode::InRow)
            }
            Token::EndTag { name } if matches!(name.as_str(), "tbody" | "tfoot" | "thead") => {
                if self.open_elements.has_in_scope(name, Scope::Table) {
                    self.open_elements.clear_back_to(TABLE_BODY_SCOPE_CLEAR);
                    let _ = self.open_elements.pop();
                    self.switch_to(InsertionMode::InTable);
                } else {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                }
                ProcessResult::Consumed
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.close_table_body(token)
            }
            Token::EndTag { name } if name == "table" => self.close_table_body(token),
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            _ => self.in_table(token),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: Clear the stack back to a table body context. Pop the
    /// current node from the stack of open elements. Switch the insertion
    /// mode to "in table". Reprocess the token."
    fn close_table_body(&mut self, token: &Token) -> ProcessResult {
        if !self
            .open_elements
            .has_any_in_scope(&["tbody", "thead", "tfoot"], Scope::Table)
        {
            self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
            return ProcessResult::Consumed;
        }
        self.open_elements.clear_back_to(TABLE_BODY_SCOPE_CLEAR);
        let _ = self.open_elements.pop();
        ProcessResult::Reprocess(InsertionMode::InTable)
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(crate) fn in_row(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::StartTag {
                name, attributes, ..
            } if matches!(name.as_str(), "th" | "td") => {
                self.open_elements.clear_back_to(TABLE_ROW_SCOPE_CLEAR);
                let _ = self.insert_html_element(name, attributes);
                self.switch_to(InsertionMode::InCell);
                self.active_formatting.insert_marker();
                ProcessResult::Consumed
            }
            Token::EndTag { name } if name == "tr" => {
                if self.close_row(token) {
                    self.switch_to(InsertionMode::InTableBody);
                }
                ProcessResult::Consumed
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                self.close_row_and_reprocess(token)
            }
            Token::EndTag { name } if name == "table" => self.close_row_and_reprocess(token),
            Token::EndTag { name } if matches!(name.as_str(), "tbody" | "tfoot" | "thead") => {
                if !self.open_elements.has_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    return ProcessResult::Consumed;
                }
                self.close_row_and_reprocess(token)
            }
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            _ => self.in_table(token),
        }
    }

    fn close_row_and_reprocess(&mut self, token: &Token) -> ProcessResult {
        if self.close_row(token) {
            ProcessResult::Reprocess(InsertionMode::InTableBody)
        } else {
            ProcessResult::Consumed
        }
    }

    /// Pop the open row; false if no `tr` is in table scope.
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.open_elements.has_in_scope("tr", Scope::Table) {
            self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
            return false;
        }
        self.open_elements.clear_back_to(TABLE_ROW_SCOPE_CLEAR);
        let _ = self.open_elements.pop();
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(crate) fn in_cell(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::EndTag { name } if matches!(name.as_str(), "td" | "th") => {
                if !self.open_elements.has_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    return ProcessResult::Consumed;
                }
                self.close_element(name, token);
                self.active_formatting.clear_to_last_marker();
                self.switch_to(InsertionMode::InRow);
                ProcessResult::Consumed
            }
            Token::StartTag { name, .. } if TABLE_STRUCTURE.contains(&name.as_str()) => {
                if !self
                    .open_elements
                    .has_any_in_scope(&["td", "th"], Scope::Table)
                {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    return ProcessResult::Consumed;
                }
                self.close_cell(token);
                ProcessResult::Reprocess(InsertionMode::InRow)
            }
            Token::EndTag { name }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            Token::EndTag { name } if TABLE_CONTEXT.contains(&name.as_str()) => {
                if !self.open_elements.has_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    return ProcessResult::Consumed;
                }
                self.close_cell(token);
                ProcessResult::Reprocess(InsertionMode::InRow)
            }
            _ => self.in_body(token),
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "Generate implied end tags. If the current node is not now a td
    /// element or a th element, then this is a parse error. Pop elements
    /// from the stack of open elements until a td element or a th element
    /// has been popped from the stack. Clear the list of active formatting
    /// elements up to the last marker. Switch the insertion mode to "in
    /// row"."
    fn close_cell(&mut self, token: &Token) {
        self.open_elements.generate_implied_end_tags(None);
        if !self.open_elements.current_is_one_of(&["td", "th"]) {
            self.parse_error(ParseErrorCode::MisnestedEndTag, token);
        }
        let _ = self.open_elements.pop_until_popped(&["td", "th"]);
        self.active_formatting.clear_to_last_marker();
        self.switch_to(InsertionMode::InRow);
    }
}
