use arbor_dom::{Namespace, QuirksMode};

use crate::error::ParseErrorCode;
use crate::foreign_content::{adjust_mathml_attributes, adjust_svg_attributes};
use crate::sink::TreeSink;
use crate::token::{Attribute, CharClass, Token};
use crate::tree_builder::open_elements::Scope;
use crate::tree_builder::tag_sets::{
    ALLOWED_OPEN_AT_END, BLOCK_END, CLOSES_P, FORMATTING, HEAD_CONTENT, HEADINGS, is_special,
};
use crate::tree_builder::{InsertionMode, ProcessResult, TokenizerState, TreeConstructor, run_class};

impl<S: TreeSink> TreeConstructor<S> {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(crate) fn in_body(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } => {
                self.in_body_characters(data, token);
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
                name,
                self_closing,
                attributes,
            } => self.in_body_start_tag(token, name, *self_closing, attributes),
            Token::EndTag { name } => self.in_body_end_tag(token, name),
            Token::EndOfFile => self.in_body_eof(token),
        }
    }

    pub(crate) fn in_body_characters(&mut self, data: &str, token: &Token) {
        match run_class(data) {
            CharClass::Null => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter, token);
            }
            CharClass::Whitespace => {
                self.reconstruct_active_formatting_elements();
                self.insert_characters(data);
            }
            CharClass::Other => {
                self.reconstruct_active_formatting_elements();
                self.insert_characters(data);
                self.state.frameset_ok = false;
            }
        }
    }

    fn in_body_eof(&mut self, token: &Token) -> ProcessResult {
        // "If the stack of template insertion modes is not empty, then
        // process the token using the rules for the "in template" insertion
        // mode."
        if !self.state.template_insertion_modes.is_empty() {
            return self.in_template(token);
        }
        if self
            .open_elements
            .iter()
            .any(|entry| !entry.is_one_of(ALLOWED_OPEN_AT_END))
        {
            self.parse_error(ParseErrorCode::EofWithUnclosedElements, token);
        }
        self.stop_parsing()
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        self_closing: bool,
        attributes: &[Attribute],
    ) -> ProcessResult {
        match name {
            "html" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                if !self.template_on_stack()
                    && let Some(html) = self.open_elements.html_element().map(|e| e.handle)
                {
                    self.merge_attributes(html, attributes);
                }
            }
            _ if HEAD_CONTENT.contains(&name) => return self.in_head(token),
            "body" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                let body = self
                    .open_elements
                    .get(1)
                    .filter(|entry| entry.is("body"))
                    .map(|entry| entry.handle);
                if let Some(body) = body
                    && !self.template_on_stack()
                {
                    self.state.frameset_ok = false;
                    self.merge_attributes(body, attributes);
                }
            }
            "frameset" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                let body = self
                    .open_elements
                    .get(1)
                    .filter(|entry| entry.is("body"))
                    .map(|entry| entry.handle);
                if let Some(body) = body
                    && self.state.frameset_ok
                {
                    // "Remove the second element on the stack of open
                    // elements from its parent node, if it has one. Pop all
                    // the nodes from the bottom of the stack of open
                    // elements, from the current node up to, but not
                    // including, the root html element."
                    self.sink.detach(body);
                    self.open_elements.truncate(1);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InFrameset);
                }
            }
            _ if CLOSES_P.contains(&name) => {
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes);
            }
            _ if HEADINGS.contains(&name) => {
                self.close_p_in_button_scope(token);
                if self.open_elements.current_is_one_of(HEADINGS) {
                    self.parse_error(ParseErrorCode::NestedHeading, token);
                    let _ = self.open_elements.pop();
                }
                let _ = self.insert_html_element(name, attributes);
            }
            "pre" | "listing" => {
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes);
                self.state.skip_next_newline = true;
                self.state.frameset_ok = false;
            }
            "form" => {
                let template = self.template_on_stack();
                if self.state.form_element.is_some() && !template {
                    self.parse_error(ParseErrorCode::NestedForm, token);
                    return ProcessResult::Consumed;
                }
                self.close_p_in_button_scope(token);
                let form = self.insert_html_element(name, attributes);
                if !template {
                    self.state.form_element = Some(form);
                }
            }
            "li" => {
                self.state.frameset_ok = false;
                self.close_list_item(&["li"], token);
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes);
            }
            "dd" | "dt" => {
                self.state.frameset_ok = false;
                self.close_list_item(&["dd", "dt"], token);
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes);
            }
            "plaintext" => {
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes);
                self.request_tokenizer_state(TokenizerState::Plaintext);
            }
            "button" => {
                if self.open_elements.has_in_scope("button", Scope::Default) {
                    self.parse_error(ParseErrorCode::NestedButton, token);
                    self.open_elements.generate_implied_end_tags(None);
                    let _ = self.open_elements.pop_until_tag_name_popped("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.state.frameset_ok = false;
            }
            "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on
                // the list (or the start of the list if there is no marker on
                // the list), then this is a parse error; run the adoption
                // agency algorithm for the token, then remove that element
                // from the list of active formatting elements and the stack
                // of open elements if the adoption agency algorithm didn't
                // already remove it"
                if let Some(index) = self.active_formatting.last_element_after_marker("a") {
                    self.parse_error(ParseErrorCode::NestedAnchor, token);
                    let previous = self.active_formatting.get(index).and_then(|e| e.handle());
                    self.adoption_agency("a", token);
                    if let Some(previous) = previous {
                        self.active_formatting.remove_handle(previous);
                        let _ = self.open_elements.remove_node(previous);
                    }
                }
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(name, attributes);
            }
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.open_elements.has_in_scope("nobr", Scope::Default) {
                    self.parse_error(ParseErrorCode::NestedNobr, token);
                    self.adoption_agency("nobr", token);
                    self.reconstruct_active_formatting_elements();
                }
                self.insert_formatting_element(name, attributes);
            }
            _ if FORMATTING.contains(&name) => {
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(name, attributes);
            }
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.active_formatting.insert_marker();
                self.state.frameset_ok = false;
            }
            "table" => {
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_in_button_scope(token);
                }
                let _ = self.insert_html_element(name, attributes);
                self.state.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
            }
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(name, attributes);
                self.state.frameset_ok = false;
            }
            "input" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(name, attributes);
                if !is_hidden_input(token) {
                    self.state.frameset_ok = false;
                }
            }
            "param" | "source" | "track" => self.insert_void_element(name, attributes),
            "hr" => {
                self.close_p_in_button_scope(token);
                self.insert_void_element(name, attributes);
                self.state.frameset_ok = false;
            }
            // "Parse error. Change the token's tag name to "img" and
            // reprocess it. (Don't ask.)"
            "image" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing,
                    attributes: attributes.to_vec(),
                };
                return self.in_body(&img);
            }
            "textarea" => {
                let _ = self.insert_html_element(name, attributes);
                self.state.skip_next_newline = true;
                self.request_tokenizer_state(TokenizerState::Rcdata);
                self.state.original_insertion_mode = Some(self.state.insertion_mode);
                self.state.frameset_ok = false;
                self.switch_to(InsertionMode::Text);
            }
            "xmp" => {
                self.close_p_in_button_scope(token);
                self.reconstruct_active_formatting_elements();
                self.state.frameset_ok = false;
                return self.parse_text_element(name, attributes, TokenizerState::Rawtext);
            }
            "iframe" => {
                self.state.frameset_ok = false;
                return self.parse_text_element(name, attributes, TokenizerState::Rawtext);
            }
            "noembed" => return self.parse_text_element(name, attributes, TokenizerState::Rawtext),
            "noscript" if self.options.scripting_enabled => {
                return self.parse_text_element(name, attributes, TokenizerState::Rawtext);
            }
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.state.frameset_ok = false;
                let in_table = matches!(
                    self.state.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                );
                self.switch_to(if in_table {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                });
            }
            "optgroup" | "option" => {
                if self.open_elements.current_is("option") {
                    let _ = self.open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
            }
            "rb" | "rtc" => {
                if self.open_elements.has_in_scope("ruby", Scope::Default) {
                    self.open_elements.generate_implied_end_tags(None);
                    if !self.open_elements.current_is("ruby") {
                        self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    }
                }
                let _ = self.insert_html_element(name, attributes);
            }
            "rp" | "rt" => {
                if self.open_elements.has_in_scope("ruby", Scope::Default) {
                    self.open_elements.generate_implied_end_tags(Some("rtc"));
                    if !self.open_elements.current_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    }
                }
                let _ = self.insert_html_element(name, attributes);
            }
            "math" | "svg" => {
                self.reconstruct_active_formatting_elements();
                let mut attributes = attributes.to_vec();
                let namespace = if name == "math" {
                    adjust_mathml_attributes(&mut attributes);
                    Namespace::MathMl
                } else {
                    adjust_svg_attributes(&mut attributes);
                    Namespace::Svg
                };
                let _ = self.insert_element(name, namespace, &attributes);
                if self_closing {
                    let _ = self.open_elements.pop();
                    self.acknowledge_self_closing();
                }
            }
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
            }
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
            }
        }
        ProcessResult::Consumed
    }

    /// The shared loop of the `li`, `dd` and `dt` start tag rules: close an
    /// open list item unless a special element other than `address`, `div`
    /// or `p` intervenes.
    fn close_list_item(&mut self, names: &[&str], token: &Token) {
        for index in (0..self.open_elements.len()).rev() {
            let Some(node) = self.open_elements.get(index) else {
                break;
            };
            if node.is_one_of(names) {
                let name = node.name.clone();
                self.open_elements.generate_implied_end_tags(Some(&name));
                if !self.open_elements.current_is(&name) {
                    self.parse_error(ParseErrorCode::MisnestedEndTag, token);
                }
                let _ = self.open_elements.pop_until_tag_name_popped(&name);
                return;
            }
            if is_special(node.namespace, &node.name) && !node.is_one_of(&["address", "div", "p"]) {
                return;
            }
        }
    }

    fn in_body_end_tag(&mut self, token: &Token, name: &str) -> ProcessResult {
        match name {
            "template" => return self.in_head(token),
            "body" | "html" => {
                if !self.open_elements.has_in_scope("body", Scope::Default) {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    return ProcessResult::Consumed;
                }
                if self
                    .open_elements
                    .iter()
                    .any(|entry| !entry.is_one_of(ALLOWED_OPEN_AT_END))
                {
                    self.parse_error(ParseErrorCode::EofWithUnclosedElements, token);
                }
                if name == "html" {
                    return ProcessResult::Reprocess(InsertionMode::AfterBody);
                }
                self.switch_to(InsertionMode::AfterBody);
            }
            _ if BLOCK_END.contains(&name) => {
                if self.open_elements.has_in_scope(name, Scope::Default) {
                    self.close_element(name, token);
                } else {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                }
            }
            "form" => self.close_form(token),
            "p" => {
                // "If the stack of open elements does not have a p element
                // in button scope, then this is a parse error; insert an HTML
                // element for a "p" start tag token with no attributes."
                if !self.open_elements.has_in_scope("p", Scope::Button) {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    let _ = self.insert_html_element("p", &[]);
                }
                self.close_p_element(token);
            }
            "li" => {
                if self.open_elements.has_in_scope("li", Scope::ListItem) {
                    self.close_implied_except(name, token);
                } else {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                }
            }
            "dd" | "dt" => {
                if self.open_elements.has_in_scope(name, Scope::Default) {
                    self.close_implied_except(name, token);
                } else {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                }
            }
            _ if HEADINGS.contains(&name) => {
                if !self.open_elements.has_any_in_scope(HEADINGS, Scope::Default) {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                    return ProcessResult::Consumed;
                }
                self.open_elements.generate_implied_end_tags(None);
                if !self.open_elements.current_is(name) {
                    self.parse_error(ParseErrorCode::MisnestedEndTag, token);
                }
                let _ = self.open_elements.pop_until_popped(HEADINGS);
            }
            _ if FORMATTING.contains(&name) => self.adoption_agency(name, token),
            "applet" | "marquee" | "object" => {
                if self.open_elements.has_in_scope(name, Scope::Default) {
                    self.close_element(name, token);
                    self.active_formatting.clear_to_last_marker();
                } else {
                    self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                }
            }
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br"
            // start tag token with no attributes, rather than the end tag
            // token that it actually is."
            "br" => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                self.reconstruct_active_formatting_elements();
                self.insert_void_element("br", &[]);
                self.state.frameset_ok = false;
            }
            _ => self.any_other_end_tag(name, token),
        }
        ProcessResult::Consumed
    }

    /// Generate implied end tags except for `name`, then pop until `name`.
    fn close_implied_except(&mut self, name: &str, token: &Token) {
        self.open_elements.generate_implied_end_tags(Some(name));
        if !self.open_elements.current_is(name) {
            self.parse_error(ParseErrorCode::MisnestedEndTag, token);
        }
        let _ = self.open_elements.pop_until_tag_name_popped(name);
    }

    fn close_form(&mut self, token: &Token) {
        if self.template_on_stack() {
            if self.open_elements.has_in_scope("form", Scope::Default) {
                self.close_element("form", token);
            } else {
                self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
            }
            return;
        }

        // "Let node be the element that the form element pointer is set to,
        // or null if it is not set to an element. Set the form element
        // pointer to null."
        let node = self.state.form_element.take();
        let Some(node) = node.filter(|&node| self.open_elements.has_node_in_scope(node, Scope::Default))
        else {
            self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
            return;
        };
        self.open_elements.generate_implied_end_tags(None);
        if self.open_elements.current().map(|entry| entry.handle) != Some(node) {
            self.parse_error(ParseErrorCode::MisnestedEndTag, token);
        }
        let _ = self.open_elements.remove_node(node);
    }

    /// "Any other end tag" in body: walk up the stack looking for a matching
    /// HTML element, giving up at the first special element.
    pub(crate) fn any_other_end_tag(&mut self, name: &str, token: &Token) {
        for index in (0..self.open_elements.len()).rev() {
            let Some(node) = self.open_elements.get(index) else {
                return;
            };
            if node.is(name) {
                let handle = node.handle;
                self.open_elements.generate_implied_end_tags(Some(name));
                if self.open_elements.current().map(|entry| entry.handle) != Some(handle) {
                    self.parse_error(ParseErrorCode::MisnestedEndTag, token);
                }
                let _ = self.open_elements.pop_until_node_popped(handle);
                return;
            }
            if is_special(node.namespace, &node.name) {
                self.parse_error(ParseErrorCode::EndTagWithoutMatchingOpenElement, token);
                return;
            }
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    ///
    /// Character data is buffered and inserted as a single text node when
    /// the element closes.
    pub(crate) fn text(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } => {
                self.state.pending_text.push_str(data);
                ProcessResult::Consumed
            }
            Token::EndOfFile => {
                self.parse_error(ParseErrorCode::EofInText, token);
                self.flush_pending_text();
                let _ = self.open_elements.pop();
                ProcessResult::Reprocess(self.take_original_insertion_mode())
            }
            Token::EndTag { .. } => {
                self.flush_pending_text();
                let _ = self.open_elements.pop();
                let mode = self.take_original_insertion_mode();
                self.switch_to(mode);
                ProcessResult::Consumed
            }
            _ => ProcessResult::Consumed,
        }
    }

    pub(crate) fn take_original_insertion_mode(&mut self) -> InsertionMode {
        self.state
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody)
    }
}

/// "If the token does not have an attribute with the name "type", or if it
/// does, but that attribute's value is not an ASCII case-insensitive match
/// for the string "hidden""
pub(crate) fn is_hidden_input(token: &Token) -> bool {
    token
        .attribute("type")
        .is_some_and(|value| value.eq_ignore_ascii_case("hidden"))
}
