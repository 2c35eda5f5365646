use crate::error::ParseErrorCode;
use crate::sink::TreeSink;
use crate::token::Token;
use crate::tree_builder::tag_sets::HEAD_CONTENT;
use crate::tree_builder::{InsertionMode, ProcessResult, TreeConstructor};

impl<S: TreeSink> TreeConstructor<S> {
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(crate) fn in_template(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.in_body(token)
            }
            Token::StartTag { name, .. } if HEAD_CONTENT.contains(&name.as_str()) => {
                self.in_head(token)
            }
            Token::EndTag { name } if name == "template" => self.in_head(token),
            Token::StartTag { name, .. } => {
                // "Pop the current template insertion mode off the stack of
                // template insertion modes. Push X onto the stack of template
                // insertion modes so that it is the new current template
                // insertion mode. Switch the insertion mode to X, and
                // reprocess the token."
                let mode = match name.as_str() {
                    "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => InsertionMode::InTable,
                    "col" => InsertionMode::InColumnGroup,
                    "tr" => InsertionMode::InTableBody,
                    "td" | "th" => InsertionMode::InRow,
                    _ => InsertionMode::InBody,
                };
                let _ = self.state.template_insertion_modes.pop();
                self.state.template_insertion_modes.push(mode);
                ProcessResult::Reprocess(mode)
            }
            Token::EndTag { .. } => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                ProcessResult::Consumed
            }
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                // elements, then stop parsing. (fragment case)"
                if !self.template_on_stack() {
                    return self.stop_parsing();
                }
                self.parse_error(ParseErrorCode::EofInTemplate, token);
                let _ = self.open_elements.pop_until_tag_name_popped("template");
                self.active_formatting.clear_to_last_marker();
                let _ = self.state.template_insertion_modes.pop();
                self.reset_insertion_mode();
                ProcessResult::Reprocess(self.state.insertion_mode)
            }
        }
    }
}
