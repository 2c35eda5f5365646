//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

use arbor_dom::Namespace;

use crate::error::ParseErrorCode;
use crate::foreign_content::{adjust_mathml_attributes, adjust_svg_attributes, adjusted_svg_tag_name};
use crate::sink::TreeSink;
use crate::token::{CharClass, Token};
use crate::tree_builder::tag_sets::{FOREIGN_BREAKOUT, is_mathml_text_integration_point};
use crate::tree_builder::{ProcessResult, TreeConstructor, run_class};

impl<S: TreeSink> TreeConstructor<S> {
    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// True when the token must be handled by the foreign content rules
    /// rather than the current insertion mode.
    pub(crate) fn is_foreign(&self, token: &Token) -> bool {
        let Some(node) = self.adjusted_current_node() else {
            return false;
        };
        if node.namespace == Namespace::Html || token.is_eof() {
            return false;
        }

        let html_start_tag = match token {
            Token::StartTag { name, .. } => Some(name.as_str()),
            _ => None,
        };
        let is_characters = matches!(token, Token::Character { .. });

        // "If the adjusted current node is a MathML text integration point
        // and the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark"", or a character token.
        if is_mathml_text_integration_point(node.namespace, &node.name)
            && (is_characters
                || html_start_tag.is_some_and(|name| !matches!(name, "mglyph" | "malignmark")))
        {
            return false;
        }

        // "If the adjusted current node is a MathML annotation-xml element
        // and the token is a start tag whose tag name is "svg""
        if node.namespace == Namespace::MathMl
            && node.name == "annotation-xml"
            && html_start_tag == Some("svg")
        {
            return false;
        }

        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag", or a character token.
        if node.is_html_integration_point() && (is_characters || html_start_tag.is_some()) {
            return false;
        }

        true
    }

    /// Process a token using the rules for foreign content.
    pub(crate) fn step_foreign(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } => match run_class(data) {
                // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER
                // character."
                CharClass::Null => {
                    self.parse_error(ParseErrorCode::UnexpectedNullCharacter, token);
                    let replacement = "\u{FFFD}".repeat(data.chars().count());
                    self.insert_characters(&replacement);
                }
                CharClass::Whitespace => self.insert_characters(data),
                CharClass::Other => {
                    self.insert_characters(data);
                    self.state.frameset_ok = false;
                }
            },
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MisplacedDoctype, token),
            Token::StartTag { name, .. } if breaks_out(token, name) => return self.break_out(token),
            Token::EndTag { name } if matches!(name.as_str(), "br" | "p") => {
                return self.break_out(token);
            }
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                let namespace = self
                    .adjusted_current_node()
                    .map_or(Namespace::Html, |node| node.namespace);
                let mut attributes = attributes.clone();
                let name = match namespace {
                    Namespace::MathMl => {
                        adjust_mathml_attributes(&mut attributes);
                        name.as_str()
                    }
                    Namespace::Svg => {
                        adjust_svg_attributes(&mut attributes);
                        adjusted_svg_tag_name(name).unwrap_or(name.as_str())
                    }
                    Namespace::Html => name.as_str(),
                };
                let _ = self.insert_element(name, namespace, &attributes);
                // "If the token has its self-closing flag set, pop the current
                // node off the stack of open elements and acknowledge the
                // token's self-closing flag."
                if *self_closing {
                    let _ = self.open_elements.pop();
                    self.acknowledge_self_closing();
                }
            }
            Token::EndTag { name } => return self.foreign_end_tag(name, token),
            Token::EndOfFile => {}
        }
        ProcessResult::Consumed
    }

    /// "Parse error. While the current node is not a MathML text integration
    /// point, an HTML integration point, or an element in the HTML namespace,
    /// pop elements from the stack of open elements. Reprocess the token
    /// according to the rules given in the section corresponding to the
    /// current insertion mode in HTML content."
    fn break_out(&mut self, token: &Token) -> ProcessResult {
        self.parse_error(ParseErrorCode::UnexpectedHtmlElementInForeignContent, token);
        while let Some(current) = self.open_elements.current() {
            if current.namespace == Namespace::Html
                || current.is_html_integration_point()
                || is_mathml_text_integration_point(current.namespace, &current.name)
            {
                break;
            }
            let _ = self.open_elements.pop();
        }
        self.step(self.state.insertion_mode, token)
    }

    /// "Any other end tag"
    fn foreign_end_tag(&mut self, name: &str, token: &Token) -> ProcessResult {
        let Some(mut index) = self.open_elements.len().checked_sub(1) else {
            return ProcessResult::Consumed;
        };
        // "If node's tag name, converted to ASCII lowercase, is not the same
        // as the tag name of the token, then this is a parse error."
        if self
            .open_elements
            .get(index)
            .is_some_and(|node| node.name.to_ascii_lowercase() != name)
        {
            self.parse_error(ParseErrorCode::UnexpectedEndTagInForeignContent, token);
        }

        loop {
            // "If node is the topmost element in the stack of open elements,
            // then return. (fragment case)"
            if index == 0 {
                return ProcessResult::Consumed;
            }
            let Some(node) = self.open_elements.get(index) else {
                return ProcessResult::Consumed;
            };
            if node.name.to_ascii_lowercase() == name {
                let handle = node.handle;
                let _ = self.open_elements.pop_until_node_popped(handle);
                return ProcessResult::Consumed;
            }
            index -= 1;
            // "If node is not an element in the HTML namespace, return to the
            // step labeled loop. Otherwise, process the token according to
            // the rules given in the section corresponding to the current
            // insertion mode in HTML content."
            if self
                .open_elements
                .get(index)
                .is_some_and(|node| node.namespace == Namespace::Html)
            {
                return self.step(self.state.insertion_mode, token);
            }
        }
    }
}

/// "A start tag whose tag name is one of: ... A start tag whose tag name is
/// "font", if the token has any attributes named "color", "face", or
/// "size""
fn breaks_out(token: &Token, name: &str) -> bool {
    FOREIGN_BREAKOUT.contains(&name)
        || (name == "font"
            && ["color", "face", "size"]
                .iter()
                .any(|attr| token.attribute(attr).is_some()))
}
