//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! "The input to the tree construction stage is a sequence of tokens from the
//! tokenization stage. The tree construction stage is associated with a DOM
//! Document object when a parser is created. The "output" of this stage
//! consists of dynamically modifying or extending that document's DOM tree."
//!
//! [`TreeConstructor`] owns the parser state, the stack of open elements and
//! the list of active formatting elements, and writes nodes through a
//! [`TreeSink`].

mod adoption;
pub mod formatting;
mod modes;
pub mod open_elements;
pub mod quirks;
pub mod tag_sets;

use arbor_dom::{Namespace, QuirksMode};
use log::{debug, error};
use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

use self::formatting::{ActiveFormattingElements, FormattingTag};
use self::open_elements::{OpenElement, OpenElementsStack, Scope};
use self::tag_sets::TABLE_CONTEXT;
use crate::error::{ParseError, ParseErrorCode, TreeBuilderError};
use crate::foreign_content::is_html_annotation;
use crate::options::TreeBuilderOptions;
use crate::sink::TreeSink;
use crate::token::{Attribute, CharClass, Token, split_runs};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// Tokenizer state switches requested by the tree builder.
///
/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
/// "switch the tokenizer to the RCDATA state" / "RAWTEXT state", and the
/// script data and PLAINTEXT switches made by `<script>` and `<plaintext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenizerState {
    /// `<title>`, `<textarea>`
    Rcdata,
    /// `<style>`, `<xmp>`, `<iframe>`, `<noembed>`, `<noframes>`, scripting `<noscript>`
    Rawtext,
    /// `<script>`
    ScriptData,
    /// `<plaintext>`
    Plaintext,
}

/// Outcome of running one insertion mode's rules on a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessResult {
    /// The token is fully handled.
    Consumed,
    /// Switch to the mode and process the same token again.
    Reprocess(InsertionMode),
}

/// Parser-wide mutable state.
///
/// [§ 13.2.4 Parse state](https://html.spec.whatwg.org/multipage/parsing.html#parse-state)
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParserState<H> {
    /// The current insertion mode.
    pub insertion_mode: InsertionMode,
    /// "the original insertion mode": where TEXT and IN_TABLE_TEXT return to.
    pub original_insertion_mode: Option<InsertionMode>,
    /// "the stack of template insertion modes"
    pub template_insertion_modes: Vec<InsertionMode>,
    /// Redirect insertions targeting table elements to in front of the table.
    pub foster_parenting: bool,
    /// "The frameset-ok flag is set to "ok" when the parser is created."
    pub frameset_ok: bool,
    /// "The head element pointer"
    pub head_element: Option<H>,
    /// "The form element pointer"
    pub form_element: Option<H>,
    /// "the pending table character tokens list"
    pub pending_table_characters: Vec<String>,
    /// Character data buffered in the TEXT insertion mode.
    pub pending_text: String,
    /// Drop a leading U+000A from the next token (after `<pre>`, `<listing>`, `<textarea>`).
    pub skip_next_newline: bool,
    /// Set once parsing has stopped; no further tokens are accepted.
    pub stopped: bool,
    self_closing_acknowledged: bool,
}

impl<H> Default for ParserState<H> {
    fn default() -> Self {
        Self {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            foster_parenting: false,
            frameset_ok: true,
            head_element: None,
            form_element: None,
            pending_table_characters: Vec::new(),
            pending_text: String::new(),
            skip_next_newline: false,
            stopped: false,
            self_closing_acknowledged: false,
        }
    }
}

/// The element a fragment is parsed in the context of.
///
/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    /// Local name of the context element.
    pub name: String,
    /// Namespace of the context element.
    pub namespace: Namespace,
    /// Attributes of the context element; only `encoding` on MathML
    /// `annotation-xml` affects parsing.
    pub attributes: Vec<Attribute>,
}

impl FragmentContext {
    /// An HTML context element.
    #[must_use]
    pub fn html(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Namespace::Html,
            attributes: Vec::new(),
        }
    }

    /// A context element in any namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
            attributes: Vec::new(),
        }
    }
}

/// Where a node is to be inserted: appended to `parent`, or before `before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertionPoint<H> {
    parent: H,
    before: Option<H>,
}

impl<H> InsertionPoint<H> {
    const fn append(parent: H) -> Self {
        Self {
            parent,
            before: None,
        }
    }
}

/// The HTML tree construction state machine.
///
/// Feed it tokens with [`process_token`](Self::process_token) in any batch
/// size, then call [`finish`](Self::finish) to get the sink back.
pub struct TreeConstructor<S: TreeSink> {
    sink: S,
    options: TreeBuilderOptions,
    state: ParserState<S::Handle>,
    open_elements: OpenElementsStack<S::Handle>,
    active_formatting: ActiveFormattingElements<S::Handle>,
    errors: Vec<ParseError>,
    token_index: usize,
    quirks_mode: QuirksMode,
    /// The fragment parsing context element, if this is a fragment parser.
    context: Option<OpenElement<S::Handle>>,
    fragment_root: Option<S::Handle>,
    initial_tokenizer_state: Option<TokenizerState>,
    directive: Option<TokenizerState>,
}

impl<S: TreeSink> TreeConstructor<S> {
    /// A document parser with default options.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, TreeBuilderOptions::default())
    }

    /// A document parser.
    #[must_use]
    pub fn with_options(sink: S, options: TreeBuilderOptions) -> Self {
        Self {
            sink,
            options,
            state: ParserState::default(),
            open_elements: OpenElementsStack::new(),
            active_formatting: ActiveFormattingElements::new(),
            errors: Vec::new(),
            token_index: 0,
            quirks_mode: QuirksMode::NoQuirks,
            context: None,
            fragment_root: None,
            initial_tokenizer_state: None,
            directive: None,
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// A fragment parser. The fragment's nodes become children of
    /// [`fragment_root`](Self::fragment_root).
    ///
    /// # Errors
    ///
    /// Returns [`TreeBuilderError::InvalidFragmentContext`] if the context
    /// element has no name.
    pub fn new_fragment(
        sink: S,
        context: FragmentContext,
        options: TreeBuilderOptions,
    ) -> Result<Self, TreeBuilderError> {
        if context.name.is_empty() {
            return Err(TreeBuilderError::InvalidFragmentContext(context.name));
        }
        let mut builder = Self::with_options(sink, options);

        // "Let root be the result of creating an html element ... Append
        // the element root to the Document node created above. Set up the
        // parser's stack of open elements so that it contains just the single
        // element root."
        let document = builder.sink.document();
        let root = builder.sink.create_element("html", Namespace::Html, &[]);
        builder.sink.append_child(document, root);
        builder.open_elements.push(OpenElement::html(root, "html"));
        builder.fragment_root = Some(root);

        let handle = builder
            .sink
            .create_element(&context.name, context.namespace, &context.attributes);
        let mut entry = OpenElement::new(handle, context.name.as_str(), context.namespace);
        entry.annotation_html = context.namespace == Namespace::MathMl
            && is_html_annotation(&context.name, &context.attributes);

        // "If the context element is a template element, push "in template"
        // onto the stack of template insertion modes"
        if entry.is("template") {
            builder
                .state
                .template_insertion_modes
                .push(InsertionMode::InTemplate);
        }

        // "Set the parser's form element pointer to the nearest node to the
        // context element that is a form element"
        if entry.is("form") {
            builder.state.form_element = Some(handle);
        }

        if context.namespace == Namespace::Html {
            builder.initial_tokenizer_state = match context.name.as_str() {
                "title" | "textarea" => Some(TokenizerState::Rcdata),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(TokenizerState::Rawtext),
                "script" => Some(TokenizerState::ScriptData),
                "noscript" if builder.options.scripting_enabled => Some(TokenizerState::Rawtext),
                "plaintext" => Some(TokenizerState::Plaintext),
                _ => None,
            };
        }

        builder.context = Some(entry);
        builder.reset_insertion_mode();
        Ok(builder)
    }

    /// Process one token.
    ///
    /// Returns the tokenizer state the caller's tokenizer must switch to, if
    /// the token requires one. Parse errors never fail this call; they are
    /// recorded in [`errors`](Self::errors).
    ///
    /// # Errors
    ///
    /// [`TreeBuilderError::TokenAfterStop`] if end-of-file was already
    /// processed, [`TreeBuilderError::ReprocessLimit`] if a token is
    /// reprocessed more often than [`TreeBuilderOptions::max_reprocess`].
    pub fn process_token(&mut self, token: Token) -> Result<Option<TokenizerState>, TreeBuilderError> {
        let token_index = self.token_index;
        if self.state.stopped {
            error!("tree builder received token {token_index} after parsing stopped");
            return Err(TreeBuilderError::TokenAfterStop { token_index });
        }
        self.token_index += 1;
        self.directive = None;

        let mut token = token;
        // "If the next token is a U+000A LINE FEED (LF) character token, then
        // ignore that token and move on to the next one."
        if std::mem::take(&mut self.state.skip_next_newline)
            && let Token::Character { data } = &mut token
            && data.starts_with('\n')
        {
            let _ = data.remove(0);
        }

        if let Token::Character { data } = &token {
            for (_, run) in split_runs(data) {
                self.dispatch(&Token::text(run), token_index)?;
            }
        } else {
            self.dispatch(&token, token_index)?;
        }

        Ok(self.directive.take())
    }

    /// Process a sequence of tokens, ignoring tokenizer state requests.
    ///
    /// # Errors
    ///
    /// Stops at the first [`TreeBuilderError`].
    pub fn process_tokens<I>(&mut self, tokens: I) -> Result<(), TreeBuilderError>
    where
        I: IntoIterator<Item = Token>,
    {
        for token in tokens {
            let _ = self.process_token(token)?;
        }
        Ok(())
    }

    /// Process end-of-file if it has not been seen, and return the sink
    /// together with the recorded parse errors.
    ///
    /// # Errors
    ///
    /// Propagates a [`TreeBuilderError`] raised while processing end-of-file.
    pub fn finish(mut self) -> Result<(S, Vec<ParseError>), TreeBuilderError> {
        if !self.state.stopped {
            let _ = self.process_token(Token::EndOfFile)?;
        }
        Ok((self.sink, self.errors))
    }

    /// Parse errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.state.insertion_mode
    }

    /// Read-only view of the parser state.
    #[must_use]
    pub const fn state(&self) -> &ParserState<S::Handle> {
        &self.state
    }

    /// The stack of open elements.
    #[must_use]
    pub const fn open_elements(&self) -> &OpenElementsStack<S::Handle> {
        &self.open_elements
    }

    /// The list of active formatting elements.
    #[must_use]
    pub const fn active_formatting_elements(&self) -> &ActiveFormattingElements<S::Handle> {
        &self.active_formatting
    }

    /// The sink being built.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// True once end-of-file has been processed.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.state.stopped
    }

    /// The `<html>` element whose children are the parsed fragment.
    #[must_use]
    pub const fn fragment_root(&self) -> Option<S::Handle> {
        self.fragment_root
    }

    /// Tokenizer state a fragment parser's tokenizer must start in.
    #[must_use]
    pub const fn initial_tokenizer_state(&self) -> Option<TokenizerState> {
        self.initial_tokenizer_state
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace", `<![CDATA[` starts a CDATA section.
    #[must_use]
    pub fn allows_cdata(&self) -> bool {
        self.adjusted_current_node()
            .is_some_and(|node| node.namespace != Namespace::Html)
    }

    /// Run the tree construction dispatcher on one token until it is consumed.
    fn dispatch(&mut self, token: &Token, token_index: usize) -> Result<(), TreeBuilderError> {
        self.state.self_closing_acknowledged = false;

        let mut count = 0;
        loop {
            count += 1;
            let mode = self.state.insertion_mode;
            if count > self.options.max_reprocess {
                error!("token {token_index} ({token}) still unconsumed after {count} dispatches");
                return Err(TreeBuilderError::ReprocessLimit {
                    token_index,
                    count,
                    mode,
                });
            }

            let foreign = self.is_foreign(token);
            debug!(
                "processing {token} in {mode}{}",
                if foreign { " (foreign content)" } else { "" }
            );
            let result = if foreign {
                self.step_foreign(token)
            } else {
                self.step(mode, token)
            };

            match result {
                ProcessResult::Consumed => break,
                ProcessResult::Reprocess(next) => self.switch_to(next),
            }
        }

        // "When a start tag token is emitted with its self-closing flag set,
        // if the flag is not acknowledged when it is processed by the tree
        // construction stage, that is a parse error."
        if let Token::StartTag {
            self_closing: true, ..
        } = token
            && !self.state.self_closing_acknowledged
        {
            self.parse_error(ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus, token);
        }
        Ok(())
    }

    // ===== State helpers =====

    pub(crate) fn switch_to(&mut self, mode: InsertionMode) {
        if self.state.insertion_mode != mode {
            debug!("insertion mode {} -> {mode}", self.state.insertion_mode);
        }
        self.state.insertion_mode = mode;
    }

    /// Record a parse error for `token` in the current insertion mode.
    pub(crate) fn parse_error(&mut self, code: ParseErrorCode, token: &Token) {
        let error = ParseError {
            code,
            token_index: self.token_index.saturating_sub(1),
            mode: self.state.insertion_mode,
            tag: token.tag_name().map(str::to_string),
        };
        debug!("parse error: {error}");
        if self.options.collect_errors {
            self.errors.push(error);
        }
    }

    pub(crate) const fn acknowledge_self_closing(&mut self) {
        self.state.self_closing_acknowledged = true;
    }

    pub(crate) const fn request_tokenizer_state(&mut self, state: TokenizerState) {
        self.directive = Some(state);
    }

    pub(crate) const fn is_fragment(&self) -> bool {
        self.context.is_some()
    }

    /// [§ 13.2.9 Stopping parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(crate) fn stop_parsing(&mut self) -> ProcessResult {
        debug!("stopping parse after {} tokens", self.token_index);
        self.open_elements.truncate(0);
        self.state.stopped = true;
        ProcessResult::Consumed
    }

    // ===== Node insertion =====

    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(crate) fn adjusted_current_node(&self) -> Option<&OpenElement<S::Handle>> {
        match &self.context {
            Some(context) if self.open_elements.len() == 1 => Some(context),
            _ => self.open_elements.current(),
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "the appropriate place for inserting a node, optionally using a
    /// particular override target"
    pub(crate) fn appropriate_place(
        &self,
        override_target: Option<&OpenElement<S::Handle>>,
    ) -> InsertionPoint<S::Handle> {
        let Some(target) = override_target.or_else(|| self.open_elements.current()) else {
            return InsertionPoint::append(self.sink.document());
        };

        // "If foster parenting is enabled and target is a table, tbody,
        // tfoot, thead, or tr element"
        if self.state.foster_parenting && target.is_one_of(TABLE_CONTEXT) {
            return self.foster_parent_place();
        }

        // "If the adjusted insertion location is inside a template element,
        // let it instead be inside the template element's template contents"
        self.inside(target)
    }

    fn inside(&self, target: &OpenElement<S::Handle>) -> InsertionPoint<S::Handle> {
        if target.is("template") {
            InsertionPoint::append(self.sink.template_contents(target.handle))
        } else {
            InsertionPoint::append(target.handle)
        }
    }

    fn foster_parent_place(&self) -> InsertionPoint<S::Handle> {
        let last_template = self.open_elements.last_index_of("template");
        let last_table = self.open_elements.last_index_of("table");

        // "If there is a last template and either there is no last table, or
        // there is one, but last template is lower (more recently added) than
        // last table in the stack of open elements, then: let adjusted
        // insertion location be inside last template's template contents"
        if let Some(template) = last_template
            && last_table.is_none_or(|table| template > table)
            && let Some(entry) = self.open_elements.get(template)
        {
            return InsertionPoint::append(self.sink.template_contents(entry.handle));
        }

        // "If there is no last table, then let adjusted insertion location be
        // inside the first element in the stack of open elements (the html
        // element)" (fragment case)
        let Some(table_index) = last_table else {
            return self
                .open_elements
                .html_element()
                .map_or_else(|| InsertionPoint::append(self.sink.document()), |html| {
                    InsertionPoint::append(html.handle)
                });
        };

        let table = self
            .open_elements
            .get(table_index)
            .map(|entry| entry.handle);
        // "If last table has a parent node, then let adjusted insertion
        // location be inside last table's parent node, immediately before
        // last table"
        if let Some(table) = table
            && let Some(parent) = self.sink.parent(table)
        {
            return InsertionPoint {
                parent,
                before: Some(table),
            };
        }

        // "Let previous element be the element immediately above last table
        // in the stack of open elements. Let adjusted insertion location be
        // inside previous element, after its last child (if any)."
        table_index
            .checked_sub(1)
            .and_then(|index| self.open_elements.get(index))
            .map_or_else(|| InsertionPoint::append(self.sink.document()), |previous| {
                self.inside(previous)
            })
    }

    pub(crate) fn insert_at(&mut self, point: InsertionPoint<S::Handle>, node: S::Handle) {
        match point.before {
            Some(reference) => self.sink.insert_before(point.parent, node, reference),
            None => self.sink.append_child(point.parent, node),
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "Insert a foreign element": create the element, insert it at the
    /// appropriate place and push it onto the stack of open elements.
    pub(crate) fn insert_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> S::Handle {
        let point = self.appropriate_place(None);
        let handle = self.sink.create_element(name, namespace, attributes);
        self.insert_at(point, handle);

        let mut entry = OpenElement::new(handle, name, namespace);
        entry.annotation_html =
            namespace == Namespace::MathMl && is_html_annotation(name, attributes);
        self.open_elements.push(entry);
        handle
    }

    /// "Insert an HTML element"
    pub(crate) fn insert_html_element(&mut self, name: &str, attributes: &[Attribute]) -> S::Handle {
        self.insert_element(name, Namespace::Html, attributes)
    }

    /// Insert an HTML element and pop it straight away (void elements).
    pub(crate) fn insert_void_element(&mut self, name: &str, attributes: &[Attribute]) {
        let _ = self.insert_html_element(name, attributes);
        let _ = self.open_elements.pop();
        self.acknowledge_self_closing();
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data. Otherwise, create
    /// a new Text node whose data is data ... and insert the newly created
    /// node at the adjusted insertion location."
    pub(crate) fn insert_characters(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        let point = self.appropriate_place(None);
        // "If the adjusted insertion location is in a Document node, then
        // return."
        if point.parent == self.sink.document() {
            return;
        }
        if let Some(text) = self.sink.text_before(point.parent, point.before) {
            self.sink.append_text_data(text, data);
        } else {
            let text = self.sink.create_text(data);
            self.insert_at(point, text);
        }
    }

    /// "Insert a comment" at the appropriate place.
    pub(crate) fn insert_comment(&mut self, data: &str) {
        let point = self.appropriate_place(None);
        let comment = self.sink.create_comment(data);
        self.insert_at(point, comment);
    }

    /// Insert a comment as the last child of the Document.
    pub(crate) fn insert_comment_in_document(&mut self, data: &str) {
        let document = self.sink.document();
        let comment = self.sink.create_comment(data);
        self.sink.append_child(document, comment);
    }

    /// Insert a comment as the last child of the `<html>` element.
    pub(crate) fn insert_comment_in_html(&mut self, data: &str) {
        let Some(html) = self.open_elements.html_element().map(|entry| entry.handle) else {
            self.insert_comment_in_document(data);
            return;
        };
        let comment = self.sink.create_comment(data);
        self.sink.append_child(html, comment);
    }

    /// Insert the TEXT-mode buffer as one text node.
    pub(crate) fn flush_pending_text(&mut self) {
        let text = std::mem::take(&mut self.state.pending_text);
        self.insert_characters(&text);
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    ///
    /// The generic raw text and RCDATA element parsing algorithms.
    pub(crate) fn parse_text_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        tokenizer_state: TokenizerState,
    ) -> ProcessResult {
        let _ = self.insert_html_element(name, attributes);
        self.request_tokenizer_state(tokenizer_state);
        self.state.original_insertion_mode = Some(self.state.insertion_mode);
        self.switch_to(InsertionMode::Text);
        ProcessResult::Consumed
    }

    // ===== Stack of open elements =====

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped from the
    /// stack."
    pub(crate) fn close_p_element(&mut self, token: &Token) {
        self.open_elements.generate_implied_end_tags(Some("p"));
        if !self.open_elements.current_is("p") {
            self.parse_error(ParseErrorCode::MisnestedEndTag, token);
        }
        let _ = self.open_elements.pop_until_tag_name_popped("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(crate) fn close_p_in_button_scope(&mut self, token: &Token) {
        if self.open_elements.has_in_scope("p", Scope::Button) {
            self.close_p_element(token);
        }
    }

    /// Generate implied end tags, report a parse error if the current node is
    /// not `name`, then pop until `name` has been popped.
    pub(crate) fn close_element(&mut self, name: &str, token: &Token) {
        self.open_elements.generate_implied_end_tags(None);
        if !self.open_elements.current_is(name) {
            self.parse_error(ParseErrorCode::MisnestedEndTag, token);
        }
        let _ = self.open_elements.pop_until_tag_name_popped(name);
    }

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// "Reset the insertion mode appropriately"
    pub(crate) fn reset_insertion_mode(&mut self) {
        let mode = self.appropriate_mode();
        self.switch_to(mode);
    }

    fn appropriate_mode(&self) -> InsertionMode {
        let len = self.open_elements.len();
        for index in (0..len).rev() {
            // "If node is the first node in the stack of open elements, then
            // set last to true, and, if the parser was created as part of the
            // HTML fragment parsing algorithm (fragment case), set node to the
            // context element passed to that algorithm."
            let last = index == 0;
            let node = match (&self.context, last) {
                (Some(context), true) => context,
                _ => match self.open_elements.get(index) {
                    Some(entry) => entry,
                    None => break,
                },
            };

            if node.namespace != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }

            match node.name.as_str() {
                "select" => {
                    // "If last is true, jump to the step below labeled done."
                    if !last {
                        for ancestor in (0..index).rev() {
                            match self.open_elements.get(ancestor) {
                                Some(entry) if entry.is("template") => break,
                                Some(entry) if entry.is("table") => {
                                    return InsertionMode::InSelectInTable;
                                }
                                _ => {}
                            }
                        }
                    }
                    return InsertionMode::InSelect;
                }
                "td" | "th" if !last => return InsertionMode::InCell,
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                "template" => {
                    return self
                        .state
                        .template_insertion_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                "html" => {
                    return if self.state.head_element.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ if last => return InsertionMode::InBody,
                _ => {}
            }
        }
        InsertionMode::InBody
    }

    // ===== Active formatting elements =====

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        let Some(start) = self
            .active_formatting
            .reconstruction_start(&self.open_elements)
        else {
            return;
        };
        let mut list = std::mem::take(&mut self.active_formatting);
        list.reconstruct_from(start, |tag| self.insert_html_element(&tag.name, &tag.attributes));
        self.active_formatting = list;
    }

    /// Insert a formatting element and push it onto the list of active
    /// formatting elements.
    pub(crate) fn insert_formatting_element(&mut self, name: &str, attributes: &[Attribute]) {
        let handle = self.insert_html_element(name, attributes);
        self.active_formatting
            .push(handle, FormattingTag::new(name, attributes.to_vec()));
    }

    // ===== Misc =====

    /// Copy attributes onto an existing element where missing (`<html>`,
    /// `<body>` start tags in body).
    pub(crate) fn merge_attributes(&mut self, node: S::Handle, attributes: &[Attribute]) {
        for attr in attributes {
            self.sink.set_attribute_if_absent(node, &attr.name, &attr.value);
        }
    }

    pub(crate) fn set_quirks_mode(&mut self, mode: QuirksMode) {
        debug!("document quirks mode: {mode:?}");
        self.quirks_mode = mode;
        self.sink.set_quirks_mode(mode);
    }
}

/// The class of a character run produced by [`split_runs`].
pub(crate) fn run_class(data: &str) -> CharClass {
    data.chars().next().map_or(CharClass::Other, CharClass::of)
}
