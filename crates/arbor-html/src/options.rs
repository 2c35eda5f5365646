use serde::{Deserialize, Serialize};

/// Configuration for a [`TreeConstructor`](crate::TreeConstructor).
///
/// Deserializes with defaults for missing fields, so hosts can keep it in
/// their own config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeBuilderOptions {
    /// [§ 13.2.2](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    ///
    /// Affects `<noscript>` handling only; scripts are never executed.
    pub scripting_enabled: bool,
    /// The document is an iframe srcdoc document, which is never in quirks mode.
    pub iframe_srcdoc: bool,
    /// Record parse errors. When false, errors are still logged.
    pub collect_errors: bool,
    /// How many times a single token may be dispatched before the builder
    /// reports a reprocess loop.
    pub max_reprocess: usize,
}

impl Default for TreeBuilderOptions {
    fn default() -> Self {
        Self {
            scripting_enabled: false,
            iframe_srcdoc: false,
            collect_errors: true,
            max_reprocess: 64,
        }
    }
}

impl TreeBuilderOptions {
    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    /// Mark the document as an iframe srcdoc document.
    #[must_use]
    pub const fn with_iframe_srcdoc(mut self, srcdoc: bool) -> Self {
        self.iframe_srcdoc = srcdoc;
        self
    }

    /// Enable or disable parse error collection.
    #[must_use]
    pub const fn with_error_collection(mut self, collect: bool) -> Self {
        self.collect_errors = collect;
        self
    }
}
