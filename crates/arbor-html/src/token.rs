use core::fmt;

/// An attribute on a start tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Character tokens carry a run of text rather than a single code point; the
/// tree builder splits runs where the insertion mode rules need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag."
    ///
    /// Missing identifiers are `None`, which is distinct from the empty string.
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },
    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes"
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes", in source order. Duplicates may appear;
        /// the first occurrence of a name wins when an element is created.
        attributes: Vec<Attribute>,
    },
    /// End tag token. Attributes on end tags carry no meaning for tree
    /// construction and are not represented.
    EndTag {
        /// "a tag name"
        name: String,
    },
    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },
    /// One or more characters.
    Character {
        /// "data"
        data: String,
    },
    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// A start tag with no attributes.
    #[must_use]
    pub fn start_tag(name: impl Into<String>) -> Self {
        Self::StartTag {
            name: name.into(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// A start tag with the given attributes.
    #[must_use]
    pub fn start_tag_with(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self::StartTag {
            name: name.into(),
            self_closing: false,
            attributes,
        }
    }

    /// An end tag.
    #[must_use]
    pub fn end_tag(name: impl Into<String>) -> Self {
        Self::EndTag { name: name.into() }
    }

    /// A character token holding `data`.
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::Character { data: data.into() }
    }

    /// A comment token.
    #[must_use]
    pub fn comment(data: impl Into<String>) -> Self {
        Self::Comment { data: data.into() }
    }

    /// `<!DOCTYPE name>` with missing identifiers.
    #[must_use]
    pub fn doctype(name: impl Into<String>) -> Self {
        Self::Doctype {
            name: Some(name.into()),
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// Sets the self-closing flag on a start tag; other tokens are unchanged.
    #[must_use]
    pub fn self_closing(mut self) -> Self {
        if let Self::StartTag { self_closing, .. } = &mut self {
            *self_closing = true;
        }
        self
    }

    /// The tag name of a start or end tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            _ => None,
        }
    }

    /// Value of the first attribute named `name` on a start tag.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } => attributes
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = name {
                    write!(f, " {n}")?;
                }
                if let Some(pub_id) = public_identifier {
                    write!(f, " PUBLIC \"{pub_id}\"")?;
                }
                if let Some(sys_id) = system_identifier {
                    write!(f, " SYSTEM \"{sys_id}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => write!(f, "Character({data:?})"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Classification of a run of characters. Mode rules distinguish "a
/// character token that is one of U+0009, U+000A, U+000C, U+000D, U+0020",
/// "a character token that is U+0000 NULL", and everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Whitespace,
    Null,
    Other,
}

impl CharClass {
    pub(crate) const fn of(c: char) -> Self {
        match c {
            '\t' | '\n' | '\x0C' | '\r' | ' ' => Self::Whitespace,
            '\0' => Self::Null,
            _ => Self::Other,
        }
    }
}

/// Splits `data` into maximal runs of one [`CharClass`].
pub(crate) fn split_runs(data: &str) -> impl Iterator<Item = (CharClass, &str)> {
    let mut rest = data;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let class = CharClass::of(first);
        let end = rest
            .char_indices()
            .find(|&(_, c)| CharClass::of(c) != class)
            .map_or(rest.len(), |(i, _)| i);
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some((class, run))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_runs() {
        let runs: Vec<_> = split_runs("  ab\0\0 c").collect();
        assert_eq!(
            runs,
            [
                (CharClass::Whitespace, "  "),
                (CharClass::Other, "ab"),
                (CharClass::Null, "\0\0"),
                (CharClass::Whitespace, " "),
                (CharClass::Other, "c"),
            ]
        );
    }

    #[test]
    fn test_attribute_first_occurrence() {
        let token = Token::start_tag_with(
            "input",
            vec![Attribute::new("type", "hidden"), Attribute::new("type", "text")],
        );
        assert_eq!(token.attribute("type"), Some("hidden"));
        assert_eq!(token.attribute("name"), None);
    }
}
