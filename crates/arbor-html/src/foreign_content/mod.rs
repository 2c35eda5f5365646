//! Name adjustments for SVG and MathML content.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

mod mathml;
mod svg;

pub use mathml::{adjust_mathml_attributes, is_html_annotation};
pub use svg::{adjust_svg_attributes, adjusted_svg_tag_name};

/// A namespaced attribute produced by "adjust foreign attributes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignAttribute {
    /// Namespace prefix, if the attribute has one (`xlink`, `xml`, `xmlns`).
    pub prefix: Option<&'static str>,
    /// Local name (`href`, `lang`, `xmlns`).
    pub local_name: &'static str,
    /// Namespace URL.
    pub namespace: &'static str,
}

const XLINK: &str = "http://www.w3.org/1999/xlink";
const XML: &str = "http://www.w3.org/XML/1998/namespace";
const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "if any of the attributes on the token match the strings in the first
/// column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string in the second column, the
/// local name being the string in the third column, and the namespace being
/// the namespace in the fourth column."
///
/// Attributes keep their qualified name (`xlink:href`) in the DOM; this
/// lookup recovers the namespace split.
#[must_use]
pub fn foreign_attribute(name: &str) -> Option<ForeignAttribute> {
    let (prefix, local_name, namespace) = match name {
        "xlink:actuate" => (Some("xlink"), "actuate", XLINK),
        "xlink:arcrole" => (Some("xlink"), "arcrole", XLINK),
        "xlink:href" => (Some("xlink"), "href", XLINK),
        "xlink:role" => (Some("xlink"), "role", XLINK),
        "xlink:show" => (Some("xlink"), "show", XLINK),
        "xlink:title" => (Some("xlink"), "title", XLINK),
        "xlink:type" => (Some("xlink"), "type", XLINK),
        "xml:lang" => (Some("xml"), "lang", XML),
        "xml:space" => (Some("xml"), "space", XML),
        "xmlns" => (None, "xmlns", XMLNS),
        "xmlns:xlink" => (Some("xmlns"), "xlink", XMLNS),
        _ => return None,
    };
    Some(ForeignAttribute {
        prefix,
        local_name,
        namespace,
    })
}
