//! Mutable document tree the pipeline rewrites.
//!
//! The tree is a strict ownership hierarchy: every node owns its attributes
//! (insertion-ordered, unique keys) and its children. Parsing goes through
//! `roxmltree`; only element nodes are kept, since the pipeline is
//! geometry-only and text/comment content has no path data to contribute.

use crate::{ParseOptions, Result};
use indexmap::IndexMap;
use std::fmt::Write as _;

/// Element kind discriminant.
///
/// A closed set of the tags the pipeline dispatches on, plus `Other` for
/// everything else. `Svg` is the document-root kind; every stage treats it
/// like a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Svg,
    Group,
    Path,
    Circle,
    Ellipse,
    Line,
    Polygon,
    Polyline,
    Rect,
    Other(String),
}

impl NodeKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "svg" => Self::Svg,
            "g" => Self::Group,
            "path" => Self::Path,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "line" => Self::Line,
            "polygon" => Self::Polygon,
            "polyline" => Self::Polyline,
            "rect" => Self::Rect,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Svg => "svg",
            Self::Group => "g",
            Self::Path => "path",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
            Self::Rect => "rect",
            Self::Other(name) => name,
        }
    }

    /// Groups aggregate their children's geometry; the root counts as one.
    pub fn is_group_like(&self) -> bool {
        matches!(self, Self::Svg | Self::Group)
    }
}

/// A single element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: String) {
        self.attrs.insert(name.to_string(), value);
    }

    /// Removes an attribute, preserving the order of the remaining ones.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    /// The degenerate placeholder the lenient parser yields on malformed
    /// markup. None of the shape/group tags match it, so it flows through
    /// every stage unchanged.
    pub fn invalid(reason: String) -> Self {
        let mut node = Self::new(NodeKind::Other("invalid".to_string()));
        node.set_attr("reason", reason);
        node
    }

    fn from_xml(source: roxmltree::Node<'_, '_>) -> Self {
        let mut node = Self::new(NodeKind::from_tag(source.tag_name().name()));
        // `attributes()` excludes namespace declarations; re-emit the ones
        // this element declares itself (in-scope minus inherited) so they
        // survive the round trip. The implicit `xml` prefix never appears
        // in markup and is skipped.
        let inherited: Vec<_> = source
            .parent_element()
            .map(|parent| parent.namespaces().collect())
            .unwrap_or_default();
        for ns in source.namespaces() {
            if ns.name() == Some("xml")
                || inherited
                    .iter()
                    .any(|i| i.name() == ns.name() && i.uri() == ns.uri())
            {
                continue;
            }
            let key = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            node.attrs.insert(key, ns.uri().to_string());
        }
        for attr in source.attributes() {
            node.attrs
                .insert(attr.name().to_string(), attr.value().to_string());
        }
        node.children = source
            .children()
            .filter(|child| child.is_element())
            .map(Self::from_xml)
            .collect();
        node
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.kind.as_str());
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            write_escaped(out, value);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.kind.as_str());
    }

    /// Serializes this subtree back to markup text.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }
}

/// A parsed document: the root element plus the verbatim leading bytes
/// (XML declaration, doctype, comments) that precede it in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub preamble: String,
    pub root: Node,
}

impl Document {
    /// Parses markup text into a document tree.
    ///
    /// With [`ParseOptions::lenient`], malformed markup produces an
    /// `<invalid reason="..."/>` placeholder root instead of an error,
    /// mirroring the permissive driver contract.
    pub fn parse(source: &str, options: ParseOptions) -> Result<Self> {
        match roxmltree::Document::parse(source) {
            Ok(doc) => {
                let root = doc.root_element();
                Ok(Self {
                    preamble: source[..root.range().start].to_string(),
                    root: Node::from_xml(root),
                })
            }
            Err(err) if options.suppress_errors => Ok(Self {
                preamble: String::new(),
                root: Node::invalid(err.to_string()),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Serializes the document, re-prepending the preamble unmodified.
    pub fn to_svg_string(&self) -> String {
        let mut out = self.preamble.clone();
        self.root.write_markup(&mut out);
        out
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_elements_in_document_order() {
        let doc = Document::parse(
            r#"<svg><g id="a"><rect width="1" height="2"/></g><circle r="3"/></svg>"#,
            ParseOptions::strict(),
        )
        .unwrap();
        assert_eq!(doc.root.kind, NodeKind::Svg);
        assert_eq!(doc.root.children.len(), 2);
        assert_eq!(doc.root.children[0].kind, NodeKind::Group);
        assert_eq!(doc.root.children[0].attr("id"), Some("a"));
        assert_eq!(doc.root.children[1].kind, NodeKind::Circle);
    }

    #[test]
    fn preamble_is_carried_verbatim() {
        let source = "<?xml version=\"1.0\"?>\n<!-- hi -->\n<svg/>";
        let doc = Document::parse(source, ParseOptions::strict()).unwrap();
        assert_eq!(doc.preamble, "<?xml version=\"1.0\"?>\n<!-- hi -->\n");
        assert_eq!(doc.to_svg_string(), source);
    }

    #[test]
    fn preamble_survives_tag_like_comment_content() {
        let source = "<!-- see <b>docs</b> -->\n<svg/>";
        let doc = Document::parse(source, ParseOptions::strict()).unwrap();
        assert_eq!(doc.preamble, "<!-- see <b>docs</b> -->\n");
        assert_eq!(doc.to_svg_string(), source);
    }

    #[test]
    fn namespace_declarations_become_attributes() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><path d="M0,0"/></svg>"#,
            ParseOptions::strict(),
        )
        .unwrap();
        assert_eq!(doc.root.attr("xmlns"), Some("http://www.w3.org/2000/svg"));
        assert_eq!(
            doc.root.attr("xmlns:xlink"),
            Some("http://www.w3.org/1999/xlink")
        );
        // Inherited namespaces are not repeated on descendants.
        let path = &doc.root.children[0];
        assert_eq!(path.attr("xmlns"), None);
        assert_eq!(path.attr("xmlns:xlink"), None);
    }

    #[test]
    fn nested_namespace_declaration_stays_on_its_element() {
        let doc = Document::parse(
            r#"<svg><g xmlns:ev="http://www.w3.org/2001/xml-events"/></svg>"#,
            ParseOptions::strict(),
        )
        .unwrap();
        assert_eq!(doc.root.attr("xmlns:ev"), None);
        assert_eq!(
            doc.root.children[0].attr("xmlns:ev"),
            Some("http://www.w3.org/2001/xml-events")
        );
    }

    #[test]
    fn lenient_parse_yields_placeholder_on_malformed_markup() {
        let doc = Document::parse("<svg><oops", ParseOptions::lenient()).unwrap();
        assert_eq!(doc.root.kind, NodeKind::Other("invalid".to_string()));
        assert!(doc.root.attr("reason").is_some());
        assert!(doc.root.children.is_empty());
    }

    #[test]
    fn strict_parse_surfaces_the_error() {
        assert!(Document::parse("<svg><oops", ParseOptions::strict()).is_err());
    }

    #[test]
    fn serialization_escapes_attribute_values() {
        let mut node = Node::new(NodeKind::Path);
        node.set_attr("data-label", "a<b & \"c\"".to_string());
        assert_eq!(
            node.to_svg_string(),
            r#"<path data-label="a&lt;b &amp; &quot;c&quot;"/>"#
        );
    }

    #[test]
    fn attribute_order_survives_removal() {
        let mut node = Node::new(NodeKind::Rect);
        node.set_attr("x", "1".to_string());
        node.set_attr("fill", "red".to_string());
        node.set_attr("y", "2".to_string());
        node.remove_attr("x");
        node.remove_attr("y");
        node.set_attr("d", "M0,0".to_string());
        let keys: Vec<&str> = node.attrs.keys().map(String::as_str).collect();
        assert_eq!(keys, ["fill", "d"]);
    }
}
