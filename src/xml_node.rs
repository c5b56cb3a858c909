//! XML outline of a CST
//!
//! Every node becomes an element named after its rule, and terminals hold
//! their source text, so the text content of the outline is the printed
//! tree. Rule names that are not XML names (`"("`, `1*DIGIT`) become a
//! `token` element with the rule in an attribute. The same structure
//! serializes to JSON through serde.

use crate::node::Node;
use serde::Serialize;

/// XML node types for CST outlines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlNode {
    Element {
        name: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attributes: Vec<(String, String)>,
        children: Vec<XmlNode>,
    },
    Text(String),
}

impl XmlNode {
    /// Outline of `node`; with `spans` set every element carries its byte offsets
    pub fn from_node(node: &dyn Node, spans: bool) -> XmlNode {
        let rule = node.rule_name();
        let mut attributes = Vec::new();
        let name = if is_xml_name(rule) {
            rule.to_string()
        } else {
            attributes.push(("rule".to_string(), rule.to_string()));
            "token".to_string()
        };
        if spans {
            let span = node.span();
            attributes.push(("from".to_string(), span.start.to_string()));
            attributes.push(("to".to_string(), span.end.to_string()));
        }
        let children = match node.text() {
            Some(text) if text.is_empty() => Vec::new(),
            Some(text) => vec![XmlNode::Text(text.to_string())],
            None => node
                .child_nodes()
                .into_iter()
                .map(|child| XmlNode::from_node(child, spans))
                .collect(),
        };
        XmlNode::Element {
            name,
            attributes,
            children,
        }
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        match self {
            XmlNode::Text(s) => s.clone(),
            XmlNode::Element { children, .. } => children
                .iter()
                .map(|child| child.text_content())
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    fn escape_xml_attr(s: &str) -> String {
        // attribute values are single-quoted
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('\'', "&apos;")
    }

    fn escape_xml_text(s: &str) -> String {
        s.replace('&', "&amp;").replace('<', "&lt;")
    }

    /// Convert to XML string
    pub fn to_xml(&self) -> String {
        match self {
            XmlNode::Element {
                name,
                attributes,
                children,
            } => {
                let attrs_str = if attributes.is_empty() {
                    String::new()
                } else {
                    format!(
                        " {}",
                        attributes
                            .iter()
                            .map(|(k, v)| format!("{}='{}'", k, Self::escape_xml_attr(v)))
                            .collect::<Vec<_>>()
                            .join(" ")
                    )
                };

                if children.is_empty() {
                    format!("<{}{}/>", name, attrs_str)
                } else {
                    let content: String = children.iter().map(XmlNode::to_xml).collect();
                    format!("<{}{}>{}</{}>", name, attrs_str, content, name)
                }
            }
            XmlNode::Text(s) => Self::escape_xml_text(s),
        }
    }
}

fn is_xml_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{CommonExpr, StringLiteral};
    use crate::native_parser::parse_complete;

    #[test]
    fn test_outline_of_comparison() {
        let e = parse_complete::<CommonExpr>("Name eq 'Bob'").unwrap().node;
        let xml = XmlNode::from_node(&e, false);
        assert_eq!(xml.text_content(), "Name eq 'Bob'");
        let text = xml.to_xml();
        assert!(text.starts_with("<commonExpr>"));
        assert!(text.contains("<odataIdentifier>Name</odataIdentifier>"));
        assert!(text.contains("<SQUOTE>'</SQUOTE>"));
    }

    #[test]
    fn test_spans_and_escaping() {
        let s = parse_complete::<StringLiteral>("'a&b'").unwrap().node;
        let text = XmlNode::from_node(&s, true).to_xml();
        assert!(text.starts_with("<string from='0' to='5'>"));
        assert!(text.contains("a&amp;b"));

        let attr = XmlNode::Element {
            name: "token".to_string(),
            attributes: vec![("rule".to_string(), "'<'".to_string())],
            children: vec![XmlNode::Text("<".to_string())],
        };
        assert_eq!(attr.to_xml(), "<token rule='&apos;&lt;&apos;'>&lt;</token>");
    }

    #[test]
    fn test_json_shape() {
        let e = parse_complete::<CommonExpr>("A").unwrap().node;
        let json = serde_json::to_value(XmlNode::from_node(&e, false)).unwrap();
        assert_eq!(json["name"], "commonExpr");
        assert!(json.get("attributes").is_none());
        assert!(json["children"].is_array());
    }

    #[test]
    fn test_xml_names() {
        assert!(is_xml_name("commonExpr-operand"));
        assert!(is_xml_name("EQ-h"));
        assert!(!is_xml_name("1*DIGIT"));
        assert!(!is_xml_name("\"(\""));
    }
}
