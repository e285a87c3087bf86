//! UI dump tree: nodes, bounds geometry, and structural queries
//!
//! A dump is parsed fresh for every query and discarded afterwards; nothing
//! here is cached across snapshots, since the screen may have changed
//! between two dumps.

use crate::error::{DeviceError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

lazy_static! {
    static ref INTEGER_RE: Regex = Regex::new(r"\d+").unwrap();
}

/// Integer pixel coordinate in device space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Pixel rectangle `(x1, y1, x2, y2)` with x1 <= x2 and y1 <= y2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    /// Center via truncating integer division: `[0,0][11,11]` gives `(5,5)`.
    pub fn center(&self) -> Point {
        Point {
            x: (self.x1 + self.x2) / 2,
            y: (self.y1 + self.y2) / 2,
        }
    }
}

/// A node in the structural UI dump. Owned and immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct UiNode {
    pub tag: String,
    pub text: Option<String>,
    pub attrs: HashMap<String, String>,
    pub children: Vec<UiNode>,
}

impl UiNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Parse the `bounds` attribute (`[x1,y1][x2,y2]`) by extracting every
    /// decimal integer substring. Fewer than four integers is a data error.
    pub fn bounds(&self) -> Result<Rect> {
        let raw = self
            .attr("bounds")
            .ok_or_else(|| DeviceError::MalformedBounds(String::new()))?;
        let values: Vec<i32> = INTEGER_RE
            .find_iter(raw)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        if values.len() < 4 {
            return Err(DeviceError::MalformedBounds(raw.to_string()));
        }
        Ok(Rect {
            x1: values[0],
            y1: values[1],
            x2: values[2],
            y2: values[3],
        })
    }

    /// Center point of this node's bounds.
    pub fn center(&self) -> Result<Point> {
        Ok(self.bounds()?.center())
    }
}

fn build_node(element: roxmltree::Node) -> UiNode {
    UiNode {
        tag: element.tag_name().name().to_string(),
        text: element
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        attrs: element
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect(),
        children: element
            .children()
            .filter(roxmltree::Node::is_element)
            .map(build_node)
            .collect(),
    }
}

/// Parse a raw dump document into an owned node tree.
pub fn parse_dump(text: &str) -> Result<UiNode> {
    let document = roxmltree::Document::parse(text)?;
    Ok(build_node(document.root_element()))
}

/// Attribute-equality predicate, `[@name='value']`.
#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    attr: String,
    value: String,
}

/// Structural query over a [`UiNode`] tree.
///
/// Supports the descendant-anywhere XPath subset the dump format calls for:
/// `//tag` or `//*`, followed by zero or more `[@attr='value']` predicates.
/// Matches are returned in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    tag: Option<String>,
    predicates: Vec<Predicate>,
}

impl Query {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = || DeviceError::InvalidPattern(pattern.to_string());

        let rest = pattern.strip_prefix("//").ok_or_else(invalid)?;
        let name_end = rest.find('[').unwrap_or(rest.len());
        let (name, mut rest) = rest.split_at(name_end);
        if name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        let mut predicates = Vec::new();
        while !rest.is_empty() {
            let inner = rest
                .strip_prefix("[@")
                .and_then(|r| r.find(']').map(|end| (&r[..end], &r[end + 1..])));
            let (body, remainder) = inner.ok_or_else(invalid)?;
            let (attr, value) = body.split_once('=').ok_or_else(invalid)?;
            let value = value
                .strip_prefix('\'')
                .and_then(|v| v.strip_suffix('\''))
                .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
                .ok_or_else(invalid)?;
            if attr.is_empty() {
                return Err(invalid());
            }
            predicates.push(Predicate {
                attr: attr.to_string(),
                value: value.to_string(),
            });
            rest = remainder;
        }

        Ok(Self {
            tag: if name == "*" {
                None
            } else {
                Some(name.to_string())
            },
            predicates,
        })
    }

    fn matches(&self, node: &UiNode) -> bool {
        if let Some(tag) = &self.tag {
            if node.tag != *tag {
                return false;
            }
        }
        self.predicates
            .iter()
            .all(|p| node.attr(&p.attr) == Some(p.value.as_str()))
    }

    /// All matching nodes, in document (pre-order) order. The root element
    /// itself is a candidate.
    pub fn select<'a>(&self, root: &'a UiNode) -> Vec<&'a UiNode> {
        let mut found = Vec::new();
        self.walk(root, &mut found);
        found
    }

    /// First matching node in document order.
    pub fn first<'a>(&self, root: &'a UiNode) -> Option<&'a UiNode> {
        self.select(root).into_iter().next()
    }

    fn walk<'a>(&self, node: &'a UiNode, found: &mut Vec<&'a UiNode>) {
        if self.matches(node) {
            found.push(node);
        }
        for child in &node.children {
            self.walk(child, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<hierarchy rotation="0">
  <node class="android.widget.FrameLayout" bounds="[0,0][1080,1920]">
    <node class="android.widget.TextView" text="Settings" bounds="[0,0][1080,120]"/>
    <node class="android.widget.ListView" bounds="[0,120][1080,1920]">
      <node class="android.widget.TextView" text="OK" bounds="[100,200][300,400]"/>
      <node class="android.widget.TextView" text="Cancel" bounds="[100,400][300,600]"/>
      <node class="android.widget.TextView" text="OK" bounds="[100,600][300,800]"/>
    </node>
  </node>
</hierarchy>"#;

    #[test]
    fn test_center_truncates() {
        let rect = Rect { x1: 0, y1: 0, x2: 11, y2: 11 };
        assert_eq!(rect.center(), Point { x: 5, y: 5 });
    }

    #[test]
    fn test_parse_dump_structure() {
        let root = parse_dump(DUMP).unwrap();
        assert_eq!(root.tag, "hierarchy");
        assert_eq!(root.attr("rotation"), Some("0"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children.len(), 2);
    }

    #[test]
    fn test_query_by_attribute() {
        let root = parse_dump(DUMP).unwrap();
        let query = Query::parse("//node[@text='OK']").unwrap();
        let matches = query.select(&root);
        assert_eq!(matches.len(), 2);
        // Document order: the list entry at y=200 comes first.
        assert_eq!(matches[0].attr("bounds"), Some("[100,200][300,400]"));
    }

    #[test]
    fn test_query_wildcard_tag() {
        let root = parse_dump(DUMP).unwrap();
        let query = Query::parse("//*[@text='Cancel']").unwrap();
        assert!(query.first(&root).is_some());
        let query = Query::parse("//*").unwrap();
        assert_eq!(query.select(&root).len(), 7);
    }

    #[test]
    fn test_query_multiple_predicates() {
        let root = parse_dump(DUMP).unwrap();
        let query =
            Query::parse("//node[@class='android.widget.TextView'][@text='Settings']").unwrap();
        let node = query.first(&root).unwrap();
        assert_eq!(node.attr("bounds"), Some("[0,0][1080,120]"));

        let query = Query::parse("//node[@class='nope'][@text='Settings']").unwrap();
        assert!(query.first(&root).is_none());
    }

    #[test]
    fn test_query_double_quoted_value() {
        let root = parse_dump(DUMP).unwrap();
        let query = Query::parse(r#"//node[@text="Cancel"]"#).unwrap();
        assert!(query.first(&root).is_some());
    }

    #[test]
    fn test_query_rejects_invalid_patterns() {
        assert!(Query::parse("node[@text='OK']").is_err());
        assert!(Query::parse("//").is_err());
        assert!(Query::parse("//node[@text=OK]").is_err());
        assert!(Query::parse("//a/b").is_err());
    }

    #[test]
    fn test_bounds_center() {
        let root = parse_dump(DUMP).unwrap();
        let query = Query::parse("//node[@text='OK']").unwrap();
        let node = query.first(&root).unwrap();
        assert_eq!(node.center().unwrap(), Point { x: 200, y: 300 });
    }

    #[test]
    fn test_bounds_malformed() {
        let node = UiNode {
            tag: "node".to_string(),
            text: None,
            attrs: [("bounds".to_string(), "[1,2][3]".to_string())]
                .into_iter()
                .collect(),
            children: Vec::new(),
        };
        assert!(matches!(
            node.bounds(),
            Err(DeviceError::MalformedBounds(_))
        ));

        let node = UiNode {
            tag: "node".to_string(),
            text: None,
            attrs: HashMap::new(),
            children: Vec::new(),
        };
        assert!(node.bounds().is_err());
    }
}
