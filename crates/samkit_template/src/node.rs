//! The normalized document tree.

use std::fmt;

use crate::directive::DirectiveKind;

/// A scalar leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Render the scalar the way it would appear as a mapping key.
    pub fn to_key(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

/// An ordered mapping with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the value back if the key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Result<(), Node> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(value);
        }
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A directive in canonical form: one name, one (possibly nested) value.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub value: Box<Node>,
}

impl Directive {
    pub fn new(kind: DirectiveKind, value: Node) -> Self {
        Self {
            kind,
            value: Box::new(value),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.canonical_name()
    }
}

/// A node of a normalized template document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    Directive(Directive),
}

impl Node {
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn directive(kind: DirectiveKind, value: Node) -> Self {
        Node::Directive(Directive::new(kind, value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(Scalar::Bool(b)) => Some(*b),
            Node::Scalar(Scalar::String(s)) => match s.as_str() {
                "true" | "True" | "TRUE" => Some(true),
                "false" | "False" | "FALSE" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Scalar(Scalar::Int(i)) => Some(*i),
            Node::Scalar(Scalar::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Scalar(Scalar::Int(i)) => Some(*i as f64),
            Node::Scalar(Scalar::Float(f)) => Some(*f),
            Node::Scalar(Scalar::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&Directive> {
        match self {
            Node::Directive(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, Node::Directive(_))
    }

    /// Short description of the node's shape for diagnostics,
    /// e.g. `scalar string` or `2-element sequence`.
    pub fn shape(&self) -> String {
        match self {
            Node::Scalar(Scalar::Null) => "null".to_string(),
            Node::Scalar(Scalar::Bool(_)) => "scalar boolean".to_string(),
            Node::Scalar(Scalar::Int(_)) | Node::Scalar(Scalar::Float(_)) => {
                "scalar number".to_string()
            }
            Node::Scalar(Scalar::String(_)) => "scalar string".to_string(),
            Node::Sequence(items) => format!("{}-element sequence", items.len()),
            Node::Mapping(_) => "mapping".to_string(),
            Node::Directive(d) => format!("directive {}", d.name()),
        }
    }
}
