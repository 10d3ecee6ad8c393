//! Source documents: format sniffing and the raw tagged tree.
//!
//! A [`SourceNode`] is the format-specific parse result before any directive
//! handling. YAML is read through an event parser so that tags, anchors and
//! line/column marks survive; JSON is validated strictly by `serde_json`.
//! Callers that already hold a `serde_yaml::Value` or `serde_json::Value`
//! convert it directly and skip byte parsing.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use tracing::debug;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::error::{TemplateError, TemplateResult};
use crate::location::Location;
use crate::node::Scalar;

const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// Upper bound on nodes materialized by alias expansion in one document.
pub const MAX_ALIAS_EXPANSION: usize = 100_000;

/// Serialization format of a template document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Guess the format from the first significant byte: `{` or `[` is JSON,
    /// anything else is YAML.
    pub fn sniff(bytes: &[u8]) -> Self {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') | Some(b'[') => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Yaml => f.write_str("YAML"),
            DocumentFormat::Json => f.write_str("JSON"),
        }
    }
}

/// A tag attached to a source node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTag {
    /// `!Name` is a candidate directive shorthand.
    Local(String),
    /// `!!name` is a YAML core schema tag.
    Core(String),
    /// Any other tag handle.
    Other(String),
}

impl SourceTag {
    /// Classify a tag written as text, e.g. `!GetAtt` or `!!str`.
    pub fn parse(tag: &str) -> Self {
        if let Some(core) = tag.strip_prefix("!!") {
            SourceTag::Core(core.to_string())
        } else if let Some(core) = tag.strip_prefix(CORE_TAG_PREFIX) {
            SourceTag::Core(core.to_string())
        } else if let Some(local) = tag.strip_prefix('!') {
            if local.starts_with('<') {
                SourceTag::Other(tag.to_string())
            } else {
                SourceTag::Local(local.to_string())
            }
        } else {
            SourceTag::Other(tag.to_string())
        }
    }

    fn from_event_tag(tag: &Tag) -> Self {
        match tag.handle.as_str() {
            "!" => SourceTag::Local(tag.suffix.clone()),
            "!!" | CORE_TAG_PREFIX => SourceTag::Core(tag.suffix.clone()),
            handle => SourceTag::Other(format!("{}{}", handle, tag.suffix)),
        }
    }

    /// Text of the tag without its leading `!`, for diagnostics.
    pub fn name(&self) -> String {
        match self {
            SourceTag::Local(name) => name.clone(),
            SourceTag::Core(name) => format!("!{}", name),
            SourceTag::Other(name) => name.trim_start_matches('!').to_string(),
        }
    }
}

/// Raw value of a source node.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceValue {
    Scalar(Scalar),
    Sequence(Vec<SourceNode>),
    Mapping(Vec<(String, SourceNode)>),
}

/// A node of the format-specific parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    pub value: SourceValue,
    pub tag: Option<SourceTag>,
    pub location: Option<Location>,
}

impl SourceNode {
    pub fn new(value: SourceValue) -> Self {
        Self {
            value,
            tag: None,
            location: None,
        }
    }

    pub fn with_tag(mut self, tag: SourceTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Convert an already-parsed YAML value. Aliases were resolved by the
    /// parser; `Value::Tagged` becomes a tagged node.
    pub fn from_yaml_value(value: serde_yaml::Value) -> TemplateResult<Self> {
        use serde_yaml::Value;

        let node = match value {
            Value::Null => SourceNode::new(SourceValue::Scalar(Scalar::Null)),
            Value::Bool(b) => SourceNode::new(SourceValue::Scalar(Scalar::Bool(b))),
            Value::Number(n) => SourceNode::new(SourceValue::Scalar(yaml_number(&n))),
            Value::String(s) => SourceNode::new(SourceValue::Scalar(Scalar::String(s))),
            Value::Sequence(items) => {
                let items = items
                    .into_iter()
                    .map(SourceNode::from_yaml_value)
                    .collect::<TemplateResult<Vec<_>>>()?;
                SourceNode::new(SourceValue::Sequence(items))
            }
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let key = match SourceNode::from_yaml_value(key)?.value {
                        SourceValue::Scalar(scalar) => scalar.to_key(),
                        _ => {
                            return Err(parse_error(
                                DocumentFormat::Yaml,
                                "mapping keys must be scalars",
                                None,
                            ))
                        }
                    };
                    entries.push((key, SourceNode::from_yaml_value(value)?));
                }
                SourceNode::new(SourceValue::Mapping(entries))
            }
            Value::Tagged(tagged) => {
                let tag = SourceTag::parse(&tagged.tag.to_string());
                let mut inner = SourceNode::from_yaml_value(tagged.value)?;
                if let (SourceTag::Local(_), SourceValue::Scalar(scalar)) = (&tag, &inner.value) {
                    inner.value = SourceValue::Scalar(Scalar::String(directive_scalar_text(scalar)));
                }
                inner.with_tag(tag)
            }
        };
        Ok(node)
    }

    /// Convert an already-parsed JSON value. JSON has no tags.
    pub fn from_json_value(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => SourceNode::new(SourceValue::Scalar(Scalar::Null)),
            Value::Bool(b) => SourceNode::new(SourceValue::Scalar(Scalar::Bool(b))),
            Value::Number(n) => {
                let scalar = match n.as_i64() {
                    Some(i) => Scalar::Int(i),
                    None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
                };
                SourceNode::new(SourceValue::Scalar(scalar))
            }
            Value::String(s) => SourceNode::new(SourceValue::Scalar(Scalar::String(s))),
            Value::Array(items) => SourceNode::new(SourceValue::Sequence(
                items.into_iter().map(SourceNode::from_json_value).collect(),
            )),
            Value::Object(map) => SourceNode::new(SourceValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, SourceNode::from_json_value(v)))
                    .collect(),
            )),
        }
    }
}

/// Parse raw document bytes in the given format.
///
/// Nothing partial is returned: any syntax error fails the whole document.
pub fn parse_document(
    bytes: &[u8],
    format: DocumentFormat,
    track_locations: bool,
) -> TemplateResult<SourceNode> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| parse_error(format, format!("input is not valid UTF-8: {}", e), None))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    match format {
        DocumentFormat::Yaml => parse_yaml(text),
        DocumentFormat::Json => {
            let strict = parse_json(text)?;
            if !track_locations {
                return Ok(strict);
            }
            // The strict parse already rejected syntax errors and repeated
            // keys. JSON is a subset of YAML flow syntax, so the event parser
            // yields the same tree with marks attached; a few escapes it does
            // not accept leave the tree unlocated.
            match parse_yaml(text) {
                Ok(node) => Ok(node),
                Err(e) => {
                    debug!("Using unlocated JSON tree: {}", e);
                    Ok(strict)
                }
            }
        }
    }
}

fn parse_yaml(text: &str) -> TemplateResult<SourceNode> {
    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new(text.chars());
    parser.load(&mut builder, false).map_err(|e| {
        let mark = e.marker();
        parse_error(DocumentFormat::Yaml, e.info().to_string(), Some(location_of(mark)))
    })?;
    builder.finish()
}

fn parse_json(text: &str) -> TemplateResult<SourceNode> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let parsed = StrictJson::deserialize(&mut deserializer)
        .and_then(|node| deserializer.end().map(|()| node.0))
        .map_err(|e| {
            parse_error(
                DocumentFormat::Json,
                e.to_string(),
                (e.line() > 0).then(|| Location::new(e.line(), e.column())),
            )
        })?;
    Ok(parsed)
}

/// JSON value that keeps key order and rejects repeated mapping keys.
struct StrictJson(SourceNode);

impl<'de> Deserialize<'de> for StrictJson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StrictJsonVisitor).map(StrictJson)
    }
}

struct StrictJsonVisitor;

impl StrictJsonVisitor {
    fn scalar(scalar: Scalar) -> SourceNode {
        SourceNode::new(SourceValue::Scalar(scalar))
    }
}

impl<'de> Visitor<'de> for StrictJsonVisitor {
    type Value = SourceNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<SourceNode, E> {
        Ok(Self::scalar(Scalar::Null))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<SourceNode, E> {
        Ok(Self::scalar(Scalar::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<SourceNode, E> {
        Ok(Self::scalar(Scalar::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SourceNode, E> {
        Ok(Self::scalar(match i64::try_from(v) {
            Ok(i) => Scalar::Int(i),
            Err(_) => Scalar::Float(v as f64),
        }))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<SourceNode, E> {
        Ok(Self::scalar(Scalar::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<SourceNode, E> {
        Ok(Self::scalar(Scalar::String(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<SourceNode, E> {
        Ok(Self::scalar(Scalar::String(v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<SourceNode, A::Error> {
        let mut items = Vec::new();
        while let Some(StrictJson(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(SourceNode::new(SourceValue::Sequence(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SourceNode, A::Error> {
        let mut entries: Vec<(String, SourceNode)> = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(de::Error::custom(format!("duplicate mapping key '{}'", key)));
            }
            let StrictJson(value) = map.next_value()?;
            entries.push((key, value));
        }
        Ok(SourceNode::new(SourceValue::Mapping(entries)))
    }
}

fn parse_error(
    format: DocumentFormat,
    message: impl Into<String>,
    location: Option<Location>,
) -> TemplateError {
    TemplateError::DocumentParse {
        format: format.to_string(),
        message: message.into(),
        location,
    }
}

fn location_of(mark: &Marker) -> Location {
    Location::new(mark.line(), mark.col() + 1)
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    match n.as_i64() {
        Some(i) => Scalar::Int(i),
        None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

// Directive arguments written as bare scalars are always text: `!Ref 123`
// names "123" and an empty `!GetAZs` means the empty string.
fn directive_scalar_text(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => String::new(),
        other => other.to_key(),
    }
}

/// Resolve an untagged plain scalar with the YAML 1.2 core schema.
pub(crate) fn resolve_plain(text: &str) -> Scalar {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return Scalar::Null,
        "true" | "True" | "TRUE" => return Scalar::Bool(true),
        "false" | "False" | "FALSE" => return Scalar::Bool(false),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return Scalar::Float(f64::INFINITY)
        }
        "-.inf" | "-.Inf" | "-.INF" => return Scalar::Float(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Scalar::Float(f64::NAN),
        _ => {}
    }

    if let Some(hex) = text.strip_prefix("0x") {
        if let Ok(i) = i64::from_str_radix(hex, 16) {
            return Scalar::Int(i);
        }
    }
    if let Some(oct) = text.strip_prefix("0o") {
        if let Ok(i) = i64::from_str_radix(oct, 8) {
            return Scalar::Int(i);
        }
    }

    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = text.parse::<i64>() {
            return Scalar::Int(i);
        }
    }

    let numeric_chars = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'));
    if numeric_chars && text.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(f) = text.parse::<f64>() {
            return Scalar::Float(f);
        }
    }

    Scalar::String(text.to_string())
}

fn resolve_core(tag: &str, text: &str, location: Option<Location>) -> TemplateResult<Scalar> {
    let invalid = |kind: &str| {
        parse_error(
            DocumentFormat::Yaml,
            format!("'{}' is not a valid !!{} value", text, kind),
            location,
        )
    };
    match tag {
        "str" => Ok(Scalar::String(text.to_string())),
        "int" => match resolve_plain(text) {
            Scalar::Int(i) => Ok(Scalar::Int(i)),
            _ => Err(invalid("int")),
        },
        "float" => match resolve_plain(text) {
            Scalar::Int(i) => Ok(Scalar::Float(i as f64)),
            Scalar::Float(f) => Ok(Scalar::Float(f)),
            _ => Err(invalid("float")),
        },
        "bool" => match resolve_plain(text) {
            Scalar::Bool(b) => Ok(Scalar::Bool(b)),
            _ => Err(invalid("bool")),
        },
        "null" => Ok(Scalar::Null),
        _ => Ok(Scalar::String(text.to_string())),
    }
}

fn node_count(node: &SourceNode) -> usize {
    1 + match &node.value {
        SourceValue::Scalar(_) => 0,
        SourceValue::Sequence(items) => items.iter().map(node_count).sum(),
        SourceValue::Mapping(entries) => entries.iter().map(|(_, v)| node_count(v)).sum(),
    }
}

struct Frame {
    node: SourceNode,
    anchor: usize,
    pending_key: Option<String>,
}

/// Builds a [`SourceNode`] tree from parser events.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, (SourceNode, usize)>,
    expanded: usize,
    root: Option<SourceNode>,
    error: Option<TemplateError>,
}

impl TreeBuilder {
    fn finish(self) -> TemplateResult<SourceNode> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self
            .root
            .unwrap_or_else(|| SourceNode::new(SourceValue::Scalar(Scalar::Null))))
    }

    fn fail(&mut self, message: impl Into<String>, location: Location) {
        if self.error.is_none() {
            self.error = Some(parse_error(DocumentFormat::Yaml, message, Some(location)));
        }
    }

    // Inside a mapping with no key read yet, the next node is a key.
    fn awaiting_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame {
                node: SourceNode {
                    value: SourceValue::Mapping(_),
                    ..
                },
                pending_key: None,
                ..
            })
        )
    }

    fn scalar(
        &mut self,
        text: String,
        style: TScalarStyle,
        tag: Option<Tag>,
        location: Location,
    ) -> Option<SourceNode> {
        let is_key = self.awaiting_key();
        let tag = tag.as_ref().map(SourceTag::from_event_tag);
        let scalar = match &tag {
            Some(SourceTag::Core(core)) => match resolve_core(core, &text, Some(location)) {
                Ok(scalar) => scalar,
                Err(e) => {
                    if self.error.is_none() {
                        self.error = Some(e);
                    }
                    return None;
                }
            },
            Some(_) => Scalar::String(text),
            // Plain keys keep their source text: `1.10` and `080` stay distinct.
            None if style == TScalarStyle::Plain && !is_key => resolve_plain(&text),
            None => Scalar::String(text),
        };
        let mut node = SourceNode::new(SourceValue::Scalar(scalar)).with_location(location);
        node.tag = tag;
        Some(node)
    }

    fn anchor(&mut self, id: usize, node: &SourceNode) {
        self.anchors.insert(id, (node.clone(), node_count(node)));
    }

    fn alias(&mut self, id: usize, location: Location) {
        let Some(size) = self.anchors.get(&id).map(|(_, size)| *size) else {
            self.fail(format!("unknown alias id {}", id), location);
            return;
        };
        self.expanded = self.expanded.saturating_add(size);
        if self.expanded > MAX_ALIAS_EXPANSION {
            self.fail(
                format!("alias expansion exceeds {} nodes", MAX_ALIAS_EXPANSION),
                location,
            );
            return;
        }
        if let Some((node, _)) = self.anchors.get(&id).cloned() {
            self.complete(node, location);
        }
    }

    fn open(&mut self, value: SourceValue, anchor: usize, tag: Option<Tag>, location: Location) {
        let mut node = SourceNode::new(value).with_location(location);
        node.tag = tag.as_ref().map(SourceTag::from_event_tag);
        self.stack.push(Frame {
            node,
            anchor,
            pending_key: None,
        });
    }

    fn close(&mut self, location: Location) {
        if let Some(frame) = self.stack.pop() {
            if frame.anchor > 0 {
                self.anchor(frame.anchor, &frame.node);
            }
            self.complete(frame.node, location);
        }
    }

    fn complete(&mut self, node: SourceNode, location: Location) {
        if self.error.is_some() {
            return;
        }
        let Some(frame) = self.stack.last_mut() else {
            self.root = Some(node);
            return;
        };
        let failure = match &mut frame.node.value {
            SourceValue::Sequence(items) => {
                items.push(node);
                None
            }
            SourceValue::Mapping(entries) => match frame.pending_key.take() {
                Some(key) => {
                    entries.push((key, node));
                    None
                }
                None => match node.value {
                    SourceValue::Scalar(scalar) => {
                        let key = scalar.to_key();
                        if entries.iter().any(|(k, _)| *k == key) {
                            Some(format!("duplicate mapping key '{}'", key))
                        } else {
                            frame.pending_key = Some(key);
                            None
                        }
                    }
                    _ => Some("mapping keys must be scalars".to_string()),
                },
            },
            SourceValue::Scalar(_) => None,
        };
        if let Some(message) = failure {
            self.fail(message, location);
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        let location = location_of(&mark);
        match ev {
            Event::Scalar(text, style, anchor, tag) => {
                if let Some(node) = self.scalar(text, style, tag, location) {
                    if anchor > 0 {
                        self.anchor(anchor, &node);
                    }
                    self.complete(node, location);
                }
            }
            Event::SequenceStart(anchor, tag) => {
                self.open(SourceValue::Sequence(Vec::new()), anchor, tag, location)
            }
            Event::MappingStart(anchor, tag) => {
                self.open(SourceValue::Mapping(Vec::new()), anchor, tag, location)
            }
            Event::SequenceEnd | Event::MappingEnd => self.close(location),
            Event::Alias(id) => self.alias(id, location),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(node: &SourceNode) -> Vec<&str> {
        match &node.value {
            SourceValue::Mapping(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            other => panic!("expected a mapping, got {:?}", other),
        }
    }

    fn child<'a>(node: &'a SourceNode, key: &str) -> &'a SourceNode {
        match &node.value {
            SourceValue::Mapping(entries) => &entries.iter().find(|(k, _)| k == key).unwrap().1,
            other => panic!("expected a mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(DocumentFormat::sniff(b"\xEF\xBB\xBF  {\"a\": 1}"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::sniff(b"\n[1]"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::sniff(b"Resources: {}"), DocumentFormat::Yaml);
    }

    #[test]
    fn test_json_duplicate_keys_are_rejected() {
        let json = br#"{"Resources": {"A": {"Type": "X"}, "A": {"Type": "Y"}}}"#;
        for track_locations in [false, true] {
            let err = parse_document(json, DocumentFormat::Json, track_locations).unwrap_err();
            match err {
                TemplateError::DocumentParse { format, message, location } => {
                    assert_eq!(format, "JSON");
                    assert!(message.contains("duplicate mapping key 'A'"), "{}", message);
                    assert_eq!(location.map(|l| l.line), Some(1));
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_json_keeps_key_order_and_numbers() {
        let json = br#"{"b": 1, "a": 2.5, "c": [true, null, 18446744073709551615]}"#;
        let root = parse_document(json, DocumentFormat::Json, false).unwrap();
        assert_eq!(keys(&root), vec!["b", "a", "c"]);
        assert_eq!(child(&root, "b").value, SourceValue::Scalar(Scalar::Int(1)));
        assert_eq!(child(&root, "a").value, SourceValue::Scalar(Scalar::Float(2.5)));
    }

    #[test]
    fn test_json_trailing_content_is_rejected() {
        let err = parse_document(br#"{"a": 1} {"#, DocumentFormat::Json, false).unwrap_err();
        assert!(matches!(err, TemplateError::DocumentParse { .. }));
    }

    #[test]
    fn test_plain_mapping_keys_keep_source_text() {
        let yaml = b"Versions:\n  1.10: a\n  080: b\n  True: c\n  ~: d\n  0x1F: e\n";
        let root = parse_document(yaml, DocumentFormat::Yaml, false).unwrap();
        let versions = child(&root, "Versions");
        assert_eq!(keys(versions), vec!["1.10", "080", "True", "~", "0x1F"]);
        // Values are still resolved.
        assert_eq!(child(versions, "1.10").value, SourceValue::Scalar(Scalar::String("a".into())));
    }

    #[test]
    fn test_numerically_equal_keys_are_distinct() {
        let yaml = b"M:\n  1.0: a\n  1.00: b\n";
        let root = parse_document(yaml, DocumentFormat::Yaml, false).unwrap();
        assert_eq!(keys(child(&root, "M")), vec!["1.0", "1.00"]);
    }

    #[test]
    fn test_plain_values_are_resolved() {
        let root = parse_document(b"A: 1.10\nB: '080'\nC: true\n", DocumentFormat::Yaml, false)
            .unwrap();
        assert_eq!(child(&root, "A").value, SourceValue::Scalar(Scalar::Float(1.1)));
        assert_eq!(child(&root, "B").value, SourceValue::Scalar(Scalar::String("080".into())));
        assert_eq!(child(&root, "C").value, SourceValue::Scalar(Scalar::Bool(true)));
    }

    #[test]
    fn test_nested_alias_expansion_is_bounded() {
        let mut yaml = String::from("a: &a [x, x, x, x, x, x, x, x, x, x]\n");
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        for pair in names.windows(2) {
            let alias = format!("*{}", pair[0]);
            let items = vec![alias.as_str(); 10].join(", ");
            yaml.push_str(&format!("{}: &{} [{}]\n", pair[1], pair[1], items));
        }
        let err = parse_document(yaml.as_bytes(), DocumentFormat::Yaml, false).unwrap_err();
        match err {
            TemplateError::DocumentParse { message, .. } => {
                assert!(message.contains("alias expansion exceeds"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_small_alias_reuse_is_allowed() {
        let root = parse_document(b"a: &a [1, 2]\nb: *a\nc: *a\n", DocumentFormat::Yaml, false)
            .unwrap();
        assert_eq!(child(&root, "b"), child(&root, "c"));
    }
}
