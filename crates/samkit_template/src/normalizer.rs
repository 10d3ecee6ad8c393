//! Directive normalization.
//!
//! Walks a [`SourceNode`] tree and produces the canonical [`Node`] tree:
//!
//! - `!Name value` shorthand tags become [`Node::Directive`] via the tag table;
//!   a tag missing from the table fails the pass.
//! - Single-key mappings whose key is a canonical directive name
//!   (`{"Fn::Join": [...]}`) become the same [`Node::Directive`].
//! - `!GetAtt Owner.Attr.Sub` splits on the first dot only into
//!   `["Owner", "Attr.Sub"]`; a dotless value is kept as one string.
//!
//! Directive values are normalized recursively, so directives nested inside
//! directives are rewritten at every depth in a single pass.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::directive::DirectiveKind;
use crate::error::{TemplateError, TemplateResult};
use crate::location::{index_path, key_path, Location, LocationTable};
use crate::node::{Mapping, Node, Scalar};
use crate::source::{parse_document, DocumentFormat, SourceNode, SourceTag, SourceValue};

/// Options controlling a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Input format; sniffed from the bytes when unset.
    #[serde(default)]
    pub format: Option<DocumentFormat>,
    /// Record a line/column for every node path.
    #[serde(default)]
    pub track_locations: bool,
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_locations(mut self) -> Self {
        self.track_locations = true;
        self
    }
}

/// Result of a normalization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    pub root: Node,
    pub format: Option<DocumentFormat>,
    pub locations: Option<LocationTable>,
}

impl NormalizedDocument {
    /// Wrap an already-normalized tree that carries no location data.
    pub fn from_node(root: Node) -> Self {
        Self {
            root,
            format: None,
            locations: None,
        }
    }

    /// Location of `path` (or its nearest located ancestor).
    pub fn location(&self, path: &str) -> Option<Location> {
        self.locations.as_ref().and_then(|table| table.nearest(path))
    }
}

/// Rewrites shorthand and long-form directives into canonical nodes.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Parse and normalize raw document bytes.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> TemplateResult<NormalizedDocument> {
        let format = self
            .options
            .format
            .unwrap_or_else(|| DocumentFormat::sniff(bytes));
        debug!("Parsing {} document ({} bytes)", format, bytes.len());

        let source = parse_document(bytes, format, self.options.track_locations)?;
        let mut document = self.normalize_source(source)?;
        document.format = Some(format);
        Ok(document)
    }

    pub fn normalize_str(&self, text: &str) -> TemplateResult<NormalizedDocument> {
        self.normalize_bytes(text.as_bytes())
    }

    /// Normalize an already-parsed `serde_yaml` tree.
    pub fn normalize_yaml_value(
        &self,
        value: serde_yaml::Value,
    ) -> TemplateResult<NormalizedDocument> {
        let mut document = self.normalize_source(SourceNode::from_yaml_value(value)?)?;
        document.format = Some(DocumentFormat::Yaml);
        Ok(document)
    }

    /// Normalize an already-parsed `serde_json` tree.
    pub fn normalize_json_value(
        &self,
        value: serde_json::Value,
    ) -> TemplateResult<NormalizedDocument> {
        let mut document = self.normalize_source(SourceNode::from_json_value(value))?;
        document.format = Some(DocumentFormat::Json);
        Ok(document)
    }

    /// Normalize a source tree.
    pub fn normalize_source(&self, source: SourceNode) -> TemplateResult<NormalizedDocument> {
        let mut walker = Walker {
            locations: self.options.track_locations.then(LocationTable::new),
            directives: 0,
        };
        let root = walker.walk(source, "")?;

        info!(
            "Normalized document: {} directive(s){}",
            walker.directives,
            walker
                .locations
                .as_ref()
                .map(|t| format!(", {} located path(s)", t.len()))
                .unwrap_or_default()
        );

        Ok(NormalizedDocument {
            root,
            format: None,
            locations: walker.locations,
        })
    }
}

struct Walker {
    locations: Option<LocationTable>,
    directives: usize,
}

impl Walker {
    fn record(&mut self, path: &str, location: Option<Location>) {
        if let (Some(table), Some(location)) = (self.locations.as_mut(), location) {
            table.insert(path, location);
        }
    }

    fn located(&self, location: Option<Location>) -> Option<Location> {
        self.locations.as_ref().and(location)
    }

    fn walk(&mut self, node: SourceNode, path: &str) -> TemplateResult<Node> {
        self.record(path, node.location);

        match node.tag {
            Some(SourceTag::Local(tag)) => {
                let kind = DirectiveKind::from_shorthand(&tag).ok_or_else(|| {
                    TemplateError::UnrecognizedDirective {
                        tag: tag.clone(),
                        path: path.to_string(),
                        location: self.located(node.location),
                    }
                })?;
                return self.shorthand(kind, node.value, node.location, path);
            }
            Some(SourceTag::Other(tag)) => {
                return Err(TemplateError::UnrecognizedDirective {
                    tag,
                    path: path.to_string(),
                    location: self.located(node.location),
                });
            }
            // Core tags were applied when the scalar was resolved.
            Some(SourceTag::Core(_)) | None => {}
        }

        match node.value {
            SourceValue::Scalar(scalar) => Ok(Node::Scalar(scalar)),
            SourceValue::Sequence(items) => self.sequence(items, path),
            SourceValue::Mapping(mut entries) => {
                if entries.len() == 1 {
                    if let Some(kind) = DirectiveKind::from_canonical(&entries[0].0) {
                        let (name, value) = entries.remove(0);
                        let inner_path = key_path(path, &name);
                        let value = self.walk(value, &inner_path)?;
                        self.directives += 1;
                        debug!("Normalized long-form {} at {}", kind, inner_path);
                        return Ok(Node::directive(kind, value));
                    }
                }
                self.mapping(entries, node.location, path)
            }
        }
    }

    fn shorthand(
        &mut self,
        kind: DirectiveKind,
        value: SourceValue,
        location: Option<Location>,
        path: &str,
    ) -> TemplateResult<Node> {
        let inner_path = key_path(path, kind.canonical_name());
        self.record(&inner_path, location);

        let value = match value {
            SourceValue::Scalar(Scalar::String(text)) if kind == DirectiveKind::GetAtt => {
                match text.split_once('.') {
                    Some((owner, attribute)) => {
                        self.record(&index_path(&inner_path, 0), location);
                        self.record(&index_path(&inner_path, 1), location);
                        Node::Sequence(vec![Node::string(owner), Node::string(attribute)])
                    }
                    None => Node::string(text),
                }
            }
            SourceValue::Scalar(scalar) => Node::Scalar(scalar),
            other => self.walk(
                SourceNode {
                    value: other,
                    tag: None,
                    location,
                },
                &inner_path,
            )?,
        };

        self.directives += 1;
        debug!("Normalized !{} at {}", kind.shorthand(), inner_path);
        Ok(Node::directive(kind, value))
    }

    fn sequence(&mut self, items: Vec<SourceNode>, path: &str) -> TemplateResult<Node> {
        let mut normalized = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            normalized.push(self.walk(item, &index_path(path, index))?);
        }
        Ok(Node::Sequence(normalized))
    }

    fn mapping(
        &mut self,
        entries: Vec<(String, SourceNode)>,
        location: Option<Location>,
        path: &str,
    ) -> TemplateResult<Node> {
        let mut mapping = Mapping::new();
        for (key, value) in entries {
            let child_path = key_path(path, &key);
            let value = self.walk(value, &child_path)?;
            if mapping.insert(key.clone(), value).is_err() {
                return Err(TemplateError::DocumentParse {
                    format: "template".to_string(),
                    message: format!("duplicate mapping key '{}' at {}", key, child_path),
                    location: self.located(location),
                });
            }
        }
        Ok(Node::Mapping(mapping))
    }
}
