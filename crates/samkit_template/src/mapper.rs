//! Projection of a normalized tree into the typed [`Template`] model.
//!
//! Only structure is enforced here: the root and `Resources` must be mappings
//! and every resource needs a non-empty `Type`. Everything else is copied
//! through as-is; directive shapes are the validator's job.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{TemplateError, TemplateResult};
use crate::location::key_path;
use crate::model::{Output, Parameter, Resource, Template};
use crate::node::{Mapping, Node};
use crate::normalizer::NormalizedDocument;

const RESOURCE_ATTRIBUTES: &[&str] = &[
    "Type",
    "Properties",
    "Metadata",
    "DependsOn",
    "Condition",
    "DeletionPolicy",
    "UpdateReplacePolicy",
    "UpdatePolicy",
    "CreationPolicy",
];

/// Maps normalized documents into [`Template`]s.
pub struct TemplateMapper<'a> {
    document: &'a NormalizedDocument,
}

impl<'a> TemplateMapper<'a> {
    pub fn new(document: &'a NormalizedDocument) -> Self {
        Self { document }
    }

    /// Map a normalized document.
    pub fn map_document(document: &NormalizedDocument) -> TemplateResult<Template> {
        TemplateMapper::new(document).map()
    }

    pub fn map(&self) -> TemplateResult<Template> {
        let root = self.expect_mapping(&self.document.root, "<root>", "")?;

        let resources_node = root.get("Resources").ok_or_else(|| {
            TemplateError::MissingRequiredField {
                field: "Resources".to_string(),
                path: String::new(),
                location: self.document.location(""),
            }
        })?;
        let resources = self.map_resources(resources_node)?;

        let template = Template {
            format_version: string_field(root, "AWSTemplateFormatVersion"),
            transform: root.get("Transform").cloned(),
            description: string_field(root, "Description"),
            metadata: root.get("Metadata").cloned(),
            globals: root.get("Globals").cloned(),
            parameters: self.map_section(root, "Parameters", map_parameter)?,
            mappings: self.map_section(root, "Mappings", |node| node.clone())?,
            conditions: self.map_section(root, "Conditions", |node| node.clone())?,
            rules: self.map_section(root, "Rules", |node| node.clone())?,
            resources,
            outputs: self.map_section(root, "Outputs", map_output)?,
        };

        info!(
            "Mapped template: {} resource(s), {} parameter(s), {} output(s)",
            template.resources.len(),
            template.parameters.len(),
            template.outputs.len()
        );
        Ok(template)
    }

    fn map_resources(&self, node: &Node) -> TemplateResult<BTreeMap<String, Resource>> {
        let entries = self.expect_mapping(node, "Resources", "Resources")?;
        let mut resources = BTreeMap::new();

        for (logical_id, body) in entries.iter() {
            let path = key_path("Resources", logical_id);
            let body = self.expect_mapping(body, logical_id, &path)?;

            let type_node = body.get("Type").ok_or_else(|| TemplateError::MissingRequiredField {
                field: "Type".to_string(),
                path: path.clone(),
                location: self.document.location(&path),
            })?;
            let resource_type = type_node
                .as_str()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    let type_path = key_path(&path, "Type");
                    TemplateError::MalformedSection {
                        section: "Type".to_string(),
                        expected: "a non-empty string".to_string(),
                        found: type_node.shape(),
                        location: self.document.location(&type_path),
                        path: type_path,
                    }
                })?;

            debug!("Mapping resource {} ({})", logical_id, resource_type);

            let mut resource = Resource::new(resource_type);
            resource.properties = body.get("Properties").cloned();
            resource.metadata = body.get("Metadata").cloned();
            resource.depends_on = body.get("DependsOn").map(string_list).unwrap_or_default();
            resource.condition = string_field(body, "Condition");
            resource.deletion_policy = body.get("DeletionPolicy").cloned();
            resource.update_replace_policy = body.get("UpdateReplacePolicy").cloned();
            resource.update_policy = body.get("UpdatePolicy").cloned();
            resource.creation_policy = body.get("CreationPolicy").cloned();
            for (key, value) in body.iter() {
                if !RESOURCE_ATTRIBUTES.contains(&key) {
                    // Keys of a validated mapping are unique.
                    let _ = resource.extra.insert(key, value.clone());
                }
            }

            resources.insert(logical_id.to_string(), resource);
        }

        Ok(resources)
    }

    fn map_section<T>(
        &self,
        root: &Mapping,
        section: &str,
        project: impl Fn(&Node) -> T,
    ) -> TemplateResult<BTreeMap<String, T>> {
        let Some(node) = root.get(section) else {
            return Ok(BTreeMap::new());
        };
        let entries = self.expect_mapping(node, section, section)?;
        Ok(entries
            .iter()
            .map(|(name, value)| (name.to_string(), project(value)))
            .collect())
    }

    fn expect_mapping<'n>(
        &self,
        node: &'n Node,
        section: &str,
        path: &str,
    ) -> TemplateResult<&'n Mapping> {
        node.as_mapping()
            .ok_or_else(|| TemplateError::MalformedSection {
                section: section.to_string(),
                path: path.to_string(),
                expected: "a mapping".to_string(),
                found: node.shape(),
                location: self.document.location(path),
            })
    }
}

fn map_parameter(node: &Node) -> Parameter {
    let Some(fields) = node.as_mapping() else {
        return Parameter::default();
    };
    Parameter {
        param_type: string_field(fields, "Type"),
        default: fields.get("Default").cloned(),
        description: string_field(fields, "Description"),
        allowed_values: fields
            .get("AllowedValues")
            .and_then(Node::as_sequence)
            .map(<[Node]>::to_vec)
            .unwrap_or_default(),
        allowed_pattern: string_field(fields, "AllowedPattern"),
        constraint_description: string_field(fields, "ConstraintDescription"),
        min_length: fields.get("MinLength").and_then(Node::as_i64).map(|v| v.max(0) as u64),
        max_length: fields.get("MaxLength").and_then(Node::as_i64).map(|v| v.max(0) as u64),
        min_value: fields.get("MinValue").and_then(Node::as_f64),
        max_value: fields.get("MaxValue").and_then(Node::as_f64),
        no_echo: fields.get("NoEcho").and_then(Node::as_bool).unwrap_or(false),
    }
}

fn map_output(node: &Node) -> Output {
    let Some(fields) = node.as_mapping() else {
        return Output::default();
    };
    Output {
        description: string_field(fields, "Description"),
        value: fields.get("Value").cloned(),
        condition: string_field(fields, "Condition"),
        export: fields.get("Export").cloned(),
    }
}

fn string_field(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(Node::as_str).map(str::to_string)
}

fn string_list(node: &Node) -> Vec<String> {
    match node {
        Node::Sequence(items) => items
            .iter()
            .filter_map(Node::as_str)
            .map(str::to_string)
            .collect(),
        other => other.as_str().map(|s| vec![s.to_string()]).unwrap_or_default(),
    }
}
