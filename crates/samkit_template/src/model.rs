//! Typed template model.

use std::collections::BTreeMap;

use crate::node::{Mapping, Node};

/// Transform name that marks a serverless application template.
pub const SERVERLESS_TRANSFORM: &str = "AWS::Serverless-2016-10-31";

/// A template parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameter {
    pub param_type: Option<String>,
    pub default: Option<Node>,
    pub description: Option<String>,
    pub allowed_values: Vec<Node>,
    pub allowed_pattern: Option<String>,
    pub constraint_description: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub no_echo: bool,
}

/// A resource entry. `resource_type` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub resource_type: String,
    pub properties: Option<Node>,
    pub metadata: Option<Node>,
    pub depends_on: Vec<String>,
    pub condition: Option<String>,
    pub deletion_policy: Option<Node>,
    pub update_replace_policy: Option<Node>,
    pub update_policy: Option<Node>,
    pub creation_policy: Option<Node>,
    /// Attributes not listed above, in document order.
    pub extra: Mapping,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: None,
            metadata: None,
            depends_on: Vec::new(),
            condition: None,
            deletion_policy: None,
            update_replace_policy: None,
            update_policy: None,
            creation_policy: None,
            extra: Mapping::new(),
        }
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Node> {
        self.properties
            .as_ref()
            .and_then(|p| p.as_mapping())
            .and_then(|p| p.get(name))
    }

    pub fn is_serverless(&self) -> bool {
        self.resource_type.starts_with("AWS::Serverless::")
    }
}

/// A template output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    pub description: Option<String>,
    pub value: Option<Node>,
    pub condition: Option<String>,
    pub export: Option<Node>,
}

/// The typed view of a normalized template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub format_version: Option<String>,
    pub transform: Option<Node>,
    pub description: Option<String>,
    pub metadata: Option<Node>,
    pub globals: Option<Node>,
    pub parameters: BTreeMap<String, Parameter>,
    pub mappings: BTreeMap<String, Node>,
    pub conditions: BTreeMap<String, Node>,
    pub rules: BTreeMap<String, Node>,
    pub resources: BTreeMap<String, Resource>,
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    /// Names of the declared transforms that are plain strings.
    pub fn transform_names(&self) -> Vec<&str> {
        match &self.transform {
            Some(Node::Sequence(items)) => items.iter().filter_map(Node::as_str).collect(),
            Some(node) => node.as_str().into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Whether the template declares the serverless transform.
    pub fn is_sam(&self) -> bool {
        self.transform_names().contains(&SERVERLESS_TRANSFORM)
    }

    /// Resources of the given type, in logical id order.
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
            .map(|(id, r)| (id.as_str(), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_names() {
        let mut template = Template::default();
        assert!(template.transform_names().is_empty());

        template.transform = Some(Node::string(SERVERLESS_TRANSFORM));
        assert!(template.is_sam());

        template.transform = Some(Node::Sequence(vec![
            Node::string("AWS::LanguageExtensions"),
            Node::string(SERVERLESS_TRANSFORM),
        ]));
        assert_eq!(template.transform_names().len(), 2);
        assert!(template.is_sam());
    }

    #[test]
    fn test_resources_of_type() {
        let mut template = Template::default();
        template
            .resources
            .insert("B".into(), Resource::new("AWS::Serverless::Function"));
        template
            .resources
            .insert("A".into(), Resource::new("AWS::S3::Bucket"));

        let functions: Vec<_> = template
            .resources_of_type("AWS::Serverless::Function")
            .map(|(id, _)| id)
            .collect();
        assert_eq!(functions, vec!["B"]);
        assert!(template.resources["B"].is_serverless());
    }
}
