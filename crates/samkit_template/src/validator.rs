//! Structural validation of directive values.
//!
//! Each directive's value is checked against a fixed shape rule. Validation of
//! a whole tree never stops at the first problem: every violation is collected
//! into a [`ValidationReport`] and the caller decides what is fatal.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::directive::DirectiveKind;
use crate::location::{display_path, index_path, key_path, Location};
use crate::node::{Node, Scalar};
use crate::normalizer::NormalizedDocument;

/// A directive whose value does not have the required shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeViolation {
    /// Path of the directive node.
    pub path: String,
    /// Canonical directive name.
    pub directive: String,
    pub expected: String,
    pub found: String,
    pub location: Option<Location>,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} requires {}, found {}",
            self.directive,
            display_path(&self.path),
            self.expected,
            self.found
        )?;
        if let Some(loc) = self.location {
            write!(f, " ({})", loc)?;
        }
        Ok(())
    }
}

/// Shape mismatch for a single directive value, before path context is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub expected: &'static str,
    pub found: String,
}

/// Outcome of validating a tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<ShapeViolation>,
    /// Number of directive nodes inspected.
    pub checked: usize,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
            checked: 0,
        }
    }

    pub fn add_violation(&mut self, violation: ShapeViolation) {
        self.valid = false;
        self.violations.push(violation);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        if !other.valid {
            self.valid = false;
        }
        self.checked += other.checked;
        self.violations.extend(other.violations);
    }
}

/// Validator for directive shapes.
pub struct DirectiveValidator;

impl DirectiveValidator {
    /// Check one directive value against its rule.
    pub fn check(kind: DirectiveKind, value: &Node) -> Result<(), ShapeMismatch> {
        let ok = match kind {
            DirectiveKind::Ref | DirectiveKind::Condition => is_string(value),
            DirectiveKind::GetAtt => is_string(value) || seq_len(value) == Some(2),
            DirectiveKind::Sub => {
                is_string(value)
                    || matches!(
                        value.as_sequence(),
                        Some([template, Node::Mapping(_)]) if is_string(template)
                    )
            }
            DirectiveKind::Join => matches!(
                value.as_sequence(),
                Some([delimiter, list]) if is_string(delimiter) && is_list(list)
            ),
            DirectiveKind::If => matches!(
                value.as_sequence(),
                Some([condition, _, _]) if is_string(condition)
            ),
            DirectiveKind::Select => matches!(
                value.as_sequence(),
                Some([index, list]) if is_index(index) && is_list(list)
            ),
            DirectiveKind::FindInMap | DirectiveKind::Cidr => seq_len(value) == Some(3),
            DirectiveKind::Base64 | DirectiveKind::GetAZs | DirectiveKind::ImportValue => {
                is_string(value) || value.is_directive()
            }
            DirectiveKind::And | DirectiveKind::Or => {
                matches!(seq_len(value), Some(n) if (2..=10).contains(&n))
            }
            DirectiveKind::Equals => seq_len(value) == Some(2),
            DirectiveKind::Not => seq_len(value) == Some(1),
            DirectiveKind::Split => matches!(
                value.as_sequence(),
                Some([delimiter, _]) if is_string(delimiter)
            ),
            DirectiveKind::Transform | DirectiveKind::ToJsonString | DirectiveKind::Length => true,
        };

        if ok {
            Ok(())
        } else {
            Err(ShapeMismatch {
                expected: Self::expected_shape(kind),
                found: value.shape(),
            })
        }
    }

    /// Human-readable rule for a directive.
    pub fn expected_shape(kind: DirectiveKind) -> &'static str {
        match kind {
            DirectiveKind::Ref | DirectiveKind::Condition => "scalar string",
            DirectiveKind::GetAtt => "scalar string or 2-element sequence",
            DirectiveKind::Sub => {
                "scalar string or 2-element sequence [template-string, variable-mapping]"
            }
            DirectiveKind::Join => "2-element sequence [delimiter-string, list-of-values]",
            DirectiveKind::If => {
                "3-element sequence [condition-name-string, true-value, false-value]"
            }
            DirectiveKind::Select => "2-element sequence [index, list]",
            DirectiveKind::FindInMap => "3-element sequence [map-name, top-key, second-key]",
            DirectiveKind::Base64 | DirectiveKind::GetAZs | DirectiveKind::ImportValue => {
                "scalar string or nested directive"
            }
            DirectiveKind::Cidr => "3-element sequence",
            DirectiveKind::And | DirectiveKind::Or => "sequence of 2-10 elements",
            DirectiveKind::Equals => "2-element sequence",
            DirectiveKind::Not => "1-element sequence",
            DirectiveKind::Split => "2-element sequence [delimiter-string, value]",
            DirectiveKind::Transform | DirectiveKind::ToJsonString | DirectiveKind::Length => {
                "any value"
            }
        }
    }

    /// Validate every directive in a normalized document.
    pub fn validate_document(document: &NormalizedDocument) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut walk = TreeWalk {
            document: Some(document),
            report: &mut report,
        };
        walk.visit(&document.root, "");
        Self::log(&report);
        report
    }

    /// Validate every directive in a bare tree (no location data).
    pub fn validate_tree(root: &Node) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut walk = TreeWalk {
            document: None,
            report: &mut report,
        };
        walk.visit(root, "");
        Self::log(&report);
        report
    }

    fn log(report: &ValidationReport) {
        if report.valid {
            debug!("Checked {} directive(s), no violations", report.checked);
        } else {
            warn!(
                "Checked {} directive(s), {} violation(s)",
                report.checked,
                report.violations.len()
            );
        }
    }
}

struct TreeWalk<'a> {
    document: Option<&'a NormalizedDocument>,
    report: &'a mut ValidationReport,
}

impl TreeWalk<'_> {
    fn visit(&mut self, node: &Node, path: &str) {
        match node {
            Node::Scalar(_) => {}
            Node::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.visit(item, &index_path(path, index));
                }
            }
            Node::Mapping(map) => {
                for (key, value) in map.iter() {
                    self.visit(value, &key_path(path, key));
                }
            }
            Node::Directive(directive) => {
                self.report.checked += 1;
                if let Err(mismatch) = DirectiveValidator::check(directive.kind, &directive.value) {
                    self.report.add_violation(ShapeViolation {
                        path: path.to_string(),
                        directive: directive.name().to_string(),
                        expected: mismatch.expected.to_string(),
                        found: mismatch.found,
                        location: self.document.and_then(|doc| doc.location(path)),
                    });
                }
                self.visit(&directive.value, &key_path(path, directive.name()));
            }
        }
    }
}

fn is_string(node: &Node) -> bool {
    matches!(node, Node::Scalar(Scalar::String(_)))
}

fn seq_len(node: &Node) -> Option<usize> {
    node.as_sequence().map(|items| items.len())
}

// A list argument may be written inline or produced by another directive.
fn is_list(node: &Node) -> bool {
    matches!(node, Node::Sequence(_) | Node::Directive(_))
}

fn is_index(node: &Node) -> bool {
    match node {
        Node::Scalar(Scalar::Int(i)) => *i >= 0,
        Node::Scalar(Scalar::String(s)) => s.trim().parse::<u64>().is_ok(),
        Node::Directive(_) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: Vec<Node>) -> Node {
        Node::Sequence(items)
    }

    fn s(text: &str) -> Node {
        Node::string(text)
    }

    #[test]
    fn test_if_requires_three_elements() {
        let two = seq(vec![s("IsProd"), s("a")]);
        let err = DirectiveValidator::check(DirectiveKind::If, &two).unwrap_err();
        assert_eq!(err.found, "2-element sequence");
        assert!(err.expected.starts_with("3-element sequence"));

        let three = seq(vec![s("IsProd"), s("a"), s("b")]);
        assert!(DirectiveValidator::check(DirectiveKind::If, &three).is_ok());
    }

    #[test]
    fn test_join_shape() {
        let ok = seq(vec![s(","), seq(vec![s("a"), s("b")])]);
        assert!(DirectiveValidator::check(DirectiveKind::Join, &ok).is_ok());

        let list_from_directive = seq(vec![
            s(","),
            Node::directive(DirectiveKind::GetAZs, s("")),
        ]);
        assert!(DirectiveValidator::check(DirectiveKind::Join, &list_from_directive).is_ok());

        let bad = seq(vec![s(","), s("a")]);
        assert!(DirectiveValidator::check(DirectiveKind::Join, &bad).is_err());
    }

    #[test]
    fn test_boolean_arity() {
        let one = seq(vec![s("A")]);
        let eleven = seq((0..11).map(|i| s(&i.to_string())).collect());
        let two = seq(vec![s("A"), s("B")]);

        assert!(DirectiveValidator::check(DirectiveKind::And, &one).is_err());
        assert!(DirectiveValidator::check(DirectiveKind::Or, &eleven).is_err());
        assert!(DirectiveValidator::check(DirectiveKind::And, &two).is_ok());
        assert!(DirectiveValidator::check(DirectiveKind::Not, &one).is_ok());
        assert!(DirectiveValidator::check(DirectiveKind::Not, &two).is_err());
        assert!(DirectiveValidator::check(DirectiveKind::Equals, &two).is_ok());
    }

    #[test]
    fn test_sub_and_select() {
        let mut vars = crate::node::Mapping::new();
        vars.insert("X", s("y")).unwrap();
        let sub = seq(vec![s("${X}"), Node::Mapping(vars)]);
        assert!(DirectiveValidator::check(DirectiveKind::Sub, &sub).is_ok());
        assert!(DirectiveValidator::check(DirectiveKind::Sub, &seq(vec![s("${X}"), s("y")])).is_err());

        let select = seq(vec![Node::Scalar(Scalar::Int(0)), seq(vec![s("a")])]);
        assert!(DirectiveValidator::check(DirectiveKind::Select, &select).is_ok());
        let bad_index = seq(vec![s("first"), seq(vec![s("a")])]);
        assert!(DirectiveValidator::check(DirectiveKind::Select, &bad_index).is_err());
    }

    #[test]
    fn test_base64_accepts_nested_directive() {
        let nested = Node::directive(DirectiveKind::Sub, s("echo ${AWS::Region}"));
        assert!(DirectiveValidator::check(DirectiveKind::Base64, &nested).is_ok());
        assert!(DirectiveValidator::check(DirectiveKind::Base64, &seq(vec![])).is_err());
    }

    fn int(i: i64) -> Node {
        Node::Scalar(Scalar::Int(i))
    }

    #[test]
    fn test_ref_and_condition_require_strings() {
        for kind in [DirectiveKind::Ref, DirectiveKind::Condition] {
            assert!(DirectiveValidator::check(kind, &s("MyBucket")).is_ok());
            let err = DirectiveValidator::check(kind, &int(3)).unwrap_err();
            assert_eq!(err.expected, "scalar string");
            assert_eq!(err.found, "scalar number");
            assert!(DirectiveValidator::check(kind, &seq(vec![s("A")])).is_err());
        }
    }

    #[test]
    fn test_getatt_shape() {
        assert!(DirectiveValidator::check(DirectiveKind::GetAtt, &s("Role.Arn")).is_ok());
        let pair = seq(vec![s("Role"), s("Arn")]);
        assert!(DirectiveValidator::check(DirectiveKind::GetAtt, &pair).is_ok());

        let three = seq(vec![s("Role"), s("Arn"), s("Extra")]);
        let err = DirectiveValidator::check(DirectiveKind::GetAtt, &three).unwrap_err();
        assert_eq!(err.found, "3-element sequence");
    }

    #[test]
    fn test_find_in_map_and_cidr_require_three_elements() {
        for kind in [DirectiveKind::FindInMap, DirectiveKind::Cidr] {
            let three = seq(vec![s("a"), s("b"), s("c")]);
            assert!(DirectiveValidator::check(kind, &three).is_ok());

            let two = seq(vec![s("a"), s("b")]);
            let err = DirectiveValidator::check(kind, &two).unwrap_err();
            assert_eq!(err.found, "2-element sequence");
            assert!(DirectiveValidator::check(kind, &s("a")).is_err());
        }
    }

    #[test]
    fn test_split_shape() {
        let ok = seq(vec![s(","), Node::directive(DirectiveKind::ImportValue, s("Subnets"))]);
        assert!(DirectiveValidator::check(DirectiveKind::Split, &ok).is_ok());

        let numeric_delimiter = seq(vec![int(1), s("a,b")]);
        assert!(DirectiveValidator::check(DirectiveKind::Split, &numeric_delimiter).is_err());
        assert!(DirectiveValidator::check(DirectiveKind::Split, &seq(vec![s(",")])).is_err());
    }

    #[test]
    fn test_import_value_shape() {
        assert!(DirectiveValidator::check(DirectiveKind::ImportValue, &s("SharedVpc")).is_ok());
        let nested = Node::directive(DirectiveKind::Sub, s("${Env}-Vpc"));
        assert!(DirectiveValidator::check(DirectiveKind::ImportValue, &nested).is_ok());

        let err =
            DirectiveValidator::check(DirectiveKind::ImportValue, &seq(vec![s("a")])).unwrap_err();
        assert_eq!(err.expected, "scalar string or nested directive");
    }

    #[test]
    fn test_tree_validation_collects_every_violation() {
        let mut root = crate::node::Mapping::new();
        root.insert("A", Node::directive(DirectiveKind::Ref, seq(vec![]))).unwrap();
        root.insert(
            "B",
            Node::directive(
                DirectiveKind::If,
                seq(vec![s("C"), Node::directive(DirectiveKind::Not, seq(vec![]))]),
            ),
        )
        .unwrap();

        let report = DirectiveValidator::validate_tree(&Node::Mapping(root));
        assert!(!report.valid);
        assert_eq!(report.checked, 3);
        let paths: Vec<_> = report.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["A", "B", "B.Fn::If[1]"]);
    }
}
