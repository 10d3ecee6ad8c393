//! Directive names and the shorthand tag table.
//!
//! Every directive has exactly one canonical (long-form) name such as `Ref` or
//! `Fn::GetAtt`, and one YAML shorthand tag such as `!Ref` or `!GetAtt`.
//! Lookups are exact and case-sensitive; anything absent from the table is
//! not a directive.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The closed set of recognized directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DirectiveKind {
    Ref,
    Condition,
    GetAtt,
    Sub,
    Join,
    If,
    Select,
    FindInMap,
    Base64,
    Cidr,
    GetAZs,
    And,
    Or,
    Equals,
    Not,
    Split,
    ImportValue,
    Transform,
    ToJsonString,
    Length,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 20] = [
        DirectiveKind::Ref,
        DirectiveKind::Condition,
        DirectiveKind::GetAtt,
        DirectiveKind::Sub,
        DirectiveKind::Join,
        DirectiveKind::If,
        DirectiveKind::Select,
        DirectiveKind::FindInMap,
        DirectiveKind::Base64,
        DirectiveKind::Cidr,
        DirectiveKind::GetAZs,
        DirectiveKind::And,
        DirectiveKind::Or,
        DirectiveKind::Equals,
        DirectiveKind::Not,
        DirectiveKind::Split,
        DirectiveKind::ImportValue,
        DirectiveKind::Transform,
        DirectiveKind::ToJsonString,
        DirectiveKind::Length,
    ];

    /// Shorthand tag without the leading `!`.
    pub fn shorthand(&self) -> &'static str {
        match self {
            DirectiveKind::Ref => "Ref",
            DirectiveKind::Condition => "Condition",
            DirectiveKind::GetAtt => "GetAtt",
            DirectiveKind::Sub => "Sub",
            DirectiveKind::Join => "Join",
            DirectiveKind::If => "If",
            DirectiveKind::Select => "Select",
            DirectiveKind::FindInMap => "FindInMap",
            DirectiveKind::Base64 => "Base64",
            DirectiveKind::Cidr => "Cidr",
            DirectiveKind::GetAZs => "GetAZs",
            DirectiveKind::And => "And",
            DirectiveKind::Or => "Or",
            DirectiveKind::Equals => "Equals",
            DirectiveKind::Not => "Not",
            DirectiveKind::Split => "Split",
            DirectiveKind::ImportValue => "ImportValue",
            DirectiveKind::Transform => "Transform",
            DirectiveKind::ToJsonString => "ToJsonString",
            DirectiveKind::Length => "Length",
        }
    }

    /// Canonical long-form name used as the single key of `{name: value}`.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            DirectiveKind::Ref => "Ref",
            DirectiveKind::Condition => "Condition",
            DirectiveKind::GetAtt => "Fn::GetAtt",
            DirectiveKind::Sub => "Fn::Sub",
            DirectiveKind::Join => "Fn::Join",
            DirectiveKind::If => "Fn::If",
            DirectiveKind::Select => "Fn::Select",
            DirectiveKind::FindInMap => "Fn::FindInMap",
            DirectiveKind::Base64 => "Fn::Base64",
            DirectiveKind::Cidr => "Fn::Cidr",
            DirectiveKind::GetAZs => "Fn::GetAZs",
            DirectiveKind::And => "Fn::And",
            DirectiveKind::Or => "Fn::Or",
            DirectiveKind::Equals => "Fn::Equals",
            DirectiveKind::Not => "Fn::Not",
            DirectiveKind::Split => "Fn::Split",
            DirectiveKind::ImportValue => "Fn::ImportValue",
            DirectiveKind::Transform => "Fn::Transform",
            DirectiveKind::ToJsonString => "Fn::ToJsonString",
            DirectiveKind::Length => "Fn::Length",
        }
    }

    /// Look up a shorthand tag (with or without the leading `!`).
    pub fn from_shorthand(tag: &str) -> Option<Self> {
        let tag = tag.strip_prefix('!').unwrap_or(tag);
        SHORTHAND_TABLE.get(tag).copied()
    }

    /// Look up a canonical long-form name.
    pub fn from_canonical(name: &str) -> Option<Self> {
        CANONICAL_TABLE.get(name).copied()
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

static SHORTHAND_TABLE: Lazy<HashMap<&'static str, DirectiveKind>> = Lazy::new(|| {
    DirectiveKind::ALL
        .iter()
        .map(|kind| (kind.shorthand(), *kind))
        .collect()
});

static CANONICAL_TABLE: Lazy<HashMap<&'static str, DirectiveKind>> = Lazy::new(|| {
    DirectiveKind::ALL
        .iter()
        .map(|kind| (kind.canonical_name(), *kind))
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_maps_to_canonical() {
        assert_eq!(DirectiveKind::from_shorthand("!GetAtt"), Some(DirectiveKind::GetAtt));
        assert_eq!(DirectiveKind::from_shorthand("Ref"), Some(DirectiveKind::Ref));
        assert_eq!(DirectiveKind::GetAtt.canonical_name(), "Fn::GetAtt");
        assert_eq!(DirectiveKind::Ref.canonical_name(), "Ref");
        assert_eq!(DirectiveKind::Condition.canonical_name(), "Condition");
    }

    #[test]
    fn test_unknown_tags_are_absent() {
        assert_eq!(DirectiveKind::from_shorthand("!Foo"), None);
        assert_eq!(DirectiveKind::from_shorthand("getatt"), None);
        assert_eq!(DirectiveKind::from_canonical("Fn::Foo"), None);
        assert_eq!(DirectiveKind::from_canonical("GetAtt"), None);
    }

    #[test]
    fn test_table_is_a_bijection() {
        for kind in DirectiveKind::ALL {
            assert_eq!(DirectiveKind::from_shorthand(kind.shorthand()), Some(kind));
            assert_eq!(DirectiveKind::from_canonical(kind.canonical_name()), Some(kind));
        }
        assert_eq!(SHORTHAND_TABLE.len(), DirectiveKind::ALL.len());
    }
}
