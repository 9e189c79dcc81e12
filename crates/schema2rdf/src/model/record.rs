//! Dialect-neutral model records and the derived serialization units.

use crate::source::Dialect;

use super::iri::{NodeUri, TermUri};

/// Dependency entry marking a record as a node declaration.
pub const NODE_MARKER: &str = "Component";

/// One row of the normalized intermediate table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRecord {
    pub name: String,
    /// Owning node for rows that only exist within one node (flat dialect).
    pub scope: Option<String>,
    pub depends_on: Vec<String>,
    pub description: String,
    pub properties_ref: String,
    pub required: bool,
    pub valid_values: Vec<String>,
    pub source_type: String,
    pub validation_rule: String,
}

impl AttributeRecord {
    /// A named row with no dependencies or constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A node declaration depending on `attributes`.
    pub fn node<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut depends_on = vec![NODE_MARKER.to_string()];
        depends_on.extend(attributes.into_iter().map(Into::into));
        Self {
            name: name.into(),
            depends_on,
            ..Self::default()
        }
    }

    pub fn is_node(&self) -> bool {
        self.depends_on.iter().any(|d| d == NODE_MARKER)
    }

    /// Dependencies without the node marker.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.depends_on
            .iter()
            .map(String::as_str)
            .filter(|d| *d != NODE_MARKER)
    }

    /// Identity used to deduplicate rows.
    pub fn identity(&self) -> (Option<&str>, &str) {
        (self.scope.as_deref(), &self.name)
    }
}

/// The normalized table produced by the source adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTable {
    pub dialect: Dialect,
    /// Node and attribute rows in source order.
    pub records: Vec<AttributeRecord>,
    /// Node names in the order they were first encountered.
    pub nodes: Vec<String>,
}

impl ModelTable {
    pub fn new(dialect: Dialect, records: Vec<AttributeRecord>) -> Self {
        let nodes = records
            .iter()
            .filter(|r| r.is_node())
            .map(|r| r.name.clone())
            .collect();
        Self {
            dialect,
            records,
            nodes,
        }
    }

    pub fn node(&self, name: &str) -> Option<&AttributeRecord> {
        self.records.iter().find(|r| r.is_node() && r.name == name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeRecord> {
        self.records.iter().filter(|r| !r.is_node())
    }
}

/// An external vocabulary code such as `NCIT:C16960`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabRef {
    pub namespace: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Primary,
    Foreign,
}

/// A primary or foreign key link between a node and a key term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRelation {
    pub role: KeyRole,
    pub node: NodeUri,
    /// The key term, in the namespace of the node that owns the key.
    pub term: TermUri,
}

/// Everything the serializer writes for one node/attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripleRecord {
    pub term: TermUri,
    pub label: String,
    pub description: String,
    pub node: NodeUri,
    pub value_type: Option<String>,
    pub required_by: Option<NodeUri>,
    pub is_key: bool,
    pub has_enum: Option<String>,
    pub maps_to: Vec<VocabRef>,
}
