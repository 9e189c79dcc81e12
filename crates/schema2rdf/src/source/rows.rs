//! Serde models of the raw table rows.
//!
//! Only the columns the compiler reads are modelled. Other columns are
//! ignored, and every optional column defaults to an empty cell, so
//! spreadsheets with extra or missing optional columns load unchanged.

use serde::Deserialize;

/// A row of a dependency-graph table (one row per attribute or node).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyRow {
    #[serde(rename = "Attribute", default)]
    pub attribute: String,
    #[serde(rename = "DependsOn", default)]
    pub depends_on: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Valid Values", default)]
    pub valid_values: String,
    #[serde(rename = "Properties", default)]
    pub properties: String,
    #[serde(rename = "Required", default)]
    pub required: String,
    #[serde(rename = "Validation Rules", default)]
    pub validation_rules: String,
    #[serde(rename = "columnType", default)]
    pub column_type: String,
}

/// A row of a flat node-property table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlatRow {
    #[serde(rename = "Node", default)]
    pub node: String,
    #[serde(rename = "Property", default)]
    pub property: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Type", default)]
    pub value_type: String,
    #[serde(rename = "Key", default)]
    pub key: String,
    #[serde(rename = "Required", default)]
    pub required: String,
    #[serde(rename = "Enum", alias = "Valid Values", default)]
    pub valid_values: String,
    #[serde(rename = "Mappings", alias = "CDE", default)]
    pub mappings: String,
}
