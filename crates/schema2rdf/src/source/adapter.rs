//! Normalize either dialect into one attribute-record table.

use std::collections::{HashMap, HashSet};

use crate::error::SourceError;
use crate::model::record::{AttributeRecord, ModelTable};

use super::dialect::Dialect;
use super::loader::SourceTable;
use super::rows::{DependencyRow, FlatRow};

/// Normalize `table` as `dialect`. Every data row becomes a record or an error.
pub fn normalize(table: &SourceTable, dialect: Dialect) -> Result<ModelTable, SourceError> {
    for &column in dialect.required_columns() {
        if !table.has_column(column) {
            return Err(SourceError::MissingColumn {
                column,
                dialect: dialect.as_str(),
            });
        }
    }

    let records = match dialect {
        Dialect::DependencyGraph => dependency_records(table)?,
        Dialect::FlatNodeProperty => flat_records(table)?,
    };
    let model = ModelTable::new(dialect, records);
    log::info!(
        "normalized {} rows into {} nodes and {} attributes ({dialect})",
        table.len(),
        model.nodes.len(),
        model.attributes().count()
    );
    Ok(model)
}

fn dependency_records(table: &SourceTable) -> Result<Vec<AttributeRecord>, SourceError> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(table.len());
    for (row, parsed) in table.rows::<DependencyRow>() {
        let r = parsed?;
        if r.attribute.is_empty() {
            return Err(empty_cell(row, "Attribute"));
        }
        if !seen.insert(r.attribute.clone()) {
            return Err(SourceError::DuplicateAttribute {
                row,
                name: r.attribute,
            });
        }
        records.push(AttributeRecord {
            name: r.attribute,
            scope: None,
            depends_on: split_list(&r.depends_on),
            description: r.description,
            properties_ref: r.properties,
            required: parse_flag(&r.required),
            valid_values: split_list(&r.valid_values),
            source_type: r.column_type,
            validation_rule: r.validation_rules,
        });
    }
    Ok(records)
}

/// Flat tables have no node rows, so one is synthesized per distinct node,
/// placed before the node's first property.
fn flat_records(table: &SourceTable) -> Result<Vec<AttributeRecord>, SourceError> {
    let mut records: Vec<AttributeRecord> = Vec::with_capacity(table.len());
    let mut node_rows: HashMap<String, usize> = HashMap::new();
    let mut seen = HashSet::new();
    for (row, parsed) in table.rows::<FlatRow>() {
        let r = parsed?;
        if r.node.is_empty() {
            return Err(empty_cell(row, "Node"));
        }
        if r.property.is_empty() {
            return Err(empty_cell(row, "Property"));
        }
        if !seen.insert((r.node.clone(), r.property.clone())) {
            return Err(SourceError::DuplicateAttribute {
                row,
                name: format!("{}.{}", r.node, r.property),
            });
        }

        let node_row = *node_rows.entry(r.node.clone()).or_insert_with(|| {
            records.push(AttributeRecord::node(r.node.clone(), Vec::<String>::new()));
            records.len() - 1
        });
        records[node_row].depends_on.push(r.property.clone());

        records.push(AttributeRecord {
            properties_ref: flat_properties_ref(&r.key, &r.mappings),
            required: parse_flag(&r.required),
            valid_values: split_values(&r.valid_values),
            name: r.property,
            scope: Some(r.node),
            depends_on: Vec::new(),
            description: r.description,
            source_type: r.value_type,
            validation_rule: String::new(),
        });
    }
    Ok(records)
}

fn empty_cell(row: usize, column: &str) -> SourceError {
    SourceError::MalformedRow {
        row,
        reason: format!("empty '{column}' cell"),
    }
}

/// Fold the flat dialect's `Key` and `Mappings` cells into one
/// properties reference, the way dependency-graph tables spell it.
fn flat_properties_ref(key: &str, mappings: &str) -> String {
    let key = key.trim();
    let lower = key.to_ascii_lowercase();
    let marker = if lower.starts_with("foreign") || lower.starts_with("fk") {
        let target = key
            .split_once(':')
            .map(|(_, target)| target.trim().replace(char::is_whitespace, "_"))
            .filter(|target| !target.is_empty());
        Some(match target {
            Some(target) => format!("foreign_key:{target}"),
            None => "foreign_key".to_string(),
        })
    } else if lower.starts_with("primary") || lower == "pk" || parse_flag(key) {
        Some("primary_key".to_string())
    } else {
        None
    };
    marker
        .into_iter()
        .chain(Some(mappings.trim().to_string()).filter(|m| !m.is_empty()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a boolean-like cell: `TRUE`, `Yes`, `Y`, `1`, `Required` or `x`.
pub fn parse_flag(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "required" | "x"
    )
}

/// Split a comma-joined cell, dropping brackets, quotes and empty items.
pub fn split_list(cell: &str) -> Vec<String> {
    split_on(cell, &[','])
}

/// Split an enumeration cell. Semicolons or pipes take precedence over
/// commas so values that contain commas survive.
pub fn split_values(cell: &str) -> Vec<String> {
    if cell.contains([';', '|']) {
        split_on(cell, &[';', '|'])
    } else {
        split_on(cell, &[','])
    }
}

fn split_on(cell: &str, separators: &[char]) -> Vec<String> {
    let cell = cell.trim();
    let cell = cell
        .strip_prefix('[')
        .and_then(|c| c.strip_suffix(']'))
        .unwrap_or(cell);
    cell.split(separators)
        .map(|item| item.trim().trim_matches(['"', '\'']).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
