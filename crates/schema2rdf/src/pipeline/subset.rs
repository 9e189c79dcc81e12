//! Restrict a model table to the attribute closure of selected nodes.

use std::collections::HashSet;

use crate::error::ModelError;
use crate::model::record::{AttributeRecord, ModelTable, NODE_MARKER};

use super::closure::AttributeIndex;

/// Keep the requested node rows, every attribute reachable from them and
/// nothing else. Node rows list only the attributes that survive. Rows
/// keep their source order.
pub fn subset(table: &ModelTable, requested: &[String]) -> Result<ModelTable, ModelError> {
    let index = AttributeIndex::new(table);
    let mut kept_nodes = HashSet::new();
    let mut kept_attributes = HashSet::new();

    for name in requested {
        let node = index
            .node(name)
            .ok_or_else(|| ModelError::UnknownNode(name.clone()))?;
        kept_nodes.insert(node.name.as_str());
        for attribute in index.closure(node)? {
            kept_attributes.insert(attribute.identity());
        }
    }

    let records: Vec<AttributeRecord> = table
        .records
        .iter()
        .filter_map(|record| {
            if record.is_node() {
                kept_nodes
                    .contains(record.name.as_str())
                    .then(|| rewrite_node(record, &index, &kept_attributes))
            } else {
                kept_attributes
                    .contains(&record.identity())
                    .then(|| record.clone())
            }
        })
        .collect();

    let subset = ModelTable::new(table.dialect, records);
    log::info!(
        "subset to {:?}: kept {} of {} attributes",
        subset.nodes,
        subset.attributes().count(),
        table.attributes().count()
    );
    Ok(subset)
}

fn rewrite_node(
    node: &AttributeRecord,
    index: &AttributeIndex<'_>,
    kept: &HashSet<(Option<&str>, &str)>,
) -> AttributeRecord {
    let mut depends_on = vec![NODE_MARKER.to_string()];
    depends_on.extend(
        node.dependencies()
            .filter(|dep| {
                index
                    .attribute(&node.name, dep)
                    .is_some_and(|attribute| kept.contains(&attribute.identity()))
            })
            .map(str::to_string),
    );
    AttributeRecord {
        depends_on,
        ..node.clone()
    }
}
