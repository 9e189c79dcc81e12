//! Resolve node/attribute memberships and mint their term URIs.

use std::collections::HashSet;

use crate::error::ModelError;
use crate::model::iri::{IriMinter, NodeUri, TermUri};
use crate::model::record::{AttributeRecord, ModelTable};

use super::closure::AttributeIndex;

/// One attribute as a member of one node.
#[derive(Debug, Clone)]
pub struct Membership<'a> {
    pub node: &'a AttributeRecord,
    pub attribute: &'a AttributeRecord,
    pub node_uri: NodeUri,
    pub term: TermUri,
}

/// All memberships of a table, grouped by node in table order.
#[derive(Debug, Clone)]
pub struct ResolvedModel<'a> {
    pub nodes: Vec<NodeUri>,
    pub memberships: Vec<Membership<'a>>,
}

/// An attribute shared by several nodes yields one membership per node.
pub fn resolve<'a>(
    table: &'a ModelTable,
    minter: &IriMinter,
) -> Result<ResolvedModel<'a>, ModelError> {
    let index = AttributeIndex::new(table);
    let mut nodes = Vec::with_capacity(table.nodes.len());
    let mut memberships = Vec::new();

    for name in &table.nodes {
        let node = index
            .node(name)
            .ok_or_else(|| ModelError::UnknownNode(name.clone()))?;
        let node_uri = minter.node(&node.name);
        let mut terms = HashSet::new();
        for attribute in index.closure(node)? {
            let term = minter.term(&node.name, &attribute.name);
            if !terms.insert(term.clone()) {
                log::warn!(
                    "attribute '{}' of node '{}' collides with another attribute as {term}",
                    attribute.name,
                    node.name
                );
            }
            memberships.push(Membership {
                node,
                attribute,
                node_uri: node_uri.clone(),
                term,
            });
        }
        nodes.push(node_uri);
    }

    log::info!(
        "resolved {} memberships across {} nodes",
        memberships.len(),
        nodes.len()
    );
    Ok(ResolvedModel { nodes, memberships })
}
