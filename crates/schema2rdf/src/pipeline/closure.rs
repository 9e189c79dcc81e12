//! Attribute lookup and depth-first closure over `dependsOn` edges.

use std::collections::{HashMap, HashSet};

use crate::error::ModelError;
use crate::model::record::{AttributeRecord, ModelTable};

/// Attribute rows indexed separately from node rows.
pub struct AttributeIndex<'a> {
    global: HashMap<&'a str, &'a AttributeRecord>,
    scoped: HashMap<&'a str, HashMap<&'a str, &'a AttributeRecord>>,
    nodes: HashMap<&'a str, &'a AttributeRecord>,
}

impl<'a> AttributeIndex<'a> {
    pub fn new(table: &'a ModelTable) -> Self {
        let mut index = Self {
            global: HashMap::new(),
            scoped: HashMap::new(),
            nodes: HashMap::new(),
        };
        for record in &table.records {
            if record.is_node() {
                index.nodes.insert(&record.name, record);
            } else if let Some(scope) = &record.scope {
                index
                    .scoped
                    .entry(scope)
                    .or_default()
                    .insert(&record.name, record);
            } else {
                index.global.insert(&record.name, record);
            }
        }
        index
    }

    pub fn node(&self, name: &str) -> Option<&'a AttributeRecord> {
        self.nodes.get(name).copied()
    }

    /// The attribute row `name` as seen from `node`: a row scoped to the
    /// node wins over a global row.
    pub fn attribute(&self, node: &str, name: &str) -> Option<&'a AttributeRecord> {
        self.scoped
            .get(node)
            .and_then(|attributes| attributes.get(name))
            .or_else(|| self.global.get(name))
            .copied()
    }

    /// Every attribute reachable from `node`, depth-first in dependency
    /// order, each once. Dependencies naming other nodes are skipped.
    pub fn closure(
        &self,
        node: &'a AttributeRecord,
    ) -> Result<Vec<&'a AttributeRecord>, ModelError> {
        let mut walk = Walk {
            index: self,
            node: &node.name,
            path: vec![node.name.as_str()],
            seen: HashSet::new(),
            out: Vec::new(),
        };
        for dep in node.dependencies() {
            walk.visit(dep)?;
        }
        Ok(walk.out)
    }
}

struct Walk<'i, 'a> {
    index: &'i AttributeIndex<'a>,
    node: &'a str,
    path: Vec<&'a str>,
    seen: HashSet<(Option<&'a str>, &'a str)>,
    out: Vec<&'a AttributeRecord>,
}

impl<'a> Walk<'_, 'a> {
    fn visit(&mut self, name: &str) -> Result<(), ModelError> {
        let record = match self.index.attribute(self.node, name) {
            Some(record) => record,
            None if self.index.node(name).is_some() => return Ok(()),
            None => {
                return Err(ModelError::DanglingReference {
                    node: self.node.to_string(),
                    attribute: name.to_string(),
                })
            }
        };
        if self.path[1..].contains(&record.name.as_str()) {
            let mut path: Vec<String> = self.path[1..].iter().map(|s| s.to_string()).collect();
            path.push(record.name.clone());
            return Err(ModelError::Cycle { path });
        }
        if !self.seen.insert(record.identity()) {
            return Ok(());
        }

        self.out.push(record);
        self.path.push(&record.name);
        for dep in record.dependencies() {
            self.visit(dep)?;
        }
        self.path.pop();
        Ok(())
    }
}
