//! In-memory triple graph read back from a written Turtle file.

use std::collections::HashMap;
use std::fmt;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::RenderError;

/// A subject or object: an IRI or a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    /// The term in N-Triples form.
    pub key: String,
    /// Local name of an IRI, or the quoted literal value.
    pub label: String,
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub predicate: String,
    pub label: String,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Triples as a directed graph: subjects and objects are vertices,
/// predicates are edges. Equal terms share one vertex.
#[derive(Debug, Clone, Default)]
pub struct TripleGraph {
    graph: DiGraph<Vertex, Edge>,
    index: HashMap<String, NodeIndex>,
}

impl TripleGraph {
    pub fn parse(turtle: &str) -> Result<Self, RenderError> {
        let mut graph = Self::default();
        for quad in RdfParser::from_format(RdfFormat::Turtle).for_slice(turtle.as_bytes()) {
            let quad = quad.map_err(|e| RenderError::Parse(e.to_string()))?;
            let predicate = Edge {
                label: local_name(quad.predicate.as_str()).to_string(),
                predicate: quad.predicate.as_str().to_string(),
            };
            graph.insert(
                vertex(Term::from(quad.subject)),
                predicate,
                vertex(quad.object),
            );
        }
        Ok(graph)
    }

    pub fn insert(&mut self, subject: Vertex, predicate: Edge, object: Vertex) {
        let s = self.vertex(subject);
        let o = self.vertex(object);
        self.graph.add_edge(s, o, predicate);
    }

    fn vertex(&mut self, vertex: Vertex) -> NodeIndex {
        if let Some(&index) = self.index.get(&vertex.key) {
            return index;
        }
        let key = vertex.key.clone();
        let index = self.graph.add_node(vertex);
        self.index.insert(key, index);
        index
    }

    pub fn triple_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn count_predicate(&self, predicate: &str) -> usize {
        self.graph
            .edge_weights()
            .filter(|e| e.predicate == predicate)
            .count()
    }

    /// Drop every triple using `predicate` and any vertex left without
    /// edges. Returns the number of triples removed.
    pub fn remove_predicate(&mut self, predicate: &str) -> usize {
        let before = self.graph.edge_count();
        self.graph
            .retain_edges(|g, e| g.edge_weight(e).is_none_or(|w| w.predicate != predicate));
        self.graph
            .retain_nodes(|g, n| g.neighbors_undirected(n).next().is_some());
        self.index = self
            .graph
            .node_indices()
            .map(|n| (self.graph[n].key.clone(), n))
            .collect();
        before - self.graph.edge_count()
    }

    /// Graphviz DOT source for the graph.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[]))
    }
}

fn vertex(term: Term) -> Vertex {
    let label = match &term {
        Term::NamedNode(node) => local_name(node.as_str()).to_string(),
        Term::Literal(literal) => format!("\"{}\"", literal.value()),
        other => other.to_string(),
    };
    Vertex {
        key: term.to_string(),
        label,
    }
}

/// Last path or fragment segment of an IRI.
fn local_name(iri: &str) -> &str {
    iri.rsplit(['/', '#'])
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or(iri)
}
