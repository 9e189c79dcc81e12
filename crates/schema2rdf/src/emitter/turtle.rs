use std::collections::{BTreeSet, HashMap};
use std::io::Write;

use crate::model::iri::{IriMinter, NodeUri, TermUri};
use crate::model::ontology::{self, is_local_name, is_prefix_name, model, predicate};
use crate::model::record::{KeyRelation, KeyRole, TripleRecord, VocabRef};

/// Turtle emitter for compiled models.
///
/// The body is buffered so the `@prefix` header can list exactly the
/// prefixes the body uses, plus one per node, before anything is written.
pub struct TurtleEmitter<W: Write> {
    writer: W,
    minter: IriMinter,
    body: String,
    count: u64,
    namespaces: HashMap<String, String>,
    used: BTreeSet<String>,
    nodes: Vec<String>,
    keys_started: bool,
}

impl<W: Write> TurtleEmitter<W> {
    pub fn new(writer: W, minter: IriMinter) -> Self {
        Self {
            writer,
            minter,
            body: String::new(),
            count: 0,
            namespaces: HashMap::new(),
            used: BTreeSet::new(),
            nodes: Vec::new(),
            keys_started: false,
        }
    }

    /// Declare a node; its term namespace gets a prefix line even when no
    /// term of the node is written.
    pub fn add_node(&mut self, node: &NodeUri) {
        let segment = node.segment();
        if !is_prefix_name(segment) || self.nodes.iter().any(|n| n == segment) {
            return;
        }
        let namespace = self.minter.node_namespace(segment);
        if self.bind(segment, &namespace) {
            self.nodes.push(segment.to_string());
        }
    }

    /// Buffer one term block. Clauses end in `;` except the last, which
    /// ends in `.`; optional clauses are left out entirely when empty.
    pub fn emit_record(&mut self, record: &TripleRecord) {
        let subject = self.term(&record.term);
        let mut clauses = vec![
            (self.fixed(predicate::LABEL), literal(&record.label)),
            (self.fixed(predicate::DESCRIPTION), literal(&record.description)),
            (self.model(model::NODE), self.node(&record.node)),
        ];
        if let Some(value_type) = &record.value_type {
            clauses.push((self.model(model::TYPE), literal(value_type)));
        }
        if let Some(node) = &record.required_by {
            clauses.push((self.model(model::REQUIRED_BY), self.node(node)));
        }
        if record.is_key {
            clauses.push((self.model(model::IS_KEY), literal("true")));
        }
        if let Some(values) = &record.has_enum {
            clauses.push((self.model(model::HAS_ENUM), literal(values)));
        }
        for vocab in &record.maps_to {
            clauses.push((self.fixed(predicate::MAPS_TO), self.vocab(vocab)));
        }

        if !self.body.is_empty() {
            self.body.push('\n');
        }
        let last = clauses.len() - 1;
        for (i, (p, o)) in clauses.iter().enumerate() {
            let end = if i == last { '.' } else { ';' };
            if i == 0 {
                self.body.push_str(&format!("{subject} {p} {o} {end}\n"));
            } else {
                self.body.push_str(&format!("    {p} {o} {end}\n"));
            }
        }
        self.count += clauses.len() as u64;
    }

    /// Buffer a key-relation line. Keys whose attribute is not an
    /// identifier are skipped and `false` is returned.
    pub fn emit_key_relation(&mut self, relation: &KeyRelation) -> bool {
        if !relation.term.has_identifier_token() {
            return false;
        }
        let local = match relation.role {
            KeyRole::Primary => model::PRIMARY_KEY,
            KeyRole::Foreign => model::FOREIGN_KEY,
        };
        let s = self.node(&relation.node);
        let p = self.model(local);
        let o = self.term(&relation.term);
        if !self.keys_started && !self.body.is_empty() {
            self.body.push('\n');
        }
        self.keys_started = true;
        self.body.push_str(&format!("{s} {p} {o} .\n"));
        self.count += 1;
        true
    }

    /// Write the header and the buffered body, then flush.
    pub fn finish(&mut self) -> std::io::Result<()> {
        let mut header = String::new();
        for prefix in self.used.iter().filter(|p| !self.nodes.contains(*p)) {
            header.push_str(&format!("@prefix {prefix}: <{}> .\n", self.namespaces[prefix]));
        }
        for node in &self.nodes {
            header.push_str(&format!("@prefix {node}: <{}> .\n", self.namespaces[node]));
        }
        if !header.is_empty() {
            header.push('\n');
        }
        self.writer.write_all(header.as_bytes())?;
        self.writer.write_all(self.body.as_bytes())?;
        self.body.clear();
        self.writer.flush()
    }

    /// Return the number of triples emitted so far.
    pub fn triple_count(&self) -> u64 {
        self.count
    }

    /// Bind `prefix` to `namespace` unless it is already bound elsewhere.
    fn bind(&mut self, prefix: &str, namespace: &str) -> bool {
        match self.namespaces.get(prefix) {
            Some(bound) => bound == namespace,
            None => {
                self.namespaces
                    .insert(prefix.to_string(), namespace.to_string());
                true
            }
        }
    }

    /// Write `prefix:local` when both halves are valid and the prefix is
    /// free or already ours, otherwise the full IRI.
    fn compact(&mut self, prefix: &str, namespace: &str, local: &str) -> String {
        if is_prefix_name(prefix) && is_local_name(local) && self.bind(prefix, namespace) {
            self.used.insert(prefix.to_string());
            return format!("{prefix}:{local}");
        }
        format!("<{namespace}{}>", IriMinter::escape(local))
    }

    fn fixed(&mut self, (prefix, local): (&str, &str)) -> String {
        let namespace = ontology::standard_namespace(prefix).unwrap_or_default();
        self.compact(prefix, namespace, local)
    }

    fn model(&mut self, local: &str) -> String {
        let base_ref = self.minter.base_ref().to_string();
        let base_uri = self.minter.base_uri().to_string();
        self.compact(&base_ref, &base_uri, local)
    }

    fn node(&mut self, node: &NodeUri) -> String {
        let base_ref = self.minter.base_ref().to_string();
        let base_uri = self.minter.base_uri().to_string();
        self.compact(&base_ref, &base_uri, node.segment())
    }

    fn term(&mut self, term: &TermUri) -> String {
        let namespace = self.minter.node_namespace(&term.node);
        self.compact(&term.node, &namespace, &term.attribute)
    }

    /// Registered vocabularies are written under their canonical prefix,
    /// whatever the spelling in the source.
    fn vocab(&mut self, vocab: &VocabRef) -> String {
        let (prefix, namespace) = match ontology::vocab::lookup(&vocab.namespace) {
            Some((prefix, namespace)) => (prefix.to_string(), namespace.to_string()),
            None => (
                vocab.namespace.clone(),
                self.minter.vocab_namespace(&vocab.namespace),
            ),
        };
        self.compact(&prefix, &namespace, &vocab.code)
    }
}

fn literal(value: &str) -> String {
    format!("\"{}\"", escape_literal(value))
}

fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
