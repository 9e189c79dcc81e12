//! Map source notations onto the canonical type vocabulary and extract
//! key and vocabulary references.

use std::collections::HashSet;

use crate::model::iri::{IriMinter, NodeUri, TermUri};
use crate::model::ontology::is_prefix_name;
use crate::model::record::{AttributeRecord, KeyRelation, KeyRole, TripleRecord, VocabRef};
use crate::source::Dialect;

use super::resolver::{Membership, ResolvedModel};

/// Key role declared in a properties reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMarker {
    Primary,
    /// Foreign key, optionally naming the referenced node.
    Foreign(Option<String>),
}

/// A parsed properties reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyRefs {
    pub key: Option<KeyMarker>,
    pub maps_to: Vec<VocabRef>,
}

/// Output of the mapper, ready for serialization.
#[derive(Debug, Clone)]
pub struct MappedModel {
    pub nodes: Vec<NodeUri>,
    pub triples: Vec<TripleRecord>,
    pub keys: Vec<KeyRelation>,
}

pub fn map_model(
    resolved: &ResolvedModel<'_>,
    dialect: Dialect,
    minter: &IriMinter,
) -> MappedModel {
    let node_segments: HashSet<&str> = resolved.nodes.iter().map(NodeUri::segment).collect();
    let mut triples = Vec::with_capacity(resolved.memberships.len());
    let mut keys = Vec::new();
    for membership in &resolved.memberships {
        let refs = parse_properties(&membership.attribute.properties_ref);
        if let Some(marker) = &refs.key {
            keys.push(key_relation(marker, membership, minter, &node_segments));
        }
        triples.push(TripleRecord {
            term: membership.term.clone(),
            label: membership.attribute.name.clone(),
            description: membership.attribute.description.clone(),
            node: membership.node_uri.clone(),
            value_type: map_type(membership.attribute, dialect),
            required_by: membership
                .attribute
                .required
                .then(|| membership.node_uri.clone()),
            is_key: refs.key == Some(KeyMarker::Primary),
            has_enum: format_enum(&membership.attribute.valid_values),
            maps_to: refs.maps_to,
        });
    }
    log::info!("mapped {} terms, {} key relations", triples.len(), keys.len());
    MappedModel {
        nodes: resolved.nodes.clone(),
        triples,
        keys,
    }
}

/// A foreign key points into the referenced node's namespace: the named
/// target, else the node the attribute is named after (`study_id` ->
/// `study`), else the owning node.
fn key_relation(
    marker: &KeyMarker,
    membership: &Membership<'_>,
    minter: &IriMinter,
    node_segments: &HashSet<&str>,
) -> KeyRelation {
    match marker {
        KeyMarker::Primary => KeyRelation {
            role: KeyRole::Primary,
            node: membership.node_uri.clone(),
            term: membership.term.clone(),
        },
        KeyMarker::Foreign(target) => {
            let attribute = &membership.term.attribute;
            let owner = target
                .as_deref()
                .map(|t| minter.segment(t))
                .or_else(|| {
                    attribute
                        .strip_suffix("_id")
                        .filter(|seg| node_segments.contains(seg))
                        .map(str::to_string)
                })
                .unwrap_or_else(|| membership.node_uri.segment().to_string());
            KeyRelation {
                role: KeyRole::Foreign,
                node: membership.node_uri.clone(),
                term: TermUri {
                    node: owner,
                    attribute: attribute.clone(),
                },
            }
        }
    }
}

/// Canonical type of an attribute, or `None` when the source gives none.
pub fn map_type(record: &AttributeRecord, dialect: Dialect) -> Option<String> {
    let has_enum = !record.valid_values.is_empty();
    match dialect {
        Dialect::DependencyGraph => {
            let notations = [record.source_type.trim(), record.validation_rule.trim()];
            let words: Vec<String> = notations.iter().flat_map(|n| words(n)).collect();
            if words.iter().any(|w| w == "list" || w == "string_list") {
                Some(array_type(has_enum))
            } else if words.iter().any(|w| w == "str" || w == "string") {
                Some(string_type(has_enum))
            } else {
                notations
                    .iter()
                    .find(|n| !n.is_empty())
                    .map(|n| n.to_string())
            }
        }
        Dialect::FlatNodeProperty => {
            let raw = record.source_type.trim();
            if raw.is_empty() {
                return None;
            }
            let words = words(raw);
            if raw.starts_with('{') {
                let mapped = if words.iter().any(|w| w == "pattern") {
                    "string"
                } else if words.iter().any(|w| w == "units")
                    || (words.iter().any(|w| w == "value_type")
                        && words
                            .iter()
                            .any(|w| matches!(w.as_str(), "number" | "integer" | "float")))
                {
                    "number"
                } else {
                    return Some(raw.to_string());
                };
                return Some(mapped.to_string());
            }
            if words.iter().any(|w| w == "list" || w == "array") {
                Some(array_type(has_enum))
            } else if words
                .iter()
                .any(|w| matches!(w.as_str(), "string" | "str" | "enum" | "text"))
            {
                Some(string_type(has_enum))
            } else {
                Some(raw.to_string())
            }
        }
    }
}

fn string_type(has_enum: bool) -> String {
    if has_enum {
        "string;enum".to_string()
    } else {
        "string".to_string()
    }
}

fn array_type(has_enum: bool) -> String {
    format!("array[{}]", string_type(has_enum))
}

fn words(notation: &str) -> Vec<String> {
    notation
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

/// `['a', 'b']`, or `None` for an empty enumeration. A value holding a
/// single quote is double-quoted instead, and any other embedded quote or
/// backslash is escaped.
pub fn format_enum(values: &[String]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let items: Vec<String> = values.iter().map(|v| quote_item(v)).collect();
    Some(format!("[{}]", items.join(", ")))
}

fn quote_item(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        if c == quote || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote);
    out
}

/// Split a properties reference into a key marker and vocabulary codes.
/// Tokens are separated by commas, semicolons, pipes or whitespace;
/// `primary key` and `foreign key` may be written with a space, and so may
/// the text after a colon.
pub fn parse_properties(text: &str) -> PropertyRefs {
    let mut refs = PropertyRefs::default();
    let mut tokens = text
        .split(|c: char| matches!(c, ',' | ';' | '|') || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .peekable();

    while let Some(token) = tokens.next() {
        let mut token = token.to_string();
        if token.eq_ignore_ascii_case("primary") || token.eq_ignore_ascii_case("foreign") {
            let starts_with_key =
                |n: &&str| n.get(..3).is_some_and(|head| head.eq_ignore_ascii_case("key"));
            if let Some(next) = tokens.next_if(starts_with_key) {
                token = format!("{token}_{next}");
            }
        }
        // `foreign_key: study` names its target in the next token.
        if token.ends_with(':') {
            if let Some(next) = tokens.next() {
                token.push_str(next);
            }
        }

        if let Some(marker) = key_marker(&token) {
            if refs.key.is_some() && refs.key.as_ref() != Some(&marker) {
                log::warn!("conflicting key markers in '{text}'; keeping the first");
            } else {
                refs.key = Some(marker);
            }
        } else if let Some(vocab) = vocab_ref(&token) {
            refs.maps_to.push(vocab);
        } else {
            log::debug!("ignoring property token '{token}'");
        }
    }
    refs
}

fn key_marker(token: &str) -> Option<KeyMarker> {
    let (head, target) = match token.split_once(':') {
        Some((head, target)) => (head, Some(target.trim()).filter(|t| !t.is_empty())),
        None => (token, None),
    };
    match head.to_ascii_lowercase().as_str() {
        "primary_key" | "primarykey" | "pk" | "primary" if target.is_none() => {
            Some(KeyMarker::Primary)
        }
        "foreign_key" | "foreignkey" | "fk" | "foreign" => {
            Some(KeyMarker::Foreign(target.map(str::to_string)))
        }
        _ => None,
    }
}

fn vocab_ref(token: &str) -> Option<VocabRef> {
    let (namespace, code) = token.split_once(':')?;
    let valid_code = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    (is_prefix_name(namespace) && valid_code).then(|| VocabRef {
        namespace: namespace.to_string(),
        code: code.to_string(),
    })
}
