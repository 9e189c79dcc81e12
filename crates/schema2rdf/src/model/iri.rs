//! IRI minting for nodes, terms and vocabulary references.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use super::ontology::vocab;

/// Characters that need percent-encoding in IRI path segments.
/// We keep alphanumeric, -, _, ., ~ as unreserved per RFC 3987.
const IRI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Vendor token stripped from the front of node and attribute names.
pub const DEFAULT_VENDOR_PREFIX: &str = "HTAN";

/// Canonical `node:attribute` identifier of a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermUri {
    pub node: String,
    pub attribute: String,
}

impl TermUri {
    /// True when the attribute segment names an identifier (`study_id`, `file_ids`, `uuid`).
    pub fn has_identifier_token(&self) -> bool {
        self.attribute
            .split('_')
            .any(|token| token == "id" || token == "ids")
            || self.attribute.ends_with("id")
    }
}

impl fmt::Display for TermUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.attribute)
    }
}

/// Normalized segment of a node type, e.g. `study` for `Study`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeUri(pub String);

impl NodeUri {
    pub fn segment(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-case a name, split camelCase into snake_case, turn spaces and
/// hyphens into underscores and drop a leading vendor token.
pub fn normalize_segment(name: &str, vendor_prefix: Option<&str>) -> String {
    let mut name = name.trim();
    if let Some(prefix) = vendor_prefix.filter(|p| !p.is_empty()) {
        if name.len() > prefix.len()
            && name.is_char_boundary(prefix.len())
            && name[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            let rest = &name[prefix.len()..];
            if rest.starts_with([' ', '_', '-']) {
                name = rest.trim_start_matches([' ', '_', '-']);
            }
        }
    }

    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_lower);
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Generates consistent IRIs for model terms.
#[derive(Debug, Clone)]
pub struct IriMinter {
    base_uri: String,
    base_ref: String,
    vendor_prefix: Option<String>,
}

impl IriMinter {
    pub fn new(base_uri: &str, base_ref: &str) -> Self {
        let mut base_uri = base_uri.trim().to_string();
        if !base_uri.ends_with('/') && !base_uri.ends_with('#') {
            base_uri.push('/');
        }
        Self {
            base_uri,
            base_ref: base_ref.to_string(),
            vendor_prefix: Some(DEFAULT_VENDOR_PREFIX.to_string()),
        }
    }

    /// Replace the vendor token stripped from names; `None` disables stripping.
    pub fn with_vendor_prefix(mut self, prefix: Option<&str>) -> Self {
        self.vendor_prefix = prefix.map(str::to_string);
        self
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Prefix name bound to [`base_uri`](Self::base_uri).
    pub fn base_ref(&self) -> &str {
        &self.base_ref
    }

    /// Escape a string for use in an IRI path segment.
    pub fn escape(value: &str) -> String {
        utf8_percent_encode(value, IRI_ENCODE_SET).to_string()
    }

    pub fn segment(&self, name: &str) -> String {
        normalize_segment(name, self.vendor_prefix.as_deref())
    }

    pub fn node(&self, name: &str) -> NodeUri {
        NodeUri(self.segment(name))
    }

    pub fn term(&self, node: &str, attribute: &str) -> TermUri {
        TermUri {
            node: self.segment(node),
            attribute: self.segment(attribute),
        }
    }

    /// IRI of a node type (`<base>study`).
    pub fn node_iri(&self, node: &NodeUri) -> String {
        format!("{}{}", self.base_uri, Self::escape(node.segment()))
    }

    /// Namespace holding a node's terms (`<base>study/`).
    pub fn node_namespace(&self, segment: &str) -> String {
        format!("{}{}/", self.base_uri, Self::escape(segment))
    }

    pub fn term_iri(&self, term: &TermUri) -> String {
        format!(
            "{}{}",
            self.node_namespace(&term.node),
            Self::escape(&term.attribute)
        )
    }

    /// IRI of a predicate in the model namespace.
    pub fn predicate_iri(&self, local: &str) -> String {
        format!("{}{}", self.base_uri, local)
    }

    /// Namespace of an external vocabulary. Unregistered vocabularies live
    /// under `<base>ext/<namespace>/`.
    pub fn vocab_namespace(&self, namespace: &str) -> String {
        match vocab::namespace(namespace) {
            Some(ns) => ns.to_string(),
            None => format!("{}ext/{}/", self.base_uri, Self::escape(namespace)),
        }
    }
}
