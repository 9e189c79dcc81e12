//! RDF vocabulary used in compiled models.
//!
//! - `rdfs:` and `dcterms:` carry the label and description of a term
//! - `skos:exactMatch` links a term to an external vocabulary code
//! - model predicates (`node`, `type`, `requiredBy`, ...) live in the
//!   namespace bound to the configured base reference

/// Standard RDF namespace URIs
pub mod standard {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// `(prefix, local name)` pairs of the fixed predicates.
pub mod predicate {
    pub const LABEL: (&str, &str) = ("rdfs", "label");
    pub const DESCRIPTION: (&str, &str) = ("dcterms", "description");
    pub const MAPS_TO: (&str, &str) = ("skos", "exactMatch");
}

/// Local names of predicates in the model namespace.
pub mod model {
    pub const NODE: &str = "node";
    pub const TYPE: &str = "type";
    pub const REQUIRED_BY: &str = "requiredBy";
    pub const IS_KEY: &str = "isKey";
    pub const HAS_ENUM: &str = "hasEnum";
    pub const PRIMARY_KEY: &str = "primaryKey";
    pub const FOREIGN_KEY: &str = "foreignKey";
}

/// Well-known external vocabularies referenced from property columns.
pub mod vocab {
    const KNOWN: &[(&str, &str)] = &[
        (
            "caDSR",
            "https://cadsr.cancer.gov/onedata/dmdirect/NIH/NCI/CO/CDEDD?filter=CDEDD.ITEM_ID=",
        ),
        ("CL", "http://purl.obolibrary.org/obo/CL_"),
        ("EDAM", "http://edamontology.org/"),
        ("EFO", "http://www.ebi.ac.uk/efo/EFO_"),
        ("HP", "http://purl.obolibrary.org/obo/HP_"),
        ("MONDO", "http://purl.obolibrary.org/obo/MONDO_"),
        ("NCIT", "http://purl.obolibrary.org/obo/NCIT_"),
        ("OBI", "http://purl.obolibrary.org/obo/OBI_"),
        ("UBERON", "http://purl.obolibrary.org/obo/UBERON_"),
    ];

    /// Canonical prefix and namespace IRI of a registered vocabulary,
    /// matched case-insensitively.
    pub fn lookup(prefix: &str) -> Option<(&'static str, &'static str)> {
        KNOWN
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(prefix))
            .copied()
    }

    pub fn namespace(prefix: &str) -> Option<&'static str> {
        lookup(prefix).map(|(_, ns)| ns)
    }
}

/// Namespaces bound to the fixed prefixes in [`predicate`].
pub fn standard_namespace(prefix: &str) -> Option<&'static str> {
    match prefix {
        "rdf" => Some(standard::RDF),
        "rdfs" => Some(standard::RDFS),
        "dcterms" => Some(standard::DCTERMS),
        "skos" => Some(standard::SKOS),
        _ => None,
    }
}

/// Whether `s` can be written as a Turtle prefix name (PN_PREFIX, ASCII subset).
pub fn is_prefix_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    !s.ends_with('.')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Whether `s` can be written as the local part of a prefixed name.
pub fn is_local_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
