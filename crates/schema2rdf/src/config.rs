//! Settings of one compilation run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::iri::{IriMinter, DEFAULT_VENDOR_PREFIX};
use crate::model::ontology::{is_prefix_name, model};
use crate::source::Dialect;

pub const DEFAULT_BASE_URI: &str = "https://metadata.example/model/";
pub const DEFAULT_BASE_REF: &str = "model";
pub const DEFAULT_VERSION: &str = "v1.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Organization tag; names the output and selects a default dialect.
    pub org: String,
    pub dialect: Option<Dialect>,
    pub delimiter: Option<u8>,
    pub base_uri: String,
    /// Prefix bound to `base_uri` in the output.
    pub base_ref: String,
    pub version: String,
    /// Nodes to keep; empty keeps the whole model.
    pub nodes: Vec<String>,
    pub subset_name: Option<String>,
    pub vendor_prefix: Option<String>,
    pub render_png: bool,
    pub interactive: bool,
    pub dot_command: String,
}

impl CompileConfig {
    pub fn new(input: impl Into<PathBuf>, org: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from("."),
            org: org.into(),
            dialect: None,
            delimiter: None,
            base_uri: DEFAULT_BASE_URI.to_string(),
            base_ref: DEFAULT_BASE_REF.to_string(),
            version: DEFAULT_VERSION.to_string(),
            nodes: Vec::new(),
            subset_name: None,
            vendor_prefix: Some(DEFAULT_VENDOR_PREFIX.to_string()),
            render_png: false,
            interactive: false,
            dot_command: "dot".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let path_safe = |s: &str| !s.trim().is_empty() && !s.contains(['/', '\\']);
        if !path_safe(&self.org) {
            return Err(ConfigError::InvalidOrg(self.org.clone()));
        }
        if !path_safe(&self.version) {
            return Err(ConfigError::InvalidVersion(self.version.clone()));
        }
        if let Some(name) = self.subset_name.as_deref().filter(|n| !path_safe(n)) {
            return Err(ConfigError::InvalidSubsetName(name.to_string()));
        }
        let uri = self.base_uri.trim();
        let scheme_ok = uri
            .split_once(':')
            .is_some_and(|(scheme, rest)| {
                !scheme.is_empty()
                    && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
                    && !rest.is_empty()
            });
        if !scheme_ok || uri.contains(char::is_whitespace) || uri.contains(['<', '>', '"']) {
            return Err(ConfigError::InvalidBaseUri(self.base_uri.clone()));
        }
        if !is_prefix_name(&self.base_ref) {
            return Err(ConfigError::InvalidPrefix(self.base_ref.clone()));
        }
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.as_str()) {
                return Err(ConfigError::DuplicateNode(node.clone()));
            }
        }
        Ok(())
    }

    pub fn minter(&self) -> IriMinter {
        IriMinter::new(&self.base_uri, &self.base_ref)
            .with_vendor_prefix(self.vendor_prefix.as_deref())
    }

    /// `<org>_<subset>_<version>`, where the subset is the explicit name,
    /// the requested node segments joined by `-`, or `all`.
    pub fn output_stem(&self) -> String {
        let subset = match (&self.subset_name, self.nodes.is_empty()) {
            (Some(name), _) => name.clone(),
            (None, true) => "all".to_string(),
            (None, false) => {
                let minter = self.minter();
                self.nodes
                    .iter()
                    .map(|n| minter.segment(n))
                    .collect::<Vec<_>>()
                    .join("-")
            }
        };
        format!("{}_{}_{}", self.org, subset, self.version)
    }

    pub fn output_path(&self) -> PathBuf {
        self.sibling("ttl")
    }

    pub fn png_path(&self) -> PathBuf {
        self.sibling("png")
    }

    /// Where a graph that never rendered is saved.
    pub fn error_artifact_path(&self) -> PathBuf {
        self.sibling("error.dot")
    }

    /// Full IRI of the predicate pruned between render attempts.
    pub fn prune_predicate(&self) -> String {
        self.minter().predicate_iri(model::HAS_ENUM)
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        Path::new(&self.output_dir).join(format!("{}.{extension}", self.output_stem()))
    }
}
