//! Error types for each compilation stage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading and normalizing a source table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot infer a dialect for org '{org}' from its name or table header; pass --dialect")]
    UnknownDialect { org: String },

    #[error("unknown dialect '{0}' (expected 'dependency-graph' or 'flat-node-property')")]
    UnknownDialectName(String),

    #[error("missing required column '{column}' for the {dialect} dialect")]
    MissingColumn {
        column: &'static str,
        dialect: &'static str,
    },

    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("row {row}: duplicate attribute '{name}'")]
    DuplicateAttribute { row: usize, name: String },
}

/// Errors raised while subsetting and resolving the attribute graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("node '{node}' depends on '{attribute}', which has no attribute row")]
    DanglingReference { node: String, attribute: String },

    #[error("dependency cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },
}

/// Serializer failures. Only I/O can fail once a model is mapped.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Graph rendering failures. None of these invalidate a written Turtle file.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("cannot parse Turtle: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "rendering failed after {attempts} attempts, graph saved to {}: {last}",
        artifact.display()
    )]
    RetryExhausted {
        attempts: u32,
        artifact: PathBuf,
        last: Box<RenderError>,
    },
}

/// Invalid compile settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base URI '{0}' must be absolute (e.g. https://example.org/model/)")]
    InvalidBaseUri(String),

    #[error("'{0}' is not a valid Turtle prefix name")]
    InvalidPrefix(String),

    #[error("org tag must be non-empty and contain no path separators, got '{0}'")]
    InvalidOrg(String),

    #[error("model version must be non-empty and contain no path separators, got '{0}'")]
    InvalidVersion(String),

    #[error("subset name must be non-empty and contain no path separators, got '{0}'")]
    InvalidSubsetName(String),

    #[error("node '{0}' requested more than once")]
    DuplicateNode(String),
}

/// Any failure that aborts a compilation run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}
