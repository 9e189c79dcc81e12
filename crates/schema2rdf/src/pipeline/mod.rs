//! The compilation pipeline: normalize, subset, resolve, map, serialize.
//!
//! Every stage before serialization runs in memory, so a model error
//! never leaves a Turtle file behind.

mod closure;
pub mod mapper;
pub mod resolver;
pub mod subset;

use std::path::PathBuf;

use crate::config::CompileConfig;
use crate::emitter;
use crate::error::{CompileError, EmitError};
use crate::source::adapter;
use crate::source::loader::{self, SourceTable};
use crate::source::Dialect;

use self::mapper::{map_model, MappedModel};
use self::resolver::resolve;
use self::subset::subset;

/// Summary of a finished compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub output: PathBuf,
    pub dialect: Dialect,
    pub nodes: usize,
    pub terms: usize,
    pub key_relations: usize,
    pub triples: u64,
}

/// Run every stage up to serialization on an already loaded table.
pub fn build_model(
    table: &SourceTable,
    config: &CompileConfig,
) -> Result<(Dialect, MappedModel), CompileError> {
    let dialect = Dialect::resolve(config.dialect, &config.org, table)?;
    let mut model = adapter::normalize(table, dialect)?;
    if !config.nodes.is_empty() {
        model = subset(&model, &config.nodes)?;
    }
    let minter = config.minter();
    let resolved = resolve(&model, &minter)?;
    Ok((dialect, map_model(&resolved, dialect, &minter)))
}

/// Compile `config.input` into `config.output_path()`.
pub fn compile(config: &CompileConfig) -> Result<CompileReport, CompileError> {
    config.validate()?;
    log::info!("compiling {}", config.input.display());
    let table = loader::load_table(&config.input, config.delimiter)?;
    let (dialect, model) = build_model(&table, config)?;

    std::fs::create_dir_all(&config.output_dir).map_err(|source| EmitError::Io {
        path: config.output_dir.clone(),
        source,
    })?;
    let output = config.output_path();
    let triples = emitter::write_model_file(&model, &config.minter(), &output)?;
    log::info!("wrote {triples} triples to {}", output.display());

    Ok(CompileReport {
        output,
        dialect,
        nodes: model.nodes.len(),
        terms: model.triples.len(),
        key_relations: model
            .keys
            .iter()
            .filter(|k| k.term.has_identifier_token())
            .count(),
        triples,
    })
}
