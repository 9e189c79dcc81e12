pub mod turtle;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::EmitError;
use crate::model::iri::IriMinter;
use crate::pipeline::mapper::MappedModel;

use self::turtle::TurtleEmitter;

/// Serialize a mapped model: term blocks first, then key relations.
/// Returns the number of triples written.
pub fn write_model<W: Write>(
    model: &MappedModel,
    minter: &IriMinter,
    writer: W,
) -> std::io::Result<u64> {
    let mut emitter = TurtleEmitter::new(writer, minter.clone());
    for node in &model.nodes {
        emitter.add_node(node);
    }
    for record in &model.triples {
        emitter.emit_record(record);
    }
    let mut skipped = 0;
    for relation in &model.keys {
        if !emitter.emit_key_relation(relation) {
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::debug!("skipped {skipped} key relations without an identifier token");
    }
    emitter.finish()?;
    Ok(emitter.triple_count())
}

/// [`write_model`] into a file. A failed write can leave a partial file,
/// which callers must discard.
pub fn write_model_file(
    model: &MappedModel,
    minter: &IriMinter,
    path: &Path,
) -> Result<u64, EmitError> {
    let io_error = |source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    write_model(model, minter, BufWriter::new(file)).map_err(io_error)
}
