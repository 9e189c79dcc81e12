//! Compile tabular metadata data models into RDF Turtle.
//!
//! A model table in one of two [`Dialect`](source::Dialect)s is normalized
//! into [`AttributeRecord`](model::record::AttributeRecord)s, optionally
//! subset to a set of node types, resolved into node/attribute memberships,
//! mapped to the canonical type vocabulary and written out as Turtle. The
//! written file can then be rendered as a graph image.

pub mod config;
pub mod emitter;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod source;

pub use config::CompileConfig;
pub use error::CompileError;
pub use pipeline::{compile, CompileReport};
