//! Reading model tables and normalizing them into
//! [`ModelTable`](crate::model::record::ModelTable)s.

pub mod adapter;
pub mod dialect;
pub mod loader;
pub mod rows;

pub use dialect::Dialect;
