//! tabpredict Core
//!
//! Schema-driven request handling shared across tabpredict components.
//!
//! This crate provides:
//! - The feature schema and its dtype heuristic
//! - Batch validation against the schema
//! - Projection and numeric coercion into a column-ordered [`Frame`]
//! - Response assembly and the shared error type

pub mod assemble;
pub mod coerce;
pub mod dtype;
pub mod error;
pub mod schema;
pub mod types;
pub mod validate;

pub use assemble::assemble;
pub use coerce::{coerce, coerce_numeric};
pub use dtype::is_numeric_dtype;
pub use error::{Error, Result};
pub use schema::{FeatureSchema, DEFAULT_DTYPE};
pub use types::{effective_columns, Frame, PredictionResult, RawRow};
pub use validate::{validate, SchemaMismatch};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::schema::FeatureSchema;
    pub use crate::types::{Frame, PredictionResult, RawRow};
    pub use crate::validate::SchemaMismatch;
}
