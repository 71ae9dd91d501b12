//! Consolidation engine for relmap: folds raw per-type mapping fragments into
//! per-table views, resolves inheritance table sharing and discriminators,
//! and normalizes the mapping graph in place.
//!
//! The engine is a single synchronous pass over one `DatabaseMapping`: no
//! I/O, no global state, exclusive `&mut` access for the duration of
//! `configure`. See `relmap_schema::validate` for the pre-pass the input is
//! expected to satisfy.

pub mod consolidate;
pub mod report;

#[cfg(test)]
pub(crate) mod test_fixtures;

use crate::consolidate::ConsolidateError;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        consolidate::{MappingConsolidator, consolidate},
        report::ConsolidationReport,
    };
    pub use relmap_schema::prelude::*;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Consolidate(#[from] ConsolidateError),
}
