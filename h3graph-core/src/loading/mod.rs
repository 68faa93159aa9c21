//! Sources of the raw road graph and turn restrictions.
//!
//! Parsing OSM itself happens elsewhere; the pipeline only needs something
//! implementing [`RawGraphProvider`] and [`RelationExtractor`].

pub mod csv_source;

pub use csv_source::CsvSource;

use crate::Error;
use crate::model::{RawGraph, RawRestriction};

/// Supplies the directed road graph, edges in a stable order
pub trait RawGraphProvider {
    /// # Errors
    ///
    /// Returns an error if the graph cannot be read.
    fn raw_graph(&self) -> Result<RawGraph, Error>;
}

/// Supplies raw turn restriction relations
pub trait RelationExtractor {
    /// # Errors
    ///
    /// Returns an error if the relations cannot be read.
    fn restrictions(&self) -> Result<Vec<RawRestriction>, Error>;
}

impl RawGraphProvider for RawGraph {
    fn raw_graph(&self) -> Result<RawGraph, Error> {
        Ok(self.clone())
    }
}

impl RelationExtractor for Vec<RawRestriction> {
    fn restrictions(&self) -> Result<Vec<RawRestriction>, Error> {
        Ok(self.clone())
    }
}
