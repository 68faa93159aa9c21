//! Graph transformation stages, leaves first

pub mod edges;
pub mod h3_index;
pub mod restrictions;
pub mod shortcuts;
pub mod speed;
pub mod transitions;
