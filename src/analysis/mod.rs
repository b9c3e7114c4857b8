//! Analysis modules.
//!
//! Aggregation and scoring over loaded snapshots.

pub mod aggregator;

pub use aggregator::*;
