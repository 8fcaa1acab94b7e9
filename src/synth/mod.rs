//! SQL synthesis - aliasing, view assembly, artifacts
//!
//! Consumes the discovery inventories and the catalog's raw column lists and
//! emits one view-replacement statement per table, plus the machine-readable
//! and flat-text artifacts.

pub mod sql;
pub mod alias;
pub mod query;
pub mod artifact;

pub use alias::AliasPolicy;
pub use query::{GeneratedQuery, QuerySynthesizer, ViewSpec};
