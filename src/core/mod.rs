//! Foundational value types: entities, ownership edges, the raw ledger
//! and the effective-ownership timeline.

pub mod edge;
pub mod entity;
pub mod timeline;
