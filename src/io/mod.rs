//! CSV import/export shims around the engine.
//!
//! The engine itself performs no I/O; these readers and writers adapt
//! flat tabular files to the in-memory types at the process boundary.

pub mod tabular;
