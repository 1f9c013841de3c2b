//! The ownership resolution pipeline.
//!
//! Stages run in order, each a pure transform of an in-memory table:
//! validate → densify → resolve per date → compress changes → collapse
//! at cutoff. No stage performs I/O; malformed input is caught at the
//! validator boundary and every later stage is total over its input.

pub mod compress;
pub mod cutoff;
pub mod densify;
pub mod resolve;
pub mod validate;
