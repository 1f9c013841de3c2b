//! Account metadata and the split-account generator.

pub mod metadata;
pub mod splits;
