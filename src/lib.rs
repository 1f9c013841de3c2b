//! # ownership-engine
//!
//! Effective-ownership resolution engine for partially owned account
//! structures.
//!
//! Given a time-stamped ledger of fractional ownership edges
//! ("Owner owns X% of Owned as of Date"), this engine derives, for any
//! cutoff date, the effective (direct + indirect, multi-level) ownership
//! between every pair of entities, and generates the proportionally-split
//! sub-accounts used in portfolio and account structuring.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: entities, ownership edges, the raw
//!   ledger, the effective-ownership timeline
//! - **engine** — The resolution pipeline: validate → densify → resolve →
//!   compress → collapse
//! - **accounts** — Account metadata and the split-account generator
//! - **io** — CSV import/export shims
//! - **simulation** — Random ledger generation for stress testing
//!
//! Each run is a pure function of the input ledger and a cutoff date:
//! no network access, no state between runs.

pub mod accounts;
pub mod core;
pub mod engine;
pub mod io;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::accounts::metadata::{AccountBook, AccountRecord};
    pub use crate::accounts::splits::{generate_splits, SplitRecord};
    pub use crate::core::edge::{OwnershipEdge, OwnershipLedger};
    pub use crate::core::entity::EntityId;
    pub use crate::core::timeline::{OwnershipRecord, OwnershipTimeline};
    pub use crate::engine::compress::compress;
    pub use crate::engine::cutoff::{collapse, CollapsedTimeline};
    pub use crate::engine::densify::{densify, DensifiedLedger};
    pub use crate::engine::resolve::{resolve, OwnershipMatrix};
    pub use crate::engine::validate::{validate, ValidatedLedger, ValidationError, ValidationMode};
}
