//! Read-side projections over member snapshots.
//!
//! # Responsibility
//! - Turn a flat member list into the groupings the family views render.
//!
//! # Invariants
//! - Projections are pure and recomputed from a full snapshot every time.

pub mod family;
