//! Family member domain model.
//!
//! # Responsibility
//! - Define the canonical member record and its relation labels.
//! - Define the editor draft and the validation rules that gate storage.
//! - Define the owner scope that partitions member collections.
//!
//! # Invariants
//! - Every member is identified by a stable `MemberId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod draft;
pub mod member;
pub mod owner;
pub mod relation;
