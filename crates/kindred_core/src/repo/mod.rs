//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the member store contract used by services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Member::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod member_repo;
