//! Member photo storage.
//!
//! # Responsibility
//! - Store uploaded member photos and hand back a stable URL.

pub mod photo_store;
