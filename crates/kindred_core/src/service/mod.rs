//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, repository calls and snapshot refreshes.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod family_service;
