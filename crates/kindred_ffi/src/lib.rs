//! FFI surface for the Kindred Flutter shell.

pub mod api;
