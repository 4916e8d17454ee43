//! Host-facing FFI surface for projtrack.

pub mod api;
