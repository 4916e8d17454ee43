//! Key/value repository abstractions and implementations.
//!
//! # Responsibility
//! - Define the storage contract the project store writes its blob through.
//! - Isolate SQLite details from store/business orchestration.
//!
//! # Invariants
//! - Repositories store opaque strings; encoding is owned by the service layer.

pub mod kv_repo;
pub mod memory_kv;
