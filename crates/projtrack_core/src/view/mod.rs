//! Presentation projections for the host list, detail pane and forms.
//!
//! # Responsibility
//! - Turn stored projects into render-ready rows, detail metadata and form values.
//! - Resolve stored link values into openable URLs.
//!
//! # Invariants
//! - Nothing in this module reads or writes storage.

pub mod form;
pub mod item;
pub mod text;
