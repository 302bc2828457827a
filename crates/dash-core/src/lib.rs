//! # dash-core
//!
//! Core types shared across all dashboard crates.
//!
//! This crate provides:
//! - `DashError`, the unified error type
//! - `DashResult<T>`, the result alias every crate re-exports
//! - `RegistrySource`, the registry description shared by config and registry code
//!
//! ## Architecture
//!
//! The crate is intentionally small; registry, workspace and config crates
//! all report failures through the same enum so callers can match on one
//! type regardless of which collaborator failed.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{DashError, DashResult};
pub use types::RegistrySource;
