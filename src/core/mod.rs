//! core
//!
//! Core domain types and configuration for tcr.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, CommitRecord, the checkpoint sentinel
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - The checkpoint sentinel is defined once and shared by every code path

pub mod config;
pub mod types;
