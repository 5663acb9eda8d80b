//! # obra-core
//!
//! Core types, traits, and utilities for the obra budget tracker.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases and the service result pattern
//! - Core traits (Entity, Identifiable, ProjectScoped)
//! - Startup configuration

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::*;
pub use result::*;
pub use traits::*;
