//! # bindist Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational components shared by the packaging command:
//! - `config`: the release layout, its defaults, loading and validation
//! - `error`: error types and the crate-wide `Result` alias
//!
//! ```rust
//! use crate::core::config; // For loading the release layout
//! use crate::core::error::{BindistError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
