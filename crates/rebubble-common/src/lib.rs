//! Common utilities for the rebubble workspace.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - deduplicated diagnostics for questionable input

pub mod warning;
