//! Shared Infrastructure
//!
//! Error types used across the identity and management aggregates.

pub mod error;
