//! Test utilities shared across the jira-rest workspace
//!
//! This crate provides:
//! - JSON fixtures shaped like Jira REST responses ([`fixtures`])
//! - Temporary `.netrc` files in an isolated home directory ([`NetrcFixture`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod fixtures;
pub mod netrc;

pub use netrc::NetrcFixture;
