//! Shared fixtures for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! shared pieces live here instead of being copied into each test crate.
//! Every test crate compiles the whole module but exercises only a subset,
//! hence the module-wide dead-code allowance.
#![allow(dead_code)]

pub mod http;
pub mod memory;
