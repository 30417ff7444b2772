//! Cross-layer integration tests for RPE
//!
//! Tests that verify correct interaction between multiple crates.

mod foraging;
