//! Integration tests for Layer 0: Foundation
//!
//! Tests for values, identifiers, primitives, geometry, and errors.

mod errors;
