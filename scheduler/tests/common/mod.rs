//! Common test utilities and infrastructure
//!
//! Fixtures for employees and shifts plus helpers that stand up a mock solver.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::TestHelpers;
