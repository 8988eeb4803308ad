//! Cross-module tests for the weapon pipeline.
//!
//! - **Scenarios**: trigger input, host timer loop and dispatch end to end
//! - **Properties**: proptest checks of cadence, dispersion and gating
//! - **Helpers**: recording effect service, factories and a host loop
//!
//! # Test Structure
//!
//! - `scenarios.rs`: End-to-end firing scenarios
//! - `properties.rs`: Property-based tests
//! - `helpers.rs`: Test setup utilities and factory functions

pub(crate) mod helpers;
