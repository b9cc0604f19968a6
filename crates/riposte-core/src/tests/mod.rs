//! Crate-level tests that exercise the whole pipeline.
//!
//! - `scenarios.rs`: worked end-to-end examples with known answers
//! - `properties.rs`: proptest invariants over arbitrary inputs
//! - `helpers.rs`: combatant and registry factories

mod helpers;
