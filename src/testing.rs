//! Test support shared by unit tests, integration tests and benches.
pub mod fixtures;
pub mod stage_contract;
