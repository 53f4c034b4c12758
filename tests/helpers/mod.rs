// Shared fixtures for the unit and integration suites.
//
// Every fixture runs against the in-process store, so the suites need no database.
// Usage from a test crate under tests/unit or tests/integration:
//
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]

pub mod test_data;

pub use test_data::*;
