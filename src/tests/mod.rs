//! tests/mod.rs
//! Unit and integration tests, run against in-memory or temp-file SQLite.

mod channel_tests;
mod support;
