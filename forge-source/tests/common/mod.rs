//! Shared test harness for forge-source integration tests.

pub mod sources;
