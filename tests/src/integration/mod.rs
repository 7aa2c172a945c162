//! Cross-subsystem integration tests.

pub mod support;

mod contention;
mod flows;
mod replication;
mod scenarios;
