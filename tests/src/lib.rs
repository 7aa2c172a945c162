//! # MK-Lottery Test Suite
//!
//! Cross-crate scenarios that no single subsystem crate can exercise alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── support.rs      # Shared rig: store, bus, clock, surfaces
//!     ├── flows.rs        # Control surface → channel → display surface
//!     ├── contention.rs   # Several control surfaces racing for the lease
//!     ├── replication.rs  # Contexts joined only by the store and event log files
//!     └── scenarios.rs    # End-to-end game scenarios, file-backed store
//!
//! tests/benches/
//! └── draw_benchmarks.rs  # Draw engine and gatekeeper throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mk-tests
//! cargo test -p mk-tests integration::contention
//! cargo bench -p mk-tests
//! ```

pub mod integration;
