//! # Action Relay Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Engine wired to in-memory channels
//! └── integration/      # End-to-end correlation behaviour
//!     ├── ordering.rs   # Concurrency, out-of-order answers, races
//!     ├── lifecycle.rs  # Timeouts, shutdown, transport refusal
//!     └── routing.rs    # Unknown kinds, unknown ids, malformed input
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p relay-tests
//! cargo test -p relay-tests integration::lifecycle::
//!
//! # Benchmarks
//! cargo bench -p relay-tests
//! ```

pub mod harness;
pub mod integration;
