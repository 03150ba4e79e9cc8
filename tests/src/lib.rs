//! # Stello Responder Test Suite
//!
//! Cross-crate flows that no single crate can test on its own.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── pipeline_benchmarks.rs   # Seal and validation throughput
//! └── src/
//!     ├── fixtures.rs              # Key pairs, sender configs, the stack
//!     └── integration/
//!         ├── http_flows.rs        # Gateway → pipeline → filesystem store
//!         └── sender_view.rs       # What the sender can open afterwards
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p responder-tests
//! cargo bench -p responder-tests
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod integration;
