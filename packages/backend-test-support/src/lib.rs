//! Backend test support utilities
//!
//! Shared helpers for the backend's integration test binaries.

pub mod test_logging;
