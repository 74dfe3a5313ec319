//! Integration test harness
//!
//! Everything under `tests/integration/` builds into one test binary.

mod crawl_tests;
