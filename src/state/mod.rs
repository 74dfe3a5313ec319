//! State module for tracking page task progress
//!
//! Every page handed to the worker pool moves through a fixed sequence of
//! stages. `PageTaskState` names those stages and `StateTracker` enforces the
//! allowed transitions for one task.

mod page_state;

// Re-export main types
pub use page_state::{PageTaskState, StateTracker};
