/// Page task state definitions
///
/// A task runs `Pending → Fetching → Extracting → ResolvingCategories →
/// Transforming → Writing → Done`. `Failed` is reachable from any non-terminal
/// state. `Done` and `Failed` are terminal.
use crate::CatalogError;
use std::fmt;

/// Represents the current stage of one page task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageTaskState {
    // ===== Active States =====
    /// Dispatched to the pool, waiting for a worker slot
    Pending,

    /// Catalog page is being downloaded
    Fetching,

    /// Item summaries are being pulled out of the page
    Extracting,

    /// Detail pages are being fetched for categories
    ResolvingCategories,

    /// Raw items are being normalized
    Transforming,

    /// Records are being written to the store
    Writing,

    // ===== Terminal States =====
    /// Task completed; records (possibly zero) were handed to the store
    Done,

    /// Task hit an unrecovered error
    Failed,
}

impl PageTaskState {
    /// Returns true for `Done` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if the task may still make progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The state that follows this one on the happy path
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Fetching),
            Self::Fetching => Some(Self::Extracting),
            Self::Extracting => Some(Self::ResolvingCategories),
            Self::ResolvingCategories => Some(Self::Transforming),
            Self::Transforming => Some(Self::Writing),
            Self::Writing => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Checks whether moving from `self` to `to` is allowed
    pub fn can_transition_to(&self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::ResolvingCategories => "resolving_categories",
            Self::Transforming => "transforming",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible task states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Extracting,
            Self::ResolvingCategories,
            Self::Transforming,
            Self::Writing,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageTaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the state of a single page task
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: PageTaskState,
    /// Stage the task was in when it failed
    failed_in: Option<PageTaskState>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            current: PageTaskState::Pending,
            failed_in: None,
        }
    }

    pub fn current(&self) -> PageTaskState {
        self.current
    }

    pub fn failed_in(&self) -> Option<PageTaskState> {
        self.failed_in
    }

    /// Moves to `to`, rejecting transitions the state machine does not allow
    pub fn advance(&mut self, to: PageTaskState) -> Result<(), CatalogError> {
        if !self.current.can_transition_to(to) {
            return Err(CatalogError::InvalidTransition {
                from: self.current,
                to,
            });
        }
        if to == PageTaskState::Failed {
            self.failed_in = Some(self.current);
        }
        self.current = to;
        Ok(())
    }

    /// Marks the task failed; a no-op once terminal
    pub fn fail(&mut self) {
        if self.current.is_active() {
            self.failed_in = Some(self.current);
            self.current = PageTaskState::Failed;
        }
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
