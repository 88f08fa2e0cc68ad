/// Controller phase definitions
///
/// A crawl moves strictly forward through these phases; `Done` is terminal.
use std::fmt;

/// Represents the lifecycle phase of a crawl controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// No work has been started
    Idle,

    /// Workers are pulling items from the frontier
    Running,

    /// The frontier is exhausted (or a stop was requested) and in-flight
    /// renders are being allowed to finish
    Draining,

    /// All work has completed; no further dequeues happen
    Done,
}

impl CrawlPhase {
    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// Phases only move forward, one step at a time.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Done)
        )
    }

    /// Converts the phase to a stable string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
