//! Section index state machine.
//!
//! [`Navigator`] knows nothing about questions; [`crate::FormSession`] decides
//! when a move is allowed and drives it.

/// Where a session stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Answering the section at the current index.
    #[default]
    Editing,

    /// Reviewing every section read-only before submitting.
    Preview,

    /// Submitted; the session accepts no further changes.
    Submitted,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to another section; the presentation layer scrolls to the top.
    Moved { from: usize, to: usize },

    /// The current section has this many errors; nothing moved.
    Blocked { errors: usize },

    /// Entered the preview pseudo-state.
    Previewing,

    /// Nothing to do (boundary reached or wrong phase).
    Stayed,
}

impl Step {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Current section index and phase over `len` sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    len: usize,
    phase: Phase,
}

impl Navigator {
    /// Start at the first section. `len` is clamped to at least one.
    pub fn new(len: usize) -> Self {
        Self {
            current: 0,
            len: len.max(1),
            phase: Phase::Editing,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn section_count(&self) -> usize {
        self.len
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len
    }

    /// Move one section forward, clamped at the last one.
    pub fn advance(&mut self) -> Step {
        self.jump(self.current + 1)
    }

    /// Move one section back, clamped at the first one.
    pub fn retreat(&mut self) -> Step {
        self.jump(self.current.saturating_sub(1))
    }

    /// Move to any section, clamped to the valid range.
    pub fn jump(&mut self, index: usize) -> Step {
        let to = index.min(self.len - 1);
        if to == self.current {
            return Step::Stayed;
        }
        let from = self.current;
        self.current = to;
        Step::Moved { from, to }
    }

    /// Completion percentage `(current + 1) / len * 100`.
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.len as f64 * 100.0
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}
