// Navigation state machine
//
// Owns the current page index. Every step returns whether the index moved;
// callers must not re-render on `Transition::Unchanged`.

use crate::error::ConfigurationError;

/// Index-changing navigation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Front,
    Back,
    Next,
    Rear,
    /// 1-based page number; anything outside `1..=count` is ignored
    Jump(i64),
}

/// Outcome of applying a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    Unchanged,
}

impl Transition {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    count: usize,
    circular: bool,
}

impl Navigator {
    /// `count` of zero is clamped to one; the paginator rejects empty
    /// page sets before a navigator is ever used.
    pub fn new(count: usize, circular: bool) -> Self {
        Self {
            current: 0,
            count: count.max(1),
            circular,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn last_index(&self) -> usize {
        self.count - 1
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Reset for a new page count, back to the first page
    pub fn reset(&mut self, count: usize) {
        self.count = count.max(1);
        self.current = 0;
    }

    /// Place the cursor on a 0-based index
    pub fn set_index(&mut self, index: usize) -> Result<(), ConfigurationError> {
        if index >= self.count {
            return Err(ConfigurationError::InvalidStartingPage {
                page: index + 1,
                count: self.count,
            });
        }
        self.current = index;
        Ok(())
    }

    pub fn apply(&mut self, step: Step) -> Transition {
        let last = self.last_index();
        let target = match step {
            Step::Front => Some(0),
            Step::Rear => Some(last),
            Step::Back => match self.current {
                0 if self.circular => Some(last),
                0 => None,
                i => Some(i - 1),
            },
            Step::Next => match self.current {
                i if i == last && self.circular => Some(0),
                i if i == last => None,
                i => Some(i + 1),
            },
            Step::Jump(n) => usize::try_from(n)
                .ok()
                .filter(|n| (1..=self.count).contains(n))
                .map(|n| n - 1),
        };

        match target {
            Some(to) if to != self.current => {
                let from = self.current;
                self.current = to;
                Transition::Moved { from, to }
            }
            _ => Transition::Unchanged,
        }
    }
}

/// Parse a jump reply into a page number, `None` for non-numeric input
pub fn parse_jump_reply(reply: &str) -> Option<i64> {
    reply.trim().parse().ok()
}
