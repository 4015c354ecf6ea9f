// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::Cell;
use std::rc::Rc;

use bitflags::bitflags;

bitflags! {
    /// Update flags to describe what a menu needs to do next.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Update: u8 {
        /// Repaint the menu window.
        const DRAW = 0b01;
        /// Re-measure the tree and re-run positioning.
        const LAYOUT = 0b10;
    }
}

/// Shared queue of pending [Update] flags.
///
/// Every node of a menu tree holds a clone pointing at the same flags; the
/// popup controller drains it after dispatching input or ticking animations.
#[derive(Debug, Clone, Default)]
pub struct UpdateQueue(Rc<Cell<Update>>);

impl UpdateQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the given flags into the queue.
    pub fn insert(&self, update: Update) {
        self.0.set(self.0.get() | update);
    }

    /// Currently pending flags.
    pub fn peek(&self) -> Update {
        self.0.get()
    }

    /// Take all pending flags, leaving the queue empty.
    pub fn take(&self) -> Update {
        self.0.replace(Update::empty())
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.0.get().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_flags() {
        let queue = UpdateQueue::new();
        let other = queue.clone();

        other.insert(Update::DRAW);
        queue.insert(Update::LAYOUT);

        assert_eq!(queue.peek(), Update::DRAW | Update::LAYOUT);
        assert_eq!(other.take(), Update::DRAW | Update::LAYOUT);
        assert!(queue.is_empty());
    }
}
