// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handler return value that stops further propagation.
pub const STOP: bool = true;

/// Handler return value that lets the remaining handlers run.
pub const PROPAGATE: bool = false;

/// Identifies a handler connected to a [Signal].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<A> = Rc<dyn Fn(&A) -> bool>;

/// Single-threaded observer list with a "first handled wins" accumulator.
///
/// Handlers run in connection order. Emission stops at the first handler
/// returning [STOP], and [Signal::emit] reports whether that happened.
///
/// Handlers may connect, disconnect or emit re-entrantly: the handler list is
/// snapshotted before running, and handlers disconnected mid-emission are
/// skipped.
pub struct Signal<A> {
    handlers: RefCell<Vec<(HandlerId, Handler<A>)>>,
    next_id: Cell<u64>,
}

impl<A> Signal<A> {
    /// Creates a signal without handlers.
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Connect a handler and return its id.
    pub fn connect(&self, handler: impl Fn(&A) -> bool + 'static) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Disconnect a handler. Returns `false` if it was not connected.
    pub fn disconnect(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Whether the handler with the given id is still connected.
    pub fn is_connected(&self, id: HandlerId) -> bool {
        self.handlers.borrow().iter().any(|(handler_id, _)| *handler_id == id)
    }

    /// Number of connected handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Run the handlers. Returns `true` if one of them handled the emission.
    pub fn emit(&self, args: &A) -> bool {
        let snapshot: Vec<(HandlerId, Handler<A>)> = self.handlers.borrow().clone();

        for (id, handler) in snapshot {
            if !self.is_connected(id) {
                continue;
            }

            if handler(args) {
                return STOP;
            }
        }

        PROPAGATE
    }
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_handled_short_circuits() {
        let signal = Signal::<u32>::new();
        let calls = Rc::new(Cell::new(0));

        let c = calls.clone();
        signal.connect(move |_| {
            c.set(c.get() + 1);
            PROPAGATE
        });
        let c = calls.clone();
        signal.connect(move |value| {
            c.set(c.get() + 1);
            *value == 7
        });
        let c = calls.clone();
        signal.connect(move |_| {
            c.set(c.get() + 1);
            PROPAGATE
        });

        assert!(signal.emit(&7));
        assert_eq!(calls.get(), 2);

        assert!(!signal.emit(&1));
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn disconnect_during_emission() {
        let signal = Rc::new(Signal::<()>::new());
        let second_ran = Rc::new(Cell::new(false));
        let second_id = Rc::new(Cell::new(None));

        let s = signal.clone();
        let id = second_id.clone();
        signal.connect(move |_| {
            if let Some(id) = id.get() {
                s.disconnect(id);
            }
            PROPAGATE
        });

        let ran = second_ran.clone();
        second_id.set(Some(signal.connect(move |_| {
            ran.set(true);
            PROPAGATE
        })));

        signal.emit(&());
        assert!(!second_ran.get());
        assert_eq!(signal.handler_count(), 1);
    }

    #[test]
    fn disconnect_unknown_id() {
        let signal = Signal::<()>::new();
        let id = signal.connect(|_| PROPAGATE);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        assert!(!signal.is_connected(id));
    }
}
