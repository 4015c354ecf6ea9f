// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pointer and keyboard capture shared by every popup of a process.
//!
//! Only one surface can hold the seat grab at a time. Popups take it
//! exclusively, which dismisses whatever popup held it before; widgets inside
//! a popup (a seek bar being dragged) take it nested and hand it back to the
//! popup when they release.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::platform::{GrabStatus, Seat, SurfaceId};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Identity of a capture holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureOwner(u64);

impl CaptureOwner {
    /// Allocate a fresh owner id.
    pub fn next() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a capture request interacts with the current holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Revoke every other holder before grabbing.
    Exclusive,
    /// Stack on top of the current holder and restore it on release.
    Nested,
}

struct Holder {
    owner: CaptureOwner,
    surface: SurfaceId,
    on_revoked: Rc<dyn Fn()>,
}

/// Arbitrates the seat grab between popups and widgets.
pub struct InputCaptureManager {
    seat: Rc<dyn Seat>,
    stack: RefCell<Vec<Holder>>,
}

impl InputCaptureManager {
    /// Create a manager driving the given seat.
    pub fn new(seat: Rc<dyn Seat>) -> Self {
        Self {
            seat,
            stack: RefCell::new(Vec::new()),
        }
    }

    /// Try to capture pointer and keyboard input for `surface`.
    ///
    /// `on_revoked` runs if another exclusive request takes the capture away.
    /// It is not run on a voluntary [release](Self::release). Returns `false`
    /// if the seat refused the grab; the previous state is left untouched in
    /// that case except for holders an exclusive request already revoked.
    pub fn try_acquire(
        &self,
        owner: CaptureOwner,
        surface: SurfaceId,
        mode: CaptureMode,
        on_revoked: impl Fn() + 'static,
    ) -> bool {
        self.stack.borrow_mut().retain(|holder| holder.owner != owner);

        if mode == CaptureMode::Exclusive {
            let revoked: Vec<Holder> = self.stack.borrow_mut().drain(..).collect();

            if !revoked.is_empty() {
                self.seat.ungrab();
            }

            // Callbacks may call back into the manager.
            for holder in revoked.into_iter().rev() {
                log::debug!("Revoking input capture of {:?}", holder.owner);
                (holder.on_revoked)();
            }
        }

        match self.seat.grab(surface) {
            GrabStatus::Success => {
                log::debug!("{owner:?} captured input on {surface:?} ({mode:?})");
                self.stack.borrow_mut().push(Holder {
                    owner,
                    surface,
                    on_revoked: Rc::new(on_revoked),
                });
                true
            },
            status => {
                log::warn!("Failed to capture input on {surface:?}: {status:?}");
                false
            },
        }
    }

    /// Give up the capture held by `owner`.
    ///
    /// If `owner` was the innermost holder, the seat is ungrabbed and the next
    /// holder down the stack, if any, is grabbed again. Releasing without
    /// holding the capture does nothing.
    pub fn release(&self, owner: CaptureOwner) {
        let restore = {
            let mut stack = self.stack.borrow_mut();
            let Some(index) = stack.iter().position(|holder| holder.owner == owner) else {
                return;
            };

            let was_top = index + 1 == stack.len();
            stack.remove(index);

            if !was_top {
                return;
            }

            stack.last().map(|holder| holder.surface)
        };

        self.seat.ungrab();
        log::debug!("{owner:?} released input capture");

        if let Some(surface) = restore {
            let status = self.seat.grab(surface);
            if status != GrabStatus::Success {
                log::warn!("Failed to restore input capture on {surface:?}: {status:?}");
            }
        }
    }

    /// The innermost holder.
    pub fn holder(&self) -> Option<CaptureOwner> {
        self.stack.borrow().last().map(|holder| holder.owner)
    }

    /// Whether `owner` holds the capture at any depth.
    pub fn is_held_by(&self, owner: CaptureOwner) -> bool {
        self.stack.borrow().iter().any(|holder| holder.owner == owner)
    }

    /// Whether anyone holds the capture.
    pub fn is_captured(&self) -> bool {
        !self.stack.borrow().is_empty()
    }
}

impl fmt::Debug for InputCaptureManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owners: Vec<CaptureOwner> = self.stack.borrow().iter().map(|h| h.owner).collect();
        f.debug_struct("InputCaptureManager")
            .field("holders", &owners)
            .finish()
    }
}
