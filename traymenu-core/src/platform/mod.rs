// SPDX-License-Identifier: MIT OR Apache-2.0

//! Windowing-layer abstraction.
//!
//! The menu code never talks to a display server directly. A host application
//! implements these traits on top of its windowing system and routes input
//! for the popup surfaces back into the menu. The [headless] implementation
//! keeps everything in memory and is used by the tests and demos.

use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use nalgebra::{Point2, Vector2};

use crate::layout::{Gravity, ScreenRect};

mod event;

/// In-memory display used for tests and headless demos.
pub mod headless;

pub use event::{EventKind, InputEvent, ScrollDirection};

/// Identifies a surface created by a [Display].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Identifies a frame clock tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Result of a seat grab request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabStatus {
    /// The grab is in place.
    Success,
    /// Another client holds a grab.
    AlreadyGrabbed,
    /// The surface is not viewable.
    NotViewable,
    /// Any other failure.
    Failed,
}

/// Callback run once per frame with the frame time.
pub type TickCallback = Box<dyn FnMut(Duration) -> ControlFlow<()>>;

/// Text measurement backed by the host's font system.
pub trait TextMeasure {
    /// Logical size of a single line of text.
    fn measure_text(&self, text: &str) -> Vector2<i32>;
}

/// Pointer and keyboard of the user.
pub trait Seat {
    /// Grab pointer and keyboard for `surface`.
    fn grab(&self, surface: SurfaceId) -> GrabStatus;

    /// Release the current grab.
    fn ungrab(&self);

    /// Pointer position in screen coordinates, if known.
    fn pointer_position(&self) -> Option<Point2<i32>>;
}

/// Source of per-frame callbacks.
pub trait FrameClock {
    /// Time of the current frame.
    fn frame_time(&self) -> Duration;

    /// Run `callback` on every frame until it breaks or is removed.
    fn add_tick_callback(&self, callback: TickCallback) -> TickId;

    /// Cancel a tick callback. Returns `false` if it was not registered.
    fn remove_tick_callback(&self, id: TickId) -> bool;
}

/// Top-level override-redirect window a menu is drawn into.
pub trait PopupSurface {
    /// Surface id, stable for the surface's lifetime.
    fn id(&self) -> SurfaceId;

    /// Create the native window.
    fn realize(&self);

    /// Whether [realize](Self::realize) has run.
    fn is_realized(&self) -> bool;

    /// Which corner of the window [move_to](Self::move_to) positions.
    fn set_gravity(&self, gravity: Gravity);

    /// Move the window in screen coordinates.
    fn move_to(&self, origin: Point2<i32>);

    /// Resize the window.
    fn resize(&self, size: Vector2<i32>);

    /// Current position in screen coordinates.
    fn position(&self) -> Point2<i32>;

    /// Current size.
    fn size(&self) -> Vector2<i32>;

    /// Map the window.
    fn show(&self);

    /// Unmap the window.
    fn hide(&self);

    /// Whether the window is mapped.
    fn is_visible(&self) -> bool;

    /// Ask the host to repaint the window.
    fn queue_draw(&self) {}
}

/// Invisible surface that only receives input.
///
/// Dropping it destroys the native surface.
pub trait InputSurface {
    /// Surface id, stable for the surface's lifetime.
    fn id(&self) -> SurfaceId;

    /// Move and resize, relative to the parent surface if there is one.
    fn move_resize(&self, rect: ScreenRect);

    /// Start receiving input.
    fn show(&self);

    /// Stop receiving input.
    fn hide(&self);
}

/// Creation attributes of an [InputSurface].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSurfaceAttributes {
    /// Parent surface, or a top-level surface if `None`.
    pub parent: Option<SurfaceId>,
    /// Initial geometry.
    pub rect: ScreenRect,
    /// Bypass the window manager.
    pub override_redirect: bool,
}

/// Connection to the display server.
pub trait Display {
    /// Work area of the monitor containing `point`.
    fn monitor_workarea_at(&self, point: Point2<i32>) -> ScreenRect;

    /// The user's seat.
    fn seat(&self) -> Rc<dyn Seat>;

    /// The clock driving animations.
    fn frame_clock(&self) -> Rc<dyn FrameClock>;

    /// Text measurement for layout.
    fn text_measure(&self) -> &dyn TextMeasure;

    /// Create a new, unrealized popup window.
    fn create_popup_surface(&self) -> Box<dyn PopupSurface>;

    /// Create an input-only surface.
    fn create_input_surface(&self, attributes: InputSurfaceAttributes) -> Box<dyn InputSurface>;

    /// Whether a popup window can hold the seat grab itself.
    ///
    /// If not, popups grab through an off-screen helper surface.
    fn supports_popup_grab(&self) -> bool {
        false
    }
}

/// Something a popup can be attached to.
pub trait AnchorSource {
    /// Allocation relative to the toplevel window.
    fn allocation(&self) -> ScreenRect;

    /// Position of the toplevel window on screen.
    fn toplevel_position(&self) -> Point2<i32>;
}
