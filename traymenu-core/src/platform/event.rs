// SPDX-License-Identifier: MIT OR Apache-2.0

use nalgebra::Point2;

use crate::platform::SurfaceId;
use crate::window::{Key, MouseButton, NamedKey};

/// Discrete scroll step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Wheel up.
    Up,
    /// Wheel down.
    Down,
    /// Tilt left.
    Left,
    /// Tilt right.
    Right,
}

impl ScrollDirection {
    /// Up and right steps increase a value, down and left decrease it.
    pub fn sign(self) -> f64 {
        match self {
            ScrollDirection::Up | ScrollDirection::Right => 1.0,
            ScrollDirection::Down | ScrollDirection::Left => -1.0,
        }
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// A pointer button went down.
    ButtonPress(MouseButton),
    /// A pointer button went up.
    ButtonRelease(MouseButton),
    /// The pointer moved.
    Motion,
    /// The pointer entered the surface.
    Enter,
    /// The pointer left the surface.
    Leave,
    /// A scroll step.
    Scroll(ScrollDirection),
    /// A key went down.
    KeyPress(Key),
}

/// An input event delivered to a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    /// The surface the event is reported relative to.
    pub surface: SurfaceId,
    /// The event payload.
    pub kind: EventKind,
    /// Pointer position relative to `surface`.
    pub position: Point2<f64>,
    /// Pointer position in screen coordinates.
    pub root_position: Point2<f64>,
}

impl InputEvent {
    /// Create an event with the pointer at `position` on a surface whose
    /// origin is at `surface_origin` on screen.
    pub fn new(surface: SurfaceId, kind: EventKind, position: Point2<f64>, surface_origin: Point2<f64>) -> Self {
        Self {
            surface,
            kind,
            position,
            root_position: Point2::new(surface_origin.x + position.x, surface_origin.y + position.y),
        }
    }

    /// The button of a press or release event.
    pub fn button(&self) -> Option<MouseButton> {
        match self.kind {
            EventKind::ButtonPress(button) | EventKind::ButtonRelease(button) => Some(button),
            _ => None,
        }
    }

    /// Whether this is a press of the Escape key.
    pub fn is_escape(&self) -> bool {
        matches!(&self.kind, EventKind::KeyPress(Key::Named(NamedKey::Escape)))
    }
}
