//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use nalgebra::Point2;
use traymenu_core::capture::InputCaptureManager;
use traymenu_core::layout::{LayoutContext, ScreenRect, SizeRequest};
use traymenu_core::platform::headless::{HeadlessDisplay, SurfaceKind};
use traymenu_core::platform::{Display, EventKind, InputEvent, SurfaceId};
use traymenu_core::theme::Palette;
use traymenu_core::vgi::Graphics;
use traymenu_core::widget::{Widget, WidgetRef};
use traymenu_widgets::menu::Menu;

/// A display with one monitor and a capture manager on its seat.
pub fn headless(work_area: ScreenRect) -> (Rc<HeadlessDisplay>, Rc<InputCaptureManager>) {
    let display = Rc::new(HeadlessDisplay::with_monitor(work_area));
    let capture = Rc::new(InputCaptureManager::new(display.seat()));
    (display, capture)
}

/// A menu on an 800x600 monitor.
pub fn menu() -> (Rc<HeadlessDisplay>, Rc<InputCaptureManager>, Rc<Menu>) {
    let (display, capture) = headless(ScreenRect::new(0, 0, 800, 600));
    let menu = Menu::new(display.clone(), capture.clone());
    (display, capture, menu)
}

/// Plain content with a fixed size.
pub struct Block {
    width: i32,
    height: i32,
    bounds: Cell<ScreenRect>,
}

impl Block {
    pub fn new(width: i32, height: i32) -> Rc<Self> {
        Rc::new(Self {
            width,
            height,
            bounds: Cell::new(ScreenRect::default()),
        })
    }

    pub fn bounds(&self) -> ScreenRect {
        self.bounds.get()
    }

    pub fn widget(self: &Rc<Self>) -> WidgetRef {
        self.clone()
    }
}

impl Widget for Block {
    fn preferred_width(&self, _cx: &LayoutContext) -> SizeRequest {
        SizeRequest::fixed(self.width)
    }

    fn preferred_height(&self, _cx: &LayoutContext) -> SizeRequest {
        SizeRequest::fixed(self.height)
    }

    fn allocate(&self, bounds: ScreenRect) {
        self.bounds.set(bounds);
    }

    fn draw(&self, _graphics: &mut dyn Graphics, _palette: &Palette) {}
}

/// An event at `(x, y)` on `surface`, whose origin is at the screen origin.
pub fn event(surface: SurfaceId, kind: EventKind, x: f64, y: f64) -> InputEvent {
    InputEvent::new(surface, kind, Point2::new(x, y), Point2::origin())
}

/// An event at `(x, y)` on `surface`, with its screen position.
pub fn event_at(surface: SurfaceId, kind: EventKind, x: f64, y: f64, origin: Point2<f64>) -> InputEvent {
    InputEvent::new(surface, kind, Point2::new(x, y), origin)
}

/// Input-only surfaces parented to `parent`.
pub fn input_children(display: &HeadlessDisplay, parent: SurfaceId) -> Vec<SurfaceId> {
    display
        .surfaces(SurfaceKind::InputOnly)
        .into_iter()
        .filter(|(_, record)| record.parent == Some(parent))
        .map(|(id, _)| id)
        .collect()
}
