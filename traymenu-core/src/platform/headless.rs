// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use nalgebra::{Point2, Vector2};

use crate::layout::{Gravity, ScreenRect};
use crate::platform::{
    Display, FrameClock, GrabStatus, InputSurface, InputSurfaceAttributes, PopupSurface, Seat,
    SurfaceId, TextMeasure, TickCallback, TickId,
};

/// Kind of a surface created by the [HeadlessDisplay].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// A popup window.
    Popup,
    /// An input-only surface.
    InputOnly,
}

/// Recorded state of a headless surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRecord {
    /// Popup or input-only.
    pub kind: SurfaceKind,
    /// Parent surface of input-only surfaces.
    pub parent: Option<SurfaceId>,
    /// Geometry; screen coordinates for top-levels, parent-relative otherwise.
    pub rect: ScreenRect,
    /// Last gravity set on a popup.
    pub gravity: Gravity,
    /// Whether the surface is shown.
    pub visible: bool,
    /// Whether a popup was realized.
    pub realized: bool,
    /// Whether the surface bypasses the window manager.
    pub override_redirect: bool,
    /// Number of repaint requests.
    pub draw_requests: usize,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    surfaces: BTreeMap<SurfaceId, SurfaceRecord>,
}

impl Registry {
    fn insert(&mut self, record: SurfaceRecord) -> SurfaceId {
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.surfaces.insert(id, record);
        id
    }
}

type SharedRegistry = Rc<RefCell<Registry>>;

fn with_record<R>(registry: &SharedRegistry, id: SurfaceId, op: impl FnOnce(&mut SurfaceRecord) -> R) -> Option<R> {
    registry.borrow_mut().surfaces.get_mut(&id).map(op)
}

/// Display server replacement that records everything in memory.
///
/// Text is measured with fixed metrics: [CHAR_WIDTH](Self::CHAR_WIDTH) per
/// character and [LINE_HEIGHT](Self::LINE_HEIGHT) per line.
pub struct HeadlessDisplay {
    registry: SharedRegistry,
    work_areas: RefCell<Vec<ScreenRect>>,
    seat: Rc<HeadlessSeat>,
    clock: Rc<HeadlessClock>,
    popup_grab: Cell<bool>,
}

impl HeadlessDisplay {
    /// Width of a single character.
    pub const CHAR_WIDTH: i32 = 8;
    /// Height of a line of text.
    pub const LINE_HEIGHT: i32 = 16;

    /// Create a display with the given monitor work areas.
    pub fn new(work_areas: Vec<ScreenRect>) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            work_areas: RefCell::new(work_areas),
            seat: Rc::new(HeadlessSeat::new()),
            clock: Rc::new(HeadlessClock::new()),
            popup_grab: Cell::new(false),
        }
    }

    /// Create a display with a single monitor.
    pub fn with_monitor(work_area: ScreenRect) -> Self {
        Self::new(vec![work_area])
    }

    /// Replace the monitor work areas.
    pub fn set_work_areas(&self, work_areas: Vec<ScreenRect>) {
        *self.work_areas.borrow_mut() = work_areas;
    }

    /// Let popup windows hold the seat grab directly.
    pub fn set_popup_grab(&self, supported: bool) {
        self.popup_grab.set(supported);
    }

    /// The concrete seat.
    pub fn headless_seat(&self) -> Rc<HeadlessSeat> {
        self.seat.clone()
    }

    /// The concrete frame clock.
    pub fn clock(&self) -> Rc<HeadlessClock> {
        self.clock.clone()
    }

    /// State of a live surface.
    pub fn surface(&self, id: SurfaceId) -> Option<SurfaceRecord> {
        self.registry.borrow().surfaces.get(&id).cloned()
    }

    /// All live surfaces of the given kind.
    pub fn surfaces(&self, kind: SurfaceKind) -> Vec<(SurfaceId, SurfaceRecord)> {
        self.registry
            .borrow()
            .surfaces
            .iter()
            .filter(|(_, record)| record.kind == kind)
            .map(|(id, record)| (*id, record.clone()))
            .collect()
    }
}

impl TextMeasure for HeadlessDisplay {
    fn measure_text(&self, text: &str) -> Vector2<i32> {
        Vector2::new(text.chars().count() as i32 * Self::CHAR_WIDTH, Self::LINE_HEIGHT)
    }
}

impl Display for HeadlessDisplay {
    fn monitor_workarea_at(&self, point: Point2<i32>) -> ScreenRect {
        let work_areas = self.work_areas.borrow();
        let probe = Point2::new(point.x as f64, point.y as f64);

        work_areas
            .iter()
            .find(|area| area.contains(probe))
            .or_else(|| work_areas.first())
            .copied()
            .unwrap_or_default()
    }

    fn seat(&self) -> Rc<dyn Seat> {
        self.seat.clone()
    }

    fn frame_clock(&self) -> Rc<dyn FrameClock> {
        self.clock.clone()
    }

    fn text_measure(&self) -> &dyn TextMeasure {
        self
    }

    fn create_popup_surface(&self) -> Box<dyn PopupSurface> {
        let id = self.registry.borrow_mut().insert(SurfaceRecord {
            kind: SurfaceKind::Popup,
            parent: None,
            rect: ScreenRect::default(),
            gravity: Gravity::NorthWest,
            visible: false,
            realized: false,
            override_redirect: true,
            draw_requests: 0,
        });

        Box::new(HeadlessPopup {
            id,
            registry: self.registry.clone(),
        })
    }

    fn create_input_surface(&self, attributes: InputSurfaceAttributes) -> Box<dyn InputSurface> {
        let id = self.registry.borrow_mut().insert(SurfaceRecord {
            kind: SurfaceKind::InputOnly,
            parent: attributes.parent,
            rect: attributes.rect,
            gravity: Gravity::NorthWest,
            visible: false,
            realized: true,
            override_redirect: attributes.override_redirect,
            draw_requests: 0,
        });

        Box::new(HeadlessInputSurface {
            id,
            registry: self.registry.clone(),
        })
    }

    fn supports_popup_grab(&self) -> bool {
        self.popup_grab.get()
    }
}

struct HeadlessPopup {
    id: SurfaceId,
    registry: SharedRegistry,
}

impl HeadlessPopup {
    fn record(&self) -> Option<SurfaceRecord> {
        self.registry.borrow().surfaces.get(&self.id).cloned()
    }
}

impl PopupSurface for HeadlessPopup {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn realize(&self) {
        with_record(&self.registry, self.id, |record| record.realized = true);
    }

    fn is_realized(&self) -> bool {
        self.record().is_some_and(|record| record.realized)
    }

    fn set_gravity(&self, gravity: Gravity) {
        with_record(&self.registry, self.id, |record| record.gravity = gravity);
    }

    fn move_to(&self, origin: Point2<i32>) {
        with_record(&self.registry, self.id, |record| {
            record.rect.x = origin.x;
            record.rect.y = origin.y;
        });
    }

    fn resize(&self, size: Vector2<i32>) {
        with_record(&self.registry, self.id, |record| {
            record.rect.width = size.x;
            record.rect.height = size.y;
        });
    }

    fn position(&self) -> Point2<i32> {
        self.record().map(|record| record.rect.origin()).unwrap_or_else(Point2::origin)
    }

    fn size(&self) -> Vector2<i32> {
        self.record().map(|record| record.rect.size()).unwrap_or_else(Vector2::zeros)
    }

    fn show(&self) {
        with_record(&self.registry, self.id, |record| record.visible = true);
    }

    fn hide(&self) {
        with_record(&self.registry, self.id, |record| record.visible = false);
    }

    fn is_visible(&self) -> bool {
        self.record().is_some_and(|record| record.visible)
    }

    fn queue_draw(&self) {
        with_record(&self.registry, self.id, |record| record.draw_requests += 1);
    }
}

impl Drop for HeadlessPopup {
    fn drop(&mut self) {
        self.registry.borrow_mut().surfaces.remove(&self.id);
    }
}

struct HeadlessInputSurface {
    id: SurfaceId,
    registry: SharedRegistry,
}

impl InputSurface for HeadlessInputSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn move_resize(&self, rect: ScreenRect) {
        with_record(&self.registry, self.id, |record| record.rect = rect);
    }

    fn show(&self) {
        with_record(&self.registry, self.id, |record| record.visible = true);
    }

    fn hide(&self) {
        with_record(&self.registry, self.id, |record| record.visible = false);
    }
}

impl Drop for HeadlessInputSurface {
    fn drop(&mut self) {
        self.registry.borrow_mut().surfaces.remove(&self.id);
    }
}

/// Seat that grants grabs unless told otherwise.
#[derive(Debug)]
pub struct HeadlessSeat {
    grabbed: Cell<Option<SurfaceId>>,
    allowed: Cell<bool>,
    pointer: Cell<Option<Point2<i32>>>,
    grab_count: Cell<usize>,
    ungrab_count: Cell<usize>,
}

impl HeadlessSeat {
    /// Create a seat without a pointer position.
    pub fn new() -> Self {
        Self {
            grabbed: Cell::new(None),
            allowed: Cell::new(true),
            pointer: Cell::new(None),
            grab_count: Cell::new(0),
            ungrab_count: Cell::new(0),
        }
    }

    /// Make subsequent grabs succeed or fail.
    pub fn set_grab_allowed(&self, allowed: bool) {
        self.allowed.set(allowed);
    }

    /// Set the reported pointer position.
    pub fn set_pointer(&self, position: Option<Point2<i32>>) {
        self.pointer.set(position);
    }

    /// The surface currently holding the grab.
    pub fn grabbed(&self) -> Option<SurfaceId> {
        self.grabbed.get()
    }

    /// Number of successful grabs so far.
    pub fn grab_count(&self) -> usize {
        self.grab_count.get()
    }

    /// Number of ungrabs so far.
    pub fn ungrab_count(&self) -> usize {
        self.ungrab_count.get()
    }
}

impl Default for HeadlessSeat {
    fn default() -> Self {
        Self::new()
    }
}

impl Seat for HeadlessSeat {
    fn grab(&self, surface: SurfaceId) -> GrabStatus {
        if !self.allowed.get() {
            return GrabStatus::AlreadyGrabbed;
        }

        self.grabbed.set(Some(surface));
        self.grab_count.set(self.grab_count.get() + 1);
        GrabStatus::Success
    }

    fn ungrab(&self) {
        self.grabbed.set(None);
        self.ungrab_count.set(self.ungrab_count.get() + 1);
    }

    fn pointer_position(&self) -> Option<Point2<i32>> {
        self.pointer.get()
    }
}

/// Frame clock that only moves when told to.
pub struct HeadlessClock {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    callbacks: RefCell<Vec<(TickId, TickCallback)>>,
    in_flight: RefCell<HashSet<TickId>>,
    cancelled: RefCell<HashSet<TickId>>,
}

impl HeadlessClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            next_id: Cell::new(1),
            callbacks: RefCell::new(Vec::new()),
            in_flight: RefCell::new(HashSet::new()),
            cancelled: RefCell::new(HashSet::new()),
        }
    }

    /// Move time forward by `delta` and run one frame of tick callbacks.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
        let now = self.now.get();

        let mut running = std::mem::take(&mut *self.callbacks.borrow_mut());
        *self.in_flight.borrow_mut() = running.iter().map(|(id, _)| *id).collect();

        for (id, callback) in running.iter_mut() {
            if self.cancelled.borrow().contains(id) {
                continue;
            }

            if callback(now).is_break() {
                self.cancelled.borrow_mut().insert(*id);
            }
        }

        self.in_flight.borrow_mut().clear();
        let cancelled = std::mem::take(&mut *self.cancelled.borrow_mut());
        running.retain(|(id, _)| !cancelled.contains(id));

        let mut callbacks = self.callbacks.borrow_mut();
        running.append(&mut callbacks);
        *callbacks = running;
    }

    /// Number of registered tick callbacks.
    pub fn pending_callbacks(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

impl Default for HeadlessClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for HeadlessClock {
    fn frame_time(&self) -> Duration {
        self.now.get()
    }

    fn add_tick_callback(&self, callback: TickCallback) -> TickId {
        let id = TickId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.callbacks.borrow_mut().push((id, callback));
        id
    }

    fn remove_tick_callback(&self, id: TickId) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|(callback_id, _)| *callback_id != id);

        if callbacks.len() != before {
            return true;
        }

        if self.in_flight.borrow().contains(&id) {
            self.cancelled.borrow_mut().insert(id);
            return true;
        }

        false
    }
}
