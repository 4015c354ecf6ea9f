// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};
use std::time::Duration;

use traymenu_core::animation::AnimationController;
use traymenu_core::capture::{CaptureMode, CaptureOwner};
use traymenu_core::config::SeekerConfig;
use traymenu_core::layout::{LayoutContext, ScreenRect, SizeRequest};
use traymenu_core::platform::{
    EventKind, InputEvent, InputSurface, InputSurfaceAttributes, SurfaceId, TickId,
};
use traymenu_core::signal::{HandlerId, Signal, PROPAGATE, STOP};
use traymenu_core::theme::{ColorRole, Palette};
use traymenu_core::update::Update;
use traymenu_core::vg::kurbo::{Affine, Point, Rect};
use traymenu_core::vg::peniko::Fill;
use traymenu_core::vgi::{shape_to_path, Graphics};
use traymenu_core::widget::{RealizeContext, Widget};
use traymenu_core::window::MouseButton;

struct HoverAnimation {
    controller: AnimationController,
    target: i32,
    reveal_label: bool,
}

/// A thin progress bar that doubles as a drag-to-seek control.
///
/// Pressing the primary button jumps to the pressed position and starts a
/// drag; [seeked](Seeker::seeked) is emitted once the button is released.
/// Scrolling steps the position and emits immediately. Hovering grows the
/// bar and reveals its label.
pub struct Seeker {
    this: Weak<Seeker>,
    owner: CaptureOwner,
    fraction: Cell<f64>,
    pending_fraction: Cell<Option<f64>>,
    grabbed: Cell<bool>,
    show_label: Cell<bool>,
    label: RefCell<String>,
    height: Cell<i32>,
    allocation: Cell<ScreenRect>,
    config: Cell<SeekerConfig>,
    animation: RefCell<Option<HoverAnimation>>,
    animate_id: Cell<Option<TickId>>,
    button_release_id: Cell<Option<HandlerId>>,
    motion_notify_id: Cell<Option<HandlerId>>,
    button_release: Signal<InputEvent>,
    motion_notify: Signal<InputEvent>,
    surface: RefCell<Option<Box<dyn InputSurface>>>,
    realized: RefCell<Option<RealizeContext>>,
    /// Emitted with the new fraction after a drag or a scroll step.
    pub seeked: Signal<f64>,
}

impl Seeker {
    /// Create a collapsed seeker at fraction 0.
    pub fn new() -> Rc<Self> {
        let config = SeekerConfig::default();

        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            owner: CaptureOwner::next(),
            fraction: Cell::new(0.0),
            pending_fraction: Cell::new(None),
            grabbed: Cell::new(false),
            show_label: Cell::new(false),
            label: RefCell::new(String::new()),
            height: Cell::new(config.collapsed_height),
            allocation: Cell::new(ScreenRect::default()),
            config: Cell::new(config),
            animation: RefCell::new(None),
            animate_id: Cell::new(None),
            button_release_id: Cell::new(None),
            motion_notify_id: Cell::new(None),
            button_release: Signal::new(),
            motion_notify: Signal::new(),
            surface: RefCell::new(None),
            realized: RefCell::new(None),
            seeked: Signal::new(),
        })
    }

    /// Current position in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        self.fraction.get()
    }

    /// Move to `fraction`, e.g. from the player's position updates.
    ///
    /// During a drag the value is held back: it is dropped when the drag ends
    /// normally and applied if the drag is interrupted.
    pub fn set_fraction(&self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);

        if self.grabbed.get() {
            self.pending_fraction.set(Some(fraction));
        } else {
            self.fraction.set(fraction);
            self.queue_update(Update::DRAW);
        }
    }

    /// The label shown while hovered.
    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    /// Change the label shown while hovered.
    pub fn set_label(&self, label: impl Into<String>) {
        *self.label.borrow_mut() = label.into();
        self.queue_update(Update::DRAW);
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.grabbed.get()
    }

    /// Whether the label is currently drawn.
    pub fn is_label_shown(&self) -> bool {
        self.show_label.get()
    }

    /// Current height request.
    pub fn height(&self) -> i32 {
        self.height.get()
    }

    /// The input-only surface, while realized.
    pub fn input_region(&self) -> Option<SurfaceId> {
        self.surface.borrow().as_ref().map(|surface| surface.id())
    }

    /// Whether a hover animation is running.
    pub fn is_animating(&self) -> bool {
        self.animate_id.get().is_some()
    }

    fn queue_update(&self, update: Update) {
        if let Some(cx) = self.realized.borrow().as_ref() {
            cx.updates.insert(update);
        }
    }

    fn fraction_at(&self, x: f64) -> f64 {
        let width = self.allocation.get().width;
        if width <= 0 {
            return self.fraction.get();
        }
        (x / width as f64).clamp(0.0, 1.0)
    }

    fn on_button_press(&self, event: &InputEvent, button: MouseButton) -> bool {
        if button != MouseButton::Left {
            return PROPAGATE;
        }

        self.fraction.set(self.fraction_at(event.position.x));
        self.queue_update(Update::DRAW);
        self.start_grab();

        STOP
    }

    fn on_scroll(&self, sign: f64) -> bool {
        let step = self.config.get().scroll_step;
        let fraction = (self.fraction.get() + sign * step).clamp(0.0, 1.0);

        self.fraction.set(fraction);
        self.queue_update(Update::DRAW);
        self.seeked.emit(&fraction);

        STOP
    }

    fn on_button_release(&self, event: &InputEvent) -> bool {
        if event.button() != Some(MouseButton::Left) {
            return PROPAGATE;
        }

        self.grabbed.set(false);
        self.pending_fraction.set(None);

        let fraction = self.fraction.get();
        log::debug!("Seeked to {fraction:.3}");
        self.seeked.emit(&fraction);

        self.end_grab();
        STOP
    }

    fn on_motion_notify(&self, event: &InputEvent) -> bool {
        self.fraction.set(self.fraction_at(event.position.x));
        self.queue_update(Update::DRAW);
        STOP
    }

    fn start_grab(&self) {
        let Some(cx) = self.realized.borrow().clone() else {
            return;
        };
        let Some(surface) = self.input_region() else {
            return;
        };

        let this = self.this.clone();
        let acquired = cx.capture.try_acquire(self.owner, surface, CaptureMode::Nested, move || {
            if let Some(seeker) = this.upgrade() {
                seeker.interrupt_grab();
            }
        });

        if !acquired {
            return;
        }

        self.grabbed.set(true);
        log::debug!("Seeker drag started");

        if self.button_release_id.get().is_none() {
            let this = self.this.clone();
            self.button_release_id.set(Some(self.button_release.connect(move |event| {
                this.upgrade()
                    .map_or(PROPAGATE, |seeker| seeker.on_button_release(event))
            })));
        }

        if self.motion_notify_id.get().is_none() {
            let this = self.this.clone();
            self.motion_notify_id.set(Some(self.motion_notify.connect(move |event| {
                this.upgrade()
                    .map_or(PROPAGATE, |seeker| seeker.on_motion_notify(event))
            })));
        }
    }

    fn end_grab(&self) {
        self.grabbed.set(false);

        let capture = self.realized.borrow().as_ref().map(|cx| cx.capture.clone());
        if let Some(capture) = capture {
            capture.release(self.owner);
        }

        self.disconnect_drag_handlers();
    }

    /// The capture was taken away mid-drag.
    fn interrupt_grab(&self) {
        if !self.grabbed.replace(false) {
            return;
        }

        log::debug!("Seeker drag interrupted at {:.3}", self.fraction.get());
        self.disconnect_drag_handlers();

        if let Some(fraction) = self.pending_fraction.take() {
            self.fraction.set(fraction);
            self.queue_update(Update::DRAW);
        }
    }

    fn disconnect_drag_handlers(&self) {
        if let Some(id) = self.button_release_id.take() {
            self.button_release.disconnect(id);
        }
        if let Some(id) = self.motion_notify_id.take() {
            self.motion_notify.disconnect(id);
        }
    }

    fn cancel_animation(&self) {
        if let Some(id) = self.animate_id.take() {
            let clock = self
                .realized
                .borrow()
                .as_ref()
                .map(|cx| cx.display.frame_clock());
            if let Some(clock) = clock {
                clock.remove_tick_callback(id);
            }
        }
        self.animation.borrow_mut().take();
    }

    fn start_animation(&self, target: i32, reveal_label: bool) {
        self.cancel_animation();

        let Some(clock) = self
            .realized
            .borrow()
            .as_ref()
            .map(|cx| cx.display.frame_clock())
        else {
            self.height.set(target);
            self.show_label.set(reveal_label);
            return;
        };

        let start = match self.allocation.get().height {
            0 => self.height.get(),
            allocated => allocated,
        };
        let duration = Duration::from_millis(self.config.get().animation_ms);

        *self.animation.borrow_mut() = Some(HoverAnimation {
            controller: AnimationController::new(clock.frame_time(), duration, start as f64, target as f64),
            target,
            reveal_label,
        });

        let this = self.this.clone();
        let id = clock.add_tick_callback(Box::new(move |now| match this.upgrade() {
            Some(seeker) => seeker.animate(now),
            None => ControlFlow::Break(()),
        }));
        self.animate_id.set(Some(id));
    }

    fn animate(&self, now: Duration) -> ControlFlow<()> {
        let Some((value, done, target, reveal_label)) = self.animation.borrow().as_ref().map(|anim| {
            let (value, done) = anim.controller.advance(now);
            (value, done, anim.target, anim.reveal_label)
        }) else {
            return ControlFlow::Break(());
        };

        let height = if done { target } else { value.round() as i32 };
        log::trace!("Seeker height {height} (target {target})");

        if height != self.height.get() {
            self.height.set(height);
            self.queue_update(Update::LAYOUT | Update::DRAW);
        }

        if height == target {
            self.animate_id.set(None);
            self.animation.borrow_mut().take();
            if reveal_label {
                self.show_label.set(true);
                self.queue_update(Update::DRAW);
            }
            return ControlFlow::Break(());
        }

        ControlFlow::Continue(())
    }
}

impl Widget for Seeker {
    fn preferred_width(&self, _cx: &LayoutContext) -> SizeRequest {
        SizeRequest::fixed(0)
    }

    fn preferred_height(&self, _cx: &LayoutContext) -> SizeRequest {
        SizeRequest::fixed(self.height.get())
    }

    fn allocate(&self, bounds: ScreenRect) {
        self.allocation.set(bounds);

        if let Some(surface) = self.surface.borrow().as_ref() {
            surface.move_resize(bounds);
        }
    }

    fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette) {
        let bounds = self.allocation.get().to_kurbo();
        let stop = bounds.x0 + bounds.width() * self.fraction.get();

        graphics.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &palette.brush(ColorRole::SeekerProgress),
            None,
            &shape_to_path(&Rect::new(bounds.x0, bounds.y0, stop, bounds.y1)),
        );
        graphics.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &palette.brush(ColorRole::SeekerTrough),
            None,
            &shape_to_path(&Rect::new(stop, bounds.y0, bounds.x1, bounds.y1)),
        );

        if !self.show_label.get() {
            return;
        }

        let label = self.label.borrow();
        let size = self
            .realized
            .borrow()
            .as_ref()
            .map(|cx| cx.display.text_measure().measure_text(&label));

        if let Some(size) = size {
            let origin = Point::new(
                (bounds.x0 + (bounds.width() - size.x as f64) / 2.0).trunc(),
                (bounds.y0 + (bounds.height() - size.y as f64) / 2.0).trunc(),
            );
            graphics.draw_text(&label, origin, &palette.brush(ColorRole::Text));
        }
    }

    fn realize(&self, cx: &RealizeContext) {
        self.config.set(cx.config.seeker);
        if self.animation.borrow().is_none() {
            let height = if self.show_label.get() {
                cx.config.seeker.expanded_height
            } else {
                cx.config.seeker.collapsed_height
            };
            self.height.set(height);
        }

        if self.surface.borrow().is_none() {
            let surface = cx.display.create_input_surface(InputSurfaceAttributes {
                parent: Some(cx.parent_surface),
                rect: self.allocation.get(),
                override_redirect: false,
            });
            *self.surface.borrow_mut() = Some(surface);
        }

        *self.realized.borrow_mut() = Some(cx.clone());
    }

    fn unrealize(&self) {
        if self.grabbed.get() {
            self.end_grab();
        }
        self.cancel_animation();
        self.surface.borrow_mut().take();
        self.realized.borrow_mut().take();
    }

    fn map(&self) {
        if let Some(surface) = self.surface.borrow().as_ref() {
            surface.show();
        }
    }

    fn unmap(&self) {
        if self.grabbed.get() {
            self.end_grab();
        }
        if let Some(surface) = self.surface.borrow().as_ref() {
            surface.hide();
        }
    }

    fn owns_surface(&self, surface: SurfaceId) -> bool {
        self.input_region() == Some(surface)
    }

    fn handle_event(&self, event: &InputEvent) -> bool {
        match &event.kind {
            EventKind::ButtonPress(button) => self.on_button_press(event, *button),
            EventKind::ButtonRelease(_) => self.button_release.emit(event),
            EventKind::Motion => self.motion_notify.emit(event),
            EventKind::Scroll(direction) => self.on_scroll(direction.sign()),
            EventKind::Enter => {
                let expanded = self.config.get().expanded_height;
                self.start_animation(expanded, true);
                PROPAGATE
            },
            EventKind::Leave => {
                self.show_label.set(false);
                self.queue_update(Update::DRAW);
                let collapsed = self.config.get().collapsed_height;
                self.start_animation(collapsed, false);
                PROPAGATE
            },
            EventKind::KeyPress(_) => PROPAGATE,
        }
    }
}
