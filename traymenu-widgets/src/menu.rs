// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use nalgebra::{Point2, Vector2};
use traymenu_core::capture::{CaptureMode, CaptureOwner, InputCaptureManager};
use traymenu_core::config::MenuConfig;
use traymenu_core::error::MenuError;
use traymenu_core::layout::{
    anchor_point, clamp_to_work_area, Gravity, LayoutContext, ScreenRect,
};
use traymenu_core::platform::{
    AnchorSource, Display, EventKind, InputEvent, InputSurface, InputSurfaceAttributes,
    PopupSurface, SurfaceId,
};
use traymenu_core::signal::{HandlerId, Signal, PROPAGATE, STOP};
use traymenu_core::theme::Palette;
use traymenu_core::update::{Update, UpdateQueue};
use traymenu_core::vgi::Graphics;
use traymenu_core::widget::RealizeContext;

use crate::menu_base::MenuBase;
use crate::node::{IntoMenuNode, NodeRef};

/// Where the menu was asked to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRequest {
    /// Anchor rectangle in screen coordinates.
    pub rect: ScreenRect,
    /// Which point of `rect` the menu attaches to.
    pub source_gravity: Gravity,
    /// Which point of the menu sits on the attach point.
    pub menu_gravity: Gravity,
}

/// A popup menu window.
///
/// The menu owns an undecorated popup surface whose only content is a root
/// [MenuBase]. Showing it captures input so that Escape or a click outside
/// dismisses it; activating any item below the root dismisses it as well.
///
/// ```rust,ignore
/// let menu = Menu::new(display.clone(), capture.clone());
/// let quit = MenuItem::new("Quit");
/// quit.activate.connect(|_| { std::process::exit(0) });
/// menu.append(quit);
///
/// menu.popup_at_rect(icon_rect, Gravity::SouthWest, Gravity::NorthWest)?;
/// ```
pub struct Menu {
    this: Weak<Menu>,
    root: Rc<MenuBase>,
    display: Rc<dyn Display>,
    capture: Rc<InputCaptureManager>,
    owner: CaptureOwner,
    config: Rc<MenuConfig>,
    palette: RefCell<Palette>,
    window: Box<dyn PopupSurface>,
    transfer_window: RefCell<Option<Box<dyn InputSurface>>>,
    updates: UpdateQueue,
    anchor: Cell<Option<AnchorRequest>>,
    key_press_id: Cell<Option<HandlerId>>,
    button_release_id: Cell<Option<HandlerId>>,
    /// Key presses that reached the menu window without being handled.
    pub key_press: Signal<InputEvent>,
    /// Button releases that reached the menu window without being handled.
    pub button_release: Signal<InputEvent>,
    /// Emitted after the menu was hidden.
    pub popped_down: Signal<()>,
}

impl Menu {
    /// Create an empty menu with the default metrics.
    pub fn new(display: Rc<dyn Display>, capture: Rc<InputCaptureManager>) -> Rc<Self> {
        Self::with_config(display, capture, MenuConfig::default())
    }

    /// Create an empty menu using `config` for its metrics.
    pub fn with_config(
        display: Rc<dyn Display>,
        capture: Rc<InputCaptureManager>,
        config: MenuConfig,
    ) -> Rc<Self> {
        let updates = UpdateQueue::new();
        let root = MenuBase::new();
        root.set_update_queue(updates.clone());

        let window = display.create_popup_surface();

        let menu = Rc::new_cyclic(|this: &Weak<Menu>| Self {
            this: this.clone(),
            root,
            display,
            capture,
            owner: CaptureOwner::next(),
            config: Rc::new(config),
            palette: RefCell::new(Palette::default()),
            window,
            transfer_window: RefCell::new(None),
            updates,
            anchor: Cell::new(None),
            key_press_id: Cell::new(None),
            button_release_id: Cell::new(None),
            key_press: Signal::new(),
            button_release: Signal::new(),
            popped_down: Signal::new(),
        });

        let this = menu.this.clone();
        menu.root.child_activated.connect(move |_| {
            if let Some(menu) = this.upgrade() {
                menu.popdown();
            }
            PROPAGATE
        });

        menu
    }

    /// The root container.
    pub fn root(&self) -> &Rc<MenuBase> {
        &self.root
    }

    /// Add a node at the end.
    pub fn append(&self, child: impl IntoMenuNode) {
        self.root.append(child);
    }

    /// Add a node at the start.
    pub fn prepend(&self, child: impl IntoMenuNode) {
        self.root.prepend(child);
    }

    /// Add a node at `index`.
    pub fn insert(&self, child: impl IntoMenuNode, index: usize) {
        self.root.insert(child, index);
    }

    /// Remove a node. Returns `false` if it is not a direct child.
    pub fn remove(&self, child: &NodeRef) -> bool {
        self.root.remove(child)
    }

    /// The direct children.
    pub fn children(&self) -> Vec<NodeRef> {
        self.root.children()
    }

    /// Show every node that allows it.
    pub fn show_all(&self) {
        self.root.show_all();
    }

    /// The metrics in use.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Replace the colors used for drawing.
    pub fn set_palette(&self, palette: Palette) {
        *self.palette.borrow_mut() = palette;
        self.updates.insert(Update::DRAW);
    }

    /// The popup surface.
    pub fn window(&self) -> &dyn PopupSurface {
        self.window.as_ref()
    }

    /// Whether the menu is on screen.
    pub fn is_visible(&self) -> bool {
        self.window.is_visible()
    }

    /// The anchor of the current popup, `None` while hidden.
    pub fn anchor(&self) -> Option<AnchorRequest> {
        self.anchor.get()
    }

    /// The helper surface input is captured on when the display cannot
    /// grab the popup directly.
    pub fn transfer_surface(&self) -> Option<SurfaceId> {
        self.transfer_window.borrow().as_ref().map(|window| window.id())
    }

    /// Show the menu attached to `rect`, in screen coordinates.
    pub fn popup_at_rect(
        &self,
        rect: ScreenRect,
        source_gravity: Gravity,
        menu_gravity: Gravity,
    ) -> Result<(), MenuError> {
        log::debug!("Popup requested at {rect:?} ({source_gravity:?} -> {menu_gravity:?})");

        self.anchor.set(Some(AnchorRequest {
            rect,
            source_gravity,
            menu_gravity,
        }));

        self.position_window()?;
        self.popup();
        Ok(())
    }

    /// Show the menu attached to a widget of another window.
    pub fn popup_at_widget(
        &self,
        widget: &dyn AnchorSource,
        source_gravity: Gravity,
        menu_gravity: Gravity,
    ) -> Result<(), MenuError> {
        let offset = widget.toplevel_position().coords;
        let rect = widget.allocation().translate(offset);

        self.popup_at_rect(rect, source_gravity, menu_gravity)
    }

    /// Show the menu growing down and right from the pointer.
    pub fn popup_at_pointer(&self, event: &InputEvent) -> Result<(), MenuError> {
        let position = self.display.seat().pointer_position().unwrap_or_else(|| {
            Point2::new(
                event.root_position.x.round() as i32,
                event.root_position.y.round() as i32,
            )
        });

        self.popup_at_rect(ScreenRect::at(position), Gravity::SouthEast, Gravity::NorthWest)
    }

    /// Hide the menu and give up the input capture.
    ///
    /// Calling this while hidden does nothing harmful.
    pub fn popdown(&self) {
        if let Some(id) = self.key_press_id.take() {
            self.key_press.disconnect(id);
        }
        if let Some(id) = self.button_release_id.take() {
            self.button_release.disconnect(id);
        }

        let was_visible = self.window.is_visible();
        if was_visible {
            self.root.unmap_children();
        }

        self.capture.release(self.owner);
        self.window.hide();
        self.anchor.set(None);

        if was_visible {
            log::debug!("Menu popped down");
            self.popped_down.emit(&());
        }
    }

    /// Compute the window position for the current anchor and move there.
    ///
    /// Fails with [MenuError::MissingAnchor] if no popup was requested.
    pub fn position_window(&self) -> Result<(), MenuError> {
        debug_assert!(
            self.anchor.get().is_some(),
            "menu positioned without an anchor rectangle"
        );
        let Some(anchor) = self.anchor.get() else {
            log::error!("Cannot position a menu without an anchor rectangle");
            return Err(MenuError::MissingAnchor);
        };

        let origin = anchor_point(anchor.rect, anchor.source_gravity);

        self.realize();
        let size = self.natural_size();

        let work_area = self.display.monitor_workarea_at(origin);
        let origin = clamp_to_work_area(origin, size, work_area);

        self.window.resize(size);
        self.allocate(size);
        self.window.set_gravity(anchor.menu_gravity);
        self.window.move_to(origin);

        log::debug!("Menu placed at {origin:?} with size {size:?} in {work_area:?}");
        Ok(())
    }

    /// Route an input event to the menu.
    ///
    /// Nodes owning the event's surface get it first; otherwise the menu's own
    /// [key_press](Menu::key_press) and [button_release](Menu::button_release)
    /// handlers see it. Pending updates are processed afterwards.
    pub fn handle_event(&self, event: &InputEvent) -> bool {
        let handled = self.root.dispatch_event(event)
            || match event.kind {
                EventKind::KeyPress(_) => self.key_press.emit(event),
                EventKind::ButtonRelease(_) => self.button_release.emit(event),
                _ => false,
            };

        self.process_updates();
        handled
    }

    /// Apply queued relayouts and redraws, returning what was pending.
    pub fn process_updates(&self) -> Update {
        let update = self.updates.take();

        if update.contains(Update::LAYOUT) {
            self.check_resize();
        }

        if update.intersects(Update::LAYOUT | Update::DRAW) && self.window.is_visible() {
            self.window.queue_draw();
        }

        update
    }

    /// Draw the menu contents.
    pub fn draw(&self, graphics: &mut dyn Graphics) {
        self.root.draw(graphics, &self.palette.borrow());
    }

    fn layout_context(&self) -> LayoutContext<'_> {
        LayoutContext::new(self.display.text_measure(), &self.config)
    }

    fn natural_size(&self) -> Vector2<i32> {
        let cx = self.layout_context();
        Vector2::new(
            self.root.preferred_width(&cx).natural,
            self.root.preferred_height(&cx).natural,
        )
    }

    fn allocate(&self, size: Vector2<i32>) {
        let cx = self.layout_context();
        self.root.allocate(ScreenRect::new(0, 0, size.x, size.y), &cx);
    }

    fn realize(&self) {
        if self.window.is_realized() {
            return;
        }

        self.window.realize();
        self.root.realize_children(&RealizeContext {
            display: self.display.clone(),
            capture: self.capture.clone(),
            parent_surface: self.window.id(),
            config: self.config.clone(),
            updates: self.updates.clone(),
        });
    }

    fn check_resize(&self) {
        if self.anchor.get().is_none() {
            let size = self.window.size();
            self.allocate(size);
            return;
        }

        self.window.resize(Vector2::new(1, 1));
        if let Err(err) = self.position_window() {
            log::error!("Failed to reposition menu: {err}");
        }
    }

    fn transfer_window(&self) -> SurfaceId {
        let mut transfer = self.transfer_window.borrow_mut();
        let window = transfer.get_or_insert_with(|| {
            let window = self.display.create_input_surface(InputSurfaceAttributes {
                parent: None,
                rect: ScreenRect::new(-100, -100, 10, 10),
                override_redirect: true,
            });
            window.show();
            window
        });

        window.id()
    }

    fn popup(&self) {
        let surface = if self.display.supports_popup_grab() {
            self.window.id()
        } else {
            self.transfer_window()
        };

        let this = self.this.clone();
        let captured = self
            .capture
            .try_acquire(self.owner, surface, CaptureMode::Exclusive, move || {
                if let Some(menu) = this.upgrade() {
                    menu.popdown();
                }
            });

        if !captured {
            log::warn!("Menu shown without input capture, outside clicks will not dismiss it");
        }

        if self.key_press_id.get().is_none() {
            let this = self.this.clone();
            self.key_press_id.set(Some(self.key_press.connect(move |event| {
                this.upgrade().map_or(PROPAGATE, |menu| menu.on_key_press(event))
            })));
        }

        if self.button_release_id.get().is_none() {
            let this = self.this.clone();
            self.button_release_id.set(Some(self.button_release.connect(move |event| {
                this.upgrade()
                    .map_or(PROPAGATE, |menu| menu.on_button_release(event))
            })));
        }

        self.window.show();
        self.root.map_children();
        self.updates.insert(Update::DRAW);
    }

    fn on_key_press(&self, event: &InputEvent) -> bool {
        if !event.is_escape() {
            return PROPAGATE;
        }

        self.popdown();
        STOP
    }

    fn on_button_release(&self, event: &InputEvent) -> bool {
        let bounds = ScreenRect::from_origin_size(self.window.position(), self.window.size());

        if bounds.contains(event.root_position) {
            return PROPAGATE;
        }

        self.popdown();
        STOP
    }
}

impl Drop for Menu {
    fn drop(&mut self) {
        self.capture.release(self.owner);
        self.root.clear();
    }
}
