// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use traymenu_core::config::MenuConfig;
use traymenu_core::layout::{LayoutContext, ScreenRect, SizeRequest};
use traymenu_core::platform::{EventKind, InputEvent, InputSurface, InputSurfaceAttributes, SurfaceId};
use traymenu_core::signal::{HandlerId, Signal, PROPAGATE};
use traymenu_core::theme::{ColorRole, Palette};
use traymenu_core::update::Update;
use traymenu_core::vg::kurbo::{Affine, Point, Rect};
use traymenu_core::vg::peniko::Fill;
use traymenu_core::vgi::{shape_to_path, Graphics, IconSource};
use traymenu_core::widget::RealizeContext;

use crate::menu_base::MenuBase;
use crate::node::{MenuNode, NodeKind, NodeState};
use crate::section::MenuSection;

bitflags! {
    /// Visual state of an item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u8 {
        /// The pointer is over the item.
        const PRELIGHT = 0b01;
    }
}

/// Disclosure state of an item's section submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmenuState {
    /// The section is hidden.
    #[default]
    Collapsed,
    /// The section is shown below the item.
    Expanded,
}

/// Glyph of the disclosure arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    /// Pointing towards the end of the line.
    Forward,
    /// Pointing down.
    Down,
}

impl Arrow {
    /// Themed icon name of the glyph.
    pub fn icon_name(self) -> &'static str {
        match self {
            Arrow::Forward => "pan-end-symbolic",
            Arrow::Down => "pan-down-symbolic",
        }
    }
}

/// What an item opens.
#[derive(Clone)]
pub enum Submenu {
    /// An inline section the item expands and collapses.
    Section(Rc<MenuSection>),
    /// Any other container; the item only shows an arrow for it.
    Container(Rc<MenuBase>),
}

impl From<Rc<MenuSection>> for Submenu {
    fn from(section: Rc<MenuSection>) -> Self {
        Submenu::Section(section)
    }
}

impl From<Rc<MenuBase>> for Submenu {
    fn from(container: Rc<MenuBase>) -> Self {
        Submenu::Container(container)
    }
}

struct SubmenuLink {
    submenu: Submenu,
    unmapped: Option<HandlerId>,
}

/// A menu line: optional icon, a label and an optional submenu arrow.
///
/// Releasing a pointer button over the item either toggles its section
/// submenu or, without a submenu, emits [activate](MenuItem::activate).
pub struct MenuItem {
    this: Weak<MenuItem>,
    state: NodeState,
    label: RefCell<String>,
    icon: RefCell<Option<IconSource>>,
    submenu: RefCell<Option<SubmenuLink>>,
    submenu_state: Cell<SubmenuState>,
    flags: Cell<StateFlags>,
    input_region: RefCell<Option<Box<dyn InputSurface>>>,
    metrics: RefCell<Rc<MenuConfig>>,
    /// Emitted when an item without submenu is activated.
    pub activate: Signal<()>,
}

impl MenuItem {
    /// Create an item with the given label.
    pub fn new(label: impl Into<String>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            state: NodeState::new(),
            label: RefCell::new(label.into()),
            icon: RefCell::new(None),
            submenu: RefCell::new(None),
            submenu_state: Cell::new(SubmenuState::Collapsed),
            flags: Cell::new(StateFlags::empty()),
            input_region: RefCell::new(None),
            metrics: RefCell::new(Rc::new(MenuConfig::default())),
            activate: Signal::new(),
        })
    }

    /// Create an item with a label and an icon.
    pub fn with_icon(label: impl Into<String>, icon: IconSource) -> Rc<Self> {
        let item = Self::new(label);
        item.set_icon(Some(icon));
        item
    }

    /// The label text.
    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    /// Change the label text.
    pub fn set_label(&self, label: impl Into<String>) {
        *self.label.borrow_mut() = label.into();
        self.queue_update(Update::LAYOUT | Update::DRAW);
    }

    /// The icon, if any.
    pub fn icon(&self) -> Option<IconSource> {
        self.icon.borrow().clone()
    }

    /// Set or clear the icon.
    pub fn set_icon(&self, icon: Option<IconSource>) {
        *self.icon.borrow_mut() = icon;
        self.queue_update(Update::LAYOUT | Update::DRAW);
    }

    /// The submenu, if any.
    pub fn submenu(&self) -> Option<Submenu> {
        self.submenu.borrow().as_ref().map(|link| link.submenu.clone())
    }

    /// Set or clear the submenu.
    ///
    /// A section submenu is taken over by the item: it is hidden, excluded
    /// from `show_all` and only shown while the item is expanded.
    pub fn set_submenu(&self, submenu: Option<Submenu>) {
        let old = self.submenu.borrow_mut().take();
        if let Some(SubmenuLink {
            submenu: Submenu::Section(section),
            unmapped: Some(id),
        }) = old
        {
            section.unmapped.disconnect(id);
        }

        self.submenu_state.set(SubmenuState::Collapsed);

        let link = submenu.map(|submenu| {
            let unmapped = match &submenu {
                Submenu::Section(section) => {
                    section.set_no_show_all(true);
                    section.hide();

                    let item = self.this.clone();
                    Some(section.unmapped.connect(move |_| {
                        if let Some(item) = item.upgrade() {
                            item.hide_submenu();
                        }
                        PROPAGATE
                    }))
                },
                Submenu::Container(_) => None,
            };

            SubmenuLink { submenu, unmapped }
        });

        *self.submenu.borrow_mut() = link;
        self.queue_update(Update::LAYOUT | Update::DRAW);
    }

    /// Current disclosure state.
    pub fn submenu_state(&self) -> SubmenuState {
        self.submenu_state.get()
    }

    /// The disclosure arrow, present only with a submenu.
    pub fn arrow(&self) -> Option<Arrow> {
        self.submenu.borrow().as_ref().map(|_| match self.submenu_state.get() {
            SubmenuState::Collapsed => Arrow::Forward,
            SubmenuState::Expanded => Arrow::Down,
        })
    }

    /// Current visual state.
    pub fn state_flags(&self) -> StateFlags {
        self.flags.get()
    }

    /// The input-only surface, while realized.
    pub fn input_region(&self) -> Option<SurfaceId> {
        self.input_region.borrow().as_ref().map(|surface| surface.id())
    }

    /// Toggle the section submenu, or emit `activate` without a submenu.
    ///
    /// Returns whether an `activate` handler handled the activation.
    pub fn maybe_activate(&self) -> bool {
        match self.submenu() {
            Some(Submenu::Section(section)) => {
                match self.submenu_state.get() {
                    SubmenuState::Expanded => self.collapse(&section),
                    SubmenuState::Collapsed => {
                        section.show();
                        self.submenu_state.set(SubmenuState::Expanded);
                        log::debug!("Expanded submenu of {:?}", self.label.borrow());
                    },
                }
                self.queue_update(Update::DRAW);
                false
            },
            Some(Submenu::Container(_)) => false,
            None => self.activate.emit(&()),
        }
    }

    /// Hide the section submenu and reset the arrow.
    pub fn hide_submenu(&self) {
        if let Some(Submenu::Section(section)) = self.submenu() {
            self.collapse(&section);
        }
    }

    fn collapse(&self, section: &MenuSection) {
        let was_expanded = self.submenu_state.replace(SubmenuState::Collapsed) == SubmenuState::Expanded;
        section.hide();

        if was_expanded {
            log::debug!("Collapsed submenu of {:?}", self.label.borrow());
            self.queue_update(Update::DRAW);
        }
    }

    fn set_flags(&self, flags: StateFlags, on: bool) {
        let mut current = self.flags.get();
        current.set(flags, on);
        if current != self.flags.get() {
            self.flags.set(current);
            self.queue_update(Update::DRAW);
        }
    }

    fn content_height(&self, cx: &LayoutContext) -> i32 {
        let mut height = cx.text.measure_text(&self.label.borrow()).y;

        if self.icon.borrow().is_some() {
            height = height.max(cx.config.icon_size);
        }
        if self.submenu.borrow().is_some() {
            height = height.max(cx.config.arrow_size);
        }

        height
    }
}

impl MenuNode for MenuItem {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn kind(&self) -> NodeKind<'_> {
        NodeKind::Item(self)
    }

    fn is_activatable(&self) -> bool {
        true
    }

    fn preferred_width(&self, cx: &LayoutContext) -> SizeRequest {
        let config = cx.config;
        let mut width = 2 * config.item_margin + cx.text.measure_text(&self.label.borrow()).x;

        if self.icon.borrow().is_some() {
            width += config.icon_size + config.item_spacing;
        }
        if self.submenu.borrow().is_some() {
            width += config.item_spacing + config.arrow_size;
        }

        SizeRequest::fixed(width)
    }

    fn preferred_height(&self, cx: &LayoutContext) -> SizeRequest {
        SizeRequest::fixed(2 * cx.config.item_margin + self.content_height(cx))
    }

    fn allocate(&self, bounds: ScreenRect, _cx: &LayoutContext) {
        self.state.set_allocation(bounds);

        if let Some(region) = self.input_region.borrow().as_ref() {
            region.move_resize(bounds);
        }
    }

    fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette) {
        let bounds = self.allocation().to_kurbo();
        let config = self.metrics.borrow().clone();

        if self.flags.get().contains(StateFlags::PRELIGHT) {
            graphics.fill(
                Fill::NonZero,
                Affine::IDENTITY,
                &palette.brush(ColorRole::ItemPrelight),
                None,
                &shape_to_path(&bounds),
            );
        }

        let margin = config.item_margin as f64;
        let mut x = bounds.x0 + margin;
        let center_y = bounds.center().y;

        if let Some(icon) = self.icon.borrow().as_ref() {
            let size = config.icon_size as f64;
            graphics.draw_icon(icon, Rect::new(x, center_y - size / 2.0, x + size, center_y + size / 2.0));
            x += size + config.item_spacing as f64;
        }

        graphics.draw_text(
            &self.label.borrow(),
            Point::new(x, bounds.y0 + margin),
            &palette.brush(ColorRole::Text),
        );

        if let Some(arrow) = self.arrow() {
            let size = config.arrow_size as f64;
            let right = bounds.x1 - margin;
            graphics.draw_icon(
                &IconSource::named(arrow.icon_name()),
                Rect::new(right - size, center_y - size / 2.0, right, center_y + size / 2.0),
            );
        }
    }

    fn realize(&self, cx: &RealizeContext) {
        *self.metrics.borrow_mut() = cx.config.clone();

        if self.input_region.borrow().is_some() {
            return;
        }

        let region = cx.display.create_input_surface(InputSurfaceAttributes {
            parent: Some(cx.parent_surface),
            rect: self.allocation(),
            override_redirect: false,
        });
        *self.input_region.borrow_mut() = Some(region);
    }

    fn unrealize(&self) {
        self.input_region.borrow_mut().take();
    }

    fn did_map(&self) {
        if let Some(region) = self.input_region.borrow().as_ref() {
            region.show();
        }
    }

    fn did_unmap(&self) {
        if let Some(region) = self.input_region.borrow().as_ref() {
            region.hide();
        }
        self.set_flags(StateFlags::PRELIGHT, false);
        self.hide_submenu();
    }

    fn dispatch_event(&self, event: &InputEvent) -> bool {
        if self.input_region() != Some(event.surface) {
            return false;
        }

        match event.kind {
            EventKind::ButtonRelease(_) => {
                self.maybe_activate();
                true
            },
            EventKind::Enter => {
                self.set_flags(StateFlags::PRELIGHT, true);
                false
            },
            EventKind::Leave => {
                self.set_flags(StateFlags::PRELIGHT, false);
                false
            },
            _ => false,
        }
    }
}
