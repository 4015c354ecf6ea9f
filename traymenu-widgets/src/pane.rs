// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use traymenu_core::layout::{LayoutContext, ScreenRect, SizeRequest};
use traymenu_core::platform::InputEvent;
use traymenu_core::signal::{HandlerId, Signal, PROPAGATE};
use traymenu_core::theme::Palette;
use traymenu_core::update::Update;
use traymenu_core::vgi::Graphics;
use traymenu_core::widget::RealizeContext;

use crate::node::{same_node, MenuNode, MenuParent, NodeKind, NodeRef, NodeState};
use crate::section::MenuSection;

/// Sections placed side by side, sharing the width equally.
pub struct MenuPane {
    this: Weak<MenuPane>,
    state: NodeState,
    panes: RefCell<Vec<(Rc<MenuSection>, HandlerId)>>,
    realized: RefCell<Option<RealizeContext>>,
    /// Bubbled activations of every pane.
    pub child_activated: Signal<NodeRef>,
}

impl MenuPane {
    /// Create a pane without columns.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            state: NodeState::new(),
            panes: RefCell::new(Vec::new()),
            realized: RefCell::new(None),
            child_activated: Signal::new(),
        })
    }

    /// Add a new column and return it.
    pub fn add_pane(&self) -> Rc<MenuSection> {
        let section = MenuSection::new();
        let parent: Weak<dyn MenuParent> = self.this.clone();
        section.state().set_parent(Some(parent));

        let pane = self.this.clone();
        let id = section.child_activated().connect(move |node| {
            pane.upgrade()
                .map_or(PROPAGATE, |pane| pane.child_activated.emit(node))
        });

        self.panes.borrow_mut().push((section.clone(), id));

        let realized = self.realized.borrow().clone();
        if let Some(cx) = realized {
            section.realize(&cx);
        }
        if MenuNode::is_mapped(self) {
            section.map();
        }

        MenuNode::queue_update(self, Update::LAYOUT | Update::DRAW);
        section
    }

    /// The columns in order.
    pub fn panes(&self) -> Vec<Rc<MenuSection>> {
        self.panes.borrow().iter().map(|(section, _)| section.clone()).collect()
    }

    fn visible_panes(&self) -> Vec<Rc<MenuSection>> {
        self.panes()
            .into_iter()
            .filter(|section| section.is_visible())
            .collect()
    }
}

impl MenuParent for MenuPane {
    fn queue_update(&self, update: Update) {
        MenuNode::queue_update(self, update);
    }

    fn is_mapped(&self) -> bool {
        MenuNode::is_mapped(self)
    }

    fn unparent_child(&self, child: &NodeRef) -> bool {
        let removed = {
            let mut panes = self.panes.borrow_mut();
            let Some(index) = panes
                .iter()
                .position(|(section, _)| same_node(&(section.clone() as NodeRef), child))
            else {
                return false;
            };
            panes.remove(index)
        };

        let (section, id) = removed;
        section.child_activated().disconnect(id);
        section.state().set_parent(None);
        if MenuNode::is_mapped(&*section) {
            section.unmap();
        }
        MenuNode::queue_update(self, Update::LAYOUT | Update::DRAW);
        true
    }

    fn realize_context(&self) -> Option<RealizeContext> {
        self.realized.borrow().clone()
    }

    fn ancestor(&self) -> Option<Rc<dyn MenuParent>> {
        MenuNode::parent(self)
    }
}

impl MenuNode for MenuPane {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn kind(&self) -> NodeKind<'_> {
        NodeKind::Pane(self)
    }

    fn preferred_width(&self, cx: &LayoutContext) -> SizeRequest {
        self.visible_panes()
            .iter()
            .map(|section| section.preferred_width(cx))
            .sum()
    }

    fn preferred_height(&self, cx: &LayoutContext) -> SizeRequest {
        self.visible_panes()
            .iter()
            .map(|section| section.preferred_height(cx))
            .fold(SizeRequest::default(), SizeRequest::max)
    }

    fn allocate(&self, bounds: ScreenRect, cx: &LayoutContext) {
        self.state.set_allocation(bounds);

        let panes = self.visible_panes();
        if panes.is_empty() {
            return;
        }

        let widths: Vec<i32> = panes
            .iter()
            .map(|section| section.preferred_width(cx).natural)
            .collect();
        let extra = (bounds.width - widths.iter().sum::<i32>()).max(0);
        let share = extra / panes.len() as i32;
        let remainder = extra % panes.len() as i32;

        let mut x = bounds.x;
        for (index, (section, width)) in panes.iter().zip(widths).enumerate() {
            let mut width = width + share;
            if index + 1 == panes.len() {
                width += remainder;
            }
            section.allocate(ScreenRect::new(x, bounds.y, width, bounds.height), cx);
            x += width;
        }
    }

    fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette) {
        for section in self.visible_panes() {
            section.draw(graphics, palette);
        }
    }

    fn realize(&self, cx: &RealizeContext) {
        *self.realized.borrow_mut() = Some(cx.clone());
        for section in self.panes() {
            section.realize(cx);
        }
    }

    fn unrealize(&self) {
        self.realized.borrow_mut().take();
        for section in self.panes() {
            section.unrealize();
        }
    }

    fn did_map(&self) {
        for section in self.visible_panes() {
            section.map();
        }
    }

    fn did_unmap(&self) {
        for section in self.panes() {
            section.unmap();
        }
    }

    fn dispatch_event(&self, event: &InputEvent) -> bool {
        self.visible_panes()
            .iter()
            .any(|section| section.dispatch_event(event))
    }

    fn show_all(&self) {
        if self.no_show_all() {
            return;
        }
        self.show();
        for section in self.panes() {
            section.show_all();
        }
    }

    fn destroy(&self) {
        if MenuNode::is_mapped(self) {
            self.unmap();
        }
        let panes = std::mem::take(&mut *self.panes.borrow_mut());
        for (section, id) in panes {
            section.child_activated().disconnect(id);
            section.state().set_parent(None);
            section.destroy();
        }
        self.realized.borrow_mut().take();
    }
}
