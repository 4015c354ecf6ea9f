// SPDX-License-Identifier: MIT OR Apache-2.0

use std::rc::{Rc, Weak};

use traymenu_core::layout::{LayoutContext, ScreenRect, SizeRequest};
use traymenu_core::platform::InputEvent;
use traymenu_core::signal::Signal;
use traymenu_core::theme::Palette;
use traymenu_core::update::Update;
use traymenu_core::vgi::Graphics;
use traymenu_core::widget::RealizeContext;

use crate::menu_base::MenuBase;
use crate::node::{IntoMenuNode, MenuNode, MenuParent, NodeKind, NodeRef, NodeState};

/// A container nested inside another container.
///
/// Typically used as the inline submenu of a [MenuItem](crate::menu_item::MenuItem),
/// which then owns the section's visibility.
pub struct MenuSection {
    state: NodeState,
    base: Rc<MenuBase>,
    /// Emitted whenever the section goes off screen.
    pub unmapped: Signal<()>,
}

impl MenuSection {
    /// Create an empty section.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<MenuSection>| {
            let base = MenuBase::new();
            let owner: Weak<dyn MenuParent> = this.clone();
            base.set_owner(owner);

            Self {
                state: NodeState::new(),
                base,
                unmapped: Signal::new(),
            }
        })
    }

    /// The container holding the section's children.
    pub fn base(&self) -> &Rc<MenuBase> {
        &self.base
    }

    /// Bubbled activations of the section's children.
    pub fn child_activated(&self) -> &Signal<NodeRef> {
        &self.base.child_activated
    }

    /// Add a node at the end.
    pub fn append(&self, child: impl IntoMenuNode) {
        self.base.append(child);
    }

    /// Add a node at the start.
    pub fn prepend(&self, child: impl IntoMenuNode) {
        self.base.prepend(child);
    }

    /// Add a node at `index`.
    pub fn insert(&self, child: impl IntoMenuNode, index: usize) {
        self.base.insert(child, index);
    }

    /// Remove a child. Returns `false` if it is not ours.
    pub fn remove(&self, child: &NodeRef) -> bool {
        self.base.remove(child)
    }

    /// The children in order.
    pub fn children(&self) -> Vec<NodeRef> {
        self.base.children()
    }
}

impl MenuParent for MenuSection {
    fn queue_update(&self, update: Update) {
        MenuNode::queue_update(self, update);
    }

    fn is_mapped(&self) -> bool {
        MenuNode::is_mapped(self)
    }

    fn unparent_child(&self, child: &NodeRef) -> bool {
        self.base.unparent(child).is_some()
    }

    fn realize_context(&self) -> Option<RealizeContext> {
        self.base.realize_context()
    }

    fn ancestor(&self) -> Option<Rc<dyn MenuParent>> {
        MenuNode::parent(self)
    }
}

impl MenuNode for MenuSection {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn kind(&self) -> NodeKind<'_> {
        NodeKind::Section(self)
    }

    fn preferred_width(&self, cx: &LayoutContext) -> SizeRequest {
        self.base.preferred_width(cx)
    }

    fn preferred_height(&self, cx: &LayoutContext) -> SizeRequest {
        self.base.preferred_height(cx)
    }

    fn allocate(&self, bounds: ScreenRect, cx: &LayoutContext) {
        self.state.set_allocation(bounds);
        self.base.allocate(bounds, cx);
    }

    fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette) {
        self.base.draw(graphics, palette);
    }

    fn realize(&self, cx: &RealizeContext) {
        self.base.realize_children(cx);
    }

    fn unrealize(&self) {
        self.base.unrealize_children();
    }

    fn did_map(&self) {
        self.base.map_children();
    }

    fn did_unmap(&self) {
        self.base.unmap_children();
        self.unmapped.emit(&());
    }

    fn dispatch_event(&self, event: &InputEvent) -> bool {
        self.base.dispatch_event(event)
    }

    fn show_all(&self) {
        if self.no_show_all() {
            return;
        }
        self.show();
        self.base.show_all();
    }

    fn destroy(&self) {
        if MenuNode::is_mapped(self) {
            self.unmap();
        }
        self.base.clear();
        self.unrealize();
    }
}
