// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use traymenu_core::layout::{LayoutContext, ScreenRect, SizeRequest};
use traymenu_core::platform::InputEvent;
use traymenu_core::signal::{HandlerId, Signal, PROPAGATE};
use traymenu_core::theme::{ColorRole, Palette};
use traymenu_core::update::{Update, UpdateQueue};
use traymenu_core::vg::kurbo::{Affine, Stroke};
use traymenu_core::vg::peniko::Fill;
use traymenu_core::vgi::{shape_to_path, Graphics};
use traymenu_core::widget::RealizeContext;

use crate::node::{is_ancestor, same_node, IntoMenuNode, MenuParent, NodeKind, NodeRef};

struct Child {
    node: NodeRef,
    activation: Option<HandlerId>,
}

/// An ordered, vertically stacked list of menu nodes.
///
/// The container measures and places its children itself: heights add up,
/// widths take the maximum, and every child gets exactly its natural height
/// at the full container width. Invisible children are skipped entirely.
///
/// Children are owned: removing a child or dropping the container tears the
/// child down.
pub struct MenuBase {
    this: Weak<MenuBase>,
    children: RefCell<Vec<Child>>,
    owner: RefCell<Option<Weak<dyn MenuParent>>>,
    updates: RefCell<Option<UpdateQueue>>,
    realized: RefCell<Option<RealizeContext>>,
    mapped: Cell<bool>,
    allocation: Cell<ScreenRect>,
    /// Emitted with the activated node whenever an item below this container
    /// is activated.
    pub child_activated: Signal<NodeRef>,
}

impl MenuBase {
    /// Create an empty container.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            children: RefCell::new(Vec::new()),
            owner: RefCell::new(None),
            updates: RefCell::new(None),
            realized: RefCell::new(None),
            mapped: Cell::new(false),
            allocation: Cell::new(ScreenRect::default()),
            child_activated: Signal::new(),
        })
    }

    /// Send queued updates straight to `updates`.
    pub fn set_update_queue(&self, updates: UpdateQueue) {
        *self.updates.borrow_mut() = Some(updates);
    }

    pub(crate) fn set_owner(&self, owner: Weak<dyn MenuParent>) {
        *self.owner.borrow_mut() = Some(owner);
    }

    /// Add a node at the end.
    pub fn append(&self, child: impl IntoMenuNode) {
        let len = self.len();
        self.insert(child, len);
    }

    /// Add a node at the start.
    pub fn prepend(&self, child: impl IntoMenuNode) {
        self.insert(child, 0);
    }

    /// Add a node at `index`, or at the end if `index` is past it.
    ///
    /// A node that already has a parent is moved: it is detached from the old
    /// parent and keeps its own children. Adding a node into its own subtree
    /// is refused.
    pub fn insert(&self, child: impl IntoMenuNode, index: usize) {
        let node = child.into_menu_node();

        if let Some(this) = self.this.upgrade() {
            let cyclic = is_ancestor(&node, this);
            debug_assert!(!cyclic, "menu node added to its own subtree");
            if cyclic {
                log::error!("Refusing to add a menu node to its own subtree");
                return;
            }
        }

        if let Some(old_parent) = node.parent() {
            let old_surface = old_parent.realize_context().map(|cx| cx.parent_surface);
            old_parent.unparent_child(&node);

            let new_surface = self.realize_context().map(|cx| cx.parent_surface);
            if old_surface.is_some() && old_surface != new_surface {
                node.unrealize();
            }
        }

        let parent: Weak<dyn MenuParent> = self.this.clone();
        node.state().set_parent(Some(parent));
        let activation = self.connect_activation(&node);

        {
            let mut children = self.children.borrow_mut();
            let index = index.min(children.len());
            children.insert(
                index,
                Child {
                    node: node.clone(),
                    activation,
                },
            );
        }

        if let Some(cx) = self.realize_context() {
            node.realize(&cx);
        }

        if self.mapped.get() {
            node.map();
        }

        self.queue_update(Update::LAYOUT | Update::DRAW);
    }

    /// Remove and tear down a child. Returns `false` if `child` is not ours.
    pub fn remove(&self, child: &NodeRef) -> bool {
        let Some(removed) = self.take_child(child) else {
            return false;
        };

        self.detach(removed);
        self.queue_update(Update::LAYOUT | Update::DRAW);
        true
    }

    /// Detach a child without tearing it down. It is unmapped but keeps its
    /// own children and native resources.
    pub fn unparent(&self, child: &NodeRef) -> Option<NodeRef> {
        let removed = self.take_child(child)?;
        self.unlink(&removed);

        if removed.node.is_mapped() {
            removed.node.unmap();
        }

        self.queue_update(Update::LAYOUT | Update::DRAW);
        Some(removed.node)
    }

    /// Remove every child.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.children.borrow_mut());
        let had_children = !removed.is_empty();

        for child in removed {
            self.detach(child);
        }

        if had_children {
            self.queue_update(Update::LAYOUT | Update::DRAW);
        }
    }

    /// The children in order.
    pub fn children(&self) -> Vec<NodeRef> {
        self.children.borrow().iter().map(|c| c.node.clone()).collect()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Show every child that allows it.
    pub fn show_all(&self) {
        for child in self.visible_or_all(false) {
            child.show_all();
        }
    }

    /// Sum of the visible children's heights, at least the minimum size.
    pub fn preferred_height(&self, cx: &LayoutContext) -> SizeRequest {
        self.visible_or_all(true)
            .iter()
            .map(|child| child.preferred_height(cx))
            .sum::<SizeRequest>()
            .at_least(cx.config.min_size)
    }

    /// Widest of the visible children, at least the minimum size.
    pub fn preferred_width(&self, cx: &LayoutContext) -> SizeRequest {
        self.visible_or_all(true)
            .iter()
            .map(|child| child.preferred_width(cx))
            .fold(SizeRequest::default(), SizeRequest::max)
            .at_least(cx.config.min_size)
    }

    /// Stack the visible children top to bottom inside `bounds`.
    pub fn allocate(&self, bounds: ScreenRect, cx: &LayoutContext) {
        self.allocation.set(bounds);

        let mut y = bounds.y;
        for child in self.visible_or_all(true) {
            let height = child.preferred_height(cx).natural;
            child.allocate(ScreenRect::new(bounds.x, y, bounds.width, height), cx);
            y += height;
        }

        log::trace!("Allocated container {bounds:?} down to y={y}");
    }

    /// The last allocation.
    pub fn allocation(&self) -> ScreenRect {
        self.allocation.get()
    }

    /// Draw background and frame, then the visible children on top.
    pub fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette) {
        let bounds = self.allocation.get().to_kurbo();

        graphics.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &palette.brush(ColorRole::MenuBackground),
            None,
            &shape_to_path(&bounds),
        );
        graphics.stroke(
            &Stroke::new(1.0),
            Affine::IDENTITY,
            &palette.brush(ColorRole::MenuBorder),
            None,
            &shape_to_path(&bounds.inset(-0.5)),
        );

        for child in self.visible_or_all(true) {
            child.draw(graphics, palette);
        }
    }

    /// Realize every child and remember the context for later additions.
    pub fn realize_children(&self, cx: &RealizeContext) {
        *self.realized.borrow_mut() = Some(cx.clone());
        for child in self.children() {
            child.realize(cx);
        }
    }

    /// Unrealize every child.
    pub fn unrealize_children(&self) {
        self.realized.borrow_mut().take();
        for child in self.children() {
            child.unrealize();
        }
    }

    /// Mark the container mapped and map the visible children.
    pub fn map_children(&self) {
        self.mapped.set(true);
        for child in self.visible_or_all(true) {
            child.map();
        }
    }

    /// Mark the container unmapped and unmap every child.
    pub fn unmap_children(&self) {
        self.mapped.set(false);
        for child in self.children() {
            child.unmap();
        }
    }

    /// Offer an event to the visible children until one handles it.
    pub fn dispatch_event(&self, event: &InputEvent) -> bool {
        self.visible_or_all(true)
            .iter()
            .any(|child| child.dispatch_event(event))
    }

    fn visible_or_all(&self, visible_only: bool) -> Vec<NodeRef> {
        self.children
            .borrow()
            .iter()
            .filter(|c| !visible_only || c.node.is_visible())
            .map(|c| c.node.clone())
            .collect()
    }

    fn connect_activation(&self, node: &NodeRef) -> Option<HandlerId> {
        let base = self.this.clone();

        match node.kind() {
            NodeKind::Item(item) => {
                let weak_node = Rc::downgrade(node);
                Some(item.activate.connect(move |_| {
                    match (base.upgrade(), weak_node.upgrade()) {
                        (Some(base), Some(node)) => base.child_activated.emit(&node),
                        _ => PROPAGATE,
                    }
                }))
            },
            NodeKind::Section(section) => Some(section.child_activated().connect(move |node| {
                base.upgrade()
                    .map_or(PROPAGATE, |base| base.child_activated.emit(node))
            })),
            NodeKind::Pane(pane) => Some(pane.child_activated.connect(move |node| {
                base.upgrade()
                    .map_or(PROPAGATE, |base| base.child_activated.emit(node))
            })),
            NodeKind::Separator(_) | NodeKind::Wrapper(_) => None,
        }
    }

    fn take_child(&self, child: &NodeRef) -> Option<Child> {
        let mut children = self.children.borrow_mut();
        let index = children.iter().position(|c| same_node(&c.node, child))?;
        Some(children.remove(index))
    }

    fn unlink(&self, child: &Child) {
        if let Some(id) = child.activation {
            match child.node.kind() {
                NodeKind::Item(item) => {
                    item.activate.disconnect(id);
                },
                NodeKind::Section(section) => {
                    section.child_activated().disconnect(id);
                },
                NodeKind::Pane(pane) => {
                    pane.child_activated.disconnect(id);
                },
                NodeKind::Separator(_) | NodeKind::Wrapper(_) => {},
            }
        }

        child.node.state().set_parent(None);
    }

    fn detach(&self, child: Child) {
        self.unlink(&child);
        child.node.destroy();
    }
}

impl MenuParent for MenuBase {
    fn queue_update(&self, update: Update) {
        if let Some(updates) = self.updates.borrow().as_ref() {
            updates.insert(update);
            return;
        }

        let owner = self.owner.borrow().as_ref().and_then(Weak::upgrade);
        if let Some(owner) = owner {
            owner.queue_update(update);
        }
    }

    fn is_mapped(&self) -> bool {
        self.mapped.get()
    }

    fn unparent_child(&self, child: &NodeRef) -> bool {
        self.unparent(child).is_some()
    }

    fn realize_context(&self) -> Option<RealizeContext> {
        self.realized.borrow().clone()
    }

    fn ancestor(&self) -> Option<Rc<dyn MenuParent>> {
        self.owner.borrow().as_ref().and_then(Weak::upgrade)
    }
}

impl Drop for MenuBase {
    fn drop(&mut self) {
        for child in std::mem::take(self.children.get_mut()) {
            self.detach(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu_item::MenuItem;
    use crate::node::MenuNode;
    use crate::section::MenuSection;
    use crate::separator::MenuSeparator;
    use traymenu_core::config::MenuConfig;
    use traymenu_core::platform::headless::HeadlessDisplay;
    use traymenu_core::platform::{Display, TextMeasure};

    fn measure() -> (HeadlessDisplay, MenuConfig) {
        (
            HeadlessDisplay::with_monitor(ScreenRect::new(0, 0, 800, 600)),
            MenuConfig::default(),
        )
    }

    #[test]
    fn empty_container_reports_floor() {
        let (display, config) = measure();
        let cx = LayoutContext::new(display.text_measure(), &config);
        let base = MenuBase::new();

        assert_eq!(base.preferred_height(&cx), SizeRequest::fixed(10));
        assert_eq!(base.preferred_width(&cx), SizeRequest::fixed(10));
    }

    #[test]
    fn hidden_children_are_ignored() {
        let (display, config) = measure();
        let cx = LayoutContext::new(display.text_measure(), &config);
        let base = MenuBase::new();

        let item = MenuItem::new("Hidden");
        base.append(item.clone());
        item.hide();

        assert_eq!(base.preferred_height(&cx), SizeRequest::fixed(10));
        assert_eq!(base.preferred_width(&cx), SizeRequest::fixed(10));
    }

    #[test]
    fn insert_clamps_index_and_remove_unknown_is_noop() {
        let base = MenuBase::new();
        let first = MenuItem::new("first");
        let last = MenuItem::new("last");

        base.append(first.clone());
        base.insert(last.clone(), 42);
        base.prepend(MenuSeparator::new());

        let children = base.children();
        assert_eq!(children.len(), 3);
        assert!(same_node(&children[2], &(last.clone() as NodeRef)));

        let stranger: NodeRef = MenuItem::new("stranger");
        assert!(!base.remove(&stranger));
        assert!(base.remove(&(first.clone() as NodeRef)));
        assert!(first.parent().is_none());
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn reparenting_detaches_first() {
        let a = MenuBase::new();
        let b = MenuBase::new();
        let item = MenuItem::new("moving");

        a.append(item.clone());
        b.append(item.clone());

        assert!(a.is_empty());
        assert_eq!(b.len(), 1);
        assert_eq!(item.activate.handler_count(), 1);
    }

    #[test]
    fn width_is_widest_child() {
        let (display, config) = measure();
        let cx = LayoutContext::new(display.text_measure(), &config);
        let base = MenuBase::new();

        base.append(MenuItem::new("ab"));
        base.append(MenuItem::new("abcdef"));

        let expected = 2 * config.item_margin + display.measure_text("abcdef").x;
        assert_eq!(base.preferred_width(&cx).natural, expected);
    }

    #[test]
    fn moved_section_keeps_its_children() {
        let a = MenuBase::new();
        let b = MenuBase::new();
        let section = MenuSection::new();
        section.append(MenuItem::new("one"));
        section.append(MenuItem::new("two"));

        a.append(section.clone());
        b.append(section.clone());

        assert!(a.is_empty());
        assert_eq!(b.len(), 1);
        assert_eq!(section.children().len(), 2);
        assert!(section.parent().is_some());
    }

    #[test]
    fn unparent_does_not_destroy() {
        let base = MenuBase::new();
        let section = MenuSection::new();
        section.append(MenuItem::new("one"));
        base.append(section.clone());

        let node: NodeRef = section.clone();
        assert!(base.unparent(&node).is_some());
        assert!(base.unparent(&node).is_none());

        assert!(section.parent().is_none());
        assert_eq!(section.children().len(), 1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "own subtree"))]
    fn adding_an_ancestor_to_its_descendant_is_refused() {
        let outer = MenuSection::new();
        let inner = MenuSection::new();
        outer.append(inner.clone());

        inner.append(outer.clone());

        assert!(inner.children().is_empty());
        assert!(outer.parent().is_none());
        assert_eq!(outer.children().len(), 1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "own subtree"))]
    fn adding_a_section_to_itself_is_refused() {
        let section = MenuSection::new();

        section.append(section.clone());

        assert!(section.children().is_empty());
    }
}
