// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use traymenu_core::layout::{LayoutContext, ScreenRect, SizeRequest};
use traymenu_core::platform::InputEvent;
use traymenu_core::signal::Signal;
use traymenu_core::theme::Palette;
use traymenu_core::update::Update;
use traymenu_core::vgi::Graphics;
use traymenu_core::widget::{RealizeContext, WidgetRef};

use crate::menu_item::MenuItem;
use crate::pane::MenuPane;
use crate::section::MenuSection;
use crate::separator::MenuSeparator;
use crate::seeker::Seeker;
use crate::wrapper::MenuChildWrapper;

/// A shared menu node.
pub type NodeRef = Rc<dyn MenuNode>;

/// Whether two node handles point at the same node.
pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Something that owns menu nodes.
pub trait MenuParent {
    /// Queue work for the popup hosting this parent.
    fn queue_update(&self, update: Update);

    /// Whether the parent is currently on screen.
    fn is_mapped(&self) -> bool;

    /// Detach `child` without tearing it down, so it can be attached
    /// elsewhere. Returns `false` if it is not a child of this parent.
    fn unparent_child(&self, child: &NodeRef) -> bool;

    /// The context children are realized with, once the menu window exists.
    fn realize_context(&self) -> Option<RealizeContext>;

    /// The parent one level further up, if any.
    fn ancestor(&self) -> Option<Rc<dyn MenuParent>>;
}

/// Whether `node` is `parent` or one of its ancestors.
pub(crate) fn is_ancestor(node: &NodeRef, parent: Rc<dyn MenuParent>) -> bool {
    let mut current = Some(parent);

    while let Some(parent) = current {
        if std::ptr::addr_eq(Rc::as_ptr(&parent), Rc::as_ptr(node)) {
            return true;
        }
        current = parent.ancestor();
    }

    false
}

/// The concrete kind of a node.
pub enum NodeKind<'a> {
    /// A label with optional icon and submenu.
    Item(&'a MenuItem),
    /// A nested container.
    Section(&'a MenuSection),
    /// A horizontal line.
    Separator(&'a MenuSeparator),
    /// Arbitrary content.
    Wrapper(&'a MenuChildWrapper),
    /// Sections laid out side by side.
    Pane(&'a MenuPane),
}

/// State every node carries.
pub struct NodeState {
    parent: RefCell<Option<Weak<dyn MenuParent>>>,
    visible: Cell<bool>,
    mapped: Cell<bool>,
    no_show_all: Cell<bool>,
    allocation: Cell<ScreenRect>,
    /// Emitted when keyboard selection moves to another node.
    pub selection_changed: Signal<NodeRef>,
}

impl NodeState {
    /// Create state for a visible, detached node.
    pub fn new() -> Self {
        Self {
            parent: RefCell::new(None),
            visible: Cell::new(true),
            mapped: Cell::new(false),
            no_show_all: Cell::new(false),
            allocation: Cell::new(ScreenRect::default()),
            selection_changed: Signal::new(),
        }
    }

    /// The node's own visibility flag, ignoring any content it wraps.
    pub fn is_shown(&self) -> bool {
        self.visible.get()
    }

    pub(crate) fn set_parent(&self, parent: Option<Weak<dyn MenuParent>>) {
        *self.parent.borrow_mut() = parent;
    }

    pub(crate) fn set_mapped(&self, mapped: bool) {
        self.mapped.set(mapped);
    }

    pub(crate) fn set_allocation(&self, allocation: ScreenRect) {
        self.allocation.set(allocation);
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Common interface of everything a menu container holds.
pub trait MenuNode {
    /// Shared node state.
    fn state(&self) -> &NodeState;

    /// The concrete kind of this node.
    fn kind(&self) -> NodeKind<'_>;

    /// Whether the node reacts to activation.
    fn is_activatable(&self) -> bool {
        false
    }

    /// Width request.
    fn preferred_width(&self, cx: &LayoutContext) -> SizeRequest;

    /// Height request.
    fn preferred_height(&self, cx: &LayoutContext) -> SizeRequest;

    /// Receive the final bounds, relative to the menu window.
    fn allocate(&self, bounds: ScreenRect, _cx: &LayoutContext) {
        self.state().set_allocation(bounds);
    }

    /// Draw into the menu window.
    fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette);

    /// Create native resources.
    fn realize(&self, _cx: &RealizeContext) {}

    /// Release native resources.
    fn unrealize(&self) {}

    /// Called after the node became mapped.
    fn did_map(&self) {}

    /// Called after the node became unmapped.
    fn did_unmap(&self) {}

    /// Route an input event. Returns `true` if it was handled.
    fn dispatch_event(&self, _event: &InputEvent) -> bool {
        false
    }

    /// Show this node and everything below it that allows it.
    fn show_all(&self) {
        if !self.no_show_all() {
            self.show();
        }
    }

    /// Tear down a detached node.
    fn destroy(&self) {
        debug_assert!(
            self.parent().is_none(),
            "menu node destroyed while still attached to its parent"
        );
        if self.is_mapped() {
            self.unmap();
        }
        self.unrealize();
    }

    /// The owning container, if attached.
    fn parent(&self) -> Option<Rc<dyn MenuParent>> {
        self.state().parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Whether the node takes part in layout.
    fn is_visible(&self) -> bool {
        self.state().visible.get()
    }

    /// Whether the node is on screen.
    fn is_mapped(&self) -> bool {
        self.state().mapped.get()
    }

    /// Current allocation, relative to the menu window.
    fn allocation(&self) -> ScreenRect {
        self.state().allocation.get()
    }

    /// Whether [show_all](MenuNode::show_all) skips this node.
    fn no_show_all(&self) -> bool {
        self.state().no_show_all.get()
    }

    /// Exclude this node from [show_all](MenuNode::show_all).
    fn set_no_show_all(&self, no_show_all: bool) {
        self.state().no_show_all.set(no_show_all);
    }

    /// Make the node visible.
    fn show(&self) {
        self.set_visible(true);
    }

    /// Make the node invisible.
    fn hide(&self) {
        self.set_visible(false);
    }

    /// Change visibility, mapping or unmapping as needed.
    fn set_visible(&self, visible: bool) {
        if self.state().visible.replace(visible) == visible {
            return;
        }

        let parent = self.parent();

        if visible {
            if parent.as_ref().is_some_and(|p| p.is_mapped()) {
                self.map();
            }
        } else if self.is_mapped() {
            self.unmap();
        }

        if let Some(parent) = parent {
            parent.queue_update(Update::LAYOUT | Update::DRAW);
        }
    }

    /// Put the node on screen.
    fn map(&self) {
        if self.is_mapped() || !self.is_visible() {
            return;
        }
        self.state().set_mapped(true);
        self.did_map();
    }

    /// Take the node off screen.
    fn unmap(&self) {
        if !self.is_mapped() {
            return;
        }
        self.state().set_mapped(false);
        self.did_unmap();
    }

    /// Queue work for the hosting popup.
    fn queue_update(&self, update: Update) {
        if let Some(parent) = self.parent() {
            parent.queue_update(update);
        }
    }
}

/// Conversion into a menu node, wrapping plain content.
pub trait IntoMenuNode {
    /// Convert into a node handle.
    fn into_menu_node(self) -> NodeRef;
}

impl IntoMenuNode for NodeRef {
    fn into_menu_node(self) -> NodeRef {
        self
    }
}

impl IntoMenuNode for Rc<MenuItem> {
    fn into_menu_node(self) -> NodeRef {
        self
    }
}

impl IntoMenuNode for Rc<MenuSection> {
    fn into_menu_node(self) -> NodeRef {
        self
    }
}

impl IntoMenuNode for Rc<MenuSeparator> {
    fn into_menu_node(self) -> NodeRef {
        self
    }
}

impl IntoMenuNode for Rc<MenuChildWrapper> {
    fn into_menu_node(self) -> NodeRef {
        self
    }
}

impl IntoMenuNode for Rc<MenuPane> {
    fn into_menu_node(self) -> NodeRef {
        self
    }
}

impl IntoMenuNode for WidgetRef {
    fn into_menu_node(self) -> NodeRef {
        MenuChildWrapper::new(self)
    }
}

impl IntoMenuNode for Rc<Seeker> {
    fn into_menu_node(self) -> NodeRef {
        MenuChildWrapper::new(self)
    }
}
