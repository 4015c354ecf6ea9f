use std::rc::Rc;

use traymenu_core::layout::{LayoutContext, ScreenRect, SizeRequest};
use traymenu_core::platform::InputEvent;
use traymenu_core::theme::Palette;
use traymenu_core::vgi::Graphics;
use traymenu_core::widget::{RealizeContext, WidgetRef};

use crate::node::{MenuNode, NodeKind, NodeState};

/// Adapter that puts arbitrary [Widget](traymenu_core::widget::Widget)
/// content into a menu.
///
/// Containers create it automatically when plain content is added. It has no
/// activation signal of its own, so it never takes part in bubbling.
pub struct MenuChildWrapper {
    state: NodeState,
    content: WidgetRef,
}

impl MenuChildWrapper {
    /// Wrap `content`.
    pub fn new(content: WidgetRef) -> Rc<Self> {
        Rc::new(Self {
            state: NodeState::new(),
            content,
        })
    }

    /// The wrapped content.
    pub fn content(&self) -> &WidgetRef {
        &self.content
    }
}

impl MenuNode for MenuChildWrapper {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn kind(&self) -> NodeKind<'_> {
        NodeKind::Wrapper(self)
    }

    fn is_visible(&self) -> bool {
        self.state.is_shown() && self.content.is_visible()
    }

    fn preferred_width(&self, cx: &LayoutContext) -> SizeRequest {
        self.content.preferred_width(cx)
    }

    fn preferred_height(&self, cx: &LayoutContext) -> SizeRequest {
        self.content.preferred_height(cx)
    }

    fn allocate(&self, bounds: ScreenRect, _cx: &LayoutContext) {
        self.state.set_allocation(bounds);
        self.content.allocate(bounds);
    }

    fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette) {
        self.content.draw(graphics, palette);
    }

    fn realize(&self, cx: &RealizeContext) {
        self.content.realize(cx);
    }

    fn unrealize(&self) {
        self.content.unrealize();
    }

    fn did_map(&self) {
        self.content.map();
    }

    fn did_unmap(&self) {
        self.content.unmap();
    }

    fn dispatch_event(&self, event: &InputEvent) -> bool {
        self.content.owns_surface(event.surface) && self.content.handle_event(event)
    }
}
