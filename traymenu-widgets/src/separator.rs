use std::rc::Rc;

use traymenu_core::layout::{LayoutContext, SizeRequest};
use traymenu_core::theme::{ColorRole, Palette};
use traymenu_core::vg::kurbo::Affine;
use traymenu_core::vg::peniko::Fill;
use traymenu_core::vgi::{shape_to_path, Graphics};

use crate::node::{MenuNode, NodeKind, NodeState};

/// A thin horizontal line between groups of items.
pub struct MenuSeparator {
    state: NodeState,
}

impl MenuSeparator {
    /// Create a separator.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            state: NodeState::new(),
        })
    }
}

impl MenuNode for MenuSeparator {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn kind(&self) -> NodeKind<'_> {
        NodeKind::Separator(self)
    }

    fn preferred_width(&self, _cx: &LayoutContext) -> SizeRequest {
        SizeRequest::fixed(0)
    }

    fn preferred_height(&self, cx: &LayoutContext) -> SizeRequest {
        SizeRequest::fixed(cx.config.separator_height)
    }

    fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette) {
        let bounds = self.allocation();
        if bounds.height <= 0 {
            return;
        }

        graphics.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &palette.brush(ColorRole::Separator),
            None,
            &shape_to_path(&bounds.to_kurbo()),
        );
    }
}
