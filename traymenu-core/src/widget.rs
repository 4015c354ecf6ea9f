use std::rc::Rc;

use crate::capture::InputCaptureManager;
use crate::config::MenuConfig;
use crate::layout::{LayoutContext, ScreenRect, SizeRequest};
use crate::platform::{Display, InputEvent, SurfaceId};
use crate::theme::Palette;
use crate::update::UpdateQueue;
use crate::vgi::Graphics;

/// A shared widget.
pub type WidgetRef = Rc<dyn Widget>;

/// Everything a widget needs once its menu window exists.
#[derive(Clone)]
pub struct RealizeContext {
    /// The display the menu lives on.
    pub display: Rc<dyn Display>,
    /// Input capture shared by all popups.
    pub capture: Rc<InputCaptureManager>,
    /// The menu window; input surfaces are created as its children.
    pub parent_surface: SurfaceId,
    /// Widget metrics.
    pub config: Rc<MenuConfig>,
    /// Where widgets queue redraws and relayouts.
    pub updates: UpdateQueue,
}

/// Arbitrary content that can be placed into a menu.
///
/// Widgets are shared (`Rc`) and use interior mutability, so every method
/// takes `&self`.
///
/// # Lifecycle
///
/// 1. [realize](Widget::realize) once the menu window exists,
/// 2. [map](Widget::map)/[unmap](Widget::unmap) as the menu is shown and hidden,
/// 3. [unrealize](Widget::unrealize) before the widget is dropped from the tree.
///
/// Layout runs [preferred_width](Widget::preferred_width) and
/// [preferred_height](Widget::preferred_height) before every
/// [allocate](Widget::allocate).
///
/// ```rust,ignore
/// struct Spacer(Cell<ScreenRect>);
///
/// impl Widget for Spacer {
///     fn preferred_width(&self, _: &LayoutContext) -> SizeRequest { SizeRequest::fixed(0) }
///     fn preferred_height(&self, _: &LayoutContext) -> SizeRequest { SizeRequest::fixed(12) }
///     fn allocate(&self, bounds: ScreenRect) { self.0.set(bounds) }
///     fn draw(&self, _: &mut dyn Graphics, _: &Palette) {}
/// }
/// ```
pub trait Widget {
    /// Width request.
    fn preferred_width(&self, cx: &LayoutContext) -> SizeRequest;

    /// Height request.
    fn preferred_height(&self, cx: &LayoutContext) -> SizeRequest;

    /// Receive the final bounds, relative to the menu window.
    fn allocate(&self, bounds: ScreenRect);

    /// Draw into the menu window.
    fn draw(&self, graphics: &mut dyn Graphics, palette: &Palette);

    /// Whether the widget takes part in layout.
    fn is_visible(&self) -> bool {
        true
    }

    /// Create surfaces and store what is needed later.
    fn realize(&self, _cx: &RealizeContext) {}

    /// Drop everything created in [realize](Widget::realize).
    fn unrealize(&self) {}

    /// The menu window became visible.
    fn map(&self) {}

    /// The menu window was hidden.
    fn unmap(&self) {}

    /// Whether input reported for `surface` belongs to this widget.
    fn owns_surface(&self, _surface: SurfaceId) -> bool {
        false
    }

    /// Handle an event on one of the owned surfaces. Returns `true` if handled.
    fn handle_event(&self, _event: &InputEvent) -> bool {
        false
    }
}
