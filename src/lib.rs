#![warn(missing_docs)]

//! Self-drawn popup menus for status-bar applications.
//!
//! A [Menu](widgets::menu::Menu) is an undecorated popup window that stacks
//! items, sections and arbitrary content vertically, places itself next to an
//! anchor rectangle and closes on Escape, an outside click or item activation.

pub use nalgebra as math;
pub use vello::peniko as color;

pub use traymenu_core as core;
pub use traymenu_widgets as widgets;

/// A "prelude" for users of traymenu.
///
/// Importing this module brings into scope the most common types
/// needed to build a menu.
///
/// ```rust
/// use traymenu::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::capture::InputCaptureManager;
    pub use crate::core::config::MenuConfig;
    pub use crate::core::error::MenuError;
    pub use crate::core::layout::{Gravity, ScreenRect};
    pub use crate::core::platform::{AnchorSource, Display, EventKind, InputEvent};
    pub use crate::core::signal::{Signal, PROPAGATE, STOP};
    pub use crate::core::theme::{ColorRole, Palette};
    pub use crate::core::vgi::{Graphics, IconSource};
    pub use crate::core::widget::{Widget, WidgetRef};

    // Math
    pub use nalgebra::{Point2, Vector2};

    // Widgets
    pub use crate::widgets::menu::Menu;
    pub use crate::widgets::menu_item::{MenuItem, Submenu};
    pub use crate::widgets::node::MenuNode;
    pub use crate::widgets::pane::MenuPane;
    pub use crate::widgets::section::MenuSection;
    pub use crate::widgets::seeker::Seeker;
    pub use crate::widgets::separator::MenuSeparator;
}
