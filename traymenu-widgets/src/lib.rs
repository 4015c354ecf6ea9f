#![warn(missing_docs)]

//! Widget library for traymenu => See `traymenu` crate.
//!
//! Contains the popup menu and everything that can be placed into it.

/// Contains the [menu::Menu] popup window controller.
pub mod menu;

/// Contains the [menu_base::MenuBase] container.
pub mod menu_base;

/// Contains the [menu_item::MenuItem] widget.
pub mod menu_item;

/// Contains the [node::MenuNode] trait shared by all menu content.
pub mod node;

/// Contains the [pane::MenuPane] widget.
pub mod pane;

/// Contains the [section::MenuSection] widget.
pub mod section;

/// Contains the [seeker::Seeker] widget.
pub mod seeker;

/// Contains the [separator::MenuSeparator] widget.
pub mod separator;

/// Contains the [wrapper::MenuChildWrapper] adapter.
pub mod wrapper;
