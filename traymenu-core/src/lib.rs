#![warn(missing_docs)]

//! Core library for traymenu => See `traymenu` crate.
//!
//! Contains the toolkit-independent pieces the menu widgets are built on:
//! geometry, input capture, animation, the windowing-layer traits and the
//! vector graphics interface.

pub use vello as vg;

/// Contains useful types for interacting with winit input enums.
pub mod window {
    pub use winit::event::{ElementState, MouseButton};
    pub use winit::keyboard::{Key, NamedKey};
}

/// Contains the [AnimationController](animation::AnimationController).
pub mod animation;

/// Contains the process-wide [InputCaptureManager](capture::InputCaptureManager).
pub mod capture;

/// Contains the [MenuConfig](config::MenuConfig) struct and its loaders.
pub mod config;

/// Contains the [MenuError](error::MenuError) type.
pub mod error;

/// Contains geometry, gravity and size negotiation types.
pub mod layout;

/// Contains the windowing-layer abstraction and a headless implementation.
pub mod platform;

/// Contains the observer [Signal](signal::Signal) type.
pub mod signal;

/// Contains the default [Palette](theme::Palette).
pub mod theme;

/// Contains the [Update](update::Update) flags.
pub mod update;

/// Contains the vector graphics interface abstraction.
pub mod vgi;

/// Contains the content [Widget](widget::Widget) trait.
pub mod widget;
