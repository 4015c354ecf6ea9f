// SPDX-License-Identifier: MIT OR Apache-2.0

//! Geometry and size negotiation.
//!
//! Everything here is plain data and pure functions. The menu container
//! performs its own layout on top of these types instead of delegating to a
//! generic layout manager.

mod anchor;
mod context;

pub use anchor::{anchor_point, clamp_to_work_area, Gravity, ScreenRect};
pub use context::{LayoutContext, SizeRequest};
