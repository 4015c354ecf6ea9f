//! Vector Graphics Interface abstraction.
//!
//! Menu nodes draw through [Graphics] so they stay independent of the
//! renderer. [VelloGraphics] renders into a vello scene and the
//! [RecordingGraphics] keeps a list of operations for tests.

use std::path::PathBuf;

use vello::kurbo::{Affine, BezPath, Point, Rect, Shape, Stroke};
use vello::peniko::{Brush, Fill};

mod recording;
mod vello_vg;

pub use recording::{DrawOp, RecordingGraphics};
pub use vello_vg::{GlyphPainter, VelloGraphics};

/// Where an icon comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconSource {
    /// A themed icon name, e.g. `pan-down-symbolic`.
    Name(String),
    /// An image file.
    Path(PathBuf),
}

impl IconSource {
    /// A themed icon by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

/// A trait for rendering vector graphics.
///
/// Note: Methods use `&BezPath` for object-safety. To use concrete shape types
/// (Rect, RoundedRect, Line, etc.), convert them with [shape_to_path].
pub trait Graphics {
    /// Fill a shape with the given brush.
    fn fill(
        &mut self,
        fill_rule: Fill,
        transform: Affine,
        brush: &Brush,
        brush_transform: Option<Affine>,
        shape: &BezPath,
    );

    /// Stroke a shape with the given brush.
    fn stroke(
        &mut self,
        style: &Stroke,
        transform: Affine,
        brush: &Brush,
        brush_transform: Option<Affine>,
        shape: &BezPath,
    );

    /// Draw a single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, brush: &Brush);

    /// Draw an icon scaled into `bounds`.
    fn draw_icon(&mut self, icon: &IconSource, bounds: Rect);

    /// Access the underlying Scene, if the backend has one.
    fn as_scene_mut(&mut self) -> Option<&mut vello::Scene> {
        None
    }
}

/// Helper function to convert a shape to BezPath for use with Graphics trait.
pub fn shape_to_path(shape: &impl Shape) -> BezPath {
    shape.to_path(0.1)
}
