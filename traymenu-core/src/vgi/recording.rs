use vello::kurbo::{Affine, BezPath, Point, Rect, Shape, Stroke};
use vello::peniko::{Brush, Fill};

use crate::vgi::{Graphics, IconSource};

/// A recorded drawing operation.
#[derive(Debug, Clone)]
pub enum DrawOp {
    /// A filled shape, by bounding box.
    Fill {
        /// Transformed bounding box of the shape.
        bounds: Rect,
        /// The brush used.
        brush: Brush,
    },
    /// A stroked shape, by bounding box.
    Stroke {
        /// Transformed bounding box of the shape.
        bounds: Rect,
        /// Stroke width.
        width: f64,
    },
    /// A line of text.
    Text {
        /// The text.
        text: String,
        /// Top-left corner.
        origin: Point,
    },
    /// An icon.
    Icon {
        /// The icon.
        icon: IconSource,
        /// Target bounds.
        bounds: Rect,
    },
}

/// [Graphics] implementation that records operations instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingGraphics {
    /// Recorded operations in draw order.
    pub ops: Vec<DrawOp>,
}

impl RecordingGraphics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded text operations.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded icon operations.
    pub fn icons(&self) -> Vec<&IconSource> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Icon { icon, .. } => Some(icon),
                _ => None,
            })
            .collect()
    }

    /// Bounds of recorded fills.
    pub fn fills(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .collect()
    }
}

impl Graphics for RecordingGraphics {
    fn fill(
        &mut self,
        _fill_rule: Fill,
        transform: Affine,
        brush: &Brush,
        _brush_transform: Option<Affine>,
        shape: &BezPath,
    ) {
        self.ops.push(DrawOp::Fill {
            bounds: transform.transform_rect_bbox(shape.bounding_box()),
            brush: brush.clone(),
        });
    }

    fn stroke(
        &mut self,
        style: &Stroke,
        transform: Affine,
        _brush: &Brush,
        _brush_transform: Option<Affine>,
        shape: &BezPath,
    ) {
        self.ops.push(DrawOp::Stroke {
            bounds: transform.transform_rect_bbox(shape.bounding_box()),
            width: style.width,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, _brush: &Brush) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin,
        });
    }

    fn draw_icon(&mut self, icon: &IconSource, bounds: Rect) {
        self.ops.push(DrawOp::Icon {
            icon: icon.clone(),
            bounds,
        });
    }
}
