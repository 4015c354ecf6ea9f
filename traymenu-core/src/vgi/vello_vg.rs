use vello::kurbo::{Affine, BezPath, Point, Rect, Stroke};
use vello::peniko::{Brush, Fill};
use vello::Scene;

use crate::vgi::{Graphics, IconSource};

/// Host-provided text and icon rasterization.
///
/// Glyph shaping and icon theme lookup belong to the host application, which
/// paints them into the scene when asked.
pub trait GlyphPainter {
    /// Paint a single line of text.
    fn paint_text(&mut self, scene: &mut Scene, text: &str, origin: Point, brush: &Brush);

    /// Paint an icon into `bounds`.
    fn paint_icon(&mut self, scene: &mut Scene, icon: &IconSource, bounds: Rect);
}

/// A Vello-based implementation of the [Graphics] trait.
pub struct VelloGraphics<'a> {
    scene: &'a mut Scene,
    glyphs: Option<&'a mut dyn GlyphPainter>,
}

impl<'a> VelloGraphics<'a> {
    /// Create a new VelloGraphics from a Scene reference.
    ///
    /// Without a [GlyphPainter], text and icons are skipped.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self {
            scene,
            glyphs: None,
        }
    }

    /// Create a VelloGraphics that paints text and icons through `glyphs`.
    pub fn with_glyphs(scene: &'a mut Scene, glyphs: &'a mut dyn GlyphPainter) -> Self {
        Self {
            scene,
            glyphs: Some(glyphs),
        }
    }
}

impl Graphics for VelloGraphics<'_> {
    fn fill(
        &mut self,
        fill_rule: Fill,
        transform: Affine,
        brush: &Brush,
        brush_transform: Option<Affine>,
        shape: &BezPath,
    ) {
        self.scene.fill(fill_rule, transform, brush, brush_transform, shape);
    }

    fn stroke(
        &mut self,
        style: &Stroke,
        transform: Affine,
        brush: &Brush,
        brush_transform: Option<Affine>,
        shape: &BezPath,
    ) {
        self.scene.stroke(style, transform, brush, brush_transform, shape);
    }

    fn draw_text(&mut self, text: &str, origin: Point, brush: &Brush) {
        if let Some(glyphs) = self.glyphs.as_deref_mut() {
            glyphs.paint_text(self.scene, text, origin, brush);
        }
    }

    fn draw_icon(&mut self, icon: &IconSource, bounds: Rect) {
        match self.glyphs.as_deref_mut() {
            Some(glyphs) => glyphs.paint_icon(self.scene, icon, bounds),
            None => log::trace!("No glyph painter, skipping icon {icon:?}"),
        }
    }

    fn as_scene_mut(&mut self) -> Option<&mut Scene> {
        Some(self.scene)
    }
}
