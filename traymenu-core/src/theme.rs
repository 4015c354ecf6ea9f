// SPDX-License-Identifier: MIT OR Apache-2.0

//! Colors used by the menu widgets.

use std::collections::HashMap;

use vello::peniko::{Brush, Color};

/// What a color is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Background of a menu window.
    MenuBackground,
    /// Frame around a menu window.
    MenuBorder,
    /// Background of a hovered item.
    ItemPrelight,
    /// Label text.
    Text,
    /// Separator line.
    Separator,
    /// Played part of a seek bar.
    SeekerProgress,
    /// Remaining part of a seek bar.
    SeekerTrough,
}

/// Color lookup for widgets.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: HashMap<ColorRole, Color>,
}

impl Palette {
    /// Get a color for the given role.
    pub fn color(&self, role: ColorRole) -> Color {
        self.colors
            .get(&role)
            .copied()
            .unwrap_or(Color::from_rgb8(255, 0, 255))
    }

    /// Get a solid brush for the given role.
    pub fn brush(&self, role: ColorRole) -> Brush {
        Brush::Solid(self.color(role))
    }

    /// Override the color of a role.
    pub fn set_color(&mut self, role: ColorRole, color: Color) {
        self.colors.insert(role, color);
    }
}

impl Default for Palette {
    fn default() -> Self {
        let colors = HashMap::from([
            (ColorRole::MenuBackground, Color::from_rgb8(43, 43, 43)),
            (ColorRole::MenuBorder, Color::from_rgb8(20, 20, 20)),
            (ColorRole::ItemPrelight, Color::from_rgb8(62, 62, 62)),
            (ColorRole::Text, Color::from_rgb8(238, 238, 236)),
            (ColorRole::Separator, Color::from_rgb8(70, 70, 70)),
            (ColorRole::SeekerProgress, Color::from_rgb8(53, 132, 228)),
            (ColorRole::SeekerTrough, Color::from_rgb8(80, 80, 80)),
        ]);

        Self { colors }
    }
}
