// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::config::MenuConfig;
use crate::platform::TextMeasure;

/// Minimum and natural extent along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeRequest {
    /// Smallest acceptable size.
    pub minimum: i32,
    /// Preferred size.
    pub natural: i32,
}

impl SizeRequest {
    /// A request with distinct minimum and natural sizes.
    pub const fn new(minimum: i32, natural: i32) -> Self {
        Self { minimum, natural }
    }

    /// A request where minimum and natural are the same.
    pub const fn fixed(size: i32) -> Self {
        Self::new(size, size)
    }

    /// Raise both values to at least `floor`.
    pub fn at_least(self, floor: i32) -> Self {
        Self::new(self.minimum.max(floor), self.natural.max(floor))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.minimum.max(other.minimum), self.natural.max(other.natural))
    }
}

impl std::ops::Add for SizeRequest {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.minimum + rhs.minimum, self.natural + rhs.natural)
    }
}

impl std::iter::Sum for SizeRequest {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, request| acc + request)
    }
}

/// Context passed to widgets while measuring.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    /// Text measurement of the display.
    pub text: &'a dyn TextMeasure,
    /// Widget metrics.
    pub config: &'a MenuConfig,
}

impl<'a> LayoutContext<'a> {
    /// Create a new layout context.
    pub fn new(text: &'a dyn TextMeasure, config: &'a MenuConfig) -> Self {
        Self { text, config }
    }
}
