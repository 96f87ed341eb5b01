//! Visibility trigger for the sentinel placed after the last loaded item.
//!
//! Geometry is one-dimensional: only the vertical extent matters for a
//! scrolling list.

use crate::config::ClientConfig;

/// Vertical extent in pixels, `top <= bottom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub top: f64,
    pub bottom: f64,
}

impl Span {
    pub fn new(top: f64, bottom: f64) -> Self {
        if top <= bottom {
            Self { top, bottom }
        } else {
            Self {
                top: bottom,
                bottom: top,
            }
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Decides when the sentinel counts as visible.
///
/// The viewport is grown by `margin` on both edges so the next page is
/// requested slightly before the sentinel scrolls into view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sentinel {
    margin: f64,
    threshold: f64,
    visible: bool,
}

impl Sentinel {
    pub fn new(margin: f64, threshold: f64) -> Self {
        Self {
            margin: margin.max(0.0),
            threshold: threshold.clamp(0.0, 1.0),
            visible: false,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.prefetch_margin, config.threshold)
    }

    /// Fraction of `target` inside the extended viewport, in `0.0..=1.0`.
    pub fn ratio(&self, viewport: Span, target: Span) -> f64 {
        let top = viewport.top - self.margin;
        let bottom = viewport.bottom + self.margin;
        let overlap = target.bottom.min(bottom) - target.top.max(top);
        if target.height() <= 0.0 {
            // A zero-height sentinel is either inside or not.
            return if target.top >= top && target.top <= bottom {
                1.0
            } else {
                0.0
            };
        }
        (overlap / target.height()).clamp(0.0, 1.0)
    }

    pub fn intersects(&self, viewport: Span, target: Span) -> bool {
        let ratio = self.ratio(viewport, target);
        ratio > 0.0 && ratio >= self.threshold
    }

    /// Feeds a new layout; returns `true` only when the sentinel has just
    /// become visible.
    pub fn observe(&mut self, viewport: Span, target: Span) -> bool {
        let visible = self.intersects(viewport, target);
        let entered = visible && !self.visible;
        self.visible = visible;
        entered
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}
