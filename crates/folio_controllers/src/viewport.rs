//! Viewport visibility
//!
//! Reveal triggers ask a [`ViewportObserver`] how much of a section is
//! visible. [`ScrollViewport`] is the plain implementation: a window of
//! `height` pixels scrolled `scroll_y` pixels down a vertically stacked page.

use folio_core::Rect;

/// Visibility of one container against the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Visible fraction of the container's height, 0.0 to 1.0
    pub ratio: f32,
    pub is_intersecting: bool,
    /// Container top relative to the viewport top
    pub top: f32,
}

/// Source of visibility information for reveal triggers
pub trait ViewportObserver {
    /// Visibility of `bounds` (page coordinates) against the viewport grown
    /// vertically by `root_margin` on both edges
    fn intersection(&self, bounds: Rect, root_margin: f32) -> Intersection;

    /// Viewport height in logical pixels
    fn height(&self) -> f32;
}

/// A vertically scrolled viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollViewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScrollViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_to(self.scroll_y + dy);
    }

    /// The visible part of the page
    pub fn visible_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }
}

impl ViewportObserver for ScrollViewport {
    fn intersection(&self, bounds: Rect, root_margin: f32) -> Intersection {
        let root = self.visible_rect().expand_y(root_margin);
        let top = bounds.top() - self.scroll_y;

        // Zero-height containers count as fully visible while their top edge
        // is inside the viewport
        if bounds.height() <= 0.0 {
            let inside = bounds.top() >= root.top() && bounds.top() <= root.bottom();
            return Intersection {
                ratio: if inside { 1.0 } else { 0.0 },
                is_intersecting: inside,
                top,
            };
        }

        let overlap = (bounds.bottom().min(root.bottom()) - bounds.top().max(root.top())).max(0.0);
        Intersection {
            ratio: (overlap / bounds.height()).clamp(0.0, 1.0),
            is_intersecting: overlap > 0.0,
            top,
        }
    }

    fn height(&self) -> f32 {
        self.height
    }
}
