// web_app/controller/scroll.rs - Scroll position of the product list viewport

/// Remaining scroll distance (px) at or under which the next page is requested
pub const NEAR_BOTTOM_THRESHOLD_PX: f64 = 10.0;

/// Snapshot of the list viewport taken on a scroll event
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top
    pub scroll_top: f64,
    /// Visible height of the viewport
    pub client_height: f64,
    /// Total height of the scrollable content
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        ScrollMetrics {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// Content still below the visible area
    pub fn remaining(&self) -> f64 {
        (self.scroll_height - self.scroll_top - self.client_height).max(0.0)
    }

    /// Level-triggered: true on every event while within the threshold
    pub fn near_bottom(&self) -> bool {
        self.remaining() <= NEAR_BOTTOM_THRESHOLD_PX
    }
}
