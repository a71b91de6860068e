//! Pointer state for picking operations
//!
//! Converts viewport pixel coordinates to Normalized Device Coordinates
//! (NDC) for ray casting.

/// Pointer position and viewport size
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    /// Screen-space X position (pixels from left)
    pub screen_x: f64,
    /// Screen-space Y position (pixels from top)
    pub screen_y: f64,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
}

impl PointerState {
    /// Pointer at the top-left corner of a viewport
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            viewport_width,
            viewport_height,
        }
    }

    /// Convert the pointer position to NDC
    ///
    /// X runs from -1 (left) to +1 (right); Y runs from +1 (top) to -1
    /// (bottom), matching the camera's Y-up clip space. `None` for an empty
    /// viewport.
    pub fn screen_to_ndc(&self) -> Option<(f32, f32)> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return None;
        }
        let ndc_x = (self.screen_x / f64::from(self.viewport_width)) as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (self.screen_y / f64::from(self.viewport_height)) as f32 * 2.0;
        Some((ndc_x, ndc_y))
    }

    /// Update pointer position from window events
    pub fn update_position(&mut self, x: f64, y: f64) {
        self.screen_x = x;
        self.screen_y = y;
    }

    /// Update viewport size; call whenever the viewport is resized
    pub fn update_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }
}
