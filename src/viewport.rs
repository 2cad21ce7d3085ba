//! Zoom and pan state of the canvas view.
//!
//! A canvas point `p` is drawn at screen position `(p + offset) * zoom`.

/// Canvas view transform plus the screen size needed to zoom around the centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    offset: (f32, f32),
    size: (f32, f32),
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.1, 5.0)
    }
}

impl Viewport {
    /// Bounds given in the wrong order are swapped.
    pub fn new(min_zoom: f32, max_zoom: f32) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else if max_zoom < min_zoom {
            (max_zoom, min_zoom)
        } else {
            // NaN bound
            (0.1, 5.0)
        };
        Self {
            zoom: 1.0,
            offset: (0.0, 0.0),
            size: (0.0, 0.0),
            min_zoom,
            max_zoom,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.offset = (x, y);
    }

    /// Screen size in pixels.
    pub fn size(&self) -> (f32, f32) {
        self.size
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = (width, height);
    }

    pub fn screen_to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.zoom - self.offset.0, y / self.zoom - self.offset.1)
    }

    pub fn canvas_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        ((x + self.offset.0) * self.zoom, (y + self.offset.1) * self.zoom)
    }

    /// Change the zoom while keeping the centre of the screen fixed.
    ///
    /// Zoom levels above 1 are rounded to whole numbers, then the result is
    /// clamped to the configured range. The offset is truncated to whole
    /// canvas units afterwards.
    pub fn set_zoom(&mut self, zoom: f32) {
        let before = self.zoom;
        let mut zoom = if zoom > 1.0 { zoom.round() } else { zoom };
        zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.zoom = zoom;

        let (w, h) = self.size;
        let dx = (w / before - w / zoom) / 2.0;
        let dy = (h / before - h / zoom) / 2.0;
        self.offset = ((self.offset.0 - dx).trunc(), (self.offset.1 - dy).trunc());
    }

    /// One wheel notch: multiply (`zoom_in`) or divide the zoom by `step`.
    pub fn zoom_by(&mut self, zoom_in: bool, step: f32) {
        let zoom = if zoom_in { self.zoom * step } else { self.zoom / step };
        self.set_zoom(zoom);
    }

    /// Pan by a screen-space pointer delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset.0 += dx / self.zoom;
        self.offset.1 += dy / self.zoom;
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
    }

    /// Zoom back to 1 and move the canvas origin to the top-left corner.
    pub fn reset(&mut self) {
        self.reset_zoom();
        self.offset = (0.0, 0.0);
    }
}
