//! In-memory drawing surface backed by an RGB image buffer.

use crate::{
    interfaces::{DrawingSurface, Marker, VideoFrame},
    utils::pixel_center,
};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

/// Canvas that keeps the last drawn frame with its overlays
#[derive(Debug, Clone, Default)]
pub struct ImageSurface {
    canvas: RgbImage,
    frames_drawn: u64,
}

impl ImageSurface {
    /// An empty surface; not ready until it is sized
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface already sized to `width` x `height`
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbImage::new(width, height),
            frames_drawn: 0,
        }
    }

    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl DrawingSurface for ImageSurface {
    fn is_ready(&self) -> bool {
        self.canvas.width() > 0 && self.canvas.height() > 0
    }

    fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn draw_frame(&mut self, frame: &VideoFrame) {
        // Canvas follows the video size, like a canvas resized on metadata load
        if frame.image.dimensions() == self.canvas.dimensions() {
            self.canvas.copy_from_slice(frame.image.as_raw());
        } else {
            self.canvas = frame.image.clone();
        }
        self.frames_drawn += 1;
    }

    fn draw_markers(&mut self, markers: &[Marker]) {
        let (width, height) = self.canvas.dimensions();
        for marker in markers {
            let Some(center) = pixel_center(marker.x, marker.y, width, height) else {
                continue;
            };
            let radius = i32::try_from(marker.radius).unwrap_or(i32::MAX);
            draw_filled_circle_mut(&mut self.canvas, center, radius, Rgb(marker.color));
        }
    }
}
