//! Grayscale raster canvas.

use crate::board::Point;
use image::{GrayImage, ImageError, Luma};
use log::debug;
use std::path::Path;
use thiserror::Error;

/// Errors raised by canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Drawing outside canvas region: {width}x{height} overlay at ({x}, {y})")]
    OutsideCanvas {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("Image error: {0}")]
    Image(#[from] ImageError),
}

/// Which point of an overlay image `pos` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    Center,
    BottomRight,
}

/// Stroke appearance for segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    /// Pen diameter in pixels.
    pub thickness: u32,
    /// Gray level of the ink (0 = black).
    pub gray: u8,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            thickness: 3,
            gray: 0,
        }
    }
}

/// A single-channel pixel buffer that segments and overlays are drawn into.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: GrayImage,
    background: u8,
    style: StrokeStyle,
}

impl Canvas {
    /// Creates a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: u8, style: StrokeStyle) -> Self {
        Self {
            pixels: GrayImage::from_pixel(width, height, Luma([background])),
            background,
            style,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Gray level at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        let (x, y) = self.index(x, y)?;
        Some(self.pixels.get_pixel(x, y).0[0])
    }

    pub fn image(&self) -> &GrayImage {
        &self.pixels
    }

    /// Resets every pixel to the background level.
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Luma([self.background]);
        }
    }

    /// Number of pixels that differ from the background.
    pub fn inked_pixels(&self) -> usize {
        self.pixels
            .pixels()
            .filter(|p| p.0[0] != self.background)
            .count()
    }

    /// Draws a thick straight segment by stamping the pen along the line.
    ///
    /// The segment is first clipped to the canvas widened by the pen radius,
    /// so endpoints far outside the canvas cost no more than the visible part.
    pub fn draw_segment(&mut self, from: Point, to: Point) {
        let radius = f64::from(self.style.thickness / 2);
        let bounds = ClipRect {
            min_x: -radius,
            min_y: -radius,
            max_x: f64::from(self.width()) - 1.0 + radius,
            max_y: f64::from(self.height()) - 1.0 + radius,
        };
        let start = (f64::from(from.x), f64::from(from.y));
        let end = (f64::from(to.x), f64::from(to.y));
        let Some(((x0, y0), (x1, y1))) = bounds.clip(start, end) else {
            return;
        };

        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = (dx * dx + dy * dy).sqrt().ceil().max(1.0) as u64;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let cx = (x0 + dx * t).round() as i32;
            let cy = (y0 + dy * t).round() as i32;
            self.stamp(cx, cy);
        }
    }

    fn stamp(&mut self, cx: i32, cy: i32) {
        let radius = (self.style.thickness / 2) as i32;
        let ink = Luma([self.style.gray]);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                if let Some((x, y)) = self.index(cx + dx, cy + dy) {
                    self.pixels.put_pixel(x, y, ink);
                }
            }
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }

    /// Copies `overlay` onto the canvas at `pos`, interpreted through `anchor`.
    ///
    /// Overlays that only partially overlap the canvas are clipped. An
    /// overlay that does not overlap the canvas at all is rejected.
    pub fn draw_image(
        &mut self,
        overlay: &GrayImage,
        pos: Point,
        anchor: Anchor,
    ) -> Result<(), CanvasError> {
        let (w, h) = (i64::from(overlay.width()), i64::from(overlay.height()));
        let (x_off, y_off) = match anchor {
            Anchor::TopLeft => (0, 0),
            Anchor::Center => (-(w / 2), -(h / 2)),
            Anchor::BottomRight => (-w, -h),
        };

        let left = i64::from(pos.x) + x_off;
        let top = i64::from(pos.y) + y_off;
        let right = left + w;
        let bottom = top + h;
        let (canvas_w, canvas_h) = (i64::from(self.width()), i64::from(self.height()));

        if left >= canvas_w || right <= 0 || top >= canvas_h || bottom <= 0 {
            return Err(CanvasError::OutsideCanvas {
                x: left,
                y: top,
                width: overlay.width(),
                height: overlay.height(),
            });
        }

        let x_range = left.max(0)..right.min(canvas_w);
        let y_range = top.max(0)..bottom.min(canvas_h);
        debug!(
            "Drawing {}x{} overlay clipped to x={:?} y={:?}",
            w, h, x_range, y_range
        );

        for cy in y_range {
            for cx in x_range.clone() {
                let value = overlay.get_pixel((cx - left) as u32, (cy - top) as u32);
                self.pixels.put_pixel(cx as u32, cy as u32, *value);
            }
        }
        Ok(())
    }

    /// Writes the canvas as an image; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<(), CanvasError> {
        self.pixels.save(path)?;
        debug!("Saved canvas snapshot to {}", path.display());
        Ok(())
    }
}

/// Axis-aligned rectangle for Liang-Barsky segment clipping.
#[derive(Debug, Clone, Copy)]
struct ClipRect {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

type FPoint = (f64, f64);

impl ClipRect {
    /// The part of `start..end` inside the rectangle, or `None`.
    fn clip(&self, start: FPoint, end: FPoint) -> Option<(FPoint, FPoint)> {
        let (x0, y0) = start;
        let dx = end.0 - x0;
        let dy = end.1 - y0;
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

        for (p, q) in [
            (-dx, x0 - self.min_x),
            (dx, self.max_x - x0),
            (-dy, y0 - self.min_y),
            (dy, self.max_y - y0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((
            (x0 + t0 * dx, y0 + t0 * dy),
            (x0 + t1 * dx, y0 + t1 * dy),
        ))
    }
}
