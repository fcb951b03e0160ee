//! Loading and rotating overlay images.

use super::canvas::CanvasError;
use image::{GrayImage, Luma};
use log::info;
use std::path::Path;

/// Fill level for pixels a rotation uncovers.
const ROTATION_FILL: u8 = 255;

/// Loads an image as 8-bit gray and rotates it by `rotation_degrees`.
pub fn load_overlay(path: &Path, rotation_degrees: f64) -> Result<GrayImage, CanvasError> {
    let gray = image::open(path)?.to_luma8();
    info!(
        "Loaded overlay {} ({}x{}), rotation {:.1}°",
        path.display(),
        gray.width(),
        gray.height(),
        rotation_degrees
    );
    Ok(rotate(&gray, rotation_degrees))
}

/// Rotates counter-clockwise about the centre, growing the output so that
/// the whole rotated image fits. Uncovered pixels are white.
pub fn rotate(source: &GrayImage, degrees: f64) -> GrayImage {
    if degrees.rem_euclid(360.0) == 0.0 {
        return source.clone();
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sw, sh) = (source.width() as f64, source.height() as f64);
    let ow = (sw * cos.abs() + sh * sin.abs()).round().max(1.0) as u32;
    let oh = (sw * sin.abs() + sh * cos.abs()).round().max(1.0) as u32;

    let (scx, scy) = (sw / 2.0, sh / 2.0);
    let (ocx, ocy) = (ow as f64 / 2.0, oh as f64 / 2.0);

    GrayImage::from_fn(ow, oh, |ox, oy| {
        let dx = ox as f64 + 0.5 - ocx;
        let dy = oy as f64 + 0.5 - ocy;
        // Inverse mapping: rotate the output pixel back into the source.
        let sx = (scx + dx * cos - dy * sin).floor();
        let sy = (scy + dx * sin + dy * cos).floor();
        if sx >= 0.0 && sy >= 0.0 && sx < sw && sy < sh {
            *source.get_pixel(sx as u32, sy as u32)
        } else {
            Luma([ROTATION_FILL])
        }
    })
}
