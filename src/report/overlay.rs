//! Display-space overlay helpers.
//!
//! Boxes come out of the detector in the 0-1000 normalized space; the
//! result view needs pixel rectangles for the image it actually shows, a
//! rectangle outline per detection, and a zoomed crop around the primary
//! detection.

use image::{Rgb, RgbImage};

use crate::types::{NormalizedBox, NORMALIZED_SPACE};

/// A rectangle in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Scale a normalized box to a concrete display size.
pub fn to_display_rect(bounds: &NormalizedBox, display_width: u32, display_height: u32) -> DisplayRect {
    let scale_x = display_width as f32 / NORMALIZED_SPACE;
    let scale_y = display_height as f32 / NORMALIZED_SPACE;
    DisplayRect {
        x: (bounds.xmin * scale_x) as u32,
        y: (bounds.ymin * scale_y) as u32,
        width: ((bounds.xmax - bounds.xmin).max(0.0) * scale_x) as u32,
        height: ((bounds.ymax - bounds.ymin).max(0.0) * scale_y) as u32,
    }
}

/// Draw box outlines onto the displayed frame.
pub fn draw_boxes(frame: &mut RgbImage, boxes: &[NormalizedBox], color: [u8; 3]) {
    for bounds in boxes {
        let rect = to_display_rect(bounds, frame.width(), frame.height());
        draw_rect(frame, &rect, color);
    }
}

fn draw_rect(frame: &mut RgbImage, rect: &DisplayRect, color: [u8; 3]) {
    let x2 = rect.x.saturating_add(rect.width);
    let y2 = rect.y.saturating_add(rect.height);
    for x in rect.x..=x2 {
        set_pixel_safe(frame, x, rect.y, color);
        set_pixel_safe(frame, x, y2, color);
    }
    for y in rect.y..=y2 {
        set_pixel_safe(frame, rect.x, y, color);
        set_pixel_safe(frame, x2, y, color);
    }
}

fn set_pixel_safe(frame: &mut RgbImage, x: u32, y: u32, color: [u8; 3]) {
    if x < frame.width() && y < frame.height() {
        frame.put_pixel(x, y, Rgb(color));
    }
}

/// Zoomed crop centered on `bounds`, padded by `margin` (a fraction of
/// the box size) and clamped to the frame.
pub fn zoom_crop(frame: &RgbImage, bounds: &NormalizedBox, margin: f32) -> RgbImage {
    let rect = to_display_rect(bounds, frame.width(), frame.height());
    let pad_x = (rect.width as f32 * margin) as u32;
    let pad_y = (rect.height as f32 * margin) as u32;
    let x = rect
        .x
        .saturating_sub(pad_x)
        .min(frame.width().saturating_sub(1));
    let y = rect
        .y
        .saturating_sub(pad_y)
        .min(frame.height().saturating_sub(1));
    let width = (rect.width + 2 * pad_x).clamp(1, frame.width().saturating_sub(x).max(1));
    let height = (rect.height + 2 * pad_y).clamp(1, frame.height().saturating_sub(y).max(1));
    image::imageops::crop_imm(frame, x, y, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scaling() {
        let bounds = NormalizedBox {
            ymin: 0.0,
            xmin: 0.0,
            ymax: 500.0,
            xmax: 250.0,
        };
        let rect = to_display_rect(&bounds, 640, 480);
        assert_eq!(
            rect,
            DisplayRect {
                x: 0,
                y: 0,
                width: 160,
                height: 240
            }
        );
    }

    #[test]
    fn test_drawing_stays_in_bounds() {
        let mut frame = RgbImage::new(64, 48);
        let bounds = NormalizedBox {
            ymin: 900.0,
            xmin: 900.0,
            ymax: 1000.0,
            xmax: 1000.0,
        };
        // Must not panic at the image edge.
        draw_boxes(&mut frame, &[bounds], [0, 255, 0]);
        assert_eq!(frame.get_pixel(63, 47), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_zoom_crop_is_clamped() {
        let frame = RgbImage::new(100, 100);
        let bounds = NormalizedBox {
            ymin: 800.0,
            xmin: 800.0,
            ymax: 1000.0,
            xmax: 1000.0,
        };
        let crop = zoom_crop(&frame, &bounds, 0.2);
        assert!(crop.width() >= 1 && crop.width() <= 100);
        assert!(crop.height() >= 1 && crop.height() <= 100);
    }
}
