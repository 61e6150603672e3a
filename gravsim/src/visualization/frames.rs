use std::path::Path;

use image::RgbImage;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use super::{body_color, FrameRenderer, AXIS, HIGHLIGHT, WHITE};
use crate::error::SimResult;
use crate::simulation::sampler::Frame;

/// Radius units per frame edge; a radius of 20 covers 1/30 of the frame
const RADIUS_UNITS: f64 = 600.0;

/// Renders frames as square PNG images
///
/// The window spans `[-limit, limit]` on both axes. Bodies outside it are not
/// drawn. The body with the largest radius is drawn in red.
#[derive(Debug, Clone)]
pub struct ImageFrameRenderer {
    pub size: u32, // edge length [px]
}

impl ImageFrameRenderer {
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }
}

impl FrameRenderer for ImageFrameRenderer {
    fn render(&mut self, frame: &Frame<'_>, path: &Path) -> SimResult<()> {
        let size = self.size;
        let edge = size as f64;
        let mut img = RgbImage::from_pixel(size, size, WHITE);

        let limit = if frame.limit.is_finite() && frame.limit > 0.0 {
            frame.limit
        } else {
            1.0
        };
        let scale = edge / (2.0 * limit);
        let largest = frame.radii.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        for (i, (p, &r)) in frame.positions.iter().zip(frame.radii).enumerate() {
            let cx = (p.x + limit) * scale;
            let cy = (limit - p.y) * scale;
            let pr = (r * edge / RADIUS_UNITS).round().max(1.0);

            let visible = cx.is_finite()
                && cy.is_finite()
                && (-pr..=edge + pr).contains(&cx)
                && (-pr..=edge + pr).contains(&cy);
            if !visible {
                continue;
            }

            let color = if r == largest { HIGHLIGHT } else { body_color(i) };
            draw_filled_circle_mut(&mut img, (cx.round() as i32, cy.round() as i32), pr as i32, color);
        }

        draw_hollow_rect_mut(&mut img, Rect::at(0, 0).of_size(size, size), AXIS);
        img.save(path)?;
        Ok(())
    }
}
