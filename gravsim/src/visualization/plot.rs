//! Static trajectory plot
//!
//! One polyline per body over every recorded sample, equal aspect, fitted to
//! the extent of all paths.

use std::path::Path;

use image::RgbImage;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use super::{body_color, TrajectoryPlotter, AXIS, WHITE};
use crate::error::SimResult;
use crate::simulation::recorder::TrajectoryRecord;
use crate::simulation::states::NVec2;

/// Margin around the fitted extent
const PADDING: f64 = 1.05;

#[derive(Debug, Clone)]
pub struct TrajectoryPlot {
    pub size: u32, // edge length [px]
}

impl TrajectoryPlot {
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }
}

/// Centre and half-width of the square that holds every finite point
fn square_bounds(paths: &[Vec<NVec2>]) -> (NVec2, f64) {
    let mut lo = NVec2::new(f64::INFINITY, f64::INFINITY);
    let mut hi = NVec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in paths.iter().flatten().filter(|p| p.x.is_finite() && p.y.is_finite()) {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    if lo.x > hi.x {
        return (NVec2::zeros(), 1.0);
    }

    let centre = (lo + hi) * 0.5;
    let extent = hi - lo;
    let half = 0.5 * extent.x.max(extent.y) * PADDING;
    (centre, if half > 0.0 { half } else { 1.0 })
}

impl TrajectoryPlotter for TrajectoryPlot {
    fn plot(&mut self, record: &TrajectoryRecord, path: &Path) -> SimResult<()> {
        let size = self.size;
        let mut img = RgbImage::from_pixel(size, size, WHITE);

        let paths: Vec<Vec<NVec2>> = (0..record.body_count()).map(|i| record.path_of(i)).collect();
        let (centre, half) = square_bounds(&paths);
        let scale = size as f64 / (2.0 * half);
        let to_px = |p: &NVec2| {
            (
                ((p.x - centre.x + half) * scale) as f32,
                ((half - (p.y - centre.y)) * scale) as f32,
            )
        };

        for (i, body_path) in paths.iter().enumerate() {
            let color = body_color(i);
            if let [only] = body_path.as_slice() {
                let (x, y) = to_px(only);
                draw_filled_circle_mut(&mut img, (x as i32, y as i32), 1, color);
                continue;
            }
            for pair in body_path.windows(2) {
                let (a, b) = (to_px(&pair[0]), to_px(&pair[1]));
                if a.0.is_finite() && a.1.is_finite() && b.0.is_finite() && b.1.is_finite() {
                    draw_line_segment_mut(&mut img, a, b, color);
                }
            }
        }

        draw_hollow_rect_mut(&mut img, Rect::at(0, 0).of_size(size, size), AXIS);
        img.save(path)?;
        Ok(())
    }
}
