//! Artifact producers handed data by the simulation driver
//!
//! The driver only talks to the traits below; the image and ffmpeg backed
//! implementations live in the submodules.

pub mod frames;
pub mod plot;
pub mod video;

use std::path::Path;

use image::Rgb;

use crate::error::SimResult;
use crate::simulation::recorder::TrajectoryRecord;
use crate::simulation::sampler::Frame;

/// Draws one animation frame into `path`
pub trait FrameRenderer {
    fn render(&mut self, frame: &Frame<'_>, path: &Path) -> SimResult<()>;
}

/// Draws the whole run as one static image into `path`
pub trait TrajectoryPlotter {
    fn plot(&mut self, record: &TrajectoryRecord, path: &Path) -> SimResult<()>;
}

/// Turns the frames in `frames_dir` into one video at `output`
pub trait VideoAssembler {
    fn assemble(&mut self, frames_dir: &Path, fps: u32, output: &Path) -> SimResult<()>;
}

pub(crate) const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub(crate) const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
pub(crate) const HIGHLIGHT: Rgb<u8> = Rgb([220, 20, 20]);

// tab10
const PALETTE: [Rgb<u8>; 10] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([127, 127, 127]),
    Rgb([188, 189, 34]),
    Rgb([23, 190, 207]),
];

/// Stable colour for body `i`
pub(crate) fn body_color(i: usize) -> Rgb<u8> {
    PALETTE[i % PALETTE.len()]
}
