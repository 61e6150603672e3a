//! Video assembly from rendered frames
//!
//! Frames are named by their simulated time, so chronological order is the
//! numeric order of the file stems. Encoding is delegated to `ffmpeg`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info};

use super::VideoAssembler;
use crate::error::{SimError, SimResult};

/// File name of the frame captured at simulated time `t`
///
/// The driver passes the time of the state being drawn, which for the frame
/// emitted after step `k` is `(k + 1) * dt`, not the time the step started at.
pub fn frame_file_name(t: f64) -> String {
    format!("{t:.0}.png")
}

/// Frames in `dir` sorted by numeric file stem; other files are ignored
pub fn ordered_frames(dir: &Path) -> SimResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SimError::io(dir, e))?;

    let mut frames = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SimError::io(dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<f64>().ok());
        if let Some(stem) = stem {
            frames.push((stem, path));
        }
    }

    frames.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(frames.into_iter().map(|(_, path)| path).collect())
}

/// Runs the `ffmpeg` concat demuxer over the ordered frame list
#[derive(Debug, Clone)]
pub struct FfmpegAssembler {
    pub program: String,
}

impl Default for FfmpegAssembler {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }
}

impl FfmpegAssembler {
    /// Write the concat list next to the frames and return its path
    fn write_list(&self, frames_dir: &Path, frames: &[PathBuf], fps: u32) -> SimResult<PathBuf> {
        let list_path = frames_dir.join("frames.txt");
        let mut list = fs::File::create(&list_path).map_err(|e| SimError::io(&list_path, e))?;
        let duration = 1.0 / fps as f64;

        let mut body = String::new();
        for frame in frames {
            let abs = fs::canonicalize(frame).map_err(|e| SimError::io(frame, e))?;
            body.push_str(&format!("file '{}'\nduration {duration}\n", abs.display()));
        }
        // concat ignores the duration of the final entry unless it is repeated
        if let Some(last) = frames.last() {
            let abs = fs::canonicalize(last).map_err(|e| SimError::io(last, e))?;
            body.push_str(&format!("file '{}'\n", abs.display()));
        }

        list.write_all(body.as_bytes()).map_err(|e| SimError::io(&list_path, e))?;
        Ok(list_path)
    }
}

impl VideoAssembler for FfmpegAssembler {
    fn assemble(&mut self, frames_dir: &Path, fps: u32, output: &Path) -> SimResult<()> {
        let frames = ordered_frames(frames_dir)?;
        if frames.is_empty() {
            return Err(SimError::Video(format!("no frames in {}", frames_dir.display())));
        }
        info!("assembling {} frames at {fps} fps", frames.len());

        let list = self.write_list(frames_dir, &frames, fps)?;
        let status = Command::new(&self.program)
            .args(["-y", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(&list)
            .arg("-vf")
            .arg(format!("fps={fps},format=yuv420p"))
            .arg(output)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| SimError::Video(format!("could not run {}: {e}", self.program)))?;

        if !status.success() {
            return Err(SimError::Video(format!("{} exited with {status}", self.program)));
        }
        debug!("video written to {}", output.display());
        Ok(())
    }
}
