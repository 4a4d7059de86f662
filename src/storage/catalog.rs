//! Video catalog loading.
//!
//! The catalog is a semicolon-delimited file with a header row and one data
//! row: `relativeVideoPath; predictedEmotions; lengthSeconds`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::models::VideoDescriptor;
use crate::utils::parse_decimal;

/// Folder, relative to the data root, that holds the video files.
pub const VIDEO_DIR: &str = "Video";

pub fn load_video_catalog(path: &Path) -> Result<VideoDescriptor> {
    if !path.exists() {
        bail!("video catalog was not found: {}", path.display());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read video catalog from {}", path.display()))?;

    parse_video_catalog(&contents)
        .with_context(|| format!("invalid video catalog {}", path.display()))
}

pub fn parse_video_catalog(contents: &str) -> Result<VideoDescriptor> {
    let lines: Vec<&str> = contents.lines().collect();
    if lines.len() < 2 {
        bail!("catalog must contain a header and at least one data row");
    }

    let data_line = lines[1].trim();
    if data_line.is_empty() {
        bail!("the catalog data row is empty");
    }

    let columns: Vec<&str> = data_line.split(';').collect();
    let relative_path = columns[0].trim();
    if relative_path.is_empty() {
        bail!("the first column (video path) is empty");
    }

    let predicted = columns.get(1).map(|raw| raw.trim()).unwrap_or_default();
    let length_secs = columns
        .get(2)
        .and_then(|raw| parse_decimal(raw))
        .unwrap_or(0.0);

    Ok(VideoDescriptor::new(relative_path, predicted, length_secs))
}

/// Locate the video file under `<root>/Video/`.
pub fn resolve_video_file(root: &Path, video: &VideoDescriptor) -> Result<PathBuf> {
    let candidate = root.join(VIDEO_DIR).join(&video.file_path);
    if !candidate.is_file() {
        bail!(
            "video file was not found: {} (searched {})",
            video.file_path,
            candidate.display()
        );
    }
    Ok(candidate)
}
