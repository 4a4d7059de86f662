use std::path::Path;

use serde::{Deserialize, Serialize};

/// The video under analysis, as described by the video catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    /// Path relative to the video folder.
    pub file_path: String,
    /// Final component of `file_path`; detection rows refer to the video by this name.
    pub file_name: String,
    pub predicted_emotions_raw: String,
    /// Zero when the catalog does not carry a usable length.
    pub length_secs: f64,
}

impl VideoDescriptor {
    pub fn new(
        file_path: impl Into<String>,
        predicted_emotions_raw: impl Into<String>,
        length_secs: f64,
    ) -> Self {
        let file_path = file_path.into();
        let file_name = Path::new(&file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.clone());

        Self {
            file_path,
            file_name,
            predicted_emotions_raw: predicted_emotions_raw.into(),
            length_secs,
        }
    }

    pub fn has_known_length(&self) -> bool {
        self.length_secs > 0.0
    }

    /// Trimmed, ASCII case-insensitive comparison against a row's video field.
    pub fn matches_file(&self, video_field: &str) -> bool {
        same_video_file(&self.file_name, video_field)
    }
}

pub fn same_video_file(expected: &str, video_field: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(video_field.trim())
}
