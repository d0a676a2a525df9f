use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::EngineError;

/// Extension used for every transcoded video component
pub const VIDEO_OUTPUT_EXTENSION: &str = "mov";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// A still image and its companion video, matched on case-insensitive stem.
///
/// Built once by the directory scan, immutable afterwards, and consumed by
/// exactly one pipeline invocation. No state survives between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPair {
    /// Stem shared by both filenames, in the image's original casing
    pub base_name: String,
    pub image_path: PathBuf,
    pub video_path: PathBuf,
}

impl AssetPair {
    pub fn new(base_name: String, image_path: PathBuf, video_path: PathBuf) -> Self {
        Self {
            base_name,
            image_path,
            video_path,
        }
    }

    /// Output filename for the image component, keeping the source extension
    pub fn output_image_name(&self, prefix: &str) -> String {
        let ext = self
            .image_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "jpg".to_string());
        format!("{}{}.{}", prefix, self.base_name, ext)
    }

    /// Output filename for the video component (always a QuickTime movie)
    pub fn output_video_name(&self, prefix: &str) -> String {
        format!("{}{}.{}", prefix, self.base_name, VIDEO_OUTPUT_EXTENSION)
    }
}

/// A still or video with no matching counterpart; copied verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpairedAsset {
    pub path: PathBuf,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
}

/// Result record for one pair's conversion; never mutated after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairOutcome {
    pub pair: AssetPair,
    pub status: OutcomeStatus,

    /// ContentIdentifier embedded in both output files (present iff succeeded)
    pub identifier: Option<String>,
    pub output_image_path: Option<PathBuf>,
    pub output_video_path: Option<PathBuf>,

    /// Present iff failed
    pub error_detail: Option<String>,
}

impl PairOutcome {
    pub fn succeeded(
        pair: AssetPair,
        identifier: String,
        output_image_path: PathBuf,
        output_video_path: PathBuf,
    ) -> Self {
        Self {
            pair,
            status: OutcomeStatus::Succeeded,
            identifier: Some(identifier),
            output_image_path: Some(output_image_path),
            output_video_path: Some(output_video_path),
            error_detail: None,
        }
    }

    pub fn failed(pair: AssetPair, error: &EngineError) -> Self {
        Self {
            pair,
            status: OutcomeStatus::Failed,
            identifier: None,
            output_image_path: None,
            output_video_path: None,
            error_detail: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

/// Aggregate report for a full run, assembled after the join barrier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub converted: Vec<PairOutcome>,
    pub failed: Vec<PairOutcome>,
    pub copied: Vec<PathBuf>,
    pub copy_failures: Vec<(PathBuf, String)>,
}

impl RunReport {
    pub fn record(&mut self, outcome: PairOutcome) {
        if outcome.is_success() {
            self.converted.push(outcome);
        } else {
            self.failed.push(outcome);
        }
    }

    pub fn total_pairs(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.copy_failures.is_empty()
    }
}
