// Companion-video transcoding via ffmpeg

use chrono::{DateTime, FixedOffset};
use std::path::Path;
use std::process::Command;

use super::error::EngineError;

/// Cap on the diagnostic text carried into a transcode error
const STDERR_SNIPPET_LEN: usize = 300;

/// Converts a companion video into the target container/codec.
///
/// Must write only `output`; the source file is never opened for writing.
pub trait Transcoder: Send + Sync {
    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        creation_time: Option<&DateTime<FixedOffset>>,
    ) -> Result<(), EngineError>;
}

/// Transcoder backed by the external `ffmpeg` process.
///
/// The profile is fixed and compatibility-first: Photos.app only accepts
/// H.264 as the video component of a Live Photo, so the source is always
/// re-encoded rather than passed through.
pub struct FfmpegTranscoder;

/// Build the ffmpeg invocation for one video.
///
/// When `creation_time` is present the container's creation-time field is
/// overridden so the movie lines up with the still's capture moment;
/// otherwise ffmpeg carries the source's own creation time forward.
pub fn build_transcode_cmd(
    input: &Path,
    output: &Path,
    creation_time: Option<&DateTime<FixedOffset>>,
) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-i").arg(input);
    cmd.args([
        "-c:v",
        "libx264",
        "-crf",
        "18",
        "-preset",
        "fast",
        "-profile:v",
        "high",
        "-pix_fmt",
        "yuv420p",
    ]);
    cmd.args(["-c:a", "aac", "-b:a", "128k"]);
    cmd.args(["-movflags", "+faststart"]);
    if let Some(ts) = creation_time {
        cmd.arg("-metadata")
            .arg(format!("creation_time={}", ts.to_rfc3339()));
    }
    cmd.args(["-y", "-loglevel", "error"]);
    cmd.arg(output);
    cmd
}

fn truncate_diagnostic(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return "ffmpeg exited nonzero with no diagnostic output".to_string();
    }
    trimmed.chars().take(STDERR_SNIPPET_LEN).collect()
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        creation_time: Option<&DateTime<FixedOffset>>,
    ) -> Result<(), EngineError> {
        let result = build_transcode_cmd(input, output, creation_time)
            .output()
            .map_err(|e| EngineError::Transcode {
                path: input.to_path_buf(),
                detail: format!("failed to launch ffmpeg: {}", e),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(EngineError::Transcode {
                path: input.to_path_buf(),
                detail: truncate_diagnostic(&stderr),
            });
        }

        Ok(())
    }
}
