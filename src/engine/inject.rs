// ContentIdentifier injection via the platform-native makelive capability

use std::fs;
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

use super::error::EngineError;

/// Embeds a shared ContentIdentifier into an image/video pair.
///
/// The identifier must land in the exact fields Photos.app's pairing matcher
/// reads: the proprietary per-image MakerNotes field and the video's
/// `com.apple.quicktime.content.identifier` Keys atom. Writes into generic
/// EXIF/XMP namespaces look valid but never pair.
///
/// Implementations copy both inputs to the output paths and only ever write
/// the copies; the inputs stay untouched.
pub trait IdentifierInjector: Send + Sync {
    fn inject(
        &self,
        image_in: &Path,
        video_in: &Path,
        image_out: &Path,
        video_out: &Path,
    ) -> Result<String, EngineError>;
}

/// Generate a fresh ContentIdentifier (uppercase UUID, Apple's convention).
/// UUIDv4 makes cross-run and cross-pair collisions a non-concern.
pub fn new_content_identifier() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

/// Injector backed by the external `makelive` tool.
///
/// Platform precondition: makelive drives CoreGraphics and AVFoundation, so
/// this backend only exists on macOS. On other systems the conversion
/// feature as a whole is unavailable; `tools::check_all` reports that before
/// any work is scheduled.
pub struct MakeLiveInjector;

impl MakeLiveInjector {
    fn stage(&self, src: &Path, dst: &Path) -> Result<(), EngineError> {
        fs::copy(src, dst).map_err(|e| EngineError::Inject {
            path: src.to_path_buf(),
            detail: format!("failed to stage copy: {}", e),
        })?;
        Ok(())
    }
}

impl IdentifierInjector for MakeLiveInjector {
    fn inject(
        &self,
        image_in: &Path,
        video_in: &Path,
        image_out: &Path,
        video_out: &Path,
    ) -> Result<String, EngineError> {
        let identifier = new_content_identifier();

        self.stage(image_in, image_out)?;
        self.stage(video_in, video_out)?;

        // makelive rewrites both files in place with the supplied identifier
        let result = Command::new("makelive")
            .arg("--asset-id")
            .arg(&identifier)
            .arg(image_out)
            .arg(video_out)
            .output()
            .map_err(|e| EngineError::Inject {
                path: image_in.to_path_buf(),
                detail: format!("failed to launch makelive: {}", e),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(EngineError::Inject {
                path: image_in.to_path_buf(),
                detail: stderr.trim().to_string(),
            });
        }

        tracing::debug!(identifier = %identifier, image = %image_out.display(), "injected ContentIdentifier");
        Ok(identifier)
    }
}
