// Per-pair conversion pipeline

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::EngineError;
use super::exif::{ExifToolReader, MetadataReader};
use super::inject::{IdentifierInjector, MakeLiveInjector};
use super::transcode::{FfmpegTranscoder, Transcoder};
use super::types::{AssetPair, PairOutcome, UnpairedAsset};

/// The three external capabilities a conversion needs, bundled so the worker
/// pool can fan them out and tests can substitute fakes.
#[derive(Clone)]
pub struct Backends {
    pub reader: Arc<dyn MetadataReader>,
    pub transcoder: Arc<dyn Transcoder>,
    pub injector: Arc<dyn IdentifierInjector>,
}

impl Backends {
    /// The production backends: exiftool, ffmpeg and makelive
    pub fn native() -> Self {
        Self {
            reader: Arc::new(ExifToolReader),
            transcoder: Arc::new(FfmpegTranscoder),
            injector: Arc::new(MakeLiveInjector),
        }
    }
}

/// Convert one pair, reporting the result as an outcome instead of an error.
///
/// All intermediate files live in a per-pair subdirectory of `scratch_root`
/// (unique because base names are unique), and outputs reach `output_dir`
/// only through the final rename. A failed pair therefore leaves nothing in
/// the export folder.
pub fn convert_pair(
    pair: &AssetPair,
    output_dir: &Path,
    scratch_root: &Path,
    prefix: &str,
    backends: &Backends,
) -> PairOutcome {
    let work = scratch_root.join(&pair.base_name);
    match convert_inner(pair, output_dir, &work, prefix, backends) {
        Ok((identifier, out_image, out_video)) => {
            PairOutcome::succeeded(pair.clone(), identifier, out_image, out_video)
        }
        Err(e) => {
            let _ = fs::remove_dir_all(&work);
            tracing::warn!(pair = %pair.base_name, error = %e, "pair conversion failed");
            PairOutcome::failed(pair.clone(), &e)
        }
    }
}

fn convert_inner(
    pair: &AssetPair,
    output_dir: &Path,
    work: &Path,
    prefix: &str,
    backends: &Backends,
) -> Result<(String, PathBuf, PathBuf), EngineError> {
    fs::create_dir_all(work).map_err(|e| EngineError::Finalize {
        path: work.to_path_buf(),
        source: e,
    })?;

    // 1. Capture timestamp, best-effort
    let capture_time = backends.reader.read_capture_time(&pair.image_path);
    if capture_time.is_none() {
        tracing::debug!(pair = %pair.base_name, "no capture timestamp, skipping alignment");
    }

    // 2. Transcode into scratch
    let transcoded = work.join("transcode.mov");
    backends
        .transcoder
        .transcode(&pair.video_path, &transcoded, capture_time.as_ref())?;

    // 3. Inject the ContentIdentifier into staged copies
    let staged_image = work.join(pair.output_image_name(prefix));
    let staged_video = work.join(pair.output_video_name(prefix));
    let identifier =
        backends
            .injector
            .inject(&pair.image_path, &transcoded, &staged_image, &staged_video)?;

    // 4. Finalize: scratch lives inside the export folder, so this is a rename
    let out_image = output_dir.join(pair.output_image_name(prefix));
    let out_video = output_dir.join(pair.output_video_name(prefix));
    fs::rename(&staged_image, &out_image).map_err(|e| EngineError::Finalize {
        path: out_image.clone(),
        source: e,
    })?;
    if let Err(e) = fs::rename(&staged_video, &out_video) {
        // Keep the no-partial-output invariant
        let _ = fs::remove_file(&out_image);
        return Err(EngineError::Finalize {
            path: out_video,
            source: e,
        });
    }

    let _ = fs::remove_dir_all(work);
    Ok((identifier, out_image, out_video))
}

/// Copy an unpaired asset verbatim into the export folder
pub fn copy_unpaired(asset: &UnpairedAsset, output_dir: &Path) -> Result<PathBuf, EngineError> {
    let name = asset.path.file_name().ok_or_else(|| EngineError::Copy {
        path: asset.path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no filename"),
    })?;

    let dest = output_dir.join(name);
    fs::copy(&asset.path, &dest).map_err(|e| EngineError::Copy {
        path: asset.path.clone(),
        source: e,
    })?;

    Ok(dest)
}
