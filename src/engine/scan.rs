use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::EngineError;
use super::types::{AssetPair, MediaKind, UnpairedAsset};

/// Still-image extensions eligible for pairing
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "heic"];

/// Companion-video extensions eligible for pairing
const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    if let Some(ext) = path.extension() {
        if let Some(ext_str) = ext.to_str() {
            return extensions.contains(&ext_str.to_lowercase().as_str());
        }
    }
    false
}

/// Check if a path has a recognized still-image extension
pub fn is_image_file(path: &Path) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

/// Check if a path has a recognized companion-video extension
pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

fn classify(path: &Path) -> Option<MediaKind> {
    if is_image_file(path) {
        Some(MediaKind::Image)
    } else if is_video_file(path) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Sort key that makes duplicate-stem resolution deterministic:
/// lowercased filename first, original filename as tie-break.
fn file_sort_key(path: &Path) -> (String, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (name.to_lowercase(), name)
}

fn lowercase_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

/// Scan a directory (non-recursive) and partition its media files into
/// stem-matched pairs and unpaired leftovers.
///
/// Stems compare case-insensitively. When several files share a stem within
/// one class (e.g. `a.jpg` and `a.jpeg`), the lexicographically smallest
/// filename wins the pair slot and the rest are reported as unpaired, so
/// they still get copied. The scan is pure: no side effects, and running it
/// twice on an unmodified directory yields identical groupings.
pub fn scan_pairs(dir: &Path) -> Result<(Vec<AssetPair>, Vec<UnpairedAsset>), EngineError> {
    if !dir.is_dir() {
        return Err(EngineError::Input(dir.to_path_buf()));
    }

    // BTreeMap keys give a stable stem order for free
    let mut images: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let mut videos: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(stem) = lowercase_stem(path) else {
            continue;
        };
        match classify(path) {
            Some(MediaKind::Image) => images.entry(stem).or_default().push(path.to_path_buf()),
            Some(MediaKind::Video) => videos.entry(stem).or_default().push(path.to_path_buf()),
            None => {}
        }
    }

    for group in images.values_mut().chain(videos.values_mut()) {
        group.sort_by_key(|p| file_sort_key(p));
    }

    let mut pairs = Vec::new();
    let mut unpaired = Vec::new();

    for (stem, group) in &images {
        match videos.get(stem) {
            Some(video_group) => {
                let image = &group[0];
                let video = &video_group[0];
                let base_name = image
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| stem.clone());
                pairs.push(AssetPair::new(base_name, image.clone(), video.clone()));

                // Losers of an ambiguous stem are still copied verbatim
                for extra in &group[1..] {
                    tracing::warn!(path = %extra.display(), "duplicate stem, treating as unpaired");
                    unpaired.push(UnpairedAsset {
                        path: extra.clone(),
                        kind: MediaKind::Image,
                    });
                }
                for extra in &video_group[1..] {
                    tracing::warn!(path = %extra.display(), "duplicate stem, treating as unpaired");
                    unpaired.push(UnpairedAsset {
                        path: extra.clone(),
                        kind: MediaKind::Video,
                    });
                }
            }
            None => {
                for path in group {
                    unpaired.push(UnpairedAsset {
                        path: path.clone(),
                        kind: MediaKind::Image,
                    });
                }
            }
        }
    }

    for (stem, group) in &videos {
        if images.contains_key(stem) {
            continue;
        }
        for path in group {
            unpaired.push(UnpairedAsset {
                path: path.clone(),
                kind: MediaKind::Video,
            });
        }
    }

    unpaired.sort_by_key(|a| file_sort_key(&a.path));

    Ok((pairs, unpaired))
}
