#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use motionlive::engine::{
    Backends, EngineError, IdentifierInjector, MetadataReader, Transcoder,
};

/// Reader that always returns the same fixed capture timestamp
pub struct FixedReader(pub DateTime<FixedOffset>);

impl MetadataReader for FixedReader {
    fn read_capture_time(&self, _image: &Path) -> Option<DateTime<FixedOffset>> {
        Some(self.0)
    }
}

/// Reader that never finds a timestamp
pub struct AbsentReader;

impl MetadataReader for AbsentReader {
    fn read_capture_time(&self, _image: &Path) -> Option<DateTime<FixedOffset>> {
        None
    }
}

/// Transcoder that copies the input and fails for configured base names
pub struct FakeTranscoder {
    fail_for: HashSet<String>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self {
            fail_for: HashSet::new(),
        }
    }

    /// Fail transcodes whose input filename starts with `stem`
    pub fn failing_on(stem: &str) -> Self {
        let mut fail_for = HashSet::new();
        fail_for.insert(stem.to_lowercase());
        Self { fail_for }
    }

    fn should_fail(&self, input: &Path) -> bool {
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| self.fail_for.contains(&s.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Transcoder for FakeTranscoder {
    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _creation_time: Option<&DateTime<FixedOffset>>,
    ) -> Result<(), EngineError> {
        if self.should_fail(input) {
            return Err(EngineError::Transcode {
                path: input.to_path_buf(),
                detail: "moov atom not found".to_string(),
            });
        }
        fs::copy(input, output).map_err(|e| EngineError::Transcode {
            path: input.to_path_buf(),
            detail: e.to_string(),
        })?;
        Ok(())
    }
}

/// Injector that copies both files and hands out sequential identifiers
pub struct FakeInjector {
    counter: AtomicU64,
    fail: bool,
}

impl FakeInjector {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            counter: AtomicU64::new(0),
            fail: true,
        }
    }
}

impl IdentifierInjector for FakeInjector {
    fn inject(
        &self,
        image_in: &Path,
        video_in: &Path,
        image_out: &Path,
        video_out: &Path,
    ) -> Result<String, EngineError> {
        if self.fail {
            return Err(EngineError::Inject {
                path: image_in.to_path_buf(),
                detail: "capability call failed".to_string(),
            });
        }
        fs::copy(image_in, image_out).map_err(|e| EngineError::Inject {
            path: image_in.to_path_buf(),
            detail: e.to_string(),
        })?;
        fs::copy(video_in, video_out).map_err(|e| EngineError::Inject {
            path: video_in.to_path_buf(),
            detail: e.to_string(),
        })?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("FAKE-{:08}", n))
    }
}

/// Backends wired entirely with fakes (everything succeeds)
pub fn fake_backends() -> Backends {
    Backends {
        reader: Arc::new(FixedReader(fixed_timestamp())),
        transcoder: Arc::new(FakeTranscoder::new()),
        injector: Arc::new(FakeInjector::new()),
    }
}

pub fn fixed_timestamp() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 15, 10, 30, 0)
        .unwrap()
}

/// Create a file with the given contents under `dir`
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Names of all plain files directly inside `dir`, sorted
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
