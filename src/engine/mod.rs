// Core conversion engine - independent of the CLI surface

pub mod error;
pub mod exif;
pub mod inject;
pub mod pipeline;
pub mod scan;
pub mod tools;
pub mod transcode;
pub mod types;
pub mod worker;

pub use error::EngineError;
pub use exif::{ExifToolReader, MetadataReader};
pub use inject::{IdentifierInjector, MakeLiveInjector, new_content_identifier};
pub use pipeline::{Backends, convert_pair, copy_unpaired};
pub use scan::{is_image_file, is_video_file, scan_pairs};
pub use transcode::{FfmpegTranscoder, Transcoder};
pub use types::{AssetPair, MediaKind, OutcomeStatus, PairOutcome, RunReport, UnpairedAsset};
pub use worker::{WorkerMessage, WorkerPool, default_workers, run};
