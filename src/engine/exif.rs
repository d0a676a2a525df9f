// Capture-timestamp extraction via exiftool

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// Reads a capture timestamp out of a still image's metadata.
///
/// Best-effort by contract: any missing field, tool failure or parse error
/// yields `None` and the pipeline proceeds without timestamp alignment.
pub trait MetadataReader: Send + Sync {
    fn read_capture_time(&self, image: &Path) -> Option<DateTime<FixedOffset>>;
}

#[derive(Debug, Deserialize)]
struct ExifEntry {
    #[serde(rename = "DateTimeOriginal")]
    date_time_original: Option<String>,
    #[serde(rename = "OffsetTimeOriginal")]
    offset_time_original: Option<String>,
}

/// Metadata reader backed by the external `exiftool` process
pub struct ExifToolReader;

impl MetadataReader for ExifToolReader {
    fn read_capture_time(&self, image: &Path) -> Option<DateTime<FixedOffset>> {
        let output = Command::new("exiftool")
            .args(["-j", "-DateTimeOriginal", "-OffsetTimeOriginal"])
            .arg(image)
            .output()
            .ok()?;

        if !output.status.success() {
            tracing::debug!(path = %image.display(), "exiftool exited nonzero");
            return None;
        }

        // exiftool -j emits one JSON array entry per input file
        let entries: Vec<ExifEntry> = serde_json::from_slice(&output.stdout).ok()?;
        let entry = entries.into_iter().next()?;
        parse_exif_datetime(
            entry.date_time_original?.as_str(),
            entry.offset_time_original.as_deref(),
        )
    }
}

/// Parse an EXIF `DateTimeOriginal` value ("YYYY:MM:DD HH:MM:SS") together
/// with an optional `OffsetTimeOriginal` ("+08:00"). Without an embedded
/// offset the local system timezone is assumed.
pub fn parse_exif_datetime(raw: &str, offset: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S").ok()?;

    match offset.map(str::trim).filter(|s| !s.is_empty()) {
        Some(tz) => {
            let offset = parse_utc_offset(tz)?;
            offset.from_local_datetime(&naive).single()
        }
        None => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset()),
    }
}

/// Parse a "+HH:MM" / "-HH:MM" UTC offset
fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.strip_prefix('+') {
        Some(rest) => (1, rest),
        None => (-1, s.strip_prefix('-')?),
    };

    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
