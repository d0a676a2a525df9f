// Per-pair pipeline behavior with fake external backends

use crate::common::{
    AbsentReader, FakeInjector, FakeTranscoder, dir_listing, fake_backends, write_file,
};
use motionlive::engine::{AssetPair, Backends, convert_pair};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    _input: TempDir,
    output: TempDir,
    scratch: TempDir,
    pair: AssetPair,
}

fn fixture() -> Fixture {
    let input = TempDir::new().unwrap();
    let image = write_file(input.path(), "IMG_001.jpg", b"jpeg-bytes");
    let video = write_file(input.path(), "IMG_001.mp4", b"mp4-bytes");
    Fixture {
        pair: AssetPair::new("IMG_001".to_string(), image, video),
        _input: input,
        output: TempDir::new().unwrap(),
        scratch: TempDir::new().unwrap(),
    }
}

#[test]
fn test_successful_pair_lands_in_output() {
    let fx = fixture();
    let outcome = convert_pair(
        &fx.pair,
        fx.output.path(),
        fx.scratch.path(),
        "Live_",
        &fake_backends(),
    );

    assert!(outcome.is_success(), "{:?}", outcome.error_detail);
    assert_eq!(
        dir_listing(fx.output.path()),
        vec!["Live_IMG_001.jpg", "Live_IMG_001.mov"]
    );
    assert!(outcome.identifier.is_some());
    assert!(
        outcome
            .output_image_path
            .as_ref()
            .unwrap()
            .ends_with("Live_IMG_001.jpg")
    );

    // Sources untouched
    assert_eq!(fs::read(&fx.pair.image_path).unwrap(), b"jpeg-bytes");
    assert_eq!(fs::read(&fx.pair.video_path).unwrap(), b"mp4-bytes");
}

#[test]
fn test_absent_timestamp_still_succeeds() {
    let fx = fixture();
    let backends = Backends {
        reader: Arc::new(AbsentReader),
        ..fake_backends()
    };

    let outcome = convert_pair(
        &fx.pair,
        fx.output.path(),
        fx.scratch.path(),
        "Live_",
        &backends,
    );
    assert!(outcome.is_success());
}

#[test]
fn test_transcode_failure_leaves_no_partial_output() {
    let fx = fixture();
    let backends = Backends {
        transcoder: Arc::new(FakeTranscoder::failing_on("IMG_001")),
        ..fake_backends()
    };

    let outcome = convert_pair(
        &fx.pair,
        fx.output.path(),
        fx.scratch.path(),
        "Live_",
        &backends,
    );

    assert!(!outcome.is_success());
    assert!(
        outcome
            .error_detail
            .as_deref()
            .unwrap()
            .contains("transcode failed")
    );
    assert!(dir_listing(fx.output.path()).is_empty());
    // Scratch area for the pair was cleaned up too
    assert!(!fx.scratch.path().join("IMG_001").exists());
}

#[test]
fn test_injection_failure_leaves_no_partial_output() {
    let fx = fixture();
    let backends = Backends {
        injector: Arc::new(FakeInjector::failing()),
        ..fake_backends()
    };

    let outcome = convert_pair(
        &fx.pair,
        fx.output.path(),
        fx.scratch.path(),
        "Live_",
        &backends,
    );

    assert!(!outcome.is_success());
    assert!(
        outcome
            .error_detail
            .as_deref()
            .unwrap()
            .contains("injection failed")
    );
    assert!(dir_listing(fx.output.path()).is_empty());
}

#[test]
fn test_identifiers_unique_across_pairs() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let backends = fake_backends();

    let mut ids = Vec::new();
    for i in 0..5 {
        let image = write_file(input.path(), &format!("p{i}.jpg"), b"i");
        let video = write_file(input.path(), &format!("p{i}.mp4"), b"v");
        let pair = AssetPair::new(format!("p{i}"), image, video);
        let outcome = convert_pair(&pair, output.path(), scratch.path(), "Live_", &backends);
        assert!(outcome.is_success());
        ids.push(outcome.identifier.unwrap());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}
