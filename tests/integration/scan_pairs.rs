// Directory-scan behavior across realistic mixed folders

use crate::common::write_file;
use motionlive::engine::{MediaKind, scan_pairs};
use std::collections::HashSet;
use tempfile::TempDir;

#[test]
fn test_mixed_folder_partition() {
    let tmp = TempDir::new().unwrap();
    for name in [
        "IMG_001.jpg",
        "IMG_001.mp4",
        "IMG_002.jpg",
        "IMG_003.mp4",
        "PXL_007.HEIC",
        "pxl_007.MP4",
        "readme.md",
        "thumbs.db",
    ] {
        write_file(tmp.path(), name, b"data");
    }

    let (pairs, unpaired) = scan_pairs(tmp.path()).unwrap();

    let pair_stems: HashSet<String> = pairs
        .iter()
        .map(|p| p.base_name.to_lowercase())
        .collect();
    assert_eq!(
        pair_stems,
        HashSet::from(["img_001".to_string(), "pxl_007".to_string()])
    );

    assert_eq!(unpaired.len(), 2);
    assert!(
        unpaired
            .iter()
            .any(|u| u.path.ends_with("IMG_002.jpg") && u.kind == MediaKind::Image)
    );
    assert!(
        unpaired
            .iter()
            .any(|u| u.path.ends_with("IMG_003.mp4") && u.kind == MediaKind::Video)
    );
}

#[test]
fn test_pair_and_unpaired_sets_are_disjoint() {
    let tmp = TempDir::new().unwrap();
    for i in 0..20 {
        write_file(tmp.path(), &format!("shot_{i:03}.jpg"), b"i");
        if i % 2 == 0 {
            write_file(tmp.path(), &format!("shot_{i:03}.mp4"), b"v");
        }
    }

    let (pairs, unpaired) = scan_pairs(tmp.path()).unwrap();
    assert_eq!(pairs.len(), 10);
    assert_eq!(unpaired.len(), 10);

    let paired: HashSet<String> = pairs.iter().map(|p| p.base_name.to_lowercase()).collect();
    for single in &unpaired {
        let stem = single
            .path
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .to_lowercase();
        assert!(!paired.contains(&stem), "stem {stem} in both sets");
    }
}

#[test]
fn test_scan_ordering_is_stable() {
    let tmp = TempDir::new().unwrap();
    for name in ["b.jpg", "b.mp4", "a.jpg", "a.mp4", "C.jpg", "c.mp4"] {
        write_file(tmp.path(), name, b"x");
    }

    let (pairs, _) = scan_pairs(tmp.path()).unwrap();
    let stems: Vec<String> = pairs.iter().map(|p| p.base_name.to_lowercase()).collect();
    assert_eq!(stems, vec!["a", "b", "c"]);
}
