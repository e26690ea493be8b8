use std::path::PathBuf;

use super::common::{found_paths, run_scan, write_file};
use dupefind::search::{MatchMode, SearchConfig, SearchOption};
use tempfile::{tempdir, TempDir};

/// Two copies of every name under `left/` and `right/`.
fn mirrored(files: &[(&str, usize)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, len) in files {
        write_file(&dir.path().join("left").join(name), *len);
        write_file(&dir.path().join("right").join(name), *len);
    }
    dir
}

fn names_found(config: SearchConfig) -> Vec<String> {
    let (_, events) = run_scan(config);
    let mut names: Vec<String> = found_paths(&events)
        .iter()
        .map(|p: &PathBuf| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names.dedup();
    names
}

fn name_config(dir: &TempDir) -> SearchConfig {
    SearchConfig::new(vec![dir.path().to_path_buf()], MatchMode::NAME)
}

#[test]
fn test_only_documents() {
    let dir = mirrored(&[("notes.txt", 3), ("photo.jpg", 3), ("REPORT.PDF", 3)]);
    let config = name_config(&dir).with_option(SearchOption::OnlyDocumentFile);
    assert_eq!(names_found(config), vec!["REPORT.PDF", "notes.txt"]);
}

#[test]
fn test_only_images_and_media_intersect_to_nothing() {
    let dir = mirrored(&[("photo.jpg", 3), ("song.mp3", 3)]);
    let config = name_config(&dir)
        .with_option(SearchOption::OnlyImageFile)
        .with_option(SearchOption::OnlyMediaFile);
    assert!(names_found(config).is_empty());
}

#[test]
fn test_only_media() {
    let dir = mirrored(&[("clip.mkv", 3), ("photo.png", 3)]);
    let config = name_config(&dir).with_option(SearchOption::OnlyMediaFile);
    assert_eq!(names_found(config), vec!["clip.mkv"]);
}

#[test]
fn test_only_file_name_is_exact() {
    let dir = mirrored(&[("keep.txt", 3), ("Keep.txt", 3), ("other.txt", 3)]);
    let config = name_config(&dir).with_only_file_names(["keep.txt"]);
    assert_eq!(names_found(config), vec!["keep.txt"]);
}

#[test]
fn test_ignore_hidden() {
    let dir = mirrored(&[(".env", 3), ("visible.txt", 3)]);

    assert_eq!(
        names_found(name_config(&dir)),
        vec![".env", "visible.txt"]
    );
    let config = name_config(&dir).with_option(SearchOption::IgnoreHiddenFile);
    assert_eq!(names_found(config), vec!["visible.txt"]);
}

#[test]
fn test_ignore_small_uses_threshold() {
    let dir = mirrored(&[("tiny.txt", 10), ("edge.txt", 100), ("big.txt", 500)]);
    let mut config = name_config(&dir).with_option(SearchOption::IgnoreSmallFile);
    config.small_file_threshold = 100;
    // Files at exactly the threshold are kept
    assert_eq!(names_found(config), vec!["big.txt", "edge.txt"]);
}

#[test]
fn test_ignore_system_extensions() {
    let dir = mirrored(&[("setup.exe", 3), ("debug.LOG", 3), ("readme.md", 3)]);
    let config = name_config(&dir).with_option(SearchOption::IgnoreSystemFile);
    assert_eq!(names_found(config), vec!["readme.md"]);
}

#[test]
fn test_custom_extension_lists() {
    let dir = mirrored(&[("a.rs", 3), ("b.txt", 3)]);
    let mut config = name_config(&dir).with_option(SearchOption::OnlyDocumentFile);
    config.extensions.document = vec!["RS".to_string()];
    assert_eq!(names_found(config), vec!["a.rs"]);
}

#[test]
fn test_filtered_files_still_counted_as_seen() {
    let dir = mirrored(&[("a.txt", 0), ("b.txt", 2)]);
    let config = name_config(&dir).with_option(SearchOption::IgnoreEmptyFile);
    let (outcome, _) = run_scan(config);

    assert_eq!(outcome.summary.files_seen, 4);
    assert_eq!(outcome.summary.files_accepted, 2);
    assert_eq!(outcome.summary.duplicate_groups, 1);
}
