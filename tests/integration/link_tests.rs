#![cfg(unix)]

use std::os::unix::fs::symlink;

use super::common::{found_paths, run_scan, write_file};
use dupefind::job::ScanState;
use dupefind::search::{MatchMode, SearchConfig};
use tempfile::tempdir;

#[test]
fn test_symlinked_file_skipped_by_default() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("real").join("data.txt");
    write_file(&target, 8);
    std::fs::create_dir(dir.path().join("links")).unwrap();
    symlink(&target, dir.path().join("links").join("data.txt")).unwrap();

    let (outcome, _) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));
    assert!(outcome.groups.is_empty());
    assert_eq!(outcome.summary.files_seen, 1);
}

#[test]
fn test_symlinked_file_followed_when_enabled() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("real").join("data.txt");
    write_file(&target, 8);
    std::fs::create_dir(dir.path().join("links")).unwrap();
    let link = dir.path().join("links").join("data.txt");
    symlink(&target, &link).unwrap();

    let mut config = SearchConfig::new(vec![dir.path().to_path_buf()], MatchMode::NAME);
    config.follow_symlinks = true;
    let (outcome, events) = run_scan(config);

    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(found_paths(&events), vec![link, target]);
}

#[test]
fn test_symlink_cycle_terminates() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("inner").join("file.txt"), 4);
    symlink(dir.path(), dir.path().join("inner").join("loop")).unwrap();

    let mut config = SearchConfig::new(vec![dir.path().to_path_buf()], MatchMode::NAME);
    config.follow_symlinks = true;
    let (outcome, _) = run_scan(config);

    assert_eq!(outcome.state, ScanState::Completed);
    assert!(outcome.groups.is_empty());
    assert_eq!(outcome.summary.files_seen, 1);
}

#[test]
fn test_symlinked_root_is_walked() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("real").join("a.txt"), 4);
    let link = dir.path().join("alias");
    symlink(dir.path().join("real"), &link).unwrap();

    let (outcome, _) = run_scan(SearchConfig::new(vec![link], MatchMode::NAME));
    assert_eq!(outcome.summary.directories, 1);
    assert_eq!(outcome.summary.files_seen, 1);
}
