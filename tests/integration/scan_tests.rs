use super::common::{found_paths, run_scan, write_file};
use dupefind::duplicates::MatchKey;
use dupefind::events::ScanEvent;
use dupefind::job::ScanState;
use dupefind::search::{MatchMode, SearchConfig, SearchOption};
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let (outcome, events) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));

    assert_eq!(outcome.state, ScanState::Completed);
    assert!(outcome.groups.is_empty());
    assert_eq!(outcome.summary.directories, 1);
    assert_eq!(outcome.summary.files_seen, 0);
    assert!(matches!(events.last(), Some(ScanEvent::Finished(_))));
}

#[test]
fn test_name_match_reports_subdirectory_first() {
    let dir = tempdir().unwrap();
    let top = dir.path().join("a.txt");
    let nested = dir.path().join("sub").join("a.txt");
    write_file(&top, 10);
    write_file(&nested, 10);

    let (outcome, events) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));

    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(
        outcome.groups[0].key,
        MatchKey::Name {
            name: "a.txt".to_string()
        }
    );
    // Post-order: sub/ is read before the root's own files
    assert_eq!(found_paths(&events), vec![nested.clone(), top.clone()]);
    assert_eq!(outcome.groups[0].paths(), vec![nested, top]);
}

#[test]
fn test_size_only_matches_different_names() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("one.txt"), 64);
    write_file(&dir.path().join("two.bin"), 64);
    write_file(&dir.path().join("three.dat"), 65);

    let (outcome, _) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::SIZE,
    ));
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].key, MatchKey::Size { size: 64 });
    assert_eq!(outcome.groups[0].len(), 2);

    let (outcome, events) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME_AND_SIZE,
    ));
    assert!(outcome.groups.is_empty());
    assert!(found_paths(&events).is_empty());
}

#[test]
fn test_ignore_empty_keeps_zero_byte_files_out() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a").join("empty.txt"), 0);
    write_file(&dir.path().join("b").join("empty.txt"), 0);
    write_file(&dir.path().join("c").join("blank.log"), 0);
    write_file(&dir.path().join("a").join("data.txt"), 5);

    let config = SearchConfig::new(vec![dir.path().to_path_buf()], MatchMode::SIZE)
        .with_option(SearchOption::IgnoreEmptyFile);
    let (outcome, events) = run_scan(config);

    assert!(outcome.groups.is_empty());
    assert!(found_paths(&events).is_empty());
    assert_eq!(outcome.summary.files_seen, 4);
    assert_eq!(outcome.summary.files_accepted, 1);
}

#[test]
fn test_three_members_reported_once_each() {
    let dir = tempdir().unwrap();
    for sub in ["a", "b", "c"] {
        write_file(&dir.path().join(sub).join("same.txt"), 1);
    }

    let (outcome, events) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));

    let found = found_paths(&events);
    assert_eq!(
        found,
        vec![
            dir.path().join("a").join("same.txt"),
            dir.path().join("b").join("same.txt"),
            dir.path().join("c").join("same.txt"),
        ]
    );
    assert_eq!(outcome.summary.duplicate_groups, 1);
    assert_eq!(outcome.summary.duplicate_files, 3);
}

#[test]
fn test_status_announces_directory_files() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("first.txt"), 1);
    write_file(&dir.path().join("second.txt"), 1);

    let (_, events) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));

    let statuses: Vec<&String> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Status(message) => Some(message),
            _ => None,
        })
        .collect();
    assert_eq!(statuses, vec!["Reading files: first.txt, second.txt"]);
}

#[test]
fn test_missing_root_completes_quietly() {
    let dir = tempdir().unwrap();
    let (outcome, _) = run_scan(SearchConfig::new(
        vec![dir.path().join("gone")],
        MatchMode::NAME,
    ));

    assert_eq!(outcome.state, ScanState::Completed);
    assert_eq!(outcome.summary.directories, 0);
    assert!(outcome.errors.is_empty());
}
