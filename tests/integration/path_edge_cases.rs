use super::common::{found_paths, run_scan, write_file};
use dupefind::duplicates::MatchKey;
use dupefind::job::ScanState;
use dupefind::search::{MatchMode, NameCase, SearchConfig};
use tempfile::tempdir;

#[test]
fn test_unicode_forms_match_each_other() {
    let dir = tempdir().unwrap();
    let composed = dir.path().join("nfc").join("caf\u{e9}.txt");
    let decomposed = dir.path().join("nfd").join("cafe\u{301}.txt");
    write_file(&composed, 1);
    write_file(&decomposed, 1);

    let (outcome, _) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));

    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(
        outcome.groups[0].key,
        MatchKey::Name {
            name: "caf\u{e9}.txt".to_string()
        }
    );
}

#[test]
fn test_case_sensitive_by_default() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a").join("Photo.JPG"), 1);
    write_file(&dir.path().join("b").join("photo.jpg"), 1);

    let config = SearchConfig::new(vec![dir.path().to_path_buf()], MatchMode::NAME);
    let (outcome, _) = run_scan(config.clone());
    assert!(outcome.groups.is_empty());

    let (outcome, events) = run_scan(config.with_name_case(NameCase::Insensitive));
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].key.name(), Some("photo.jpg"));
    // Records keep their on-disk names
    assert!(found_paths(&events)
        .iter()
        .any(|p| p.ends_with("Photo.JPG")));
}

#[test]
fn test_names_with_spaces_and_symbols() {
    let dir = tempdir().unwrap();
    let name = "my file (copy) #1 [final].txt";
    write_file(&dir.path().join("x").join(name), 2);
    write_file(&dir.path().join("y").join(name), 2);

    let (outcome, _) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME_AND_SIZE,
    ));
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].key.name(), Some(name));
}

#[test]
fn test_files_without_extension() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("x").join("Makefile"), 2);
    write_file(&dir.path().join("y").join("Makefile"), 2);

    let (outcome, _) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].members[0].extension, "");
}

#[test]
fn test_file_given_as_root_is_skipped() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    write_file(&file, 2);

    let (outcome, _) = run_scan(SearchConfig::new(vec![file], MatchMode::NAME));
    assert_eq!(outcome.state, ScanState::Completed);
    assert_eq!(outcome.summary.directories, 0);
    assert_eq!(outcome.summary.files_seen, 0);
}

#[test]
fn test_deeply_nested_tree() {
    let dir = tempdir().unwrap();
    let mut deep = dir.path().to_path_buf();
    for level in 0..40 {
        deep = deep.join(format!("level{level}"));
    }
    write_file(&deep.join("bottom.txt"), 1);
    write_file(&dir.path().join("bottom.txt"), 1);

    let (outcome, events) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));
    assert_eq!(outcome.summary.directories, 41);
    assert_eq!(found_paths(&events).first(), Some(&deep.join("bottom.txt")));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    write_file(&locked.join("secret.txt"), 1);
    write_file(&dir.path().join("open").join("secret.txt"), 1);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not apply to privileged users
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (outcome, events) = run_scan(SearchConfig::new(
        vec![dir.path().to_path_buf()],
        MatchMode::NAME,
    ));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(outcome.state, ScanState::Completed);
    assert_eq!(outcome.summary.skipped_directories, 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].path(), locked.as_path());
    assert!(outcome.groups.is_empty());
    assert!(events.iter().any(|e| matches!(
        e,
        dupefind::events::ScanEvent::Status(message) if message.starts_with("Skipped ")
    )));
}
