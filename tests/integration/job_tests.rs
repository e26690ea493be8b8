use std::sync::{mpsc, Arc};

use super::common::{found_paths, run_scan, write_file, Gate};
use dupefind::events::ScanEvent;
use dupefind::job::{JobError, ScanJob, ScanState};
use dupefind::search::{ConfigError, MatchMode, SearchConfig};
use tempfile::{tempdir, TempDir};

/// Root with `a/x.txt`, `b/x.txt`, `c/x.txt`.
fn three_copies() -> TempDir {
    let dir = tempdir().unwrap();
    for sub in ["a", "b", "c"] {
        write_file(&dir.path().join(sub).join("x.txt"), 4);
    }
    dir
}

fn name_config(dir: &TempDir) -> SearchConfig {
    SearchConfig::new(vec![dir.path().to_path_buf()], MatchMode::NAME)
}

#[test]
fn test_stop_leaves_unvisited_directories_out() {
    let dir = three_copies();
    let (gate, control) = Gate::new();
    let mut job = ScanJob::new();

    job.start(name_config(&dir), gate).unwrap();
    control.reached.recv().unwrap();
    job.stop();
    control.release.send(()).unwrap();

    let outcome = job.wait().unwrap();
    let events: Vec<ScanEvent> = control.events.try_iter().collect();

    assert_eq!(outcome.state, ScanState::Stopped);
    assert!(outcome.summary.interrupted);
    // Only a/ was read; b/ and c/ were never entered
    assert_eq!(outcome.summary.directories, 1);
    assert!(outcome.groups.is_empty());
    assert!(found_paths(&events).is_empty());
    assert!(matches!(events.last(), Some(ScanEvent::Stopped(_))));
    assert!(!events.iter().any(|e| matches!(e, ScanEvent::Finished(_))));
}

#[test]
fn test_groups_found_before_stop_are_kept() {
    let dir = tempdir().unwrap();
    for sub in ["a", "b", "c", "d"] {
        write_file(&dir.path().join(sub).join("x.txt"), 4);
    }
    // Parked while c/ is being read, after a/ and b/ already formed a group
    let (gate, control) = Gate::parked_at(3);
    let mut job = ScanJob::new();

    job.start(name_config(&dir), gate).unwrap();
    control.reached.recv().unwrap();
    job.stop();
    control.release.send(()).unwrap();

    let outcome = job.wait().unwrap();
    let events: Vec<ScanEvent> = control.events.try_iter().collect();
    let expected: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|sub| dir.path().join(sub).join("x.txt"))
        .collect();

    assert_eq!(outcome.state, ScanState::Stopped);
    assert_eq!(outcome.summary.directories, 3);
    // The batch in flight when stop arrived is still indexed
    assert_eq!(found_paths(&events), expected);
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].paths(), expected);
    assert!(!found_paths(&events)
        .iter()
        .any(|path| path.starts_with(dir.path().join("d"))));
    assert!(matches!(events.last(), Some(ScanEvent::Stopped(_))));
}

#[test]
fn test_restart_after_stop_is_fresh() {
    let dir = three_copies();
    let (gate, control) = Gate::new();
    let mut job = ScanJob::new();

    job.start(name_config(&dir), gate).unwrap();
    control.reached.recv().unwrap();
    job.stop();
    control.release.send(()).unwrap();

    // Restart without waiting: start joins the stopping worker itself
    let (tx, rx) = mpsc::channel();
    job.start(name_config(&dir), Arc::new(tx)).unwrap();
    let outcome = job.wait().unwrap();

    assert_eq!(outcome.state, ScanState::Completed);
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].len(), 3);

    let events: Vec<ScanEvent> = rx.try_iter().collect();
    assert_eq!(found_paths(&events).len(), 3);
    assert!(matches!(events.last(), Some(ScanEvent::Finished(_))));
}

#[test]
fn test_stop_before_start_does_not_affect_next_scan() {
    let dir = three_copies();
    let mut job = ScanJob::new();
    job.stop();

    let (tx, _rx) = mpsc::channel();
    job.start(name_config(&dir), Arc::new(tx)).unwrap();
    let outcome = job.wait().unwrap();
    assert_eq!(outcome.state, ScanState::Completed);
}

#[test]
fn test_stale_stop_handle_is_ignored() {
    let dir = three_copies();
    let mut job = ScanJob::new();

    let (tx, _rx) = mpsc::channel();
    job.start(name_config(&dir), Arc::new(tx)).unwrap();
    let old_handle = job.stop_handle();
    job.wait().unwrap();

    let (tx, _rx) = mpsc::channel();
    job.start(name_config(&dir), Arc::new(tx)).unwrap();
    old_handle.stop();
    let outcome = job.wait().unwrap();
    assert_eq!(outcome.state, ScanState::Completed);
}

#[test]
fn test_config_errors_are_synchronous() {
    let mut job = ScanJob::new();
    let (tx, rx) = mpsc::channel();

    let err = job
        .start(SearchConfig::new(Vec::new(), MatchMode::NAME), Arc::new(tx))
        .unwrap_err();
    assert!(matches!(err, JobError::Config(ConfigError::NoRoots)));
    assert_eq!(job.state(), ScanState::Idle);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_repeated_scans_give_same_result() {
    let dir = three_copies();
    let (first, _) = run_scan(name_config(&dir));
    let (second, _) = run_scan(name_config(&dir));
    assert_eq!(first.groups, second.groups);
}
