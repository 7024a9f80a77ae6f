//! Task id resolution against a real remote

use super::helpers::{create_fixture, git};
use serial_test::serial;
use taskmerge::commands::check::{self, CheckOptions};
use taskmerge::commands::Session;
use taskmerge::fs::read_required_branches;
use taskmerge::models::{BranchName, TaskId};

#[test]
#[serial]
fn test_check_selects_branches_for_task_ids() {
    let fixture = create_fixture().unwrap();
    fixture.remote_branch("feat-T1-login", "login.txt", "login\n").unwrap();
    fixture.remote_branch("fix-T2", "fix.txt", "fix\n").unwrap();
    fixture.remote_branch("feat-T3", "other.txt", "other\n").unwrap();
    fixture.write_task_ids(&["T1", "T2", "T9"]).unwrap();

    let session = Session::open_locked(&fixture.work).unwrap();
    let report = check::run(&session, &CheckOptions::default()).unwrap();

    let required: Vec<_> = report.resolution.required.iter().cloned().collect();
    assert_eq!(
        required,
        vec![BranchName::from("feat-T1-login"), BranchName::from("fix-T2")]
    );
    assert_eq!(
        report.resolution.task_map.get(&TaskId::from("T9")),
        Some(&[] as &[BranchName])
    );
    assert_eq!(
        report.resolution.task_map.unmatched().collect::<Vec<_>>(),
        vec![&TaskId::from("T9")]
    );

    let persisted = read_required_branches(&session.required_branches_path()).unwrap();
    assert_eq!(persisted, required);
}

#[test]
#[serial]
fn test_check_skips_branches_already_merged() {
    let fixture = create_fixture().unwrap();
    fixture.remote_branch("feat-T1", "a.txt", "a\n").unwrap();
    fixture.remote_branch("feat-T2", "b.txt", "b\n").unwrap();
    git(&fixture.work, &["fetch", "origin"]).unwrap();
    git(&fixture.work, &["merge", "--no-ff", "-m", "manual", "origin/feat-T1"]).unwrap();
    fixture.write_task_ids(&["T1", "T2"]).unwrap();

    let session = Session::open_locked(&fixture.work).unwrap();
    let report = check::run(&session, &CheckOptions::default()).unwrap();

    assert_eq!(
        report.resolution.required.iter().collect::<Vec<_>>(),
        vec![&BranchName::from("feat-T2")]
    );
    assert_eq!(
        report.resolution.task_map.get(&TaskId::from("T1")),
        Some(&[] as &[BranchName])
    );
}

#[test]
#[serial]
fn test_check_without_fetch_uses_known_remote_refs() {
    let fixture = create_fixture().unwrap();
    fixture.remote_branch("feat-T1", "a.txt", "a\n").unwrap();
    fixture.write_task_ids(&["T1"]).unwrap();

    let session = Session::open_locked(&fixture.work).unwrap();
    let options = CheckOptions {
        task_ids: None,
        fetch: false,
    };
    let report = check::run(&session, &options).unwrap();

    // The push in the fixture already updated origin/feat-T1
    assert_eq!(report.resolution.required.len(), 1);
}

#[test]
#[serial]
fn test_check_reads_task_ids_from_explicit_path() {
    let fixture = create_fixture().unwrap();
    fixture.remote_branch("feat-T7", "a.txt", "a\n").unwrap();
    let task_file = fixture.work.join("ids.txt");
    std::fs::write(&task_file, "T7\n\nT7\n").unwrap();

    let session = Session::open_locked(&fixture.work).unwrap();
    let options = CheckOptions {
        task_ids: Some(task_file),
        fetch: true,
    };
    let report = check::run(&session, &options).unwrap();

    assert_eq!(report.task_ids, vec![TaskId::from("T7")]);
    assert_eq!(report.resolution.required.len(), 1);
}

#[test]
#[serial]
fn test_check_missing_task_file_is_an_error() {
    let fixture = create_fixture().unwrap();

    let session = Session::open_locked(&fixture.work).unwrap();
    let err = check::run(&session, &CheckOptions::default()).unwrap_err();

    assert!(err.to_string().contains("Task id file not found"));
}

#[test]
#[serial]
fn test_second_locked_session_is_busy() {
    let fixture = create_fixture().unwrap();

    let first = Session::open_locked(&fixture.work).unwrap();
    assert!(first.is_locked());
    let second = Session::open_locked(&fixture.work);
    assert!(second.is_err());

    // Read-only sessions do not contend
    let reader = Session::open(&fixture.work).unwrap();
    assert!(!reader.is_locked());
}
