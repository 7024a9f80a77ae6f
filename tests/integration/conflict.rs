//! Conflict pause, resolution and abort

use super::helpers::{create_fixture, git, Fixture};
use serial_test::serial;
use taskmerge::commands::check::{self, CheckOptions};
use taskmerge::commands::{abort, merge, push, resolve, status, Session};
use taskmerge::git::PushMode;
use taskmerge::models::{BranchName, MergeOutcome, Phase};
use taskmerge::orchestrator::{MergeError, NullSink, ResolutionInconsistency};

/// feat-T1 and feat-T2 both rewrite README.md; feat-T3 is independent.
fn conflicting_fixture() -> Fixture {
    let fixture = create_fixture().unwrap();
    fixture.remote_branch("feat-T1", "README.md", "from T1\n").unwrap();
    fixture.remote_branch("feat-T2", "README.md", "from T2\n").unwrap();
    fixture.remote_branch("feat-T3", "c.txt", "c\n").unwrap();
    fixture.write_required(&["feat-T1", "feat-T2", "feat-T3"]).unwrap();
    fixture
}

fn merge_error(err: &anyhow::Error) -> &MergeError {
    err.downcast_ref::<MergeError>()
        .unwrap_or_else(|| panic!("expected a MergeError, got: {err:#}"))
}

#[test]
#[serial]
fn test_conflict_pauses_the_run() {
    let fixture = conflicting_fixture();
    let session = Session::open_locked(&fixture.work).unwrap();

    let report = merge::run(&session, &NullSink, None).unwrap();

    assert_eq!(report.phase, Phase::ConflictPaused);
    assert_eq!(report.conflict, Some(BranchName::from("feat-T2")));
    assert_eq!(report.pending, vec![BranchName::from("feat-T3")]);
    assert_eq!(
        report.summary.with_outcome(MergeOutcome::MergedNow),
        vec![&BranchName::from("feat-T1")]
    );
    assert_eq!(report.summary.conflicted(), Some(&BranchName::from("feat-T2")));

    // Working tree is left mid-merge for the operator
    assert!(session.repo.merge_in_progress());
    assert!(fixture.state_exists());
    assert_eq!(fixture.required_file().unwrap(), "feat-T2\nfeat-T3\n");
    assert!(!fixture.is_merged("feat-T3"));
}

#[test]
#[serial]
fn test_commands_refuse_while_paused() {
    let fixture = conflicting_fixture();
    let session = Session::open_locked(&fixture.work).unwrap();
    merge::run(&session, &NullSink, None).unwrap();

    let err = merge::run(&session, &NullSink, None).unwrap_err();
    assert!(matches!(
        merge_error(&err),
        MergeError::ConflictOutstanding { .. }
    ));

    fixture.write_task_ids(&["T1"]).unwrap();
    let err = check::run(&session, &CheckOptions::default()).unwrap_err();
    assert!(matches!(
        merge_error(&err),
        MergeError::ConflictOutstanding { .. }
    ));

    let err = push::run(&session).unwrap_err();
    assert!(matches!(
        merge_error(&err),
        MergeError::ConflictOutstanding { .. }
    ));
}

#[test]
#[serial]
fn test_resolve_commits_and_continues() {
    let fixture = conflicting_fixture();
    let session = Session::open_locked(&fixture.work).unwrap();
    merge::run(&session, &NullSink, None).unwrap();

    std::fs::write(fixture.work.join("README.md"), "from T1 and T2\n").unwrap();
    let report = resolve::run(&session, None, &NullSink, None).unwrap();

    assert_eq!(report.phase, Phase::Completed);
    assert_eq!(
        report.summary.with_outcome(MergeOutcome::MergedNow),
        vec![&BranchName::from("feat-T2"), &BranchName::from("feat-T3")]
    );
    assert!(fixture.is_merged("feat-T1"));
    assert!(fixture.is_merged("feat-T2"));
    assert!(fixture.is_merged("feat-T3"));
    assert!(!fixture.state_exists());

    let log = git(&fixture.work, &["log", "--format=%s"]).unwrap();
    assert!(log.lines().any(|subject| subject == "Resolve merge conflict"));
    // The tool's own files never end up in a commit
    let tracked = git(&fixture.work, &["ls-files"]).unwrap();
    assert!(!tracked.contains(".taskmerge"));

    // Nothing left outstanding, so the result can be published
    assert_eq!(push::run(&session).unwrap(), PushMode::Plain);
}

#[test]
#[serial]
fn test_resolve_uses_custom_message() {
    let fixture = conflicting_fixture();
    let session = Session::open_locked(&fixture.work).unwrap();
    merge::run(&session, &NullSink, None).unwrap();

    std::fs::write(fixture.work.join("README.md"), "merged\n").unwrap();
    resolve::run(&session, Some("Combine README edits"), &NullSink, None).unwrap();

    let log = git(&fixture.work, &["log", "--format=%s"]).unwrap();
    assert!(log.lines().any(|subject| subject == "Combine README edits"));
}

#[test]
#[serial]
fn test_resolve_without_conflict_is_inconsistent() {
    let fixture = create_fixture().unwrap();
    let session = Session::open_locked(&fixture.work).unwrap();

    let err = resolve::run(&session, None, &NullSink, None).unwrap_err();

    assert!(matches!(
        merge_error(&err),
        MergeError::Inconsistent(ResolutionInconsistency::NoConflict)
    ));
}

#[test]
#[serial]
fn test_resolve_after_manual_abort_keeps_state_paused() {
    let fixture = conflicting_fixture();
    let session = Session::open_locked(&fixture.work).unwrap();
    merge::run(&session, &NullSink, None).unwrap();
    git(&fixture.work, &["merge", "--abort"]).unwrap();

    let err = resolve::run(&session, None, &NullSink, None).unwrap_err();

    assert!(matches!(
        merge_error(&err),
        MergeError::Inconsistent(ResolutionInconsistency::NoMergeInProgress { .. })
    ));
    let state = session.load_state().unwrap().unwrap();
    assert_eq!(state.phase(), Phase::ConflictPaused);
}

#[test]
#[serial]
fn test_resolve_after_manual_abort_ignores_unrelated_edits() {
    let fixture = conflicting_fixture();
    let session = Session::open_locked(&fixture.work).unwrap();
    merge::run(&session, &NullSink, None).unwrap();
    git(&fixture.work, &["merge", "--abort"]).unwrap();
    std::fs::write(fixture.work.join("unrelated.txt"), "scratch\n").unwrap();
    let head = git(&fixture.work, &["rev-parse", "HEAD"]).unwrap();

    let err = resolve::run(&session, None, &NullSink, None).unwrap_err();

    assert!(matches!(
        merge_error(&err),
        MergeError::Inconsistent(ResolutionInconsistency::NoMergeInProgress { .. })
    ));
    assert_eq!(git(&fixture.work, &["rev-parse", "HEAD"]).unwrap(), head);
    assert!(!fixture.is_merged("feat-T2"));
    assert_eq!(fixture.required_file().unwrap(), "feat-T2\nfeat-T3\n");
    let state = session.load_state().unwrap().unwrap();
    assert_eq!(state.conflict_branch(), Some(&BranchName::from("feat-T2")));

    // Abort is the way out, and the branch is retried
    abort::run(&session, &NullSink).unwrap();
    assert_eq!(fixture.required_file().unwrap(), "feat-T2\nfeat-T3\n");
}

#[test]
#[serial]
fn test_abort_requeues_the_conflicted_branch() {
    let fixture = conflicting_fixture();
    let session = Session::open_locked(&fixture.work).unwrap();
    merge::run(&session, &NullSink, None).unwrap();

    let branch = abort::run(&session, &NullSink).unwrap();

    assert_eq!(branch, BranchName::from("feat-T2"));
    assert!(!session.repo.merge_in_progress());
    assert_eq!(fixture.required_file().unwrap(), "feat-T2\nfeat-T3\n");

    let report = status::run(&session).unwrap();
    assert_eq!(report.phase, Some(Phase::Running));
    assert!(report.conflict.is_none());

    // The retry conflicts again at the same place
    let report = merge::run(&session, &NullSink, None).unwrap();
    assert_eq!(report.conflict, Some(BranchName::from("feat-T2")));
}

#[test]
#[serial]
fn test_status_reports_paused_run() {
    let fixture = conflicting_fixture();
    {
        let session = Session::open_locked(&fixture.work).unwrap();
        merge::run(&session, &NullSink, None).unwrap();
    }

    let session = Session::open(&fixture.work).unwrap();
    let report = status::run(&session).unwrap();

    assert_eq!(report.phase, Some(Phase::ConflictPaused));
    assert_eq!(report.conflict, Some(BranchName::from("feat-T2")));
    assert!(report.merge_in_progress);
    assert_eq!(
        report.required,
        vec![BranchName::from("feat-T2"), BranchName::from("feat-T3")]
    );
}

#[test]
#[serial]
fn test_resolve_refuses_on_another_branch() {
    let fixture = conflicting_fixture();
    let session = Session::open_locked(&fixture.work).unwrap();
    merge::run(&session, &NullSink, None).unwrap();
    git(&fixture.work, &["merge", "--abort"]).unwrap();
    git(&fixture.work, &["checkout", "-q", "-b", "elsewhere"]).unwrap();

    let err = resolve::run(&session, None, &NullSink, None).unwrap_err();

    assert!(matches!(
        merge_error(&err),
        MergeError::BranchChanged { .. }
    ));
}
