//! Publishing the merged branch

use super::helpers::{create_fixture, git};
use serial_test::serial;
use taskmerge::commands::{push, Session};
use taskmerge::git::PushMode;
use taskmerge::orchestrator::MergeError;

#[test]
#[serial]
fn test_first_push_sets_upstream_then_plain() {
    let fixture = create_fixture().unwrap();
    git(&fixture.work, &["checkout", "-q", "-b", "release"]).unwrap();
    fixture.commit_file("notes.txt", "one\n", "Release notes").unwrap();

    let session = Session::open_locked(&fixture.work).unwrap();
    assert_eq!(push::run(&session).unwrap(), PushMode::SetUpstream);
    assert!(session.repo.has_upstream(&"release".into()));

    fixture.commit_file("notes.txt", "two\n", "More notes").unwrap();
    assert_eq!(push::run(&session).unwrap(), PushMode::Plain);

    let local = git(&fixture.work, &["rev-parse", "HEAD"]).unwrap();
    let remote = git(&fixture.origin, &["rev-parse", "release"]).unwrap();
    assert_eq!(local, remote);
}

#[test]
#[serial]
fn test_push_refused_with_pending_branches() {
    let fixture = create_fixture().unwrap();
    let state_dir = fixture.work.join(".taskmerge");
    std::fs::create_dir_all(&state_dir).unwrap();
    std::fs::write(
        state_dir.join("state.toml"),
        "current_branch = \"main\"\npending = [\"feat-T1\"]\n",
    )
    .unwrap();

    let session = Session::open_locked(&fixture.work).unwrap();
    let err = push::run(&session).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<MergeError>(),
        Some(MergeError::PendingBranches { count: 1 })
    ));
}
