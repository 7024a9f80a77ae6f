//! Repository fixtures

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A working repository on `main` with a bare `origin` beside it.
///
/// Keep the value alive for the whole test; dropping it removes both.
pub struct Fixture {
    _temp: TempDir,
    pub origin: PathBuf,
    pub work: PathBuf,
}

/// Run git in `dir`, failing on a non-zero exit
pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("LC_ALL", "C")
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}{}",
            args.join(" "),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub fn create_fixture() -> Result<Fixture> {
    let temp = TempDir::new().context("Failed to create temp directory")?;
    let origin = temp.path().join("origin.git");
    let work = temp.path().join("work");
    std::fs::create_dir_all(&origin)?;
    std::fs::create_dir_all(&work)?;

    git(&origin, &["init", "--bare"])?;

    git(&work, &["init"])?;
    git(&work, &["config", "user.email", "test@test.com"])?;
    git(&work, &["config", "user.name", "Test User"])?;
    git(&work, &["config", "commit.gpgsign", "false"])?;
    std::fs::write(work.join("README.md"), "# Test Repository\n")
        .context("Failed to write README.md")?;
    git(&work, &["add", "."])?;
    git(&work, &["commit", "-m", "Initial commit"])?;
    git(&work, &["branch", "-M", "main"])?;

    let origin_url = origin.to_string_lossy().into_owned();
    git(&work, &["remote", "add", "origin", &origin_url])?;
    git(&work, &["push", "-u", "origin", "main"])?;

    Ok(Fixture {
        _temp: temp,
        origin,
        work,
    })
}

impl Fixture {
    /// Commit `content` to `file` on a new branch forked from `main`, push
    /// it, and delete the local copy so it only exists on the remote.
    pub fn remote_branch(&self, name: &str, file: &str, content: &str) -> Result<()> {
        git(&self.work, &["checkout", "-q", "-b", name, "main"])?;
        std::fs::write(self.work.join(file), content)
            .with_context(|| format!("Failed to write {file}"))?;
        git(&self.work, &["add", "."])?;
        git(&self.work, &["commit", "-m", &format!("Work on {name}")])?;
        git(&self.work, &["push", "origin", name])?;
        git(&self.work, &["checkout", "-q", "main"])?;
        git(&self.work, &["branch", "-D", name])?;
        Ok(())
    }

    /// Commit directly on the checked-out branch
    pub fn commit_file(&self, file: &str, content: &str, message: &str) -> Result<()> {
        std::fs::write(self.work.join(file), content)
            .with_context(|| format!("Failed to write {file}"))?;
        git(&self.work, &["add", file])?;
        git(&self.work, &["commit", "-m", message])?;
        Ok(())
    }

    pub fn write_task_ids(&self, ids: &[&str]) -> Result<()> {
        let dir = self.work.join(".taskmerge");
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("task_ids.txt"), ids.join("\n") + "\n")?;
        Ok(())
    }

    pub fn write_required(&self, branches: &[&str]) -> Result<()> {
        let dir = self.work.join(".taskmerge");
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("required_branches.txt"), branches.join("\n") + "\n")?;
        Ok(())
    }

    pub fn required_file(&self) -> Result<String> {
        Ok(std::fs::read_to_string(
            self.work.join(".taskmerge").join("required_branches.txt"),
        )?)
    }

    pub fn state_exists(&self) -> bool {
        self.work.join(".taskmerge").join("state.toml").exists()
    }

    /// `git merge-base --is-ancestor <branch> HEAD`
    pub fn is_merged(&self, branch: &str) -> bool {
        git(&self.work, &["merge-base", "--is-ancestor", branch, "HEAD"]).is_ok()
    }

    pub fn head_subject(&self) -> Result<String> {
        Ok(git(&self.work, &["log", "-1", "--format=%s"])?.trim().to_string())
    }
}
