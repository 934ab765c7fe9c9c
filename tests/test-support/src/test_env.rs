#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::prelude::*;

use std::path::{Path, PathBuf};
use std::process::Command;

/// Test environment with a real git repository plus a directory for worktrees
pub struct GitTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub worktrees_dir: assert_fs::fixture::ChildPath,
    _temp_dir: TempDir, // Keep temp_dir private to ensure cleanup, but don't expose it
}

impl GitTestEnvironment {
    /// Creates a new test environment with a real git repository and an
    /// initial commit on `main`
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize git repository
    /// - Failed to configure git settings
    /// - Failed to create initial commit
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("test_repo");
        let worktrees_dir = temp_dir.child("worktrees");

        repo_dir.create_dir_all()?;
        worktrees_dir.create_dir_all()?;

        let env = Self {
            repo_dir,
            worktrees_dir,
            _temp_dir: temp_dir,
        };

        env.git(&["init"])?;
        env.git(&["config", "user.name", "Test User"])?;
        env.git(&["config", "user.email", "test@example.com"])?;

        env.repo_dir.child("README.md").write_str("# Test Repo")?;
        env.git(&["add", "."])?;
        env.git(&["commit", "-m", "Initial commit"])?;

        // Ensure we have a main branch (some git versions default to 'master')
        env.git(&["branch", "-M", "main"])?;

        Ok(env)
    }

    /// Run a git command in the repository directory
    ///
    /// # Errors
    /// Returns an error if the command cannot be spawned or exits non-zero
    pub fn git(&self, args: &[&str]) -> Result<String> {
        self.git_in(self.repo_dir.path(), args)
    }

    /// Run a git command in an arbitrary directory
    ///
    /// # Errors
    /// Returns an error if the command cannot be spawned or exits non-zero
    pub fn git_in(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command failed: {}", stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Create a branch in the repository without checking it out
    ///
    /// # Errors
    /// Returns an error if the git command fails
    pub fn create_branch(&self, branch: &str) -> Result<()> {
        self.git(&["branch", branch])?;
        Ok(())
    }

    /// Create a worktree with `branch` checked out and return its path
    ///
    /// # Errors
    /// Returns an error if the git command fails
    pub fn add_worktree(&self, branch: &str) -> Result<PathBuf> {
        let sanitized = branch.replace('/', "-");
        let path = self.worktrees_dir.child(&sanitized);
        self.git(&[
            "worktree",
            "add",
            &path.path().to_string_lossy(),
            branch,
        ])?;
        Ok(path.path().to_path_buf())
    }

    /// The branch currently checked out in `dir`
    ///
    /// # Errors
    /// Returns an error if the git command fails
    pub fn current_branch(&self, dir: &Path) -> Result<String> {
        self.git_in(dir, &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Whether a local branch exists in the repository
    pub fn branch_exists(&self, branch: &str) -> bool {
        self.git(&["rev-parse", "--verify", &format!("refs/heads/{branch}")])
            .is_ok()
    }

    /// Drop an uncommitted file into `dir`
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn create_uncommitted_change(&self, dir: &Path) -> Result<()> {
        std::fs::write(dir.join("uncommitted.txt"), "uncommitted change\n")
            .context("Failed to create uncommitted file")?;
        Ok(())
    }

    /// Build a CLI invocation running from the repository directory
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("git-wt-detach")
            .context("Failed to find git-wt-detach binary")?;

        cmd.current_dir(self.repo_dir.path());
        cmd.args(args);
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_environment_creation() -> Result<()> {
        let env = GitTestEnvironment::new()?;

        env.repo_dir.assert(predicate::path::is_dir());
        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.repo_dir
            .child("README.md")
            .assert(predicate::str::contains("# Test Repo"));

        assert!(env.branch_exists("main"));
        assert!(!env.branch_exists("nonexistent"));

        Ok(())
    }

    #[test]
    fn test_worktree_setup() -> Result<()> {
        let env = GitTestEnvironment::new()?;

        env.create_branch("feature/test")?;
        let worktree = env.add_worktree("feature/test")?;

        assert!(worktree.is_dir());
        assert_eq!(env.current_branch(&worktree)?, "feature/test");
        assert_eq!(env.current_branch(env.repo_dir.path())?, "main");

        Ok(())
    }
}
