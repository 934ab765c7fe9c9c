use anyhow::Context;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::git::GitCli;
use crate::traits::GitRunner;
use crate::worktree::{Worktree, find_worktree_by_branch, parse_worktree_list};

/// Default suffix appended to a branch name to form its temporary branch
pub const DEFAULT_SUFFIX: &str = "__wt_detach";

/// Uncommitted-changes errors stop itemizing files beyond this many entries
const MAX_LISTED_FILES: usize = 10;

/// Per-invocation command options
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub dry_run: bool,
    pub revert: bool,
    pub force: bool,
    pub yes: bool,
}

/// The result of a detach or revert operation
///
/// Carries enough information for the CLI to render status without
/// re-querying repository state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    pub worktree_path: Option<PathBuf>,
    pub temp_branch: Option<String>,
}

/// Typed failures from the detach/revert engine
///
/// Every failure crosses the engine boundary as one of these variants; the
/// CLI layer is solely responsible for formatting and exit-code mapping.
#[derive(Debug, Error)]
pub enum DetachError {
    #[error("branch '{0}' does not exist")]
    BranchNotFound(String),

    #[error("temporary branch '{0}' does not exist")]
    TempBranchNotFound(String),

    #[error("temporary branch '{0}' already exists. Use --revert first or delete the branch manually")]
    TempBranchConflict(String),

    #[error("{}", uncommitted_message(.path, .files))]
    UncommittedChanges { path: PathBuf, files: Vec<String> },

    #[error(transparent)]
    Command(#[from] anyhow::Error),
}

fn uncommitted_message(path: &Path, files: &[String]) -> String {
    let mut msg = format!("uncommitted changes found in worktree: {}", path.display());
    if files.len() > MAX_LISTED_FILES {
        msg.push_str(&format!("\n  {} files or more", files.len()));
    } else {
        for file in files {
            msg.push_str(&format!("\n  {file}"));
        }
    }
    msg.push_str("\n  Use --force to override");
    msg
}

/// Orchestrates the detach and revert workflows
///
/// The engine issues a strict sequence of git commands through its
/// [`GitRunner`] and holds no state across calls apart from the configured
/// suffix. It never writes to output streams; results and failures are
/// returned as values. Concurrent invocations against the same repository can
/// race on branch creation/deletion; no locking is attempted.
pub struct Detacher {
    git: Box<dyn GitRunner>,
    suffix: String,
}

impl Detacher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_runner(Box::new(GitCli::new()))
    }

    /// Creates a detacher backed by a custom runner (used by tests)
    #[must_use]
    pub fn with_runner(git: Box<dyn GitRunner>) -> Self {
        Self {
            git,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Sets the temporary-branch suffix; empty suffixes are ignored
    pub fn set_suffix(&mut self, suffix: &str) {
        if !suffix.is_empty() {
            self.suffix = suffix.to_string();
        }
    }

    /// Loads the suffix from the `wt-detach.suffix` git config key, if set
    pub fn load_suffix_from_config(&mut self) {
        if let Ok(suffix) = self.git.run(&["config", "--get", "wt-detach.suffix"]) {
            self.set_suffix(&suffix);
        }
    }

    /// Returns the temporary branch name for a given branch
    #[must_use]
    pub fn temp_branch_name(&self, branch: &str) -> String {
        format!("{branch}{}", self.suffix)
    }

    /// Checks if a local branch exists
    #[must_use]
    pub fn branch_exists(&self, branch: &str) -> bool {
        self.git
            .run(&["rev-parse", "--verify", &format!("refs/heads/{branch}")])
            .is_ok()
    }

    /// Returns the path of the worktree the command runs from
    ///
    /// # Errors
    /// Returns an error if the current directory is not inside a git worktree
    pub fn current_worktree_path(&self) -> Result<PathBuf, DetachError> {
        let path = self
            .git
            .run(&["rev-parse", "--show-toplevel"])
            .context("failed to get current worktree path")?;
        Ok(PathBuf::from(path))
    }

    /// Lists all worktrees of the current repository
    ///
    /// # Errors
    /// Returns an error if the listing command fails
    pub fn list_worktrees(&self) -> Result<Vec<Worktree>, DetachError> {
        let output = self
            .git
            .run(&["worktree", "list", "--porcelain"])
            .context("failed to list worktrees")?;
        Ok(parse_worktree_list(&output))
    }

    /// Finds the worktree that has `branch` checked out, excluding the
    /// current worktree
    ///
    /// # Errors
    /// Returns an error if the current path or the worktree list cannot be
    /// resolved
    pub fn find_worktree_for_branch(&self, branch: &str) -> Result<Option<Worktree>, DetachError> {
        let current = self.current_worktree_path()?;
        let worktrees = self.list_worktrees()?;
        Ok(find_worktree_by_branch(&worktrees, branch, Some(&current)).cloned())
    }

    /// Checks whether a worktree has uncommitted changes
    ///
    /// A failing status query counts as "has changes": when in doubt the
    /// operation is blocked rather than allowed to clobber work.
    #[must_use]
    pub fn has_uncommitted_changes(&self, worktree_path: &Path) -> bool {
        match self.git.run_in_dir(worktree_path, &["status", "--porcelain"]) {
            Ok(output) => !output.is_empty(),
            Err(_) => true,
        }
    }

    /// Returns the paths reported dirty by `git status --porcelain`
    ///
    /// Used only to build error messages; a failing query yields an empty list.
    #[must_use]
    pub fn uncommitted_files(&self, worktree_path: &Path) -> Vec<String> {
        self.git
            .run_in_dir(worktree_path, &["status", "--porcelain"])
            .map(|output| {
                output
                    .lines()
                    // Status fields like " M" start with a space, so strip
                    // leading whitespace before splitting off the code
                    .filter_map(|line| line.trim_start().split_once(' '))
                    .map(|(_, file)| file.trim_start().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn create_branch(&self, branch: &str, worktree_path: &Path) -> Result<(), DetachError> {
        self.git
            .run_in_dir(worktree_path, &["branch", branch])
            .with_context(|| format!("failed to create branch '{branch}'"))?;
        Ok(())
    }

    fn delete_branch(&self, branch: &str) -> Result<(), DetachError> {
        self.git
            .run(&["branch", "-D", branch])
            .with_context(|| format!("failed to delete branch '{branch}'"))?;
        Ok(())
    }

    fn checkout(&self, worktree_path: &Path, branch: &str) -> Result<(), DetachError> {
        self.git
            .run_in_dir(worktree_path, &["checkout", branch])
            .with_context(|| {
                format!(
                    "failed to checkout '{branch}' in '{}'",
                    worktree_path.display()
                )
            })?;
        Ok(())
    }

    /// Detaches `branch` from the worktree holding it
    ///
    /// Creates the temporary branch at the worktree's HEAD and checks it out
    /// there, freeing `branch` for checkout elsewhere. Finding no worktree
    /// with the branch checked out is a success, not an error.
    ///
    /// # Errors
    /// Returns [`DetachError::BranchNotFound`] for a missing branch,
    /// [`DetachError::UncommittedChanges`] for a dirty worktree without
    /// `force`, [`DetachError::TempBranchConflict`] if the temporary branch
    /// already exists, and [`DetachError::Command`] for underlying git
    /// failures. If the checkout fails after the temporary branch was
    /// created, the engine deletes it again (best effort) before returning
    /// the checkout error.
    pub fn detach(&self, branch: &str, opts: &Options) -> Result<Outcome, DetachError> {
        if !self.branch_exists(branch) {
            return Err(DetachError::BranchNotFound(branch.to_string()));
        }

        let temp_branch = self.temp_branch_name(branch);

        let Some(wt) = self.find_worktree_for_branch(branch)? else {
            return Ok(Outcome {
                success: true,
                message: format!("Branch '{branch}' is not checked out in any other worktree"),
                worktree_path: None,
                temp_branch: None,
            });
        };

        if !opts.force && self.has_uncommitted_changes(&wt.path) {
            return Err(DetachError::UncommittedChanges {
                files: self.uncommitted_files(&wt.path),
                path: wt.path,
            });
        }

        // Never silently reuse or overwrite a leftover temp branch
        if self.branch_exists(&temp_branch) {
            return Err(DetachError::TempBranchConflict(temp_branch));
        }

        if opts.dry_run {
            return Ok(Outcome {
                success: true,
                message: "dry-run".to_string(),
                worktree_path: Some(wt.path),
                temp_branch: Some(temp_branch),
            });
        }

        self.create_branch(&temp_branch, &wt.path)?;

        if let Err(err) = self.checkout(&wt.path, &temp_branch) {
            // Best-effort rollback so a half-completed detach does not leave
            // an orphaned temp branch dangling
            let _ = self.delete_branch(&temp_branch);
            return Err(err);
        }

        Ok(Outcome {
            success: true,
            message: format!("Branch '{branch}' detached successfully"),
            worktree_path: Some(wt.path),
            temp_branch: Some(temp_branch),
        })
    }

    /// Reverts a previous detach, restoring `branch` in its worktree and
    /// deleting the temporary branch
    ///
    /// A temporary branch that exists but is checked out nowhere (leftover
    /// from an interrupted run) is simply deleted. Unlike [`Detacher::detach`],
    /// a delete failure after the checkout is surfaced without rolling the
    /// checkout back: the branch restoration has already succeeded and is
    /// left in place.
    ///
    /// # Errors
    /// Returns [`DetachError::BranchNotFound`] if the original branch is
    /// missing, [`DetachError::TempBranchNotFound`] if the temporary branch
    /// is, [`DetachError::UncommittedChanges`] for a dirty worktree without
    /// `force`, and [`DetachError::Command`] for underlying git failures.
    pub fn revert(&self, branch: &str, opts: &Options) -> Result<Outcome, DetachError> {
        if !self.branch_exists(branch) {
            return Err(DetachError::BranchNotFound(branch.to_string()));
        }

        let temp_branch = self.temp_branch_name(branch);

        if !self.branch_exists(&temp_branch) {
            return Err(DetachError::TempBranchNotFound(temp_branch));
        }

        // Any worktree, including the current one, may hold the temp branch,
        // so this lookup excludes nothing
        let worktrees = self.list_worktrees()?;
        let found = find_worktree_by_branch(&worktrees, &temp_branch, None).cloned();

        let Some(wt) = found else {
            if opts.dry_run {
                return Ok(Outcome {
                    success: true,
                    message: "dry-run: would delete branch".to_string(),
                    worktree_path: None,
                    temp_branch: Some(temp_branch),
                });
            }

            self.delete_branch(&temp_branch)?;

            return Ok(Outcome {
                success: true,
                message: format!("Deleted temporary branch '{temp_branch}'"),
                worktree_path: None,
                temp_branch: Some(temp_branch),
            });
        };

        if !opts.force && self.has_uncommitted_changes(&wt.path) {
            return Err(DetachError::UncommittedChanges {
                files: self.uncommitted_files(&wt.path),
                path: wt.path,
            });
        }

        if opts.dry_run {
            return Ok(Outcome {
                success: true,
                message: "dry-run".to_string(),
                worktree_path: Some(wt.path),
                temp_branch: Some(temp_branch),
            });
        }

        self.checkout(&wt.path, branch)?;
        self.delete_branch(&temp_branch)?;

        Ok(Outcome {
            success: true,
            message: format!("Branch '{branch}' restored successfully"),
            worktree_path: Some(wt.path),
            temp_branch: Some(temp_branch),
        })
    }
}

impl Default for Detacher {
    fn default() -> Self {
        Self::new()
    }
}
