use anyhow::Result;
use std::path::Path;

/// Trait for running git commands to enable mocking in tests
///
/// Implementations return trimmed stdout on success and an error on non-zero
/// exit; callers never inspect exit codes beyond success/failure.
pub trait GitRunner {
    /// Run `git <args>` in the current working directory
    ///
    /// # Errors
    /// Returns an error if the command cannot be spawned or exits non-zero
    fn run(&self, args: &[&str]) -> Result<String>;

    /// Run `git <args>` against a specific worktree path
    ///
    /// # Errors
    /// Returns an error if the command cannot be spawned or exits non-zero
    fn run_in_dir(&self, dir: &Path, args: &[&str]) -> Result<String>;
}
