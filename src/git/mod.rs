use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;

use crate::traits::GitRunner;

/// Runs git commands as subprocesses
///
/// This is the production [`GitRunner`]: it shells out to the `git` binary so
/// that worktree bookkeeping, checkout safety checks, and config resolution all
/// behave exactly as they do for the user on the command line.
#[derive(Debug, Default)]
pub struct GitCli;

impl GitCli {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn execute(cmd: &mut Command, args: &[&str]) -> Result<String> {
        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitRunner for GitCli {
    fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        Self::execute(&mut cmd, args)
    }

    fn run_in_dir(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(dir).args(args);
        Self::execute(&mut cmd, args)
    }
}
