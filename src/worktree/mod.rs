use std::path::{Path, PathBuf};

/// A single entry from `git worktree list --porcelain`
///
/// An empty branch means the worktree is on a detached HEAD. Records are
/// ephemeral: they are reconstructed on every listing call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    pub path: PathBuf,
    pub branch: String,
}

/// Parses the output of `git worktree list --porcelain` into worktree records
///
/// The format is paragraph-oriented: `worktree <path>` opens a record,
/// `branch refs/heads/<name>` sets its branch, and a blank line closes it.
/// Any other line (`HEAD`, `detached`, `bare`, future attributes) is ignored,
/// so this function is total and never fails. A record still open at the end
/// of input is emitted even without a trailing blank line.
#[must_use]
pub fn parse_worktree_list(output: &str) -> Vec<Worktree> {
    let mut worktrees = Vec::new();
    let mut current: Option<Worktree> = None;

    for line in output.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            current = Some(Worktree {
                path: PathBuf::from(path),
                branch: String::new(),
            });
        } else if let Some(branch) = line.strip_prefix("branch refs/heads/") {
            if let Some(wt) = current.as_mut() {
                wt.branch = branch.to_string();
            }
        } else if line.is_empty() {
            if let Some(wt) = current.take() {
                worktrees.push(wt);
            }
        }
    }

    // Last record when the output has no trailing blank line
    if let Some(wt) = current {
        worktrees.push(wt);
    }

    worktrees
}

/// Finds the first worktree (in listing order) that has `branch` checked out,
/// skipping the worktree at `exclude` if one is given
///
/// Git never checks out the same branch in two worktrees, so at most one match
/// is expected; scanning in input order keeps the result deterministic anyway.
#[must_use]
pub fn find_worktree_by_branch<'a>(
    worktrees: &'a [Worktree],
    branch: &str,
    exclude: Option<&Path>,
) -> Option<&'a Worktree> {
    worktrees
        .iter()
        .find(|wt| wt.branch == branch && exclude != Some(wt.path.as_path()))
}
