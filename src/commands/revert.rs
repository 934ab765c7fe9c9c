use anyhow::{Result, bail};
use inquire::Confirm;
use std::path::Path;

use crate::detach::{DetachError, Detacher, Options};
use crate::worktree::find_worktree_by_branch;

/// Reverts a previous detach, restoring the branch in its worktree
///
/// # Errors
/// Returns an error if:
/// - The branch or its temporary branch does not exist
/// - The worktree holding the temporary branch has uncommitted changes and
///   `--force` is not set
/// - Git operations fail
pub fn run_revert(detacher: &Detacher, branch: &str, opts: &Options) -> Result<()> {
    if !detacher.branch_exists(branch) {
        bail!("branch '{branch}' does not exist");
    }

    let temp_branch = detacher.temp_branch_name(branch);

    if !detacher.branch_exists(&temp_branch) {
        bail!("temporary branch '{temp_branch}' does not exist");
    }

    // The temp branch may be held by any worktree, including this one
    let worktrees = detacher.list_worktrees()?;
    let found = find_worktree_by_branch(&worktrees, &temp_branch, None).cloned();

    let Some(wt) = found else {
        // Leftover from an interrupted run: the temp branch exists but is
        // checked out nowhere, so it only needs deleting
        if opts.dry_run {
            println!("would delete branch: {temp_branch}");
            return Ok(());
        }

        detacher.revert(branch, opts)?;
        println!("✔ Deleted temp branch: {temp_branch}");
        return Ok(());
    };

    println!("✔ Found worktree with temp branch: {}", wt.path.display());

    if detacher.has_uncommitted_changes(&wt.path) {
        if !opts.force {
            bail!(DetachError::UncommittedChanges {
                files: detacher.uncommitted_files(&wt.path),
                path: wt.path,
            });
        }
        println!(
            "⚠ Warning: Uncommitted changes found in worktree: {}",
            wt.path.display()
        );
    }

    if opts.dry_run {
        println!(
            "would checkout branch in worktree: {} -> {branch}",
            wt.path.display()
        );
        println!("would delete branch: {temp_branch}");
        return Ok(());
    }

    if !opts.yes && !confirm_revert(branch, &wt.path, &temp_branch)? {
        println!("Aborted.");
        return Ok(());
    }

    detacher.revert(branch, opts)?;

    println!("✔ Switched worktree to: {branch}");
    println!("✔ Deleted temp branch: {temp_branch}");
    println!("✔ Branch restored: {branch}");

    Ok(())
}

fn confirm_revert(branch: &str, worktree_path: &Path, temp_branch: &str) -> Result<bool> {
    println!(
        "Worktree '{}' will be switched back to branch '{branch}'",
        worktree_path.display()
    );
    println!("Temporary branch '{temp_branch}' will be deleted.");
    println!();

    let confirmed = Confirm::new("Proceed?").with_default(false).prompt()?;
    Ok(confirmed)
}
