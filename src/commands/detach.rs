use anyhow::{Result, bail};
use inquire::Confirm;
use std::path::Path;

use crate::detach::{DetachError, Detacher, Options};

/// Detaches a branch from the worktree currently holding it
///
/// Renders progress, handles the confirmation prompt and dry-run display, and
/// delegates the actual state changes to the engine.
///
/// # Errors
/// Returns an error if:
/// - The branch does not exist
/// - The target worktree has uncommitted changes and `--force` is not set
/// - The temporary branch already exists
/// - Git operations fail
pub fn run_detach(detacher: &Detacher, branch: &str, opts: &Options) -> Result<()> {
    if !detacher.branch_exists(branch) {
        bail!("branch '{branch}' does not exist");
    }

    let Some(wt) = detacher.find_worktree_for_branch(branch)? else {
        println!("Branch '{branch}' is not checked out in any other worktree.");
        return Ok(());
    };

    println!("✔ Found worktree: {}", wt.path.display());

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
        let outcome = detacher.detach(branch, opts)?;
        if let Some(temp_branch) = &outcome.temp_branch {
            println!("would create branch: {temp_branch}");
        }
        if let Some(path) = &outcome.worktree_path {
            println!("would checkout in worktree: {}", path.display());
        }
        return Ok(());
    }

    if !opts.yes && !confirm_detach(branch, &wt.path, &detacher.temp_branch_name(branch))? {
        println!("Aborted.");
        return Ok(());
    }

    let outcome = detacher.detach(branch, opts)?;

    match &outcome.temp_branch {
        Some(temp_branch) => {
            println!("✔ Created temp branch: {temp_branch}");
            println!("✔ Switched worktree branch");
            println!("✔ Branch detached: {branch}");
        }
        // The worktree disappeared between the lookup above and the engine's
        // own lookup; nothing was mutated
        None => println!("{}", outcome.message),
    }

    Ok(())
}

fn confirm_detach(branch: &str, worktree_path: &Path, temp_branch: &str) -> Result<bool> {
    println!("Branch '{branch}' is currently checked out in:");
    println!("  {}", worktree_path.display());
    println!();
    println!("It will be temporarily replaced by:");
    println!("  {temp_branch}");
    println!();

    let confirmed = Confirm::new("Proceed?").with_default(false).prompt()?;
    Ok(confirmed)
}
