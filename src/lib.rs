//! # git-wt-detach
//!
//! A small git extension that works around a narrow limitation: git refuses to
//! check out the same branch in two worktrees at once. `git wt-detach` parks the
//! worktree that currently holds a branch on a derived temporary branch, freeing
//! the branch name for checkout elsewhere, and `git wt-detach --revert` restores
//! the original state afterwards.
//!
//! ## Quick Start
//!
//! ```bash
//! # Free up feature/auth, which is checked out in another worktree
//! git wt-detach feature/auth
//!
//! # ... check out feature/auth wherever you need it ...
//!
//! # Put everything back the way it was
//! git wt-detach --revert feature/auth
//! ```
//!
//! The temporary branch name is `<branch><suffix>`, where the suffix defaults to
//! `__wt_detach` and can be overridden via the `wt-detach.suffix` git config key.
//!
//! ## Module Structure
//!
//! - [`commands`] - CLI command implementations (detach, revert, shell integration)
//! - [`detach`] - The detach/revert engine: precondition checks and the two-step mutation
//! - [`worktree`] - Parser for `git worktree list --porcelain` output and branch lookup
//! - [`git`] - Subprocess-backed git command runner
//! - [`traits`] - Defines the GitRunner trait for testability and abstraction

pub mod commands;
pub mod detach;
pub mod git;
pub mod traits;
pub mod worktree;

pub use anyhow::Result;
