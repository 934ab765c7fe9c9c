//! Test support utilities for git-wt-detach integration tests
//!
//! This crate provides shared test helpers for setting up real git
//! repositories with worktrees. It's designed to be used only during
//! development and testing, not published.

pub mod test_env;

// Re-export commonly used items for convenience
pub use test_env::GitTestEnvironment;
