use anyhow::Result;
use clap::{Command, ValueEnum};
use clap_complete::{Shell as CompleteShell, generate};
use std::io;

use crate::detach::Detacher;

#[derive(ValueEnum, Clone, Copy)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// Generate shell integration for the specified shell
///
/// The integration scripts complete branch names by calling back into the
/// binary with the hidden `--list-branches` flag, for both the direct command
/// and `git wt-detach`.
pub fn generate_shell_integration(shell: Shell) {
    match shell {
        Shell::Bash => println!("{BASH_INTEGRATION}"),
        Shell::Zsh => println!("{ZSH_INTEGRATION}"),
        Shell::Fish => println!("{FISH_INTEGRATION}"),
    }
}

/// Generate native shell completions using clap
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    let clap_shell = match shell {
        Shell::Bash => CompleteShell::Bash,
        Shell::Zsh => CompleteShell::Zsh,
        Shell::Fish => CompleteShell::Fish,
    };

    generate(
        clap_shell,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

/// Print the branch names currently checked out in worktrees, one per line
///
/// Backs the `--list-branches` completion flag; detached-HEAD worktrees are
/// skipped.
///
/// # Errors
/// Returns an error if the worktree listing fails
pub fn list_branch_completions(detacher: &Detacher) -> Result<()> {
    for wt in detacher.list_worktrees()? {
        if !wt.branch.is_empty() {
            println!("{}", wt.branch);
        }
    }

    Ok(())
}

const BASH_INTEGRATION: &str = r#"# bash completion for git-wt-detach
_git_wt_detach_branches() {
    git-wt-detach --list-branches 2>/dev/null
}

_git_wt_detach() {
    local cur="${COMP_WORDS[COMP_CWORD]}"
    if [[ "$cur" == -* ]]; then
        COMPREPLY=($(compgen -W "--dry-run --revert --force --yes --init --completions --help --version" -- "$cur"))
    else
        COMPREPLY=($(compgen -W "$(_git_wt_detach_branches)" -- "$cur"))
    fi
}

# Complete for direct command
complete -F _git_wt_detach git-wt-detach

# Complete for git subcommand
_git_wt_detach_subcommand() {
    if [[ ${COMP_WORDS[1]} == "wt-detach" ]]; then
        local cur="${COMP_WORDS[COMP_CWORD]}"
        COMPREPLY=($(compgen -W "$(_git_wt_detach_branches)" -- "$cur"))
    fi
}

# Hook into git completion if available
if type _git &>/dev/null; then
    _git_wt_detach_orig_git=$(declare -f _git | tail -n +2)
    _git() {
        if [[ ${COMP_WORDS[1]} == "wt-detach" ]]; then
            _git_wt_detach_subcommand
        else
            eval "${_git_wt_detach_orig_git}"
        fi
    }
fi"#;

const ZSH_INTEGRATION: &str = r#"# zsh completion for git-wt-detach
_git-wt-detach() {
    local -a branches
    branches=(${(f)"$(git-wt-detach --list-branches 2>/dev/null)"})
    _describe 'branch' branches
}

compdef _git-wt-detach git-wt-detach

# Register completion for "git wt-detach"
zstyle ':completion:*:*:git:*' user-commands wt-detach:'Temporarily detach a branch checked out in another worktree'"#;

const FISH_INTEGRATION: &str = r#"# fish completion for git-wt-detach
function __fish_git_wt_detach_branches
    git-wt-detach --list-branches 2>/dev/null
end

complete -c git-wt-detach -f -a '(__fish_git_wt_detach_branches)' -d 'Branch'
complete -c git-wt-detach -s n -l dry-run -d 'Show what would be done without making changes'
complete -c git-wt-detach -s r -l revert -d 'Revert the temporary detach'
complete -c git-wt-detach -s f -l force -d 'Force execution even with uncommitted changes'
complete -c git-wt-detach -s y -l yes -d 'Skip confirmation prompt'
complete -c git-wt-detach -l init -d 'Print shell integration script' -x -a 'bash zsh fish'
complete -c git-wt-detach -l completions -d 'Generate shell completions' -x -a 'bash zsh fish'
complete -c git-wt-detach -l version -d 'Show version'

# git subcommand completion
complete -c git -n '__fish_git_using_command wt-detach' -f -a '(__fish_git_wt_detach_branches)' -d 'Branch'"#;
