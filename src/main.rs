use clap::{CommandFactory, Parser, ValueHint};
use wt_detach::Result;
use wt_detach::commands::init::Shell;
use wt_detach::commands::{detach, init, revert};
use wt_detach::detach::{Detacher, Options};

#[derive(Parser)]
#[command(name = "git-wt-detach")]
#[command(about = "Temporarily detach a branch that is checked out in another worktree")]
#[command(version)]
pub struct Cli {
    /// Branch name to detach or revert
    #[arg(value_hint = ValueHint::Other)]
    branch: Option<String>,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Revert the temporary detach
    #[arg(short, long)]
    revert: bool,

    /// Force execution even with uncommitted changes
    #[arg(short, long)]
    force: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Print shell integration script (bash, zsh, fish)
    #[arg(long, value_enum, value_name = "SHELL")]
    init: Option<Shell>,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// List branches checked out in worktrees for completion (internal use)
    #[arg(long, hide = true)]
    list_branches: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.init {
        init::generate_shell_integration(shell);
        return Ok(());
    }

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        init::generate_completions(shell, &mut cmd);
        return Ok(());
    }

    let mut detacher = Detacher::new();
    detacher.load_suffix_from_config();

    if cli.list_branches {
        return init::list_branch_completions(&detacher);
    }

    let Some(branch) = cli.branch else {
        anyhow::bail!("branch name is required");
    };

    let opts = Options {
        dry_run: cli.dry_run,
        revert: cli.revert,
        force: cli.force,
        yes: cli.yes,
    };

    if opts.revert {
        revert::run_revert(&detacher, &branch, &opts)
    } else {
        detach::run_detach(&detacher, &branch, &opts)
    }
}
