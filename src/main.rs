use clap::{Args, Parser, Subcommand};
use qxrename::cli::{RenameCommand, RenameRule, run_cli_with_config};
use qxrename::models::RenameMode;
use std::path::PathBuf;
use std::process::ExitCode;

/// Batch-rename files and folders with a replace, wildcard or regex rule.
#[derive(Parser, Debug)]
#[command(name = "qxrename", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the rename plan without changing anything
    Preview {
        #[command(flatten)]
        rule: RuleArgs,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename every ready item of the plan
    Apply {
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Revert the last applied rename in a directory
    Undo {
        /// Directory the renames were applied in
        root: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RuleArgs {
    /// Directory whose entries are renamed
    root: PathBuf,
    /// Text, wildcard or regular expression to match
    #[arg(short, long)]
    pattern: String,
    /// Replacement text (`*` is the name stem in wildcard mode, `$1` a group in regex mode)
    #[arg(short = 'w', long, default_value = "")]
    replacement: String,
    /// replace, wildcard or regex
    #[arg(short, long)]
    mode: Option<RenameMode>,
    /// Walk the whole subtree
    #[arg(short, long)]
    recursive: bool,
    /// Include folders
    #[arg(long)]
    folders: bool,
    /// Leave files out
    #[arg(long)]
    no_files: bool,
    /// Configuration file to use instead of the default lookup
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RuleArgs {
    fn into_rule(self) -> (RenameRule, PathBuf, Option<PathBuf>) {
        let rule = RenameRule {
            mode: self.mode,
            pattern: self.pattern,
            replacement: self.replacement,
            recursive: self.recursive.then_some(true),
            include_files: self.no_files.then_some(false),
            include_folders: self.folders.then_some(true),
        };
        (rule, self.root, self.config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (command, root, config) = match cli.command {
        Commands::Preview { rule, json } => {
            let (rule, root, config) = rule.into_rule();
            (RenameCommand::Preview { rule, json }, root, config)
        }
        Commands::Apply { rule } => {
            let (rule, root, config) = rule.into_rule();
            (RenameCommand::Apply { rule }, root, config)
        }
        Commands::Undo { root } => (RenameCommand::Undo, root, None),
    };

    match run_cli_with_config(command, &root, config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
