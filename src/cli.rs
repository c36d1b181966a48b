use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taip")]
#[command(version)]
#[command(about = "Idempotent installer for git repositories and VS Code extensions", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Registry file (default: ~/.config/taip/taip.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List missing items, leaving out previously installed ones
    PrintLatest,

    /// List every missing item
    PrintAll,

    /// Install missing items, leaving out previously installed ones
    InstallLatest,

    /// Install every missing item
    InstallAll,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_reconciliation_subcommands() {
        let parse = |name: &str| Cli::try_parse_from(["taip", name]).unwrap().command;

        assert!(matches!(parse("print-latest"), Command::PrintLatest));
        assert!(matches!(parse("print-all"), Command::PrintAll));
        assert!(matches!(parse("install-latest"), Command::InstallLatest));
        assert!(matches!(parse("install-all"), Command::InstallAll));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["taip", "install-all", "-vv", "--config", "/tmp/r.toml"]).unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/r.toml")));
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["taip", "install-some"]).is_err());
    }
}
