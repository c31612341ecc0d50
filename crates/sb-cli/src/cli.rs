//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sb_core::CategoryFilter;

/// Staking dashboard.
///
/// Loads every staker from the staking contract (or a snapshot file) and
/// prints filtered, sorted, paged views of their staked items.
#[derive(Debug, Parser)]
#[command(name = "sb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Read the ledger from a snapshot file instead of the RPC node.
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the item categories offered by the contract.
    Categories {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show totals across all stakers.
    Summary {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one page of stakers.
    List {
        /// Only stakers holding this category ("all" for no filter).
        #[arg(long, default_value = "all")]
        category: CategoryFilter,

        /// Minimum total staked days.
        #[arg(long, default_value_t = 0)]
        min_days: u32,

        /// Sort order: elapsed-desc, elapsed-asc, count-desc or count-asc.
        #[arg(long, default_value = "elapsed-desc")]
        sort: String,

        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_defaults() {
        let cli = Cli::parse_from(["sb", "list"]);
        let Some(Commands::List {
            category,
            min_days,
            sort,
            page,
            json,
        }) = cli.command
        else {
            panic!("expected list command");
        };
        assert_eq!(category, CategoryFilter::All);
        assert_eq!(min_days, 0);
        assert_eq!(sort, "elapsed-desc");
        assert_eq!(page, 1);
        assert!(!json);
    }

    #[test]
    fn list_parses_category_and_global_flags() {
        let cli = Cli::parse_from([
            "sb",
            "list",
            "--category",
            "Mage",
            "--snapshot",
            "ledger.json",
            "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.snapshot, Some(PathBuf::from("ledger.json")));
        let Some(Commands::List { category, .. }) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(category.to_string(), "Mage");
    }

    #[test]
    fn empty_category_is_rejected() {
        assert!(Cli::try_parse_from(["sb", "list", "--category", " "]).is_err());
    }
}
