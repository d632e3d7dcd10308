//! Command-line arguments.

use clap::{Parser, Subcommand};
use cheongyak_core::DetailTab;

#[derive(Debug, Parser)]
#[command(name = "cheongyak")]
#[command(about = "Housing subscription (청약) listings from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show a subscription listing
    Show {
        /// Subscription id
        id: String,
        /// Tab to print: common, price, chart, special or schedule
        #[arg(short, long, default_value = "common")]
        tab: DetailTab,
        /// Use the cached copy instead of fetching
        #[arg(long)]
        offline: bool,
    },
    /// Toggle the listing in your interest list
    Like {
        /// Subscription id
        id: String,
    },
    /// List or manage your interest regions
    Regions {
        #[command(subcommand)]
        action: Option<RegionAction>,
    },
    /// Save an access token
    Login {
        token: String,
    },
    /// Forget the saved token
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum RegionAction {
    /// Register an interest region (max 5)
    Add {
        /// 시/도
        city: String,
        /// 군/구
        district: String,
    },
    /// Remove an interest region
    Remove {
        city: String,
        district: String,
    },
    /// List available 시/도
    Cities,
    /// List 군/구 in a 시/도, defaulting to the last one used
    Districts {
        city: Option<String>,
    },
}
