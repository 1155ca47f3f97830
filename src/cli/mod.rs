//! CLI interface for Salonpanel

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "salonpanel")]
#[command(version)]
#[command(about = "Session handling and role-based routing for the salon admin panel", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new salonpanel.toml configuration file
    Init,

    /// Start the web server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the unverified claims of an access token
    InspectToken {
        /// The access token
        token: String,
    },

    /// Show how the route gate treats a request
    CheckRoute {
        /// Request path, e.g. /admin/organisations
        path: String,

        /// Access token cookie value
        #[arg(long, env = "SALONPANEL_ACCESS_TOKEN")]
        access: Option<String>,

        /// Refresh token cookie value
        #[arg(long, env = "SALONPANEL_REFRESH_TOKEN")]
        refresh: Option<String>,
    },
}
