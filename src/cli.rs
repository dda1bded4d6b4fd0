// Command-line interface

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "certwatch",
    about = "Tracks TLS certificate expiry for a set of hostnames and sends reminders",
    version
)]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the HTTP API and the scheduled reminder loop (the default)
    #[arg(long, conflicts_with_all = ["check_now", "remind_now"])]
    pub serve: bool,

    /// Probe every stored hostname once, print the results, and exit
    #[arg(long)]
    pub check_now: bool,

    /// Run a single reminder pass against today's date and exit
    #[arg(long)]
    pub remind_now: bool,

    /// Database connection URL (overrides the config file)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Address for the HTTP API to bind (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port for the HTTP API (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,
}
