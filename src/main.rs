mod archive;
mod cli;
mod config;
mod imap;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

/// Downloads every message of an IMAP account into one file per message.
#[derive(Parser, Debug, Default)]
#[command(version, about)]
pub struct Args {
    /// Config file, defaults to $XDG_CONFIG_HOME/imapdump/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// IMAP server to connect to over TLS
    #[arg(long)]
    host: Option<String>,
    /// Port of the IMAP server [default: 993]
    #[arg(long)]
    port: Option<u16>,
    #[arg(short, long)]
    user: Option<String>,
    /// Directory the archive is written to, created if missing
    #[arg(short, long)]
    destination: Option<PathBuf>,
    /// Mailbox to skip, may be repeated
    #[arg(long, value_name = "MAILBOX")]
    exclude: Vec<String>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(logging::level(args.verbose, args.quiet));

    cli::run(&args)
}
