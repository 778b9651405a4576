// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lockfab", version, about = "lockfab — lock the screen over a fresh wallpaper.")]
pub struct Args {
    /// Log to stderr (in addition to the log file)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Override log file path (default: $XDG_STATE_HOME/lockfab/lockfab.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Override config path (default: $XDG_CONFIG_HOME/lockfab/lockfab.rune)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Cmd {
    /// Lock now, refreshing the wallpaper in the background (default)
    Lock,

    /// Fetch and composite a new wallpaper without locking
    Refresh,
}

impl Args {
    pub fn command(&self) -> Cmd {
        self.cmd.unwrap_or(Cmd::Lock)
    }
}
