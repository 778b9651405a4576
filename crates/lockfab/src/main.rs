// Author: Dustin Pilgrim
// License: MIT

mod cli;
mod config;
mod displays;
mod fetch;
mod locker;
mod logging;
mod orchestrator;
mod paths;
mod refresh;
mod refresh_guard;
mod setup;

use std::path::Path;

use clap::Parser;
use eventline::{debug, error, info};

use lockfab_core::ImageStore;

use crate::cli::{Args, Cmd};
use crate::config::LockfabConfig;
use crate::locker::I3Lock;

fn main() {
    let args = Args::parse();

    let preferred_log = args
        .log_file
        .clone()
        .unwrap_or_else(|| paths::default_log_path("lockfab.log"));

    // A broken log setup must never stop the screen from locking.
    let log_path = match logging::init_logging(&preferred_log, args.verbose) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("lockfab: failed to init logging: {e}");
            preferred_log
        }
    };

    info!("lockfab starting");
    debug!("verbose={}", args.verbose);

    if let Err(e) = run(args, &log_path) {
        error!("fatal error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args, log_path: &Path) -> Result<(), String> {
    let config_path = args.config.clone().unwrap_or_else(paths::default_config_path);
    let store = ImageStore::new(paths::data_dir());
    logging::log_context(log_path, &store, &config_path);

    // Without the placeholder there may be nothing to lock on; report but go on.
    if let Err(e) = setup::prepare(&store, &config_path) {
        error!("{e}");
    }

    let cfg = match config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load config {} (using defaults): {e}", config_path.display());
            LockfabConfig::default()
        }
    };
    debug!("config: {cfg:?}");

    match args.command() {
        Cmd::Lock => {
            setup::check_session();
            let bg_cfg = cfg.clone();
            let bg_store = store.clone();
            orchestrator::run(&cfg, &store, &I3Lock::default(), move || {
                refresh::spawn_detached(bg_cfg, bg_store)
            })
        }

        Cmd::Refresh => match refresh::run_default(&cfg, &store) {
            Some(_) => Ok(()),
            None => Err("refresh failed (see log)".into()),
        },
    }
}
