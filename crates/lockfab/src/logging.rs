// Author: Dustin Pilgrim
// License: MIT

use std::fs::OpenOptions;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::task::{Context, Poll, Waker};

use eventline::runtime::{self, LogLevel};
use eventline::{debug, info};

use lockfab_core::ImageStore;

use crate::paths::{self, ensure_parent_dir};

/// The log file doubles as the diagnostic record for background refresh
/// failures, so file output is always on; the console only with `verbose`.
///
/// Returns the file actually logged to: `preferred`, or the temp-dir fallback
/// when `preferred` can't be written.
pub fn init_logging(preferred: &Path, verbose: bool) -> Result<PathBuf, String> {
    let log_path = writable_log_path(preferred, &paths::fallback_log_path())?;

    block_on(runtime::init());

    runtime::enable_file_output(&log_path).map_err(|e| format!("enable file output: {e}"))?;

    runtime::enable_console_output(verbose);
    runtime::enable_console_color(verbose);

    runtime::set_log_level(if verbose { LogLevel::Debug } else { LogLevel::Info });

    Ok(log_path)
}

/// One startup record of where lockfab reads and writes, so a later
/// "why is my lock screen still black" can be answered from the log alone.
pub fn log_context(log_path: &Path, store: &ImageStore, config_path: &Path) {
    info!("log file={}", log_path.display());
    info!("data dir={}", store.dir().display());
    info!("config={}", config_path.display());
    debug!(
        "DISPLAY={} XDG_SESSION_TYPE={}",
        env_or_unset("DISPLAY"),
        env_or_unset("XDG_SESSION_TYPE")
    );
    debug!("background refresh failures are recorded here only");
}

fn env_or_unset(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| "<unset>".into())
}

fn writable_log_path(preferred: &Path, fallback: &Path) -> Result<PathBuf, String> {
    let first_err = match open_for_append(preferred) {
        Ok(()) => return Ok(preferred.to_path_buf()),
        Err(e) => e,
    };

    open_for_append(fallback)
        .map(|()| fallback.to_path_buf())
        .map_err(|e| {
            format!(
                "no writable log file ({}: {first_err}; {}: {e})",
                preferred.display(),
                fallback.display()
            )
        })
}

fn open_for_append(path: &Path) -> std::io::Result<()> {
    ensure_parent_dir(path)?;
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

// -------------------- tiny async runner (no new deps) --------------------

fn block_on<F: Future>(fut: F) -> F::Output {
    let mut cx = Context::from_waker(Waker::noop());
    let mut fut = pin!(fut);

    loop {
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(v) => return v,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}
