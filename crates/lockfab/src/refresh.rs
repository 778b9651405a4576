// Author: Dustin Pilgrim
// License: MIT
//
// Background refresh: fetch a new wallpaper, composite it for the monitors
// attached *now*, and leave it as the output for the next lock.
//
// The current lock never waits for this. Whatever happens here is only seen
// by a later run, and every failure stops at `run_guarded`.

use std::thread;

use eventline::{debug, error, info, warn};

use lockfab_core::geometry::{overlapping_pairs, parse_monitors};
use lockfab_core::{ImageKey, ImageStore, LockfabError, Result, compositor};

use crate::config::LockfabConfig;
use crate::displays::{DisplaySource, Xrandr};
use crate::fetch::{HttpImageSource, ImageSource};
use crate::refresh_guard::{GuardError, RefreshGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered { width: u32, height: u32 },
    /// New source stored, but no monitors were reported; output left as is.
    NoMonitors,
    /// Another refresh holds the guard.
    Busy,
}

pub fn refresh_once(
    cfg: &LockfabConfig,
    store: &ImageStore,
    displays: &dyn DisplaySource,
    images: &dyn ImageSource,
) -> Result<RefreshOutcome> {
    let _guard = match RefreshGuard::acquire(store.dir()) {
        Ok(g) => g,
        Err(e @ GuardError::AlreadyRunning(_)) => {
            debug!("{e}");
            return Ok(RefreshOutcome::Busy);
        }
        Err(GuardError::Io(e)) => return Err(LockfabError::Io(e)),
    };

    let url = images.find_image_url(&cfg.url)?;
    info!("fetching wallpaper {url}");

    let bytes = images.fetch(&url)?;
    debug!("downloaded {} bytes", bytes.len());

    // Don't let an error page replace a good cached source.
    let source = image::load_from_memory(&bytes)?;
    store.put_bytes(ImageKey::Source, &bytes)?;

    // Monitors are re-queried here, not remembered from an earlier run.
    let layout = displays.query()?;
    let monitors = parse_monitors(&layout);
    if monitors.is_empty() {
        warn!("no monitors found; keeping previous output image");
        return Ok(RefreshOutcome::NoMonitors);
    }
    for m in &monitors {
        debug!("monitor {m}");
    }
    for (a, b) in overlapping_pairs(&monitors) {
        warn!("monitors {a} and {b} overlap; {b} is drawn on top");
    }

    let (width, height) = compositor::compose_into(store, &source, &monitors)?;
    Ok(RefreshOutcome::Rendered { width, height })
}

/// The one error boundary of the refresh task: log and discard.
pub fn run_guarded(
    cfg: &LockfabConfig,
    store: &ImageStore,
    displays: &dyn DisplaySource,
    images: &dyn ImageSource,
) -> Option<RefreshOutcome> {
    match refresh_once(cfg, store, displays, images) {
        Ok(outcome) => {
            match outcome {
                RefreshOutcome::Rendered { width, height } => {
                    info!("wallpaper refreshed ({width}x{height}) for next lock");
                }
                RefreshOutcome::NoMonitors => {
                    info!("wallpaper source refreshed");
                }
                RefreshOutcome::Busy => {
                    warn!("another refresh is in progress; skipping");
                }
            }
            Some(outcome)
        }
        Err(e) => {
            error!("background refresh failed: {e}");
            None
        }
    }
}

/// Refresh with the real collaborators. The HTTP client is built here so
/// nothing network-related ever runs on the lock path.
pub fn run_default(cfg: &LockfabConfig, store: &ImageStore) -> Option<RefreshOutcome> {
    let images = match HttpImageSource::new(&cfg.proxies) {
        Ok(s) => s,
        Err(e) => {
            error!("background refresh failed: {e}");
            return None;
        }
    };
    run_guarded(cfg, store, &Xrandr::default(), &images)
}

/// Start a detached refresh. No handle is returned: it is never joined or
/// cancelled, and if the process exits first its result is simply lost.
pub fn spawn_detached(cfg: LockfabConfig, store: ImageStore) {
    let spawned = thread::Builder::new()
        .name("lockfab-refresh".into())
        .spawn(move || {
            run_default(&cfg, &store);
        });

    if let Err(e) = spawned {
        warn!("failed to start background refresh: {e}");
    }
}
