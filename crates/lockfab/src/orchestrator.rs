// Author: Dustin Pilgrim
// License: MIT
//
// Decides what to lock on, and locks. Never touches the network: with
// `random_pic` the refresh is only *started* (detached) before locking on the
// output composited by some earlier run.

use std::path::PathBuf;

use eventline::{debug, info, warn};

use lockfab_core::{ImageKey, ImageStore};

use crate::config::LockfabConfig;
use crate::locker::{LockOptions, Locker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Lock on the current composite; refresh it in the background.
    ImmediateWithRefresh,
    /// Lock on the raw cached source, no fetch, no compositing.
    Static,
}

impl LockMode {
    pub fn from_config(cfg: &LockfabConfig) -> Self {
        if cfg.random_pic {
            LockMode::ImmediateWithRefresh
        } else {
            LockMode::Static
        }
    }
}

pub fn lock_options(cfg: &LockfabConfig) -> LockOptions {
    LockOptions {
        suppress_unlock_indicator: cfg.no_unlock_indicator,
        show_failed_attempts: cfg.show_failed_attempts,
    }
}

/// Image to hand to the locker for `mode`.
pub fn lock_image(mode: LockMode, store: &ImageStore) -> PathBuf {
    match mode {
        LockMode::ImmediateWithRefresh => store.path(ImageKey::Output),
        LockMode::Static if store.exists(ImageKey::Source) => store.path(ImageKey::Source),
        LockMode::Static => {
            warn!("no cached wallpaper yet; locking on the last output image");
            store.path(ImageKey::Output)
        }
    }
}

/// Run one lock session. `start_refresh` is only called in
/// [`LockMode::ImmediateWithRefresh`], and always before the lock.
pub fn run<L, F>(
    cfg: &LockfabConfig,
    store: &ImageStore,
    locker: &L,
    start_refresh: F,
) -> Result<(), String>
where
    L: Locker + ?Sized,
    F: FnOnce(),
{
    let mode = LockMode::from_config(cfg);
    debug!("lock mode: {mode:?}");

    if mode == LockMode::ImmediateWithRefresh {
        start_refresh();
    }

    let image = lock_image(mode, store);
    info!("locking with {}", image.display());

    locker.lock(&image, lock_options(cfg))?;

    info!("unlocked");
    Ok(())
}
