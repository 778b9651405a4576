// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use eventline::{info, warn};

use lockfab_core::ImageStore;

use crate::config;

/// First-run preparation: data dir, black placeholder output, default config.
///
/// Only the placeholder matters for locking, so config problems are logged
/// and skipped.
pub fn prepare(store: &ImageStore, config_path: &Path) -> Result<(), String> {
    store
        .ensure_dir()
        .map_err(|e| format!("create data dir {}: {e}", store.dir().display()))?;

    if store
        .ensure_default_output()
        .map_err(|e| format!("write placeholder output image: {e}"))?
    {
        info!("wrote placeholder output image in {}", store.dir().display());
    }

    match config::write_default_if_missing(config_path) {
        Ok(true) => {
            info!("wrote default config to {}", config_path.display());
        }
        Ok(false) => {}
        Err(e) => {
            warn!("failed to write default config {}: {e}", config_path.display());
        }
    }

    Ok(())
}

/// i3lock needs an X display; say so early, but still try to lock.
pub fn check_session() {
    if std::env::var_os("DISPLAY").is_none() {
        warn!("DISPLAY is not set; i3lock and xrandr will likely fail");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lockfab_core::ImageKey;

    #[test]
    fn prepare_creates_everything_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("data"));
        let cfg_path = dir.path().join("config").join("lockfab.rune");

        prepare(&store, &cfg_path).unwrap();
        assert!(store.exists(ImageKey::Output));
        assert!(cfg_path.is_file());

        let output = std::fs::read(store.path(ImageKey::Output)).unwrap();
        prepare(&store, &cfg_path).unwrap();
        assert_eq!(std::fs::read(store.path(ImageKey::Output)).unwrap(), output);
    }
}
