// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

fn home_or(fallback: &str) -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Where the source and output images live.
///
/// Priority:
/// 1) $LOCKFAB_DIR (if set and non-empty)
/// 2) $XDG_CACHE_HOME/lockfab
/// 3) $HOME/.cache/lockfab
/// 4) /tmp/lockfab
pub fn data_dir() -> PathBuf {
    if let Some(v) = std::env::var_os("LOCKFAB_DIR") {
        let p = PathBuf::from(v);
        if !p.as_os_str().is_empty() {
            return p;
        }
    }

    std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".cache")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("lockfab")
}

pub fn default_config_path() -> PathBuf {
    let dir = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => home_or(".").join(".config"),
    };
    dir.join("lockfab").join("lockfab.rune")
}

pub fn default_log_path(file: &str) -> PathBuf {
    let base = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join("lockfab").join(file)
}

/// Used when the preferred log location can't be written.
pub fn fallback_log_path() -> PathBuf {
    std::env::temp_dir().join("lockfab").join("lockfab.log")
}

pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
