// Author: Dustin Pilgrim
// License: MIT

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use eventline::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockOptions {
    pub suppress_unlock_indicator: bool,
    pub show_failed_attempts: bool,
}

/// The screen-lock action. Blocks until the user unlocks.
pub trait Locker {
    fn lock(&self, image: &Path, opts: LockOptions) -> Result<(), String>;
}

#[derive(Debug, Clone)]
pub struct I3Lock {
    program: String,
}

impl Default for I3Lock {
    fn default() -> Self {
        Self {
            program: "i3lock".into(),
        }
    }
}

/// `-n` keeps i3lock in the foreground so `lock` returns only on unlock.
/// `-e` ignores empty passwords.
pub fn i3lock_args(image: &Path, opts: LockOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-n".into(), "-e".into()];
    if opts.suppress_unlock_indicator {
        args.push("-u".into());
    }
    if opts.show_failed_attempts {
        args.push("-f".into());
    }
    args.push("-i".into());
    args.push(image.as_os_str().to_owned());
    args
}

impl Locker for I3Lock {
    fn lock(&self, image: &Path, opts: LockOptions) -> Result<(), String> {
        let args = i3lock_args(image, opts);
        debug!("running {} {:?}", self.program, args);

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| format!("run {}: {e}", self.program))?;

        // Wrong password retries etc. are i3lock's business; just note it.
        if !status.success() {
            warn!("{} exited with {status}", self.program);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_with_all_options() {
        let opts = LockOptions {
            suppress_unlock_indicator: true,
            show_failed_attempts: true,
        };
        let args = i3lock_args(Path::new("/cache/out.png"), opts);
        assert_eq!(args, ["-n", "-e", "-u", "-f", "-i", "/cache/out.png"].map(OsString::from));
    }

    #[test]
    fn args_without_options() {
        let args = i3lock_args(Path::new("/cache/out.png"), LockOptions::default());
        assert_eq!(args, ["-n", "-e", "-i", "/cache/out.png"].map(OsString::from));
    }

    #[test]
    fn missing_locker_is_reported() {
        let locker = I3Lock {
            program: "lockfab-test-no-such-locker".into(),
        };
        let err = locker
            .lock(Path::new("/nonexistent.png"), LockOptions::default())
            .unwrap_err();
        assert!(err.contains("lockfab-test-no-such-locker"));
    }
}
