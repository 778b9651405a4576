// Author: Dustin Pilgrim
// License: MIT
//
// Monitor layout comes from `xrandr` with no arguments: its stdout carries a
// `WxH+X+Y` descriptor for every connected, active output.

use std::io;
use std::process::Command;

use lockfab_core::{LockfabError, Result};

/// Anything that can describe the attached monitors as text.
pub trait DisplaySource {
    fn query(&self) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct Xrandr {
    program: String,
}

impl Default for Xrandr {
    fn default() -> Self {
        Self {
            program: "xrandr".into(),
        }
    }
}

impl DisplaySource for Xrandr {
    fn query(&self) -> Result<String> {
        let out = Command::new(&self.program).output().map_err(|e| {
            LockfabError::Io(io::Error::new(e.kind(), format!("run {}: {e}", self.program)))
        })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(LockfabError::Io(io::Error::other(format!(
                "{} exited with {}: {}",
                self.program,
                out.status,
                stderr.trim()
            ))));
        }

        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}
