// Author: Dustin Pilgrim
// License: MIT

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LockfabError>;

#[derive(Debug, Error)]
pub enum LockfabError {
    /// A monitor descriptor that doesn't look like `WxH+X+Y`. Never fatal.
    #[error("invalid monitor geometry: {0:?}")]
    Geometry(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("source image has no pixels")]
    EmptySource,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
