// Author: Dustin Pilgrim
// License: MIT

pub mod compositor;
pub mod error;
pub mod geometry;
pub mod store;

pub use compositor::{Canvas, CoverFit, DEFAULT_CANVAS_SIZE};
pub use error::{LockfabError, Result};
pub use geometry::MonitorGeometry;
pub use store::{ImageKey, ImageStore};
