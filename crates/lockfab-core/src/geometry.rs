// Author: Dustin Pilgrim
// License: MIT
//
// Monitor geometry as reported by the display server, in the shared
// virtual desktop coordinate space (`<width>x<height>+<x>+<y>`).

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LockfabError;

static DESCRIPTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)x(\d+)([+-]\d+)([+-]\d+)").expect("valid regex"));

static DESCRIPTOR_EXACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)x(\d+)([+-]\d+)([+-]\d+)$").expect("valid regex"));

/// One physical display: pixel size plus its offset on the virtual desktop.
///
/// Width and height are always non-zero; use [`MonitorGeometry::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorGeometry {
    width: u32,
    height: u32,
    x: i32,
    y: i32,
}

impl MonitorGeometry {
    pub fn new(width: u32, height: u32, x: i32, y: i32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height, x, y })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Exclusive right edge in desktop coordinates.
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge in desktop coordinates.
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn overlaps(&self, other: &MonitorGeometry) -> bool {
        i64::from(self.x) < other.right()
            && i64::from(other.x) < self.right()
            && i64::from(self.y) < other.bottom()
            && i64::from(other.y) < self.bottom()
    }

    pub fn contains(&self, px: i64, py: i64) -> bool {
        px >= i64::from(self.x) && px < self.right() && py >= i64::from(self.y) && py < self.bottom()
    }
}

impl fmt::Display for MonitorGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}{:+}{:+}", self.width, self.height, self.x, self.y)
    }
}

impl FromStr for MonitorGeometry {
    type Err = LockfabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || LockfabError::Geometry(s.to_string());

        let caps = DESCRIPTOR_EXACT_RE.captures(s).ok_or_else(bad)?;
        let width = caps[1].parse().map_err(|_| bad())?;
        let height = caps[2].parse().map_err(|_| bad())?;
        let x = caps[3].parse().map_err(|_| bad())?;
        let y = caps[4].parse().map_err(|_| bad())?;

        Self::new(width, height, x, y).ok_or_else(bad)
    }
}

/// Pull every `WxH+X+Y` descriptor out of free-form display-server text.
///
/// Anything that doesn't parse (overflowing numbers, zero sizes) is skipped.
/// Duplicates are kept; they simply composite over each other.
pub fn parse_monitors(text: &str) -> Vec<MonitorGeometry> {
    DESCRIPTOR_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Every pair of monitors that share at least one pixel, in report order.
///
/// Overlapping layouts still composite; later tiles cover earlier ones.
pub fn overlapping_pairs(monitors: &[MonitorGeometry]) -> Vec<(MonitorGeometry, MonitorGeometry)> {
    let mut pairs = Vec::new();
    for (i, a) in monitors.iter().enumerate() {
        for b in &monitors[i + 1..] {
            if a.overlaps(b) {
                pairs.push((*a, *b));
            }
        }
    }
    pairs
}

/// Size of the canvas that holds every monitor at its offset:
/// `(max(x + width), max(y + height))`, never below zero.
pub fn bounding_size(monitors: &[MonitorGeometry]) -> (u32, u32) {
    let w = monitors.iter().map(MonitorGeometry::right).max().unwrap_or(0);
    let h = monitors.iter().map(MonitorGeometry::bottom).max().unwrap_or(0);
    (clamp_u32(w), clamp_u32(h))
}

fn clamp_u32(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}
