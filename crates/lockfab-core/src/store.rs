// Author: Dustin Pilgrim
// License: MIT
//
// The two persisted images, shared across runs (and with a concurrently
// starting lock in a later run). Every write is staged into a temp file in
// the same directory and renamed into place, so readers only ever see a
// complete previous image or a complete new one.

use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use tempfile::NamedTempFile;

use crate::compositor::{DEFAULT_CANVAS_SIZE, black_canvas};
use crate::error::{LockfabError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKey {
    /// Last downloaded wallpaper, raw bytes as fetched.
    Source,
    /// Last composited canvas (PNG), what the locker shows.
    Output,
}

impl ImageKey {
    pub fn file_name(self) -> &'static str {
        match self {
            ImageKey::Source => "background.img",
            ImageKey::Output => "out.png",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: ImageKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn exists(&self, key: ImageKey) -> bool {
        self.path(key).is_file()
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Decode the stored image. The format is sniffed from the content,
    /// since the source keeps whatever the remote served.
    pub fn load(&self, key: ImageKey) -> Result<DynamicImage> {
        let img = ImageReader::open(self.path(key))?
            .with_guessed_format()?
            .decode()?;
        Ok(img)
    }

    /// Stage-then-replace. `write` fills a temp file next to the target; the
    /// target is only replaced if `write` returns `Ok`.
    pub fn replace_with<F>(&self, key: ImageKey, write: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> Result<()>,
    {
        self.ensure_dir()?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        write(staged.as_file_mut())?;
        staged.as_file_mut().flush()?;
        staged.as_file().sync_all()?;

        staged
            .persist(self.path(key))
            .map_err(|e| LockfabError::Io(e.error))?;
        Ok(())
    }

    pub fn put_bytes(&self, key: ImageKey, bytes: &[u8]) -> Result<()> {
        self.replace_with(key, |f| {
            f.write_all(bytes)?;
            Ok(())
        })
    }

    /// Encode fully in memory first so an encoder error never touches disk.
    pub fn put_png(&self, key: ImageKey, image: &RgbImage) -> Result<()> {
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        self.put_bytes(key, &buf)
    }

    /// Write the black placeholder output if there is none yet.
    /// Returns whether it was written.
    pub fn ensure_default_output(&self) -> Result<bool> {
        if self.exists(ImageKey::Output) {
            return Ok(false);
        }
        let (w, h) = DEFAULT_CANVAS_SIZE;
        self.put_png(ImageKey::Output, &black_canvas(w, h))?;
        Ok(true)
    }
}
