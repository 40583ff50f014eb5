/// Shared data structures for the image stack
///
/// These structs represent the data model that flows between
/// the intake layer, the compositor, and the UI layer.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use uuid::Uuid;

/// Opaque identifier of an entry, used only as a stable list key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

/// The file an entry was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path as returned by the file dialog
    pub path: PathBuf,
    /// Filename only (e.g., "beach.jpg")
    pub name: String,
    /// Size of the file in bytes at load time
    pub len: u64,
}

impl SourceFile {
    pub fn new(path: &Path, len: u64) -> Self {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Self {
            path: path.to_path_buf(),
            name,
            len,
        }
    }
}

/// One decoded image in the stack
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub id: EntryId,
    pub source: SourceFile,
    /// Decoded raster, shared with any render that is still in flight
    pub image: Arc<DynamicImage>,
}

impl ImageEntry {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
impl ImageEntry {
    /// Build an entry from an in-memory raster
    pub fn from_rgba(name: &str, image: image::RgbaImage) -> Self {
        Self {
            id: EntryId::new(),
            source: SourceFile::new(Path::new(name), 0),
            image: Arc::new(DynamicImage::ImageRgba8(image)),
        }
    }

    /// Build an entry filled with a single color
    pub fn solid(name: &str, width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_rgba(name, image::RgbaImage::from_pixel(width, height, image::Rgba(color)))
    }
}

impl PartialEq for ImageEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
