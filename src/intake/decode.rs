/// File intake
///
/// Reads the selected files and decodes them into stack entries.
/// Every file is read and decoded concurrently, but the results are
/// collected by input position, so entries come back in selection order
/// no matter which decode finishes first.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, RgbaImage};

use super::thumbnail::make_thumbnail;
use crate::error::{Result, StackError};
use crate::state::{EntryId, ImageEntry, SourceFile};

/// A freshly decoded entry and its list-row thumbnail.
///
/// The thumbnail is handed to the view, which keeps the only copy.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub entry: ImageEntry,
    pub thumbnail: RgbaImage,
}

/// A file that could not be turned into an entry
#[derive(Debug, Clone)]
pub struct DecodeFailure {
    pub path: PathBuf,
    /// Cause, without the path
    pub reason: String,
}

impl DecodeFailure {
    fn new(path: PathBuf, error: StackError) -> Self {
        let reason = match error {
            StackError::Io { source, .. } => source.to_string(),
            StackError::Decode { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        Self { path, reason }
    }

    /// Filename only, for the status line
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Outcome of decoding one selection
#[derive(Debug, Clone, Default)]
pub struct DecodeBatch {
    /// Decoded entries, in the order the files were selected
    pub decoded: Vec<Decoded>,
    /// Files that were dropped, in selection order
    pub failed: Vec<DecodeFailure>,
}

/// Decode a selection of image files.
///
/// Fails with `InvalidInput` only when `paths` is empty. Unreadable or
/// undecodable files are left out of `decoded` and reported in `failed`.
pub async fn load_batch(paths: Vec<PathBuf>, thumbnail_size: u32) -> Result<DecodeBatch> {
    if paths.is_empty() {
        return Err(StackError::InvalidInput);
    }

    let tasks: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let handle = tokio::spawn(load_one(path.clone(), thumbnail_size));
            (path, handle)
        })
        .collect();

    let mut batch = DecodeBatch::default();
    for (path, handle) in tasks {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(StackError::Task(e.to_string())),
        };

        match result {
            Ok(decoded) => batch.decoded.push(decoded),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                batch.failed.push(DecodeFailure::new(path, e));
            }
        }
    }

    tracing::info!(
        "Decoded {} images, skipped {}",
        batch.decoded.len(),
        batch.failed.len()
    );

    Ok(batch)
}

/// Read one file and decode it on the blocking pool
async fn load_one(path: PathBuf, thumbnail_size: u32) -> Result<Decoded> {
    let bytes = tokio::fs::read(&path).await.map_err(|source| StackError::Io {
        path: path.clone(),
        source,
    })?;

    tokio::task::spawn_blocking(move || decode_entry(&path, &bytes, thumbnail_size))
        .await
        .map_err(|e| StackError::Task(e.to_string()))?
}

/// Decode raw file bytes into a new entry with a fresh id
pub fn decode_entry(path: &Path, bytes: &[u8], thumbnail_size: u32) -> Result<Decoded> {
    let image: DynamicImage =
        image::load_from_memory(bytes).map_err(|source| StackError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    let thumbnail = make_thumbnail(&image, thumbnail_size);

    Ok(Decoded {
        entry: ImageEntry {
            id: EntryId::new(),
            source: SourceFile::new(path, bytes.len() as u64),
            image: Arc::new(image),
        },
        thumbnail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Stack;
    use image::Rgba;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn names<'a>(entries: impl IntoIterator<Item = &'a ImageEntry>) -> Vec<&'a str> {
        entries
            .into_iter()
            .map(|e| e.source.name.as_str())
            .collect()
    }

    fn entries(batch: DecodeBatch) -> Vec<ImageEntry> {
        batch.decoded.into_iter().map(|d| d.entry).collect()
    }

    #[tokio::test]
    async fn test_empty_selection_is_invalid() {
        let result = load_batch(Vec::new(), 96).await;
        assert!(matches!(result, Err(StackError::InvalidInput)));
    }

    #[tokio::test]
    async fn test_entries_keep_selection_order() {
        let dir = TempDir::new().unwrap();
        // A large first file makes it the slowest decode
        let paths = vec![
            write_png(&dir, "wide.png", 1200, 900),
            write_png(&dir, "square.png", 6, 6),
            write_png(&dir, "tall.png", 3, 4),
        ];

        let batch = load_batch(paths, 96).await.unwrap();

        assert!(batch.failed.is_empty());
        let entries = entries(batch);
        assert_eq!(names(&entries), vec!["wide.png", "square.png", "tall.png"]);
        assert_eq!(entries[0].width(), 1200);
        assert_eq!(entries[0].height(), 900);
        assert_eq!(entries[2].width(), 3);
    }

    #[tokio::test]
    async fn test_bad_files_are_dropped() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"definitely not a png").unwrap();
        let missing = dir.path().join("missing.png");

        let paths = vec![
            write_png(&dir, "a.png", 4, 4),
            broken.clone(),
            missing.clone(),
            write_png(&dir, "b.png", 4, 4),
        ];

        let batch = load_batch(paths, 96).await.unwrap();

        assert_eq!(batch.failed.len(), 2);
        assert_eq!(batch.failed[0].path, broken);
        assert_eq!(batch.failed[0].name(), "broken.png");
        assert_eq!(batch.failed[1].path, missing);
        assert!(!batch.failed[1].reason.contains("missing.png"));
        assert_eq!(names(&entries(batch)), vec!["a.png", "b.png"]);
    }

    #[tokio::test]
    async fn test_batch_appends_after_existing() {
        let dir = TempDir::new().unwrap();
        let first = load_batch(vec![write_png(&dir, "first.png", 4, 4)], 96)
            .await
            .unwrap();
        let stack = Stack::new().append(entries(first));

        let second = load_batch(
            vec![write_png(&dir, "x.png", 4, 4), write_png(&dir, "y.png", 4, 4)],
            96,
        )
        .await
        .unwrap();
        let stack = stack.append(entries(second));

        assert_eq!(names(stack.entries()), vec!["first.png", "x.png", "y.png"]);
    }

    #[test]
    fn test_decode_entry_builds_thumbnail() {
        let mut bytes = Vec::new();
        RgbaImage::new(400, 200)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_entry(Path::new("big.png"), &bytes, 100).unwrap();

        assert_eq!(decoded.entry.source.name, "big.png");
        assert_eq!(decoded.entry.source.len, bytes.len() as u64);
        assert_eq!(decoded.entry.width(), 400);
        assert_eq!(decoded.thumbnail.dimensions(), (100, 50));
    }

    #[test]
    fn test_decode_entry_rejects_garbage() {
        let result = decode_entry(Path::new("junk.jpg"), &[0, 1, 2, 3], 96);
        assert!(matches!(result, Err(StackError::Decode { .. })));
    }

    #[test]
    fn test_failure_reason_drops_path() {
        let error = StackError::Io {
            path: PathBuf::from("/photos/gone.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        let failure = DecodeFailure::new(PathBuf::from("/photos/gone.png"), error);

        assert_eq!(failure.name(), "gone.png");
        assert_eq!(failure.reason, "no such file");
    }
}
