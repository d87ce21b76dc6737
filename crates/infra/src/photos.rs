//! Photo files keyed by record id.
//!
//! A missing or unreadable photo is a normal state ("no image"), never an
//! error attached to the record. Only an explicit delete can fail.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use foodrecords_core::FoodId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PhotoFormat {
    Jpeg,
    Png,
    Webp,
}

impl PhotoFormat {
    /// Recognise a format from the file's leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(PhotoFormat::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(PhotoFormat::Png),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(PhotoFormat::Webp)
            }
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "image/jpeg",
            PhotoFormat::Png => "image/png",
            PhotoFormat::Webp => "image/webp",
        }
    }
}

/// A decoded photo ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub format: PhotoFormat,
    pub bytes: Arc<[u8]>,
}

/// What the presentation layer shows for a record's photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoState {
    /// No usable file; render the placeholder.
    Missing,
    Ready(Photo),
}

impl From<Option<Photo>> for PhotoState {
    fn from(photo: Option<Photo>) -> Self {
        photo.map_or(PhotoState::Missing, PhotoState::Ready)
    }
}

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("photo io failed at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PhotoError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Where the photo for `id` lives (whether or not it exists).
    fn path_for(&self, id: &FoodId) -> PathBuf;

    async fn exists(&self, path: &Path) -> bool;

    async fn delete(&self, path: &Path) -> Result<(), PhotoError>;

    /// `None` when the file is missing, unreadable or not a known image.
    async fn decode(&self, path: &Path) -> Option<Photo>;
}

#[async_trait]
impl<P> PhotoStore for Arc<P>
where
    P: PhotoStore + ?Sized,
{
    fn path_for(&self, id: &FoodId) -> PathBuf {
        (**self).path_for(id)
    }

    async fn exists(&self, path: &Path) -> bool {
        (**self).exists(path).await
    }

    async fn delete(&self, path: &Path) -> Result<(), PhotoError> {
        (**self).delete(path).await
    }

    async fn decode(&self, path: &Path) -> Option<Photo> {
        (**self).decode(path).await
    }
}

/// Photos as `<root>/<uuid>.jpg` on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsPhotoStore {
    root: PathBuf,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the photo for `id`, creating the directory if needed.
    pub async fn save(&self, id: &FoodId, bytes: &[u8]) -> Result<PathBuf, PhotoError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PhotoError::io(&self.root, e))?;

        let path = self.path_for(id);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PhotoError::io(&path, e))?;
        Ok(path)
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    fn path_for(&self, id: &FoodId) -> PathBuf {
        self.root.join(format!("{id}.jpg"))
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn delete(&self, path: &Path) -> Result<(), PhotoError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| PhotoError::io(path, e))
    }

    async fn decode(&self, path: &Path) -> Option<Photo> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no photo on disk");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read photo");
                return None;
            }
        };

        let Some(format) = PhotoFormat::sniff(&bytes) else {
            tracing::warn!(path = %path.display(), len = bytes.len(), "unrecognised photo format");
            return None;
        };

        Some(Photo {
            format,
            bytes: Arc::from(bytes),
        })
    }
}
