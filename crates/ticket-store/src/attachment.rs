//! Attachment storage.
//!
//! The core never inspects attachment content. It only keeps the
//! [`MediaRef`] returned here, whose `kind` tells the presentation layer
//! whether to render an image, a video, or a download link.

use std::collections::HashMap;

use async_trait::async_trait;
use ticket_core::{MediaKind, MediaRef};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// Default upload limit (10 MiB).
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// A stored attachment blob with its reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub media: MediaRef,
    pub bytes: Vec<u8>,
}

/// Storage for uploaded attachment blobs.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Store a blob and return a stable reference to it.
    async fn put(&self, filename: &str, content_type: &str, bytes: Vec<u8>) -> Result<MediaRef>;

    /// Fetch a blob and its reference.
    async fn get(&self, id: &str) -> Result<Attachment>;

    /// Look up just the reference.
    async fn media_ref(&self, id: &str) -> Result<MediaRef> {
        Ok(self.get(id).await?.media)
    }
}

/// Attachments held in memory.
#[derive(Debug)]
pub struct MemoryAttachmentStore {
    blobs: RwLock<HashMap<String, Attachment>>,
    max_bytes: usize,
}

impl MemoryAttachmentStore {
    pub fn new() -> Self {
        Self::with_max_bytes(DEFAULT_MAX_ATTACHMENT_BYTES)
    }

    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

impl Default for MemoryAttachmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    async fn put(&self, filename: &str, content_type: &str, bytes: Vec<u8>) -> Result<MediaRef> {
        if bytes.len() > self.max_bytes {
            return Err(StoreError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        let content_type = if content_type.trim().is_empty() {
            "application/octet-stream".to_string()
        } else {
            content_type.trim().to_string()
        };

        let media = MediaRef {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            kind: MediaKind::from_content_type(&content_type),
            content_type,
            size: bytes.len() as u64,
        };

        tracing::debug!(id = %media.id, size = media.size, kind = ?media.kind, "Stored attachment");

        self.blobs.write().await.insert(
            media.id.clone(),
            Attachment {
                media: media.clone(),
                bytes,
            },
        );

        Ok(media)
    }

    async fn get(&self, id: &str) -> Result<Attachment> {
        self.blobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Attachment",
                id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryAttachmentStore::new();
        let media = store
            .put("sink.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(media.kind, MediaKind::Image);
        assert_eq!(media.size, 3);

        let attachment = store.get(&media.id).await.unwrap();
        assert_eq!(attachment.bytes, vec![1, 2, 3]);
        assert_eq!(attachment.media, media);
        assert_eq!(store.media_ref(&media.id).await.unwrap(), media);
    }

    #[tokio::test]
    async fn test_missing_content_type_defaults() {
        let store = MemoryAttachmentStore::new();
        let media = store.put("notes.bin", "  ", vec![0]).await.unwrap();
        assert_eq!(media.content_type, "application/octet-stream");
        assert_eq!(media.kind, MediaKind::Other);
    }

    #[tokio::test]
    async fn test_size_limit() {
        let store = MemoryAttachmentStore::with_max_bytes(4);
        let result = store.put("clip.mp4", "video/mp4", vec![0; 5]).await;
        assert!(matches!(result, Err(StoreError::TooLarge { size: 5, max: 4 })));

        let media = store.put("clip.mp4", "video/mp4", vec![0; 4]).await.unwrap();
        assert_eq!(media.kind, MediaKind::Video);
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let store = MemoryAttachmentStore::new();
        let result = store.get("missing").await;
        assert!(matches!(
            result,
            Err(StoreError::NotFound { entity: "Attachment", .. })
        ));
    }
}
