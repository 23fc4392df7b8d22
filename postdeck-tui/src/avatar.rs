use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::api::{ApiError, PostSource};

/// Side length in pixels of a decoded avatar
pub const AVATAR_SIZE: u32 = 12;

#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("Failed to fetch avatar: {0}")]
    Fetch(#[from] ApiError),

    #[error("Failed to decode avatar: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Avatar decode task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Default)]
struct RegistryInner {
    live: AtomicUsize,
    issued: AtomicU64,
}

/// Issues avatar handles and tracks how many are still alive
#[derive(Debug, Clone, Default)]
pub struct AvatarRegistry {
    inner: Arc<RegistryInner>,
}

impl AvatarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles acquired and not yet released
    pub fn live_handles(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Total number of handles ever acquired
    pub fn issued_handles(&self) -> u64 {
        self.inner.issued.load(Ordering::SeqCst)
    }

    /// Take ownership of decoded pixels and hand back a tracked handle
    pub fn acquire(&self, source_url: impl Into<String>, pixels: RgbaImage) -> AvatarHandle {
        let id = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.live.fetch_add(1, Ordering::SeqCst);
        AvatarHandle {
            id,
            source_url: source_url.into(),
            pixels,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Decode raw image bytes, crop to a square and scale to `AVATAR_SIZE`
    pub fn decode(&self, source_url: &str, bytes: &[u8]) -> Result<AvatarHandle, AvatarError> {
        let image = image::load_from_memory(bytes)?;
        let pixels = image
            .resize_to_fill(AVATAR_SIZE, AVATAR_SIZE, FilterType::Triangle)
            .to_rgba8();
        Ok(self.acquire(source_url, pixels))
    }
}

/// Owned, decoded avatar image. Dropping it releases the resource.
pub struct AvatarHandle {
    id: u64,
    source_url: String,
    pixels: RgbaImage,
    registry: Arc<RegistryInner>,
}

impl AvatarHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGBA value at (x, y); out-of-range coordinates read as transparent
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.pixels
            .get_pixel_checked(x, y)
            .copied()
            .unwrap_or(Rgba([0, 0, 0, 0]))
    }
}

impl fmt::Debug for AvatarHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarHandle")
            .field("id", &self.id)
            .field("source_url", &self.source_url)
            .field("size", &(self.pixels.width(), self.pixels.height()))
            .finish()
    }
}

impl Drop for AvatarHandle {
    fn drop(&mut self) {
        self.registry.live.fetch_sub(1, Ordering::SeqCst);
        log::trace!(target: "fetch", "released avatar handle #{} ({})", self.id, self.source_url);
    }
}

/// Fetch an avatar and decode it on the blocking pool
pub async fn resolve_avatar(
    source: &dyn PostSource,
    registry: &AvatarRegistry,
    url: &str,
) -> Result<AvatarHandle, AvatarError> {
    let bytes = source.fetch_avatar(url).await?;
    let registry = registry.clone();
    let url = url.to_string();
    tokio::task::spawn_blocking(move || registry.decode(&url, &bytes)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiResult;
    use async_trait::async_trait;
    use crate::test_utils;
    use postdeck_types::Post;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        test_utils::png_bytes(width, height, [200, 40, 40, 255])
    }

    struct BytesSource(Option<Vec<u8>>);

    #[async_trait]
    impl PostSource for BytesSource {
        async fn fetch_posts(&self) -> ApiResult<Vec<Post>> {
            Ok(Vec::new())
        }

        async fn fetch_avatar(&self, url: &str) -> ApiResult<Vec<u8>> {
            self.0
                .clone()
                .ok_or_else(|| ApiError::NotFound(url.to_string()))
        }
    }

    #[test]
    fn test_decode_scales_to_square() {
        let registry = AvatarRegistry::new();
        let handle = registry.decode("https://img/a.png", &png_bytes(40, 20)).unwrap();

        assert_eq!(handle.width(), AVATAR_SIZE);
        assert_eq!(handle.height(), AVATAR_SIZE);
        let corner = handle.pixel(0, 0);
        assert_eq!(corner[3], 255);
        assert!(corner[0] >= 195 && corner[1] <= 45);
        assert_eq!(handle.pixel(AVATAR_SIZE, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(handle.source_url(), "https://img/a.png");
    }

    #[test]
    fn test_drop_releases_handle() {
        let registry = AvatarRegistry::new();
        let first = registry.decode("a", &png_bytes(4, 4)).unwrap();
        let second = registry.decode("b", &png_bytes(4, 4)).unwrap();

        assert_eq!(registry.live_handles(), 2);
        assert_ne!(first.id(), second.id());

        drop(first);
        assert_eq!(registry.live_handles(), 1);
        drop(second);
        assert_eq!(registry.live_handles(), 0);
        assert_eq!(registry.issued_handles(), 2);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let registry = AvatarRegistry::new();
        let result = registry.decode("bad", b"definitely not an image");

        assert!(matches!(result, Err(AvatarError::Decode(_))));
        assert_eq!(registry.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_resolve_avatar_success() {
        let registry = AvatarRegistry::new();
        let source = BytesSource(Some(png_bytes(8, 8)));

        let handle = resolve_avatar(&source, &registry, "https://img/b.png").await.unwrap();

        assert_eq!(handle.source_url(), "https://img/b.png");
        assert_eq!(registry.live_handles(), 1);
    }

    #[tokio::test]
    async fn test_resolve_avatar_fetch_failure() {
        let registry = AvatarRegistry::new();
        let source = BytesSource(None);

        let result = resolve_avatar(&source, &registry, "https://img/missing.png").await;

        assert!(matches!(result, Err(AvatarError::Fetch(ApiError::NotFound(_)))));
        assert_eq!(registry.issued_handles(), 0);
    }
}
