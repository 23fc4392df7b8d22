//! End-to-end flows through `App` with an in-memory post source.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use postdeck::api::{ApiError, ApiResult, PostSource};
use postdeck::app::{App, AvatarSlot, LoadStatus, Msg, Phase};
use postdeck::avatar::AvatarRegistry;
use postdeck_types::{Author, Post, Thumbnail};

struct MemorySource {
    posts: ApiResult<Vec<Post>>,
    /// url -> (delay, image bytes)
    avatars: HashMap<String, (Duration, Vec<u8>)>,
    post_requests: AtomicUsize,
}

impl MemorySource {
    fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: Ok(posts),
            avatars: HashMap::new(),
            post_requests: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            posts: Err(ApiError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            }),
            avatars: HashMap::new(),
            post_requests: AtomicUsize::new(0),
        }
    }

    fn with_avatar(mut self, url: &str, delay: Duration) -> Self {
        self.avatars.insert(url.to_string(), (delay, png()));
        self
    }
}

#[async_trait]
impl PostSource for MemorySource {
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>> {
        self.post_requests.fetch_add(1, Ordering::SeqCst);
        match &self.posts {
            Ok(posts) => Ok(posts.clone()),
            Err(ApiError::Api { status, message }) => Err(ApiError::Api {
                status: *status,
                message: message.clone(),
            }),
            Err(e) => Err(ApiError::NotFound(e.to_string())),
        }
    }

    async fn fetch_avatar(&self, url: &str) -> ApiResult<Vec<u8>> {
        match self.avatars.get(url) {
            Some((delay, bytes)) => {
                tokio::time::sleep(*delay).await;
                Ok(bytes.clone())
            }
            None => Err(ApiError::NotFound(url.to_string())),
        }
    }
}

fn png() -> Vec<u8> {
    let image = RgbaImage::from_pixel(8, 8, Rgba([90, 90, 90, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn post(id: u64, avatar: Option<&str>) -> Post {
    Post {
        id,
        title: format!("Post {}", id),
        content: "Body".to_string(),
        thumbnail: Thumbnail {
            small: format!("https://img/{}.jpg", id),
            large: None,
        },
        author: avatar.map(|url| Author {
            name: format!("Author {}", id),
            role: None,
            avatar: Some(url.to_string()),
        }),
        date: None,
    }
}

/// Wait for the next completion, failing the test if none arrives
async fn next(app: &mut App) {
    let applied = tokio::time::timeout(Duration::from_secs(5), app.next_completion())
        .await
        .expect("completion should arrive");
    assert!(applied);
}

async fn mounted(source: MemorySource) -> (App, Arc<MemorySource>) {
    let source = Arc::new(source);
    let mut app = App::new(source.clone(), AvatarRegistry::new());
    app.dispatch(Msg::Mount);
    next(&mut app).await;
    (app, source)
}

#[tokio::test]
async fn test_mount_loads_posts_once() {
    let (mut app, source) = mounted(MemorySource::new(vec![post(1, None), post(2, None)])).await;

    assert_eq!(app.view.load_status(), &LoadStatus::Loaded);
    assert_eq!(app.view.posts().len(), 2);

    app.dispatch(Msg::Mount);
    assert_eq!(app.drain_completions(), 0);
    assert_eq!(source.post_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_load_shows_empty_collection() {
    let (app, _) = mounted(MemorySource::failing()).await;

    assert!(app.view.posts().is_empty());
    assert!(matches!(app.view.load_status(), LoadStatus::Failed(_)));
    assert_eq!(app.view.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_open_resolves_avatar_then_close_releases_it() {
    let url = "https://img/a.png";
    let source = MemorySource::new(vec![post(1, Some(url))]).with_avatar(url, Duration::ZERO);
    let (mut app, _) = mounted(source).await;

    app.dispatch(Msg::Open(1));
    next(&mut app).await;

    assert_eq!(app.view.phase(), Phase::Viewing);
    assert_eq!(app.view.avatar().map(|h| h.source_url()), Some(url));
    assert_eq!(app.avatars().live_handles(), 1);

    app.dispatch(Msg::Close);

    assert_eq!(app.view.phase(), Phase::Idle);
    assert_eq!(app.avatars().live_handles(), 0);
}

#[tokio::test]
async fn test_avatar_failure_leaves_modal_usable() {
    let url = "https://img/missing.png";
    let (mut app, _) = mounted(MemorySource::new(vec![post(1, Some(url))])).await;

    app.dispatch(Msg::LearnMore(1));
    next(&mut app).await;

    assert_eq!(app.view.phase(), Phase::Expanded);
    assert!(matches!(app.view.modal().unwrap().avatar(), AvatarSlot::Failed));
    assert_eq!(
        app.view.selected_post().and_then(|p| p.author.as_ref()).map(|a| a.name.as_str()),
        Some("Author 1")
    );
}

#[tokio::test]
async fn test_slow_avatar_for_previous_selection_never_shows() {
    let slow = "https://img/slow.png";
    let fast = "https://img/fast.png";
    let source = MemorySource::new(vec![post(1, Some(slow)), post(2, Some(fast))])
        .with_avatar(slow, Duration::from_millis(300))
        .with_avatar(fast, Duration::ZERO);
    let (mut app, _) = mounted(source).await;

    app.dispatch(Msg::Open(1));
    app.dispatch(Msg::Open(2));

    next(&mut app).await;
    assert_eq!(app.view.avatar().map(|h| h.source_url()), Some(fast));

    next(&mut app).await;
    assert_eq!(
        app.view.avatar().map(|h| h.source_url()),
        Some(fast),
        "late result for post 1 must be discarded"
    );
    assert_eq!(app.view.selected_post().map(|p| p.id), Some(2));
    assert_eq!(app.avatars().live_handles(), 1);
    assert_eq!(app.avatars().issued_handles(), 2);
}

#[tokio::test]
async fn test_avatar_after_close_is_released() {
    let url = "https://img/slow.png";
    let source =
        MemorySource::new(vec![post(1, Some(url))]).with_avatar(url, Duration::from_millis(100));
    let (mut app, _) = mounted(source).await;

    app.dispatch(Msg::Open(1));
    app.dispatch(Msg::Close);
    next(&mut app).await;

    assert_eq!(app.view.phase(), Phase::Idle);
    assert!(app.view.avatar().is_none());
    assert_eq!(app.avatars().live_handles(), 0);
    assert_eq!(app.avatars().issued_handles(), 1);
}
