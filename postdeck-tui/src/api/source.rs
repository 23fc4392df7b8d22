use async_trait::async_trait;
use postdeck_types::Post;

use super::ApiResult;

/// Remote collaborators the view model fetches from
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch the full post collection
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>>;

    /// Fetch the raw bytes of an avatar image
    async fn fetch_avatar(&self, url: &str) -> ApiResult<Vec<u8>>;
}
