mod client;
mod error;
mod source;

pub use client::{ApiClient, DEFAULT_POSTS_ENDPOINT};
pub use error::{ApiError, ApiResult};
pub use source::PostSource;
