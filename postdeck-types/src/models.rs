use serde::{Deserialize, Serialize};

/// Identifier assigned to a post by the remote source
pub type PostId = u64;

/// Thumbnail references for a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub small: String,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    /// URL of the author's avatar image
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub thumbnail: Thumbnail,
    #[serde(default)]
    pub author: Option<Author>,
    /// Publication date as epoch seconds
    #[serde(default)]
    pub date: Option<i64>,
}

impl Post {
    /// Avatar URL of the post's author, if both exist
    pub fn avatar_url(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|author| author.avatar.as_deref())
            .filter(|url| !url.is_empty())
    }
}
