//! Fixtures shared by unit tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use postdeck_types::{Author, Post, Thumbnail};

use crate::app::{Msg, ViewState};

pub fn post(id: u64, title: &str) -> Post {
    Post {
        id,
        title: title.to_string(),
        content: format!("Content of {}", title),
        thumbnail: Thumbnail {
            small: format!("https://img.example/{}-small.jpg", id),
            large: Some(format!("https://img.example/{}-large.jpg", id)),
        },
        author: None,
        date: None,
    }
}

pub fn post_with_author(id: u64, title: &str, avatar: Option<&str>) -> Post {
    Post {
        author: Some(Author {
            name: format!("Author {}", id),
            role: Some("Writer".to_string()),
            avatar: avatar.map(str::to_string),
        }),
        date: Some(1_700_000_000),
        ..post(id, title)
    }
}

/// A view whose collection has been loaded with `posts`
pub fn loaded_view(posts: Vec<Post>) -> ViewState {
    let (view, _) = ViewState::new().update(Msg::Mount);
    let (view, _) = view.update(Msg::PostsLoaded(Ok(posts)));
    view
}

pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
