//! Pure projection of the view model into what the widgets draw.

use postdeck_types::{Post, PostId};

use super::formatting::format_epoch_date;
use crate::app::ViewState;
use crate::avatar::AvatarHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView<'a> {
    pub post_id: PostId,
    pub title: &'a str,
    pub content: &'a str,
    pub thumbnail: &'a str,
    pub zoomed: bool,
    /// `name · role`, or just the name
    pub author_line: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug)]
pub struct ModalView<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub thumbnail: &'a str,
    pub zoomed: bool,
    pub author_name: Option<&'a str>,
    pub avatar: Option<&'a AvatarHandle>,
}

/// One card per post, in the order received
pub fn project_cards(view: &ViewState) -> Vec<CardView<'_>> {
    let zoomed = view.zoom();
    view.posts().iter().map(|post| project_card(post, zoomed)).collect()
}

fn project_card(post: &Post, zoomed: bool) -> CardView<'_> {
    let author_line = post.author.as_ref().map(|author| match &author.role {
        Some(role) if !role.is_empty() => format!("{} · {}", author.name, role),
        _ => author.name.clone(),
    });

    CardView {
        post_id: post.id,
        title: &post.title,
        content: &post.content,
        thumbnail: &post.thumbnail.small,
        zoomed,
        author_line,
        date: post.date.and_then(format_epoch_date),
    }
}

/// The modal overlay, present only while a post is selected
pub fn project_modal(view: &ViewState) -> Option<ModalView<'_>> {
    let post = view.selected_post()?;
    let zoomed = view.zoom();

    let thumbnail = if zoomed {
        post.thumbnail.large.as_deref().unwrap_or(&post.thumbnail.small)
    } else {
        &post.thumbnail.small
    };

    Some(ModalView {
        title: &post.title,
        content: &post.content,
        thumbnail,
        zoomed,
        author_name: post.author.as_ref().map(|a| a.name.as_str()),
        avatar: post.author.as_ref().and_then(|_| view.avatar()),
    })
}
