use postdeck_types::{Post, PostId};

use crate::api::ApiError;
use crate::avatar::{AvatarError, AvatarHandle};

/// Which of the three interaction states the view is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No selection, modal hidden
    Idle,
    /// Selection set, modal visible, zoom off
    Viewing,
    /// Selection set, modal visible, zoom on
    Expanded,
}

/// Progress of the one-shot post collection load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    NotStarted,
    Loading,
    Loaded,
    Failed(String),
}

/// Avatar resolution state for the open modal
#[derive(Debug)]
pub enum AvatarSlot {
    /// The selected post has no author avatar to fetch
    Absent,
    Pending,
    Ready(AvatarHandle),
    Failed,
}

/// The open modal. Holding the selection here keeps "modal visible"
/// and "post selected" from ever disagreeing.
#[derive(Debug)]
pub struct ModalState {
    post_index: usize,
    zoom: bool,
    generation: u64,
    avatar: AvatarSlot,
}

impl ModalState {
    pub fn zoom(&self) -> bool {
        self.zoom
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn avatar(&self) -> &AvatarSlot {
        &self.avatar
    }
}

/// Inputs to the view model
#[derive(Debug)]
pub enum Msg {
    /// The component became active
    Mount,
    PostsLoaded(Result<Vec<Post>, ApiError>),
    /// Primary card interaction
    Open(PostId),
    /// Secondary "learn more" interaction
    LearnMore(PostId),
    Close,
    AvatarResolved {
        generation: u64,
        result: Result<AvatarHandle, AvatarError>,
    },
}

/// Avatar fetch requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRequest {
    pub generation: u64,
    pub post_id: PostId,
    pub url: String,
}

/// Side effects a transition asks the runtime to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPosts,
    FetchAvatar(AvatarRequest),
}

/// Everything the renderer needs to draw a frame
#[derive(Debug, Default)]
pub struct ViewState {
    posts: Vec<Post>,
    load_status: LoadStatus,
    modal: Option<ModalState>,
    next_generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one message, returning the next state and the effects to run.
    /// Handles dropped along with the old state are released.
    pub fn update(mut self, msg: Msg) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        match msg {
            Msg::Mount => {
                if self.load_status == LoadStatus::NotStarted {
                    self.load_status = LoadStatus::Loading;
                    effects.push(Effect::FetchPosts);
                }
            }
            Msg::PostsLoaded(result) => {
                // The collection is written once; late or repeated results are ignored
                if self.load_status == LoadStatus::Loading {
                    self.load_status = match result {
                        Ok(posts) => {
                            self.posts = posts;
                            LoadStatus::Loaded
                        }
                        Err(e) => {
                            self.posts.clear();
                            LoadStatus::Failed(e.to_string())
                        }
                    };
                }
            }
            Msg::Open(post_id) => {
                if let Some(index) = self.index_of(post_id) {
                    // Zoom is sticky while the modal stays open
                    let zoom = self.modal.as_ref().is_some_and(|m| m.zoom);
                    effects.extend(self.select(index, zoom));
                }
            }
            Msg::LearnMore(post_id) => {
                if let Some(index) = self.index_of(post_id) {
                    effects.extend(self.select(index, true));
                }
            }
            Msg::Close => {
                self.modal = None;
            }
            Msg::AvatarResolved { generation, result } => {
                if let Some(modal) = self.modal.as_mut().filter(|m| m.generation == generation) {
                    modal.avatar = match result {
                        Ok(handle) => AvatarSlot::Ready(handle),
                        Err(_) => AvatarSlot::Failed,
                    };
                }
                // A superseded result is dropped here, releasing its handle
            }
        }

        (self, effects)
    }

    /// Select the post at `index`, open the modal and start a new avatar generation
    fn select(&mut self, index: usize, zoom: bool) -> Option<Effect> {
        let post_id = self.posts[index].id;
        let avatar_url = self.posts[index].avatar_url().map(str::to_string);

        self.next_generation += 1;
        let generation = self.next_generation;

        let avatar = match (avatar_url.is_some(), self.modal.take()) {
            (false, _) => AvatarSlot::Absent,
            // Same post stays selected, so its resolved avatar remains valid
            // until the new request replaces or clears it
            (
                true,
                Some(ModalState {
                    post_index,
                    avatar: AvatarSlot::Ready(handle),
                    ..
                }),
            ) if post_index == index => AvatarSlot::Ready(handle),
            (true, _) => AvatarSlot::Pending,
        };

        self.modal = Some(ModalState {
            post_index: index,
            zoom,
            generation,
            avatar,
        });

        avatar_url.map(|url| {
            Effect::FetchAvatar(AvatarRequest {
                generation,
                post_id,
                url,
            })
        })
    }

    fn index_of(&self, post_id: PostId) -> Option<usize> {
        self.posts.iter().position(|p| p.id == post_id)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn modal(&self) -> Option<&ModalState> {
        self.modal.as_ref()
    }

    pub fn phase(&self) -> Phase {
        match &self.modal {
            None => Phase::Idle,
            Some(modal) if modal.zoom => Phase::Expanded,
            Some(_) => Phase::Viewing,
        }
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.modal.as_ref().and_then(|m| self.posts.get(m.post_index))
    }

    pub fn modal_visible(&self) -> bool {
        self.modal.is_some()
    }

    pub fn zoom(&self) -> bool {
        self.modal.as_ref().is_some_and(|m| m.zoom)
    }

    /// The resolved avatar for the current selection, if any
    pub fn avatar(&self) -> Option<&AvatarHandle> {
        match self.modal.as_ref().map(|m| &m.avatar) {
            Some(AvatarSlot::Ready(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Whether a completion for `generation` would still be applied
    pub fn is_current_avatar(&self, generation: u64) -> bool {
        self.modal.as_ref().is_some_and(|m| m.generation == generation)
    }
}

/// Keyboard focus and scrolling over the card grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridState {
    pub focused: usize,
    /// First visible card row
    pub scroll_row: usize,
    /// Columns used by the last rendered frame
    pub columns: usize,
}

impl GridState {
    fn columns(&self) -> usize {
        self.columns.max(1)
    }

    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.focused = 0;
            return;
        }
        let target = self.focused as isize + delta;
        self.focused = target.clamp(0, len as isize - 1) as usize;
    }

    pub fn left(&mut self, len: usize) {
        self.move_by(-1, len);
    }

    pub fn right(&mut self, len: usize) {
        self.move_by(1, len);
    }

    pub fn up(&mut self, len: usize) {
        self.move_by(-(self.columns() as isize), len);
    }

    pub fn down(&mut self, len: usize) {
        self.move_by(self.columns() as isize, len);
    }

    /// Adjust `scroll_row` so the focused card's row is within `visible_rows`
    pub fn ensure_visible(&mut self, columns: usize, visible_rows: usize) {
        self.columns = columns.max(1);
        let row = self.focused / self.columns;
        let visible_rows = visible_rows.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + visible_rows {
            self.scroll_row = row + 1 - visible_rows;
        }
    }
}
