use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use postdeck_types::ColorScheme;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::PostSource;
use crate::avatar::{resolve_avatar, AvatarRegistry};
use crate::logging::LogConfig;
use crate::ui::hitmap::HitMap;
use crate::{log_fetch, log_transition};

pub mod state;
pub use state::*;
pub mod handlers;


/// Main application state
pub struct App {
    pub running: bool,
    pub view: ViewState,
    pub grid: GridState,
    /// Clickable regions of the last rendered frame
    pub hit_map: HitMap,
    pub color_scheme: ColorScheme,
    pub log_config: LogConfig,
    source: Arc<dyn PostSource>,
    avatars: AvatarRegistry,
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,
}

impl App {
    pub fn new(source: Arc<dyn PostSource>, avatars: AvatarRegistry) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            view: ViewState::new(),
            grid: GridState::default(),
            hit_map: HitMap::default(),
            color_scheme: ColorScheme::Default,
            log_config: LogConfig::default(),
            source,
            avatars,
            tx,
            rx,
        }
    }

    pub fn avatars(&self) -> &AvatarRegistry {
        &self.avatars
    }

    /// Feed a message through the view model and start any resulting effects.
    /// Effects are spawned, so this must run inside a tokio runtime.
    pub fn dispatch(&mut self, msg: Msg) {
        self.report(&msg);

        let before = self.view.phase();
        let (view, effects) = std::mem::take(&mut self.view).update(msg);
        self.view = view;
        let after = self.view.phase();

        if before != after {
            log_transition!(
                self.log_config,
                "{:?} -> {:?}, selected={:?}",
                before,
                after,
                self.view.selected_post().map(|p| p.id)
            );
        }

        if self.grid.focused >= self.view.posts().len() {
            self.grid.focused = self.view.posts().len().saturating_sub(1);
        }

        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Log fetch outcomes before the view model consumes them
    fn report(&self, msg: &Msg) {
        match msg {
            Msg::PostsLoaded(Ok(posts)) => {
                log_fetch!(self.log_config, "Loaded {} posts", posts.len());
            }
            Msg::PostsLoaded(Err(e)) => {
                log::error!("Error fetching posts: {}", e);
            }
            Msg::AvatarResolved { generation, result } => {
                if !self.view.is_current_avatar(*generation) {
                    log_fetch!(
                        self.log_config,
                        "Discarding superseded avatar result (generation {})",
                        generation
                    );
                } else if let Err(e) = result {
                    log::error!("Error fetching author image: {}", e);
                }
            }
            _ => {}
        }
    }

    fn run_effect(&self, effect: Effect) {
        let tx = self.tx.clone();
        let source = Arc::clone(&self.source);

        match effect {
            Effect::FetchPosts => {
                log_fetch!(self.log_config, "Fetching posts");
                tokio::spawn(async move {
                    let result = source.fetch_posts().await;
                    let _ = tx.send(Msg::PostsLoaded(result));
                });
            }
            Effect::FetchAvatar(request) => {
                log_fetch!(
                    self.log_config,
                    "Fetching avatar for post {} (generation {}): {}",
                    request.post_id,
                    request.generation,
                    request.url
                );
                let registry = self.avatars.clone();
                tokio::spawn(async move {
                    let result = resolve_avatar(source.as_ref(), &registry, &request.url).await;
                    let _ = tx.send(Msg::AvatarResolved {
                        generation: request.generation,
                        result,
                    });
                });
            }
        }
    }

    /// Apply every completion that has already arrived. Returns how many were applied.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.dispatch(msg);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it
    pub async fn next_completion(&mut self) -> bool {
        match self.rx.recv().await {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        handlers::handle_key_event(self, key)
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        handlers::handle_mouse_event(self, mouse)
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
