use crate::app::{App, Msg};
use crate::log_input;
use crate::ui::hitmap::Target;
use anyhow::Result;
use postdeck_types::PostId;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    log_input!(app.log_config, "key={:?}, phase={:?}", key.code, app.view.phase());

    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Ok(());
    }

    // Priority 1: the modal captures all keys while visible
    if app.view.modal_visible() {
        match key.code {
            KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('q') => app.dispatch(Msg::Close),
            KeyCode::Char('m') => {
                if let Some(post_id) = app.view.selected_post().map(|p| p.id) {
                    app.dispatch(Msg::LearnMore(post_id));
                }
            }
            _ => {}
        }
        return Ok(());
    }

    // Priority 2: card grid
    let len = app.view.posts().len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.grid.left(len),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.grid.right(len),
        KeyCode::Up | KeyCode::Char('k') => app.grid.up(len),
        KeyCode::Down | KeyCode::Char('j') => app.grid.down(len),
        KeyCode::Home => app.grid.focused = 0,
        KeyCode::End => app.grid.focused = len.saturating_sub(1),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(post_id) = focused_post_id(app) {
                app.dispatch(Msg::Open(post_id));
            }
        }
        KeyCode::Char('m') => {
            if let Some(post_id) = focused_post_id(app) {
                app.dispatch(Msg::LearnMore(post_id));
            }
        }
        _ => {}
    }

    Ok(())
}

pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> Result<()> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let target = app.hit_map.resolve(mouse.column, mouse.row);
            log_input!(
                app.log_config,
                "click at ({}, {}) -> {:?}",
                mouse.column,
                mouse.row,
                target
            );
            if let Some(target) = target {
                if let Target::Card(post_id) | Target::LearnMore(post_id) = target {
                    focus_post(app, post_id);
                }
                if let Some(msg) = click_message(target) {
                    app.dispatch(msg);
                }
            }
        }
        MouseEventKind::ScrollDown if !app.view.modal_visible() => {
            app.grid.down(app.view.posts().len());
        }
        MouseEventKind::ScrollUp if !app.view.modal_visible() => {
            app.grid.up(app.view.posts().len());
        }
        _ => {}
    }

    Ok(())
}

/// Message produced by clicking a target. Clicks on the modal body are
/// swallowed so they never reach the backdrop's close handler.
pub fn click_message(target: Target) -> Option<Msg> {
    match target {
        Target::Card(post_id) => Some(Msg::Open(post_id)),
        Target::LearnMore(post_id) => Some(Msg::LearnMore(post_id)),
        Target::ModalClose | Target::Backdrop => Some(Msg::Close),
        Target::ModalBody => None,
    }
}

fn focused_post_id(app: &App) -> Option<PostId> {
    app.view.posts().get(app.grid.focused).map(|p| p.id)
}

fn focus_post(app: &mut App, post_id: PostId) {
    if let Some(index) = app.view.posts().iter().position(|p| p.id == post_id) {
        app.grid.focused = index;
    }
}
