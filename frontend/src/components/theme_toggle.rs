use super::super::Model;
use super::super::Msg;
use gloo_storage::{LocalStorage, Storage};
use shared::Theme;
use shared::theme::THEME_STORAGE_KEY;
use yew::html::Scope;
use yew::prelude::*;

// The preference is stored as a bare string, not JSON, so go through the raw storage.
pub fn load_theme() -> Theme {
    let stored = LocalStorage::raw().get_item(THEME_STORAGE_KEY).ok().flatten();
    Theme::from_stored(stored.as_deref())
}

pub fn store_theme(theme: Theme) {
    if let Err(e) = LocalStorage::raw().set_item(THEME_STORAGE_KEY, theme.as_ref()) {
        log::warn!("Could not persist theme: {:?}", e);
    }
}

pub fn apply_theme(theme: Theme) {
    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        return;
    };

    if let Err(e) = body.class_list().toggle_with_force("dark-mode", theme.is_dark()) {
        log::warn!("Could not apply theme: {:?}", e);
    }
}

pub fn render_theme_toggle(theme: Theme, link: &Scope<Model>) -> Html {
    html! {
        <button
            id="theme-toggle"
            class="theme-toggle"
            onclick={link.callback(|_| Msg::ToggleTheme)}
            title="Change colour scheme"
        >
            { if theme.is_dark() {
                html! { <img src="https://cdnjs.cloudflare.com/ajax/libs/twemoji/14.0.2/svg/1f319.svg" alt="Dark" class="toggle-icon" /> }
            } else {
                html! { <img src="https://cdnjs.cloudflare.com/ajax/libs/twemoji/14.0.2/svg/2600.svg" alt="Light" class="toggle-icon" /> }
            }}
        </button>
    }
}
