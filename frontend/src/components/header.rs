use super::super::{Model, Msg};
use super::theme_toggle::render_theme_toggle;
use shared::Theme;
use yew::html::Scope;
use yew::prelude::*;

/// Renders the application header
pub fn render_header(theme: Theme, link: &Scope<Model>) -> Html {
    html! {
        <header class="app-header">
            <div class="logo">
                <h1><span class="logo-text">{"AI"}</span><span class="logo-highlight">{"Upscaler"}</span></h1>
                <p class="subtitle">{"AI-powered Image Upscaler"}</p>
            </div>
            <div class="top-right">
                <button
                    class="how-it-works-btn"
                    onclick={link.callback(|_| Msg::SetAboutOpen(true))}
                >
                    <i class="fa-solid fa-circle-question"></i>{" How it works"}
                </button>
                { render_theme_toggle(theme, link) }
            </div>
        </header>
    }
}
