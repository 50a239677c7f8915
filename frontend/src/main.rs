mod api;
mod components;
mod config;

use components::handlers;
use components::notifications::{Notification, NotificationKind};
use components::statistics::StatisticsPanel;
use components::utils::ProgressTicker;
use gloo_events::EventListener;
use gloo_file::File as GlooFile;
use gloo_file::callbacks::FileReader;
use gloo_timers::callback::Timeout;
use shared::{IncomingFile, RunError, RunId, SelectionId, Theme, UpscaledImage, Workflow};
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Catalog
    CatalogLoaded(Vec<String>),
    CatalogFailed(String),
    SelectModel(String),

    // File operations
    FilesAdded(Vec<IncomingFile<GlooFile>>),
    PreviewReady(SelectionId, Result<String, String>),
    RemoveFile,

    // Upscale run
    StartProcessing,
    ProgressTick(RunId),
    RunFinished(RunId, Result<UpscaledImage, RunError>),
    DownloadResult,
    DismissError,

    // UI states
    Notify(NotificationKind, String),
    DismissNotification(u64),
    SetDragging(bool),
    ToggleTheme,
    SetAboutOpen(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

// Main component
pub struct Model {
    pub workflow: Workflow<GlooFile, ProgressTicker>,
    pub api_base: String,
    pub theme: Theme,
    pub is_dragging: bool,
    pub about_open: bool,
    pub notifications: Vec<Notification>,
    pub notification_timeouts: HashMap<u64, Timeout>,
    pub next_notification_id: u64,
    pub preview_reader: Option<FileReader>,
    paste_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let api_base = config::api_base();
        log::info!("Upscaler service base: {:?}", api_base);

        let theme = components::theme_toggle::load_theme();
        components::theme_toggle::apply_theme(theme);

        let mut model = Self {
            workflow: Workflow::new(),
            api_base,
            theme,
            is_dragging: false,
            about_open: false,
            notifications: Vec::new(),
            notification_timeouts: HashMap::new(),
            next_notification_id: 0,
            preview_reader: None,
            paste_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        handlers::load_catalog(ctx, model.api_base.clone());
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Catalog
            Msg::CatalogLoaded(models) => handlers::handle_catalog_loaded(self, models),
            Msg::CatalogFailed(error) => handlers::handle_catalog_failed(self, ctx, error),
            Msg::SelectModel(name) => handlers::handle_select_model(self, ctx, name),

            // File operations
            Msg::FilesAdded(files) => handlers::handle_files_added(self, ctx, files),
            Msg::PreviewReady(id, result) => handlers::handle_preview_ready(self, ctx, id, result),
            Msg::RemoveFile => handlers::handle_remove_file(self),

            // Upscale run
            Msg::StartProcessing => handlers::handle_start_processing(self, ctx),
            Msg::ProgressTick(run) => self.workflow.tick(run),
            Msg::RunFinished(run, outcome) => {
                handlers::handle_run_finished(self, ctx, run, outcome)
            }
            Msg::DownloadResult => handlers::handle_download_result(self),
            Msg::DismissError => self.workflow.dismiss_error(),

            // UI states
            Msg::Notify(kind, text) => {
                components::notifications::push_notification(self, ctx, kind, text);
                true
            }
            Msg::DismissNotification(id) => {
                components::notifications::dismiss_notification(self, id)
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::ToggleTheme => handlers::handle_toggle_theme(self),
            Msg::SetAboutOpen(open) => {
                self.about_open = open;
                true
            }

            // Input events
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class={classes!("container", self.theme.as_ref().to_string())}>
                { components::header::render_header(self.theme, link) }
                { components::about_modal::render_about_modal(self.about_open, link) }
                { components::notifications::render_notifications(&self.notifications, link) }

                <main class="main-content">
                    { components::layout::render_title() }
                    <div class="upload-card">
                        { components::upload_section::render_upload_section(self, ctx) }
                        { components::model_selector::render_model_selector(self, ctx) }
                        { components::progress_panel::render_process_button(self, ctx) }
                        { components::utils::render_error_message(self, ctx) }
                        { components::progress_panel::render_progress(self) }
                        { components::results::render_results(self, ctx) }
                    </div>
                    { components::layout::render_features() }
                    <StatisticsPanel api_base={self.api_base.clone()} />
                </main>

                { components::layout::render_footer() }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.workflow.teardown();
        self.preview_reader = None;
        self.notification_timeouts.clear();
        self.paste_listener = None;
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
