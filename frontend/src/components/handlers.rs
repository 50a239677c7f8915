use super::super::{Model, Msg};
use super::notifications::{NotificationKind, push_notification};
use super::theme_toggle;
use super::utils::{ProgressTicker, incoming_files, trigger_download};
use crate::api;
use gloo_file::File as GlooFile;
use js_sys::Date;
use shared::image_data::download_file_name;
use shared::{IncomingFile, RunError, RunId, RunTicket, SelectionId, UpscaledImage};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

pub fn load_catalog(ctx: &Context<Model>, api_base: String) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::fetch_models(&api_base).await {
            Ok(models) => link.send_message(Msg::CatalogLoaded(models)),
            Err(e) => link.send_message(Msg::CatalogFailed(e.to_string())),
        }
    });
}

pub fn handle_catalog_loaded(model: &mut Model, models: Vec<String>) -> bool {
    model.workflow.load_catalog(models);
    true
}

pub fn handle_catalog_failed(model: &mut Model, ctx: &Context<Model>, error: String) -> bool {
    log::error!("Failed to fetch models: {}", error);
    push_notification(
        model,
        ctx,
        NotificationKind::Error,
        "Could not load the list of models".into(),
    );
    true
}

pub fn handle_select_model(model: &mut Model, ctx: &Context<Model>, name: String) -> bool {
    match model.workflow.select_model(&name) {
        Ok(changed) => changed,
        Err(e) => {
            log::warn!("Model selection rejected: {}", e);
            push_notification(model, ctx, NotificationKind::Warning, e.to_string());
            true
        }
    }
}

pub fn handle_files_added(
    model: &mut Model,
    ctx: &Context<Model>,
    files: Vec<IncomingFile<GlooFile>>,
) -> bool {
    match model.workflow.select_files(files) {
        Ok(accepted) => {
            for name in accepted.skipped {
                log::warn!("Skipping non-image file: {}", name);
                push_notification(
                    model,
                    ctx,
                    NotificationKind::Warning,
                    format!("Skipped non-image file: {}", name),
                );
            }
            start_preview(model, ctx, accepted.id);
        }
        Err(e) => push_notification(model, ctx, NotificationKind::Error, e.to_string()),
    }
    true
}

// Replacing the reader handle aborts a read still running for an older file.
fn start_preview(model: &mut Model, ctx: &Context<Model>, id: SelectionId) {
    let Some(file) = model.workflow.selection().map(|selected| selected.handle.clone()) else {
        return;
    };

    let link = ctx.link().clone();
    let reader = gloo_file::callbacks::read_as_data_url(&file, move |result| {
        link.send_message(Msg::PreviewReady(id, result.map_err(|e| e.to_string())));
    });
    model.preview_reader = Some(reader);
}

pub fn handle_preview_ready(
    model: &mut Model,
    ctx: &Context<Model>,
    id: SelectionId,
    result: Result<String, String>,
) -> bool {
    model.preview_reader = None;
    match result {
        Ok(data_uri) => model.workflow.attach_preview(id, data_uri),
        Err(e) => {
            log::error!("Failed to read preview for {}: {}", id, e);
            push_notification(
                model,
                ctx,
                NotificationKind::Warning,
                "Preview unavailable for the selected image".into(),
            );
            true
        }
    }
}

pub fn handle_remove_file(model: &mut Model) -> bool {
    match model.workflow.remove_file() {
        Ok(removed) => {
            model.preview_reader = None;
            removed
        }
        Err(e) => {
            log::warn!("Remove rejected: {}", e);
            false
        }
    }
}

pub fn handle_start_processing(model: &mut Model, ctx: &Context<Model>) -> bool {
    let link = ctx.link().clone();
    let started = model
        .workflow
        .begin_run(Date::now(), move |run| ProgressTicker::start(link, run));

    match started {
        Ok(ticket) => {
            send_upscale_request(ctx, model.api_base.clone(), ticket);
            true
        }
        Err(e) => {
            log::warn!("Run not started: {}", e);
            false
        }
    }
}

fn send_upscale_request(ctx: &Context<Model>, api_base: String, ticket: RunTicket<GlooFile>) {
    spawn_local({
        let link = ctx.link().clone();

        async move {
            let outcome = api::upscale(&api_base, &ticket.file, &ticket.model).await;
            link.send_message(Msg::RunFinished(ticket.id, outcome));
        }
    });
}

pub fn handle_run_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    run: RunId,
    outcome: Result<UpscaledImage, RunError>,
) -> bool {
    let failure = outcome.as_ref().err().map(ToString::to_string);
    if !model.workflow.complete_run(run, Date::now(), outcome) {
        return false;
    }

    match failure {
        Some(message) => push_notification(
            model,
            ctx,
            NotificationKind::Error,
            format!("Processing failed: {}", message),
        ),
        None => {
            let seconds = model.workflow.elapsed_seconds();
            push_notification(
                model,
                ctx,
                NotificationKind::Success,
                format!("Upscaling finished in {} s", seconds),
            );
        }
    }
    true
}

pub fn handle_download_result(model: &mut Model) -> bool {
    let Some(result) = model.workflow.result() else {
        return false;
    };
    let file_name = download_file_name(model.workflow.selection().map(|f| f.name.as_str()));

    if let Err(e) = trigger_download(&result.data_uri, &file_name) {
        log::error!("Download of {} failed: {:?}", file_name, e);
    }
    false
}

pub fn handle_toggle_theme(model: &mut Model) -> bool {
    model.theme = model.theme.toggled();
    theme_toggle::apply_theme(model.theme);
    theme_toggle::store_theme(model.theme);
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            process_file_list(model, ctx, file_list);
        }
    }

    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            if file_list.length() > 0 {
                event.prevent_default();
                process_file_list(model, ctx, file_list);
                return true;
            }
        }
    }
    false
}

fn process_file_list(model: &Model, ctx: &Context<Model>, file_list: FileList) {
    if model.workflow.is_processing() {
        log::warn!("Ignoring files while a run is in progress");
        return;
    }

    let files = incoming_files(&file_list);
    if !files.is_empty() {
        ctx.link().send_message(Msg::FilesAdded(files));
    }
}
