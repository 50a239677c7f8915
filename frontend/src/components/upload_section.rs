use super::super::Model;
use super::super::Msg;
use super::notifications::NotificationKind;
use super::utils::incoming_files;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_selected_file(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let locked = model.workflow.is_processing();
    let link = ctx.link();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files().as_ref().map(incoming_files).unwrap_or_default();

        input.set_value("");

        if !files.is_empty() {
            Msg::FilesAdded(files)
        } else {
            Msg::Notify(NotificationKind::Warning, "No valid image files selected.".into())
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(move |_: MouseEvent| {
        if locked {
            return;
        }
        if let Some(input) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("file-input"))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                disabled={locked}
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!(
                    "upload-area",
                    model.is_dragging.then_some("drag-over"),
                    locked.then_some("disabled")
                )}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={trigger_file_input}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag an image here, paste it, or click to browse"}</p>
                    <p class="file-types">{"JPG, PNG, WEBP"}</p>
                </div>
            </div>
        </>
    }
}

fn render_selected_file(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(file) = model.workflow.selection() else {
        return html! {};
    };

    html! {
        <div class="selected-file">
            {
                match &file.preview {
                    Some(uri) => html! { <img class="selected-thumb" src={uri.clone()} alt={file.name.clone()} /> },
                    None => html! { <i class="fa-solid fa-spinner fa-spin"></i> },
                }
            }
            <span class="selected-name" title={file.name.clone()}>{ &file.name }</span>
            <button
                class="remove-btn"
                title="Remove this image"
                disabled={model.workflow.is_processing()}
                onclick={ctx.link().callback(|e: MouseEvent| {
                    e.stop_propagation();
                    Msg::RemoveFile
                })}
            >
                <i class="fa-solid fa-times" style="font-size: 10px;"></i>
            </button>
        </div>
    }
}
