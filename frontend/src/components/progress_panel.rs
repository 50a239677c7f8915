use super::super::{Model, Msg};
use yew::prelude::*;

pub fn render_process_button(model: &Model, ctx: &Context<Model>) -> Html {
    let workflow = &model.workflow;

    html! {
        <button
            class="analyze-btn process-btn"
            onclick={ctx.link().callback(|_| Msg::StartProcessing)}
            disabled={!workflow.can_submit()}
        >
            {
                if workflow.is_uploading() {
                    html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Uploading file..."}</> }
                } else if workflow.is_processing() {
                    html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Enhancing image..."}</> }
                } else {
                    html! { <><i class="fa-solid fa-wand-magic-sparkles"></i>{" Enhance image"}</> }
                }
            }
        </button>
    }
}

pub fn render_progress(model: &Model) -> Html {
    let workflow = &model.workflow;
    if !workflow.is_processing() {
        return html! {};
    }

    let percent = workflow.progress_percent();
    let (label, tip) = if workflow.is_uploading() {
        ("Uploading image to the server...", "Please wait...")
    } else {
        (
            "Enhancing image...",
            "Processing usually takes 30-50 seconds depending on the image size",
        )
    };

    html! {
        <div class="progress-container">
            <strong>{ label }</strong>
            <div class="meter" role="progressbar" aria-valuenow={percent.to_string()}>
                <div class="meter-fill" style={format!("width: {}%", percent)}></div>
            </div>
            <div class="meter-value">{ format!("{}%", percent) }</div>
            <p class="progress-tip">{ tip }</p>
        </div>
    }
}
