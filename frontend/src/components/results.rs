use super::super::{Model, Msg};
use shared::Phase;
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let workflow = &model.workflow;
    let Some(result) = workflow.result() else {
        return html! {};
    };

    let original = workflow.selection().and_then(|file| file.preview.clone());
    let finished = workflow.phase() == Phase::Succeeded && workflow.progress_percent() == 100;

    html! {
        <div class="results-container">
            {
                if let Some(original) = original {
                    html! {
                        <div class="comparison">
                            <h3>{ format!("Upscaled result ({})", workflow.selected_model()) }</h3>
                            <div class="image-pair">
                                <figure>
                                    <figcaption>{"Original"}</figcaption>
                                    <img src={original} alt="Original" />
                                </figure>
                                <figure>
                                    <figcaption>{"Upscaled"}</figcaption>
                                    <img src={result.data_uri.clone()} alt="Upscaled" />
                                </figure>
                            </div>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            {
                if finished {
                    html! {
                        <div class="success-message">
                            <i class="fa-solid fa-circle-check"></i>
                            <span>{"Processing complete!"}</span>
                            <span class="elapsed">{ format!("Done in {} s", workflow.elapsed_seconds()) }</span>
                            <button
                                class="analyze-btn"
                                onclick={ctx.link().callback(|_| Msg::DownloadResult)}
                            >
                                <i class="fa-solid fa-download"></i>{" Download"}
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
