use super::super::{Model, Msg};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

pub fn render_model_selector(model: &Model, ctx: &Context<Model>) -> Html {
    let catalog = model.workflow.catalog();
    let selected = model.workflow.selected_model();
    let onchange = ctx.link().callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SelectModel(select.value())
    });

    html! {
        <div class="model-selection">
            <label for="model-select"><strong>{"Model:"}</strong></label>
            <select
                id="model-select"
                onchange={onchange}
                disabled={catalog.is_empty() || model.workflow.is_processing()}
            >
                { for catalog.iter().map(|name| html! {
                    <option value={name.clone()} selected={name == selected}>{ name }</option>
                })}
            </select>
        </div>
    }
}
