use super::super::{Model, Msg};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_about_modal(open: bool, link: &Scope<Model>) -> Html {
    if !open {
        return html! {};
    }

    let close = link.callback(|_| Msg::SetAboutOpen(false));
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="modal-backdrop" onclick={close.clone()}>
            <div class="modal" role="dialog" onclick={keep_open}>
                <h2><i class="fa-solid fa-circle-question"></i>{" How it works"}</h2>
                <h3>{"EDSR (Enhanced Deep Super-Resolution)"}</h3>
                <p>
                    {"The service runs EDSR, a deep residual convolutional network trained on pairs of \
                      low- and high-resolution images, to enlarge pictures while restoring detail."}
                </p>
                <h4>{"What it does"}</h4>
                <ul>
                    <li>{"Enlarges images 2x, 3x or 4x"}</li>
                    <li>{"Sharpens fine detail"}</li>
                    <li>{"Reduces noise and compression artefacts"}</li>
                    <li>{"Keeps natural textures and edges"}</li>
                </ul>
                <p>
                    {"Unlike classic interpolation, the network does not just stretch pixels: it \
                      predicts new detail from patterns learned during training."}
                </p>
                <div class="modal-footer">
                    <button class="analyze-btn" onclick={close}>{"Close"}</button>
                </div>
            </div>
        </div>
    }
}
