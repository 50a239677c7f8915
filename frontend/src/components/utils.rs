use super::super::{Model, Msg};
use gloo_file::File as GlooFile;
use gloo_timers::callback::Interval;
use shared::progress::TICK_INTERVAL_MS;
use shared::{IncomingFile, RunId, TickHandle};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{FileList, HtmlAnchorElement};
use yew::html::Scope;
use yew::prelude::*;

/// Interval driving the simulated progress of one run.
pub struct ProgressTicker(Interval);

impl ProgressTicker {
    pub fn start(link: Scope<Model>, run: RunId) -> Self {
        Self(Interval::new(TICK_INTERVAL_MS, move || {
            link.send_message(Msg::ProgressTick(run));
        }))
    }
}

impl TickHandle for ProgressTicker {
    fn cancel(self) {
        let _ = self.0.cancel();
    }
}

/// Wraps every entry of a browser file list; MIME filtering happens in the workflow.
pub fn incoming_files(file_list: &FileList) -> Vec<IncomingFile<GlooFile>> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .map(|file| {
            let name = file.name();
            let mime_type = file.type_();
            let file = GlooFile::from(file);
            IncomingFile {
                size: file.size(),
                handle: file,
                name,
                mime_type,
            }
        })
        .collect()
}

/// Saves a data URI through a temporary anchor element.
pub fn trigger_download(data_uri: &str, file_name: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(data_uri);
    anchor.set_download(file_name);
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Ok(())
}

pub fn render_error_message(model: &Model, ctx: &Context<Model>) -> Html {
    if let Some(error_msg) = model.workflow.error() {
        html! {
            <div class="error-message" role="alert">
                <i class="fa-solid fa-circle-exclamation"></i>
                <div>
                    <strong>{"Processing error"}</strong>
                    <p>{ error_msg }</p>
                </div>
                <button
                    class="close-btn"
                    title="Dismiss"
                    onclick={ctx.link().callback(|_| Msg::DismissError)}
                >
                    <i class="fa-solid fa-times"></i>
                </button>
            </div>
        }
    } else {
        html! {}
    }
}
