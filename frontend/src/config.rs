use shared::ClientConfig;
use wasm_bindgen::JsValue;

/// Base URL of the upscaling service.
///
/// Taken from `window.CONSTS` published by the host page, then from the
/// `UPSCALER_API_BASE` build variable. Empty means same origin.
pub fn api_base() -> String {
    runtime_config()
        .map(|config| config.host)
        .or_else(|| option_env!("UPSCALER_API_BASE").map(str::to_string))
        .unwrap_or_default()
}

fn runtime_config() -> Option<ClientConfig> {
    let window = web_sys::window()?;
    let consts = js_sys::Reflect::get(&window, &JsValue::from_str("CONSTS")).ok()?;
    if consts.is_undefined() || consts.is_null() {
        return None;
    }

    let json = js_sys::JSON::stringify(&consts).ok()?.as_string()?;
    match serde_json::from_str::<ClientConfig>(&json) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Ignoring malformed window.CONSTS: {}", e);
            None
        }
    }
}
