use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::api::{
    IMAGE_FIELD, MODEL_FIELD, MODELS_PATH, REPORT_PATH, STATISTICS_PATH, UPSCALE_PATH, endpoint,
};
use shared::{HistoryStatistics, ModelsResponse, RunError, UpscaledImage};
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(gloo_net::Error),
    #[error("Server error: {0}")]
    Status(u16),
    #[error("Invalid response body: {0}")]
    Json(#[source] serde_json::Error),
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Json(e),
            other => ApiError::Network(other),
        }
    }
}

pub async fn fetch_models(base: &str) -> Result<Vec<String>, ApiError> {
    let response = Request::get(&endpoint(base, MODELS_PATH)).send().await?;
    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }
    let body = response.json::<ModelsResponse>().await?;
    Ok(body.models)
}

pub async fn fetch_statistics(base: &str) -> Result<HistoryStatistics, ApiError> {
    let response = Request::get(&endpoint(base, STATISTICS_PATH)).send().await?;
    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }
    Ok(response.json::<HistoryStatistics>().await?)
}

pub fn report_url(base: &str) -> String {
    endpoint(base, REPORT_PATH)
}

/// Posts the image and model as one multipart form and decodes the binary reply.
pub async fn upscale(base: &str, file: &GlooFile, model: &str) -> Result<UpscaledImage, RunError> {
    let form_data = web_sys::FormData::new().map_err(js_error)?;
    form_data
        .append_with_blob(IMAGE_FIELD, file.as_ref())
        .map_err(js_error)?;
    form_data.append_with_str(MODEL_FIELD, model).map_err(js_error)?;

    let response = Request::post(&endpoint(base, UPSCALE_PATH))
        .body(form_data)
        .map_err(transport_error)?
        .send()
        .await
        .map_err(transport_error)?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::error!("Upscale request failed with status {}: {}", status, body);
        return Err(RunError::Status(status));
    }

    let content_type = response.headers().get("content-type");
    let bytes = response.binary().await.map_err(transport_error)?;
    Ok(UpscaledImage::from_bytes(&bytes, content_type.as_deref())?)
}

fn js_error(err: JsValue) -> RunError {
    RunError::Transport(format!("{:?}", err))
}

fn transport_error(err: gloo_net::Error) -> RunError {
    RunError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_parse_failures_are_json_errors() {
        let parse_error = serde_json::from_str::<ModelsResponse>("<html>").unwrap_err();
        let err = ApiError::from(gloo_net::Error::SerdeError(parse_error));
        assert!(matches!(err, ApiError::Json(_)));
        assert!(err.to_string().starts_with("Invalid response body"));
    }

    #[test]
    fn transport_failures_stay_network_errors() {
        let err = ApiError::from(gloo_net::Error::GlooError("connection reset".into()));
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.to_string(), "Network error: connection reset");
    }
}
