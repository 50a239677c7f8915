use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use reqwest::Client as HttpClient;
use serde::Serialize;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

const FORWARDED_REQUEST_HEADERS: &[&str] = &["content-type", "accept"];
const RETURNED_RESPONSE_HEADERS: &[&str] = &["content-type", "content-disposition"];

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("Invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Unsupported method: {0}")]
    Method(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// Relays `/api/latest/*` calls to the upscaling service.
#[derive(Clone)]
pub struct UpstreamProxy {
    http_client: HttpClient,
    base: Url,
}

impl UpstreamProxy {
    pub fn new(base: Url) -> Self {
        Self::with_client(HttpClient::new(), base)
    }

    pub fn with_client(http_client: HttpClient, base: Url) -> Self {
        Self { http_client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Appends the incoming path and query to the upstream base, keeping any base path prefix.
    pub fn target_url(&self, path: &str, query: &str) -> Result<Url, ProxyError> {
        let prefix = self.base.path().trim_end_matches('/');
        let mut target = self.base.join(&format!("{}{}", prefix, path))?;
        target.set_query((!query.is_empty()).then_some(query));
        Ok(target)
    }

    pub async fn forward(&self, req: &HttpRequest, body: web::Bytes) -> Result<HttpResponse, ProxyError> {
        let request_id = Uuid::new_v4().to_string();
        let target = self.target_url(req.path(), req.query_string())?;
        let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
            .map_err(|_| ProxyError::Method(req.method().to_string()))?;

        log::info!("[{}] {} {} -> {}", request_id, req.method(), req.path(), target);

        let mut upstream = self
            .http_client
            .request(method, target.as_str())
            .header(REQUEST_ID_HEADER, request_id.as_str());

        for name in FORWARDED_REQUEST_HEADERS {
            if let Some(value) = req.headers().get(*name).and_then(|v| v.to_str().ok()) {
                upstream = upstream.header(*name, value);
            }
        }
        if !body.is_empty() {
            upstream = upstream.body(body.to_vec());
        }

        let response = upstream.send().await.map_err(|e| {
            log::error!("[{}] Upstream unreachable: {}", request_id, e);
            ProxyError::Upstream(e)
        })?;

        let status =
            StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        log::info!("[{}] Upstream answered {}", request_id, status);

        let mut builder = HttpResponse::build(status);
        builder.insert_header((REQUEST_ID_HEADER, request_id.clone()));
        for name in RETURNED_RESPONSE_HEADERS {
            if let Some(value) = response.headers().get(*name).and_then(|v| v.to_str().ok()) {
                builder.insert_header((*name, value.to_owned()));
            }
        }

        let bytes = response.bytes().await?;
        Ok(builder.body(bytes.to_vec()))
    }
}
