use crate::proxy::{MAX_BODY_BYTES, ProxyError, UpstreamProxy};
use actix_files::Files;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use log::error;
use serde::Serialize;
use shared::ClientConfig;
use shared::api::API_PREFIX;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    upstream_configured: bool,
}

pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    frontend_dir: String,
    proxy: Option<UpstreamProxy>,
) {
    let upstream_configured = proxy.is_some();

    cfg.service(web::resource("/consts.js").route(web::get().to(consts_script)))
        .service(web::resource("/health").route(web::get().to(
            move || async move { health(upstream_configured) },
        )));

    if let Some(proxy) = proxy {
        cfg.service(
            web::scope(API_PREFIX)
                .app_data(web::Data::new(proxy))
                .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
                .default_service(web::to(proxy_api)),
        );
    }

    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn consts_script(config: web::Data<ClientConfig>) -> HttpResponse {
    match config.to_script() {
        Ok(script) => HttpResponse::Ok()
            .content_type("application/javascript; charset=utf-8")
            .insert_header((header::CACHE_CONTROL, "no-cache"))
            .body(script),
        Err(e) => {
            error!("Failed to render consts.js: {:?}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to render client configuration".into(),
            })
        }
    }
}

fn health(upstream_configured: bool) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        upstream_configured,
    })
}

async fn proxy_api(
    req: HttpRequest,
    body: web::Bytes,
    proxy: web::Data<UpstreamProxy>,
) -> Result<HttpResponse, ProxyError> {
    proxy.forward(&req, body).await
}
