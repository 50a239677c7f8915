mod config;
mod proxy;
mod routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use config::ServerConfig;
use proxy::UpstreamProxy;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = ServerConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let client_config = config.client_config();
    if client_config.host.is_empty() {
        log::info!("Browser will call the upscaling service on the same origin");
    } else {
        log::info!("Browser will call the upscaling service at {}", client_config.host);
    }

    let proxy = config.upstream.clone().map(UpstreamProxy::new);
    match &proxy {
        Some(proxy) => log::info!("Proxying /api/latest/* to {}", proxy.base()),
        None => log::warn!("UPSCALER_UPSTREAM_URL is not set; /api/latest/* is not proxied"),
    }

    let frontend_dir = config.frontend_dir.clone();
    log::info!("Serving frontend from {}", frontend_dir);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(client_config.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone(), proxy.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
