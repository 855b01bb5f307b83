use std::time::Duration;

use accounting_client::AccountingApi;
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpResponse, HttpServer};
use log::{info, warn};

use crate::{
    config::{ServerConfig, ServerOptions},
    data_objects::RequestDataError,
    errors::ServerError,
    routes::health,
    webhook_routes::OrderWebhookRoute,
};

/// Order notifications are small; anything bigger than this is not an order.
const MAX_PAYLOAD_SIZE: usize = 10 * 1024;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let api = AccountingApi::new(config.accounting_config.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🧾️ Transaction records will be forwarded to {}", api.endpoint());
    let srv = create_server_instance(config, api)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, api: AccountingApi) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ors::access_log"))
            .app_data(web::Data::new(api.clone()))
            .app_data(web::Data::new(options))
            .app_data(json_config())
            .service(health)
            .service(OrderWebhookRoute::<AccountingApi>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Caps order payloads at 10KB and renders bodies that cannot be deserialized in the same shape
/// as schema validation failures, so the provider sees a single 400 format.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(MAX_PAYLOAD_SIZE).error_handler(|err, _req| {
        warn!("📦️ Could not read request body. {err}");
        let details = vec![err.to_string()];
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(RequestDataError::new(details)),
        )
        .into()
    })
}
