//----------------------------------------------   Order webhook  ----------------------------------------------------

use accounting_client::{TransactionForwarder, TransactionRecord};
use actix_web::{web, HttpResponse};
use log::*;

use crate::{
    config::ServerOptions,
    data_objects::{ForwardSuccess, InternalError, ProbeAck},
    errors::ServerError,
    order::{OrderPayload, WebhookRequest},
    route,
};

route!(order_webhook => Post "/webhook" impl TransactionForwarder);
/// The single request/response cycle of the relay: validate, classify, map, forward.
///
/// The raw payload is never logged; it carries customer emails and payment data. Log lines
/// identify a delivery by its order id and product count only.
pub async fn order_webhook<F>(
    body: web::Json<OrderPayload>,
    forwarder: web::Data<F>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    F: TransactionForwarder,
{
    let payload = body.into_inner();
    if let Err(details) = payload.validate() {
        warn!("📦️ Rejected order notification with {} validation failure(s)", details.len());
        details.iter().for_each(|d| debug!("📦️ Validation failure: {d}"));
        return Err(ServerError::InvalidRequestData(details));
    }
    let order = match payload.classify() {
        WebhookRequest::Probe => {
            info!("📦️ Test probe received and acknowledged. Nothing was forwarded.");
            return Ok(HttpResponse::Ok().json(ProbeAck::received()));
        },
        WebhookRequest::Order(order) => order,
    };
    let product_count = order.product_count();
    let record = TransactionRecord::from(order);
    if record.id.is_empty() {
        warn!("📦️ Order notification has no order ID. Nothing was forwarded.");
        return Err(ServerError::InvalidOrderData("Missing order ID".to_string()));
    }
    debug!("📦️ Forwarding order {} ({product_count} product(s))", record.id);
    match forwarder.forward(&record).await {
        Ok(api_response) => {
            info!("📦️ Order {} forwarded successfully.", record.id);
            Ok(HttpResponse::Ok().json(ForwardSuccess::new(record.id, api_response)))
        },
        Err(e) => {
            error!("📦️ Could not forward order {}. {e}", record.id);
            let details = options.development_mode.then(|| e.to_string());
            Ok(HttpResponse::InternalServerError().json(InternalError::forwarding(details)))
        },
    }
}
