use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::client::SlackClient;
use crate::controller::webhooks::{self, CustomerPortal};
use crate::crypto::WebhookSigningKey;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener.
///
/// Webhook signatures are only verified when a signing key is given.
pub fn run(
    listener: TcpListener,
    slack_client: SlackClient,
    signing_key: Option<WebhookSigningKey>,
    customer_portal: CustomerPortal,
) -> anyhow::Result<Server> {
    // Wrap application data
    let slack_client = web::Data::new(slack_client);
    let signing_key = web::Data::new(signing_key);
    let customer_portal = web::Data::new(customer_portal);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(slack_client.clone())
            .app_data(signing_key.clone())
            .app_data(customer_portal.clone())
            .service(health_check)
            .service(webhooks::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
