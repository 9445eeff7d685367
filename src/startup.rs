use actix_web::{dev::Server, middleware::NormalizePath, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::{
    middlewares::{idempotency::{Idempotency, IdempotencyStore}, security_headers::security_headers},
    routes::configure_routes,
    AppState,
};

/// Builds the HTTP server on an already bound listener.
///
/// Middleware order, outermost first: request tracing, security headers,
/// path normalisation, idempotency replay.
pub fn run(
    listener: TcpListener,
    state: web::Data<AppState>,
    idempotency: IdempotencyStore,
    workers: usize,
) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Idempotency::new(idempotency.clone()))
            .wrap(NormalizePath::trim())
            .wrap(security_headers())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .listen(listener)?
    .workers(workers)
    .disable_signals()
    .run();

    Ok(server)
}
