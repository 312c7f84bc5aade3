use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};
use std::net::TcpListener;

use crate::api::{self, job::JobService};

/// Build the HTTP server on an already-bound listener
///
/// The returned server must be awaited (or spawned) to start serving.
pub fn run(
    service: web::Data<JobService>,
    listener: TcpListener,
    max_payload_size: usize,
    cors_allowed_origins: Vec<String>,
) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(api::cors(&cors_allowed_origins))
            .wrap(api::security_headers())
            .wrap(Logger::default())
            .configure(api::configure(service.clone(), max_payload_size))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
