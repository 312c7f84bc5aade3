pub mod health;
pub mod job;
pub mod validation;

use actix_cors::Cors;
use actix_web::{http::Method, middleware::DefaultHeaders, web};
use tracing::debug;

use crate::api::{health::health_config, job::JobService, job::handlers::job_config};

/// Register shared app data and every route
pub fn configure(
    service: web::Data<JobService>,
    max_payload_size: usize,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |config: &mut web::ServiceConfig| {
        config
            .app_data(service)
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config(max_payload_size));
        health_config(config);
        job_config(config);
    }
}

/// Cross-origin policy for browser clients
///
/// An empty list allows any origin; otherwise only the listed origins
/// may call the API.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.is_empty() {
        cors = cors.allow_any_origin();
        debug!("CORS: Allowing any origin");
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        debug!("CORS: Allowed origins: {:?}", allowed_origins);
    }

    cors
}

/// Response headers added to every reply
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("Referrer-Policy", "no-referrer"))
}
