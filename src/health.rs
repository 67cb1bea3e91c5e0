//! Liveness endpoint for hosting platforms that expect an open HTTP port.

use actix_web::dev::Server;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};

pub const LIVENESS_TEXT: &str = "Invoice bot is running.";

/// GET / - always answers while the process is up
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(LIVENESS_TEXT)
}

/// Configure liveness routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(liveness)));
}

/// Bind the liveness server. The returned server must be awaited or spawned.
pub fn start_server(port: u16) -> std::io::Result<Server> {
    let server = HttpServer::new(|| App::new().configure(config))
        .workers(1)
        .bind(("0.0.0.0", port))?
        .run();
    log::info!("HTTP server listening on port {}", port);
    Ok(server)
}
