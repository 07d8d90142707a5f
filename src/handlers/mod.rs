pub mod attempt_handler;
pub mod catalog_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod resource_handler;

use actix_web::web;

/// Registers every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health_handler::configure(cfg);
    catalog_handler::configure(cfg);
    resource_handler::configure(cfg);
    quiz_handler::configure(cfg);
    attempt_handler::configure(cfg);
}
