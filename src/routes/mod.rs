// Route exports
pub mod venues;

use actix_web::web;

pub use venues::{AppState, Clock};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(venues::configure);
}
