use actix_web::{web, Scope};

pub mod scanner;

pub fn create_api_router() -> Scope {
    web::scope("/api").configure(scanner::configure_scanner_routes)
}
