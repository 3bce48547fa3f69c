pub mod customer_auth;
pub mod health;
pub mod swagger;

use crate::utils::{AppError, ErrorBody};
use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};

/// Registers every route of the service on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/customer-auth")
                .service(
                    web::resource("/set-password")
                        .route(web::post().to(customer_auth::set_password))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/login")
                        .route(web::post().to(customer_auth::login))
                        .default_service(web::to(method_not_allowed)),
                ),
        );
}

/// Malformed bodies get the same `{ "error": ... }` shape as validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        log::warn!("❌ Rejected request body: {}", err);
        let response = HttpResponse::BadRequest().json(ErrorBody {
            error: format!("Invalid request body: {}", err),
        });
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, AppError> {
    log::warn!("⛔ {} {} - method not allowed", req.method(), req.path());
    Err(AppError::MethodNotAllowed)
}
