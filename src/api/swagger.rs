use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Restaurant Admin API",
        version = "1.0.0",
        description = "Customer authentication endpoints for the restaurant admin panel.\n\nPasswords can only be set for phone numbers that are already registered."
    ),
    paths(
        crate::api::customer_auth::set_password,
        crate::api::customer_auth::login,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::SetPasswordRequest,
            crate::services::auth_service::SetPasswordResponse,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::LoginResponse,
            crate::models::Session,
            crate::utils::ErrorBody,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Customer Auth", description = "Password setup and login for registered customers."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    )
)]
pub struct ApiDoc;
