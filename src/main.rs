use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use restaurant_admin::{
    api,
    config::Config,
    database::{MongoDB, MongoUserRepository, UserRepository},
    middleware::SecurityHeaders,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Restaurant Admin API...");

    let db = MongoDB::new(&config.database_url)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;

    log::info!("✅ MongoDB connected successfully");

    let repo: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(db));
    let repo_data = web::Data::from(repo);

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    let frontend_origin = config.frontend_origin.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(repo_data.clone())
            .wrap(cors)
            .wrap(SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
    })
    .bind(bind_address.as_str())?
    .run()
    .await
}
