use crate::{
    database::UserRepository,
    services::auth_service::{self, LoginRequest, LoginResponse, SetPasswordRequest, SetPasswordResponse},
    utils::{AppError, ErrorBody},
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/customer-auth/set-password",
    tag = "Customer Auth",
    request_body = SetPasswordRequest,
    responses(
        (status = 200, description = "Password stored", body = SetPasswordResponse),
        (status = 400, description = "Validation failed or user not registered", body = ErrorBody),
        (status = 405, description = "Method not allowed", body = ErrorBody),
        (status = 500, description = "Unexpected failure", body = ErrorBody)
    )
)]
pub async fn set_password(
    repo: web::Data<dyn UserRepository>,
    request: web::Json<SetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔑 POST /api/customer-auth/set-password - phone: {}", request.phone_number);

    match auth_service::set_password(repo.get_ref(), &request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            if !matches!(e, AppError::Persistence(_) | AppError::Hashing(_)) {
                log::warn!("❌ Set password rejected: {} - {}", request.phone_number, e);
            }
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/customer-auth/login",
    tag = "Customer Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    repo: web::Data<dyn UserRepository>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /api/customer-auth/login - phone: {}", request.phone_number);

    let response = auth_service::login(repo.get_ref(), &request).await.map_err(|e| {
        log::warn!("❌ Login failed: {} - {}", request.phone_number, e);
        e
    })?;

    log::info!("✅ Login successful: {}", response.user.id);
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api, database::InMemoryUserRepository, models::UserRecord, utils::GENERIC_FAILURE};
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn seeded_repo() -> (Arc<InMemoryUserRepository>, mongodb::bson::oid::ObjectId) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = UserRecord::new("+5511988887777", "Eva", "eva@example.com");
        let id = user.id;
        repo.insert(user).unwrap();
        (repo, id)
    }

    fn data(repo: Arc<InMemoryUserRepository>) -> web::Data<dyn UserRepository> {
        let repo: Arc<dyn UserRepository> = repo;
        web::Data::from(repo)
    }

    async fn post(repo: Arc<InMemoryUserRepository>, body: Value) -> (StatusCode, Value) {
        let app = test::init_service(App::new().app_data(data(repo)).configure(api::configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/customer-auth/set-password")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_short_password_is_400() {
        let (repo, _) = seeded_repo();
        let (status, body) = post(
            repo,
            json!({ "phoneNumber": "+5511988887777", "password": "abc12", "confirmPassword": "abc12" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at least 6"));
    }

    #[actix_web::test]
    async fn test_mismatch_is_400() {
        let (repo, _) = seeded_repo();
        let (status, body) = post(
            repo,
            json!({ "phoneNumber": "+5511988887777", "password": "secret1", "confirmPassword": "secret2" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], auth_service::MSG_PASSWORD_MISMATCH);
    }

    #[actix_web::test]
    async fn test_unknown_phone_is_400() {
        let (repo, _) = seeded_repo();
        let (status, body) = post(
            repo,
            json!({ "phoneNumber": "+10000000000", "password": "secret1", "confirmPassword": "secret1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User not found. Please register first.");
    }

    #[actix_web::test]
    async fn test_valid_payload_updates_hash() {
        let (repo, id) = seeded_repo();
        let (status, body) = post(
            repo.clone(),
            json!({ "phoneNumber": "+5511988887777", "password": "secret1", "confirmPassword": "secret1" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], auth_service::MSG_PASSWORD_SET);

        let stored = repo.get(&id).unwrap();
        let hash = stored.password.unwrap();
        assert_ne!(hash, "secret1");
        assert!(stored.updated_at.is_some());
    }

    #[actix_web::test]
    async fn test_malformed_body_is_400_json() {
        let (repo, _) = seeded_repo();
        let app = test::init_service(App::new().app_data(data(repo)).configure(api::configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/customer-auth/set-password")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_non_post_is_405() {
        let (repo, _) = seeded_repo();
        let app = test::init_service(App::new().app_data(data(repo)).configure(api::configure)).await;

        for req in [
            test::TestRequest::get().uri("/api/customer-auth/set-password").to_request(),
            test::TestRequest::put().uri("/api/customer-auth/set-password").to_request(),
            test::TestRequest::delete().uri("/api/customer-auth/login").to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Method not allowed");
        }
    }

    /// Every call fails the way a dropped database connection would.
    struct BrokenRepository;

    #[async_trait]
    impl UserRepository for BrokenRepository {
        async fn find_by_phone(&self, _phone_number: &str) -> Result<Option<UserRecord>, AppError> {
            Err(AppError::Persistence("connection refused".to_string()))
        }

        async fn update_password(
            &self,
            _id: &ObjectId,
            _password_hash: &str,
            _updated_at: BsonDateTime,
        ) -> Result<(), AppError> {
            Err(AppError::Persistence("connection refused".to_string()))
        }
    }

    #[actix_web::test]
    async fn test_database_failure_is_generic_500() {
        let repo: Arc<dyn UserRepository> = Arc::new(BrokenRepository);
        let app = test::init_service(
            App::new().app_data(web::Data::from(repo)).configure(api::configure),
        )
        .await;

        let requests = [
            test::TestRequest::post()
                .uri("/api/customer-auth/set-password")
                .set_json(json!({ "phoneNumber": "1", "password": "secret1", "confirmPassword": "secret1" }))
                .to_request(),
            test::TestRequest::post()
                .uri("/api/customer-auth/login")
                .set_json(json!({ "phoneNumber": "1", "password": "secret1" }))
                .to_request(),
        ];

        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], GENERIC_FAILURE);
            assert!(!body["error"].as_str().unwrap().contains("connection refused"));
        }
    }

    #[actix_web::test]
    async fn test_login_returns_session() {
        let (repo, id) = seeded_repo();
        post(
            repo.clone(),
            json!({ "phoneNumber": "+5511988887777", "password": "secret1", "confirmPassword": "secret1" }),
        )
        .await;

        let app = test::init_service(App::new().app_data(data(repo)).configure(api::configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/customer-auth/login")
            .set_json(json!({ "phoneNumber": "+5511988887777", "password": "secret1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["id"], id.to_hex());
        assert_eq!(body["user"]["role"], "customer");
    }
}
