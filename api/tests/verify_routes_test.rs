use actix_web::{
    http::{header, StatusCode},
    test, web,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use kh_api::dto::{CheckCodeResponse, ErrorResponse, SendCodeResponse, VerificationStatusResponse};
use kh_api::i18n::{error_message, Language};
use kh_api::middleware::create_cors;
use kh_api::{create_app, AppState};
use kh_core::domain::entities::{Claims, UserProfile, VerificationAttempt, VerificationChannel};
use kh_core::repositories::{ProfileRepository, VerificationRepository};
use kh_core::services::gate::{RouteDecision, SessionGate, SessionUser};
use kh_core::services::verification::VerificationService;
use kh_infra::memory::{InMemoryProfileRepository, InMemoryVerificationRepository};
use kh_infra::sms::MockSmsProvider;
use kh_shared::config::{AuthConfig, Environment, ServerConfig, TestPhoneNumbers, VerificationConfig};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const JWT_SECRET: &str = "integration-test-secret";
const PHONE: &str = "+966501234567";
const PROVIDER_CODE: &str = "482913";
const WRONG_CODE: &str = "000000";
const TEST_PHONE: &str = "+966500000001";
const TEST_CODE: &str = "111111";

type TestState = AppState<MockSmsProvider, InMemoryVerificationRepository, InMemoryProfileRepository>;

struct Harness {
    sms: Arc<MockSmsProvider>,
    attempts: Arc<InMemoryVerificationRepository>,
    profiles: Arc<InMemoryProfileRepository>,
    state: web::Data<TestState>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(verification_config())
    }

    fn with_config(config: VerificationConfig) -> Self {
        let sms = Arc::new(MockSmsProvider::with_fixed_code(PROVIDER_CODE));
        let attempts = Arc::new(InMemoryVerificationRepository::new());
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let service = Arc::new(VerificationService::new(
            sms.clone(),
            attempts.clone(),
            profiles.clone(),
            config,
        ));

        Self {
            sms,
            attempts,
            profiles,
            state: web::Data::new(AppState::new(service)),
        }
    }
}

fn verification_config() -> VerificationConfig {
    VerificationConfig {
        test_phones: TestPhoneNumbers::from_pairs([(TEST_PHONE, TEST_CODE)]),
        ..VerificationConfig::default()
    }
}

fn bearer_token(user_id: Uuid) -> String {
    let claims = Claims::new(user_id, 3600);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

macro_rules! init_app {
    ($harness:expr) => {
        test::init_service(create_app(
            $harness.state.clone(),
            AuthConfig::new(JWT_SECRET),
            create_cors(Environment::Development, &ServerConfig::default()),
        ))
        .await
    };
}

fn send_request(phone: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/verify/send")
        .set_json(json!({ "phoneNumber": phone }))
}

fn check_request(phone: &str, code: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/verify/check")
        .set_json(json!({ "phoneNumber": phone, "code": code }))
}

#[actix_web::test]
async fn test_health_check() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_send_normalizes_phone_without_plus() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let resp = test::call_service(&app, send_request("966 50 123 4567").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: SendCodeResponse = test::read_body_json(resp).await;
    assert!(body.success);
    assert!(!body.is_test_phone);
    assert_eq!(body.status, "pending");
    assert_eq!(body.resend_after, 60);
    assert!(body.expires_at > Utc::now());

    assert_eq!(harness.sms.code_for(PHONE).await.as_deref(), Some(PROVIDER_CODE));
    let attempt = harness.attempts.find_latest_by_phone(PHONE).await.unwrap().unwrap();
    assert_eq!(attempt.channel, VerificationChannel::Provider);
    assert!(attempt.code.is_none());
}

#[actix_web::test]
async fn test_test_phone_send_skips_provider() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let resp = test::call_service(&app, send_request(TEST_PHONE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: SendCodeResponse = test::read_body_json(resp).await;
    assert!(body.is_test_phone);
    assert_eq!(harness.sms.request_count(), 0);
}

#[actix_web::test]
async fn test_test_phone_wrong_code_leaves_attempt_untouched() {
    let harness = Harness::new();
    let app = init_app!(harness);

    test::call_service(&app, send_request(TEST_PHONE).to_request()).await;

    let resp = test::call_service(&app, check_request(TEST_PHONE, "999999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.code, "INVALID_VERIFICATION_CODE");
    assert_eq!(body.verified, Some(false));

    let attempt = harness.attempts.find_latest_by_phone(TEST_PHONE).await.unwrap().unwrap();
    assert_eq!(attempt.attempts, 0);
    assert!(!attempt.verified);

    let resp = test::call_service(&app, check_request(TEST_PHONE, TEST_CODE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: CheckCodeResponse = test::read_body_json(resp).await;
    assert!(body.verified);
    assert_eq!(harness.sms.request_count(), 0);
}

#[actix_web::test]
async fn test_universal_code_only_when_configured() {
    let harness = Harness::new();
    let app = init_app!(harness);
    let resp = test::call_service(&app, check_request(TEST_PHONE, "123456").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let harness = Harness::with_config(VerificationConfig {
        universal_test_code: Some("123456".to_string()),
        ..verification_config()
    });
    let app = init_app!(harness);
    let resp = test::call_service(&app, check_request(TEST_PHONE, "123456").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Real phones never accept the universal code
    test::call_service(&app, send_request(PHONE).to_request()).await;
    let resp = test::call_service(&app, check_request(PHONE, "123456").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_attempts_exhausted_rejects_correct_code() {
    let harness = Harness::new();
    let app = init_app!(harness);

    test::call_service(&app, send_request(PHONE).to_request()).await;

    for expected_remaining in [2, 1, 0] {
        let resp = test::call_service(&app, check_request(PHONE, WRONG_CODE).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.code, "INVALID_VERIFICATION_CODE");
        assert_eq!(body.remaining_attempts, Some(expected_remaining));
    }

    let resp = test::call_service(&app, check_request(PHONE, PROVIDER_CODE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.code, "MAX_ATTEMPTS_EXCEEDED");
    assert_eq!(body.verified, Some(false));
    assert!(!body.success);
}

#[actix_web::test]
async fn test_expired_attempt_fails_regardless_of_code() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let mut attempt = VerificationAttempt::new(
        PHONE,
        None,
        Some("654321".to_string()),
        VerificationChannel::LocalSms,
        10,
    );
    attempt.expires_at = Utc::now() - Duration::minutes(1);
    harness.attempts.create(&attempt).await.unwrap();

    let resp = test::call_service(&app, check_request(PHONE, "654321").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.code, "VERIFICATION_NOT_FOUND_OR_EXPIRED");
}

#[actix_web::test]
async fn test_check_without_send_is_not_found() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let resp = test::call_service(&app, check_request(PHONE, PROVIDER_CODE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.code, "VERIFICATION_NOT_FOUND_OR_EXPIRED");
}

#[actix_web::test]
async fn test_public_check_sets_flag_and_is_idempotent() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let user_id = Uuid::new_v4();
    harness
        .profiles
        .save(&UserProfile::new(user_id).with_phone(PHONE))
        .await
        .unwrap();

    test::call_service(&app, send_request(PHONE).to_request()).await;

    for _ in 0..2 {
        let resp = test::call_service(&app, check_request(PHONE, PROVIDER_CODE).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: CheckCodeResponse = test::read_body_json(resp).await;
        assert!(body.success && body.verified);
    }

    let profile = harness.profiles.find_by_id(user_id).await.unwrap().unwrap();
    assert!(profile.phone_verified);
}

#[actix_web::test]
async fn test_provider_fallback_to_local_sms() {
    let harness = Harness::new();
    harness.sms.set_simulate_failure(true);
    let app = init_app!(harness);

    let resp = test::call_service(&app, send_request(PHONE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(harness.sms.sent_messages().await.len(), 1);

    let attempt = harness.attempts.find_latest_by_phone(PHONE).await.unwrap().unwrap();
    assert_eq!(attempt.channel, VerificationChannel::LocalSms);
    let code = attempt.code.unwrap();

    let resp = test::call_service(&app, check_request(PHONE, &code).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_malformed_phone_rejected_without_side_effects() {
    let harness = Harness::new();
    let app = init_app!(harness);

    for phone in ["", "abc"] {
        let resp = test::call_service(&app, send_request(phone).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "send {:?}", phone);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.code, "INVALID_PHONE_FORMAT");

        let resp = test::call_service(&app, check_request(phone, PROVIDER_CODE).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "check {:?}", phone);
    }

    assert_eq!(harness.sms.request_count(), 0);
    assert!(harness.attempts.is_empty().await);
}

#[actix_web::test]
async fn test_malformed_code_rejected() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let resp = test::call_service(&app, check_request(PHONE, "").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.code, "INVALID_CODE_FORMAT");
    assert_eq!(body.verified, Some(false));
}

#[actix_web::test]
async fn test_malformed_json_is_validation_error() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/verify/send")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.code, "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_error_language_negotiation() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let resp = test::call_service(&app, send_request("abc").to_request()).await;
    let body: ErrorResponse = test::read_body_json(resp).await;
    let (arabic, _) = error_message("INVALID_PHONE_FORMAT", Language::Arabic).unwrap();
    assert_eq!(body.error, arabic);

    let req = send_request("abc")
        .insert_header((header::ACCEPT_LANGUAGE, "en-GB,en;q=0.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.error.starts_with("Invalid phone number"));
}

#[actix_web::test]
async fn test_account_routes_require_token() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/account/verification-status")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.code, "UNAUTHORIZED");

    let req = test::TestRequest::post()
        .uri("/api/account/verify/send")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .set_json(json!({ "phoneNumber": PHONE }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.sms.request_count(), 0);
}

#[actix_web::test]
async fn test_unknown_route_is_not_found() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/nothing").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.code, "NOT_FOUND");
}

#[actix_web::test]
async fn test_end_to_end_account_flow_unlocks_gate() {
    let harness = Harness::new();
    let app = init_app!(harness);
    let user_id = Uuid::new_v4();
    let token = bearer_token(user_id);

    let status_request = || {
        test::TestRequest::get()
            .uri("/api/account/verification-status")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .to_request()
    };

    let resp = test::call_service(&app, status_request()).await;
    let status: VerificationStatusResponse = test::read_body_json(resp).await;
    assert!(!status.phone_verified);

    let mut gate = SessionGate::new();
    gate.sign_in(&SessionUser {
        id: user_id,
        phone_verified: status.phone_verified,
    });
    assert_eq!(gate.route_access("/home"), RouteDecision::Redirect("/verify-phone"));

    let req = test::TestRequest::post()
        .uri("/api/account/verify/send")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(json!({ "phoneNumber": PHONE }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let check = |code: &str| {
        test::TestRequest::post()
            .uri("/api/account/verify/check")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(json!({ "phoneNumber": PHONE, "code": code }))
            .to_request()
    };

    let resp = test::call_service(&app, check(WRONG_CODE)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let failed: ErrorResponse = test::read_body_json(resp).await;
    gate.apply_check_result(failed.verified.unwrap_or(false));
    assert!(!gate.is_phone_verified());

    let resp = test::call_service(&app, check(PROVIDER_CODE)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let verified: CheckCodeResponse = test::read_body_json(resp).await;
    gate.apply_check_result(verified.verified);
    assert_eq!(gate.route_access("/home"), RouteDecision::Allow);

    let resp = test::call_service(&app, status_request()).await;
    let status: VerificationStatusResponse = test::read_body_json(resp).await;
    assert!(status.phone_verified);
    assert_eq!(status.phone.as_deref(), Some(PHONE));

    gate.refresh_from_server(status.phone_verified);
    assert!(gate.is_phone_verified());
}
