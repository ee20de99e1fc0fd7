//! Registration, login, and password change over the HTTP surface.

use axum::http::StatusCode;
use serde_json::json;

use shoprate_integration_tests::TestApp;

const NAME: &str = "Integration Test Customer";
const PASSWORD: &str = "Val1dPass!";

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_creates_customer_and_returns_token() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({
                "name": NAME,
                "email": "new@example.com",
                "password": PASSWORD,
                "address": "7 Example Lane"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["role"], "USER");
    assert_eq!(body["user"]["email"], "new@example.com");
    // The credential hash never appears in a response.
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_invalid_fields() {
    let app = TestApp::spawn().await;

    // Name below the 20-character floor.
    let (status, _) = app
        .post(
            "/auth/register",
            None,
            json!({ "name": "Shorty", "email": "a@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Password missing the special character.
    let (status, _) = app
        .post(
            "/auth/register",
            None,
            json!({ "name": NAME, "email": "b@example.com", "password": "NoSpecial123" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unparseable email.
    let (status, _) = app
        .post(
            "/auth/register",
            None,
            json!({ "name": NAME, "email": "not-an-email", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let app = TestApp::spawn().await;
    let payload = json!({ "name": NAME, "email": "dup@example.com", "password": PASSWORD });

    let (status, _) = app.post("/auth/register", None, payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/auth/register", None, payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "An account with this email already exists");
}

#[tokio::test]
async fn login_rejects_wrong_credentials_identically() {
    let app = TestApp::spawn().await;
    app.post(
        "/auth/register",
        None,
        json!({ "name": NAME, "email": "login@example.com", "password": PASSWORD }),
    )
    .await;

    let (status, wrong_password) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "login@example.com", "password": "Wr0ngPass!" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, wrong_email) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Same message either way; existence of the account is not revealed.
    assert_eq!(wrong_password["message"], wrong_email["message"]);
}

#[tokio::test]
async fn change_password_requires_current_and_takes_effect() {
    let app = TestApp::spawn().await;
    let (_, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "name": NAME, "email": "pw@example.com", "password": PASSWORD }),
        )
        .await;
    let token = body["token"].as_str().unwrap().to_owned();

    // Wrong current password is rejected.
    let (status, _) = app
        .put(
            "/auth/change-password",
            Some(&token),
            json!({ "currentPassword": "Wr0ngPass!", "newPassword": "N3wSecret$" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .put(
            "/auth/change-password",
            Some(&token),
            json!({ "currentPassword": PASSWORD, "newPassword": "N3wSecret$" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Old password no longer works, new one does.
    let (status, _) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "pw@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    app.login("pw@example.com", "N3wSecret$").await;
}

#[tokio::test]
async fn change_password_needs_a_token() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .put(
            "/auth/change-password",
            None,
            json!({ "currentPassword": PASSWORD, "newPassword": "N3wSecret$" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
