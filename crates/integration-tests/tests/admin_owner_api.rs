//! Admin management surface and the owner dashboard.

use axum::http::StatusCode;
use serde_json::json;

use shoprate_core::Role;
use shoprate_integration_tests::TestApp;

const PASSWORD: &str = "Val1dPass!";

async fn seed_admin(app: &TestApp) -> String {
    app.seed_user("Admin Surface Test Person", "admin@example.com", PASSWORD, Role::Admin)
        .await
}

#[tokio::test]
async fn admin_creates_users_with_explicit_roles() {
    let app = TestApp::spawn().await;
    let admin = seed_admin(&app).await;

    let (status, body) = app
        .post(
            "/admin/users",
            Some(&admin),
            json!({
                "name": "Admin Created Store Owner",
                "email": "newowner@example.com",
                "password": PASSWORD,
                "address": "3 Owner Street",
                "role": "OWNER"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["role"], "OWNER");

    // The new owner can log in immediately.
    app.login("newowner@example.com", PASSWORD).await;
}

#[tokio::test]
async fn admin_user_listing_filters_and_sorts() {
    let app = TestApp::spawn().await;
    let admin = seed_admin(&app).await;
    app.seed_user("Filter Listing Customer Ann", "ann@example.com", PASSWORD, Role::User)
        .await;
    app.seed_user("Filter Listing Owner Bert", "bert@example.com", PASSWORD, Role::Owner)
        .await;

    let (status, body) = app.get("/admin/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = app.get("/admin/users?role=OWNER", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "bert@example.com");

    // An unknown role value is a validation error, not an empty list.
    let (status, _) = app.get("/admin/users?role=WIZARD", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .get("/admin/users?search=filter%20listing&sort=email&order=desc", Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["email"], "bert@example.com");
    assert_eq!(rows[1]["email"], "ann@example.com");
}

#[tokio::test]
async fn store_creation_validates_the_owner_reference() {
    let app = TestApp::spawn().await;
    let admin = seed_admin(&app).await;

    // Unknown owner id.
    let (status, body) = app
        .post(
            "/admin/stores",
            Some(&admin),
            json!({
                "name": "Orphan Store",
                "email": "orphan@example.com",
                "address": "1 Nowhere",
                "ownerId": 999
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Owner not found");

    // A customer cannot be assigned as a store owner.
    app.seed_user("Not An Owner Test Person", "plain@example.com", PASSWORD, Role::User)
        .await;
    let (_, listing) = app.get("/admin/users?role=USER", Some(&admin)).await;
    let customer_id = listing.as_array().unwrap()[0]["id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            "/admin/stores",
            Some(&admin),
            json!({
                "name": "Misassigned Store",
                "email": "mis@example.com",
                "address": "2 Nowhere",
                "ownerId": customer_id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_store_email_conflicts() {
    let app = TestApp::spawn().await;
    let admin = seed_admin(&app).await;
    let payload = json!({ "name": "First Store", "email": "same@example.com", "address": "1 Road" });

    let (status, _) = app.post("/admin/stores", Some(&admin), payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post("/admin/stores", Some(&admin), payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn dashboard_reports_live_totals() {
    let app = TestApp::spawn().await;
    let admin = seed_admin(&app).await;

    let (_, body) = app
        .post(
            "/admin/stores",
            Some(&admin),
            json!({ "name": "Dash Store", "email": "dash@example.com", "address": "5 Way" }),
        )
        .await;
    let store_id = body["store"]["id"].as_i64().unwrap();

    for (i, value) in [5, 3].into_iter().enumerate() {
        let token = app
            .seed_user(
                "Dashboard Rating Customer",
                &format!("dash{i}@example.com"),
                PASSWORD,
                Role::User,
            )
            .await;
        app.post("/user/ratings", Some(&token), json!({ "storeId": store_id, "rating": value }))
            .await;
    }

    let (status, body) = app.get("/admin/dashboard", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 3);
    assert_eq!(body["totalStores"], 1);
    assert_eq!(body["totalRatings"], 2);
    assert!((body["averageRating"].as_f64().unwrap() - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn admin_user_detail_carries_owner_average() {
    let app = TestApp::spawn().await;
    let admin = seed_admin(&app).await;

    app.seed_user("Detail View Store Owner", "downer@example.com", PASSWORD, Role::Owner)
        .await;
    let (_, listing) = app.get("/admin/users?role=OWNER", Some(&admin)).await;
    let owner_id = listing.as_array().unwrap()[0]["id"].as_i64().unwrap();

    let (_, body) = app
        .post(
            "/admin/stores",
            Some(&admin),
            json!({
                "name": "Detail Store",
                "email": "detail@example.com",
                "address": "8 Way",
                "ownerId": owner_id
            }),
        )
        .await;
    let store_id = body["store"]["id"].as_i64().unwrap();

    let customer = app
        .seed_user("Detail Rating Customer One", "drater@example.com", PASSWORD, Role::User)
        .await;
    app.post("/user/ratings", Some(&customer), json!({ "storeId": store_id, "rating": 5 }))
        .await;

    let (status, body) = app.get(&format!("/admin/users/{owner_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!((body["average_rating"].as_f64().unwrap() - 5.0).abs() < f64::EPSILON);

    let (status, body) = app.get("/admin/users/424242", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn owner_dashboard_and_ratings_list() {
    let app = TestApp::spawn().await;
    let admin = seed_admin(&app).await;

    let owner = app
        .seed_user("Owner Dashboard Test User", "owner@example.com", PASSWORD, Role::Owner)
        .await;

    // Before a store is assigned, the dashboard is a 404.
    let (status, _) = app.get("/owner/dashboard", Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = app.get("/admin/users?role=OWNER", Some(&admin)).await;
    let owner_id = listing.as_array().unwrap()[0]["id"].as_i64().unwrap();
    let (_, body) = app
        .post(
            "/admin/stores",
            Some(&admin),
            json!({
                "name": "Owned Emporium",
                "email": "emporium@example.com",
                "address": "9 High Street",
                "ownerId": owner_id
            }),
        )
        .await;
    let store_id = body["store"]["id"].as_i64().unwrap();

    // Unrated store still reports a formatted zero.
    let (_, body) = app.get("/owner/dashboard", Some(&owner)).await;
    assert_eq!(body["averageRating"], "0.00");
    assert_eq!(body["totalRatings"], 0);

    for (i, value) in [5, 5, 5, 1].into_iter().enumerate() {
        let token = app
            .seed_user(
                "Emporium Rating Customer",
                &format!("emp{i}@example.com"),
                PASSWORD,
                Role::User,
            )
            .await;
        app.post("/user/ratings", Some(&token), json!({ "storeId": store_id, "rating": value }))
            .await;
    }

    let (status, body) = app.get("/owner/dashboard", Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"]["name"], "Owned Emporium");
    assert_eq!(body["totalRatings"], 4);
    // The average is a string formatted to two decimals.
    assert_eq!(body["averageRating"], "4.00");

    let (status, body) = app.get("/owner/ratings", Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    // Each row carries the rater's identity for the owner to see.
    assert!(rows.iter().all(|r| r["user_name"].is_string() && r["user_email"].is_string()));

    // Sorting by value ascending puts the single 1 first.
    let (_, body) = app.get("/owner/ratings?sort=rating&order=asc", Some(&owner)).await;
    assert_eq!(body.as_array().unwrap()[0]["rating"], 1);
}
