//! Handler tests for the stores domain
//!
//! Users are inserted straight into the in-memory user repository and get
//! tokens minted by the same `JwtAuth` the route layer verifies with.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Router, middleware::from_fn_with_state};
use axum_helpers::{JwtAuth, JwtConfig, jwt_auth_middleware};
use domain_stores::*;
use domain_users::{InMemoryUserRepository, Role, User, UserRepository};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const SECRET: &str = "stores-test-secret-with-32-characters!";

struct TestApp {
    router: Router,
    jwt: JwtAuth,
    users: InMemoryUserRepository,
}

fn test_app() -> TestApp {
    let jwt = JwtAuth::new(&JwtConfig::new(SECRET));
    let users = InMemoryUserRepository::new();
    let service = StoreService::new(InMemoryStoreRepository::new(), users.clone());

    let router = Router::new()
        .nest("/admin", handlers::admin_router(service.clone()))
        .nest("/user", handlers::user_router(service.clone()))
        .nest("/store", handlers::owner_router(service))
        .route_layer(from_fn_with_state(jwt.clone(), jwt_auth_middleware));

    TestApp { router, jwt, users }
}

impl TestApp {
    /// Insert a user and return it with a bearer token
    async fn user(&self, builder: &TestDataBuilder, label: &str, role: Role) -> (User, String) {
        let user = self
            .users
            .create(User::new(
                builder.name(label, "account"),
                builder.email(label),
                "unused-hash".into(),
                builder.address(),
                role,
            ))
            .await
            .unwrap();
        let token = self.jwt.create_token(user.id, &role.to_string()).unwrap();
        (user, token)
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_store(app: &TestApp, admin: &str, name: &str, email: &str, address: &str) -> Value {
    let (status, body) = send(
        &app.router,
        "POST",
        "/admin/stores",
        Some(admin),
        Some(json!({ "name": name, "email": email, "address": address })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_create_store_validation() {
    let app = test_app();
    let builder = TestDataBuilder::from_test_name("create_store_validation");
    let (_, admin) = app.user(&builder, "admin", Role::Admin).await;

    let cases = [
        (
            json!({ "name": "Too Short", "email": "a@b.co", "address": "1 Road" }),
            "Name must be at least 20 characters long",
        ),
        (
            json!({ "name": "Long Enough Store Name Here", "email": "nope", "address": "1 Road" }),
            "Please provide a valid email address",
        ),
        (
            json!({ "name": "Long Enough Store Name Here", "email": "a@b.co" }),
            "Address is required",
        ),
        // Several invalid fields: name is checked first, then email, then address
        (
            json!({ "name": "short", "email": "bad", "address": "" }),
            "Name must be at least 20 characters long",
        ),
        (json!({ "email": "bad" }), "Name is required"),
        (
            json!({ "name": "Long Enough Store Name Here", "email": "bad" }),
            "Please provide a valid email address",
        ),
    ];

    for (body, message) in cases {
        let (status, response) =
            send(&app.router, "POST", "/admin/stores", Some(&admin), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], message);
    }

    let store = create_store(
        &app,
        &admin,
        "Twenty Nine Character Stores!",
        "Store@Example.com",
        "7 Mill Lane",
    )
    .await;
    assert_eq!(store["rating"], "0.00");
    assert_eq!(store["email"], "store@example.com");
    assert!(store["ownerId"].is_null());
}

#[tokio::test]
async fn test_rating_updates_average() {
    let app = test_app();
    let builder = TestDataBuilder::from_test_name("rating_updates_average");
    let (_, admin) = app.user(&builder, "admin", Role::Admin).await;
    let (_, alice) = app.user(&builder, "alice", Role::User).await;
    let (_, bob) = app.user(&builder, "bob", Role::User).await;

    let store = create_store(&app, &admin, "Riverside Fish Market Co", "fish@river.com", "Quay 2").await;
    let store_id = store["id"].as_str().unwrap();

    for (token, value) in [(&alice, 4), (&bob, 2)] {
        let (status, body) = send(
            &app.router,
            "POST",
            "/user/rating",
            Some(token),
            Some(json!({ "storeId": store_id, "rating": value })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Rating submitted");
        assert_eq!(body["rating"], value);
    }

    let (_, stores) = send(&app.router, "GET", "/user/stores", Some(&alice), None).await;
    assert_eq!(stores[0]["rating"], "3.00");
    assert_eq!(stores[0]["userRating"], 4);

    send(
        &app.router,
        "POST",
        "/user/rating",
        Some(&alice),
        Some(json!({ "storeId": store_id, "rating": 5 })),
    )
    .await;

    let (_, stores) = send(&app.router, "GET", "/user/stores", Some(&alice), None).await;
    assert_eq!(stores[0]["rating"], "3.50");
    assert_eq!(stores[0]["userRating"], 5);

    let (_, stats) = send(&app.router, "GET", "/admin/dashboard", Some(&admin), None).await;
    assert_eq!(stats, json!({ "totalUsers": 3, "totalStores": 1, "totalRatings": 2 }));
}

#[tokio::test]
async fn test_rating_rejections() {
    let app = test_app();
    let builder = TestDataBuilder::from_test_name("rating_rejections");
    let (_, admin) = app.user(&builder, "admin", Role::Admin).await;
    let (_, user) = app.user(&builder, "user", Role::User).await;
    let store = create_store(&app, &admin, "Harbour View Chandlery", "ship@harbour.com", "Pier 9").await;

    let (status, _) = send(
        &app.router,
        "POST",
        "/user/rating",
        Some(&user),
        Some(json!({ "storeId": store["id"], "rating": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for value in [0, 6, 9] {
        let (status, body) = send(
            &app.router,
            "POST",
            "/user/rating",
            Some(&user),
            Some(json!({ "storeId": store["id"], "rating": value })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Rating must be 1-5");
    }

    // Rejected values leave both the average and the caller's rating alone
    let (_, stores) = send(&app.router, "GET", "/user/stores", Some(&user), None).await;
    assert_eq!(stores[0]["rating"], "3.00");
    assert_eq!(stores[0]["userRating"], 3);
    let (_, stats) = send(&app.router, "GET", "/admin/dashboard", Some(&admin), None).await;
    assert_eq!(stats["totalRatings"], 1);

    let (status, body) = send(
        &app.router,
        "POST",
        "/user/rating",
        Some(&user),
        Some(json!({ "storeId": Uuid::now_v7(), "rating": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Store not found");
}

#[tokio::test]
async fn test_assign_owner() {
    let app = test_app();
    let builder = TestDataBuilder::from_test_name("assign_owner");
    let (_, admin) = app.user(&builder, "admin", Role::Admin).await;
    let (customer, _) = app.user(&builder, "customer", Role::User).await;
    let (owner, _) = app.user(&builder, "owner", Role::StoreOwner).await;
    let store = create_store(&app, &admin, "Old Town Cheese Merchants", "cheese@town.com", "2 Square").await;
    let uri = format!("/admin/stores/{}/owner", store["id"].as_str().unwrap());

    let (status, body) = send(
        &app.router,
        "PUT",
        &uri,
        Some(&admin),
        Some(json!({ "ownerId": customer.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ownerId must be a valid store-owner");

    let (_, stores) = send(&app.router, "GET", "/admin/stores", Some(&admin), None).await;
    let listed = stores
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == store["id"])
        .unwrap();
    assert!(listed["ownerId"].is_null());
    assert!(listed["owner"].is_null());

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/admin/stores/{}/owner", Uuid::now_v7()),
        Some(&admin),
        Some(json!({ "ownerId": owner.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Store not found");

    let (status, body) = send(
        &app.router,
        "PUT",
        &uri,
        Some(&admin),
        Some(json!({ "ownerId": owner.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Owner assigned");
    assert_eq!(body["store"]["ownerId"], owner.id.to_string());

    let (_, stores) = send(&app.router, "GET", "/admin/stores", Some(&admin), None).await;
    assert_eq!(stores[0]["owner"]["email"], owner.email);

    let (status, details) = send(
        &app.router,
        "GET",
        &format!("/admin/users/{}", owner.id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["role"], "store-owner");
    assert_eq!(details["storeRating"], "0.00");
}

#[tokio::test]
async fn test_owner_dashboard() {
    let app = test_app();
    let builder = TestDataBuilder::from_test_name("owner_dashboard");
    let (_, admin) = app.user(&builder, "admin", Role::Admin).await;
    let (owner, owner_token) = app.user(&builder, "owner", Role::StoreOwner).await;
    let (_, zed) = app.user(&builder, "zed", Role::User).await;
    let (_, amy) = app.user(&builder, "amy", Role::User).await;

    let (status, body) = send(&app.router, "GET", "/store/dashboard", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Store not found");

    let store = create_store(&app, &admin, "Greenhouse Plant Nursery", "plants@green.com", "Field 3").await;
    send(
        &app.router,
        "PUT",
        &format!("/admin/stores/{}/owner", store["id"].as_str().unwrap()),
        Some(&admin),
        Some(json!({ "ownerId": owner.id })),
    )
    .await;
    for (token, value) in [(&zed, 3), (&amy, 4)] {
        send(
            &app.router,
            "POST",
            "/user/rating",
            Some(token),
            Some(json!({ "storeId": store["id"], "rating": value })),
        )
        .await;
    }

    let (status, body) = send(&app.router, "GET", "/store/dashboard", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storeName"], "Greenhouse Plant Nursery");
    assert_eq!(body["averageRating"], "3.50");
    assert_eq!(body["totalRatings"], 2);
    assert_eq!(body["raters"][0]["email"], builder.email("amy"));
    assert_eq!(body["raters"][1]["rating"], 3);

    // A store owner can still browse and rate like any user
    let (status, _) = send(&app.router, "GET", "/user/stores", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_guards() {
    let app = test_app();
    let builder = TestDataBuilder::from_test_name("role_guards");
    let (_, user) = app.user(&builder, "user", Role::User).await;
    let (_, admin) = app.user(&builder, "admin", Role::Admin).await;

    for (method, uri, token) in [
        ("GET", "/admin/stores", &user),
        ("GET", "/admin/dashboard", &user),
        ("GET", "/store/dashboard", &user),
        ("GET", "/store/dashboard", &admin),
    ] {
        let (status, body) = send(&app.router, method, uri, Some(token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["message"], "Forbidden: Insufficient role");
    }

    let (status, body) = send(&app.router, "GET", "/user/stores", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn test_browse_filters_and_sorting() {
    let app = test_app();
    let builder = TestDataBuilder::from_test_name("browse_filters");
    let (_, admin) = app.user(&builder, "admin", Role::Admin).await;
    let (_, user) = app.user(&builder, "user", Role::User).await;

    create_store(&app, &admin, "Alpine Outdoor Equipment", "alpine@gear.com", "3 Ridge Road").await;
    create_store(&app, &admin, "Coastal Outdoor Equipment", "coastal@gear.com", "9 Beach Road").await;
    create_store(&app, &admin, "Bookworm Secondhand Books", "books@worm.com", "1 Library Lane").await;

    let (status, stores) = send(
        &app.router,
        "GET",
        "/user/stores?name=OUTDOOR&sortBy=name&order=desc",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = stores
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Coastal Outdoor Equipment", "Alpine Outdoor Equipment"]);
    assert!(stores[0].get("email").is_none());

    let (_, stores) = send(&app.router, "GET", "/admin/stores?email=WORM", Some(&admin), None).await;
    assert_eq!(stores.as_array().unwrap().len(), 1);
    assert!(stores[0]["owner"].is_null());

    let (status, _) = send(&app.router, "GET", "/user/stores?sortBy=owner", Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app.router, "GET", "/admin/stores?order=sideways", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_details_errors() {
    let app = test_app();
    let builder = TestDataBuilder::from_test_name("user_details_errors");
    let (_, admin) = app.user(&builder, "admin", Role::Admin).await;

    let (status, body) = send(
        &app.router,
        "GET",
        &format!("/admin/users/{}", Uuid::now_v7()),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, _) = send(&app.router, "GET", "/admin/users/not-a-uuid", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
