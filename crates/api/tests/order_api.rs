//! HTTP-level integration tests for the order endpoints.
//!
//! Covers order placement with stock decrement, status transitions,
//! scoped listing/detail, cancellation with stock restore, and the
//! no-oversell guarantee under concurrent requests.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth};
use marketplace_api::auth::password::hash_password;
use marketplace_db::models::member::{CreateMember, MemberRole};
use marketplace_db::models::order::OrderStatus;
use marketplace_db::repositories::{MemberRepo, OrderRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a member with the given role and return a logged-in access token.
async fn member_token(pool: &PgPool, email: &str, role: MemberRole) -> String {
    let password = "testPass1!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let input = CreateMember {
        email: email.to_string(),
        password_hash: hashed,
        name: "Test Member".to_string(),
        phone: None,
        role,
    };
    MemberRepo::create(pool, &input)
        .await
        .expect("member creation should succeed");

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Create a product through the seller API and return its id.
async fn create_product(pool: &PgPool, token: &str, name: &str, price: i64, stock: i32) -> i64 {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": name, "price": price, "stock_quantity": stock });
    let response = post_json_auth(app, "/api/v1/seller/products", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

/// Place an order and return the parsed JSON body (asserts 201).
async fn place_order(pool: &PgPool, token: &str, product_id: i64, quantity: i32) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "product_id": product_id, "quantity": quantity });
    let response = post_json_auth(app, "/api/v1/orders", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Placing an order snapshots the product, decrements stock, totals the price.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_place_order(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let buyer = member_token(&pool, "buyer@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Lamp", 12000, 10).await;

    let json = place_order(&pool, &buyer, product_id, 3).await;

    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["total_price"], 36000);
    assert_eq!(json["data"]["items"][0]["product_name"], "Lamp");
    assert_eq!(json["data"]["items"][0]["product_price"], 12000);
    assert_eq!(json["data"]["items"][0]["quantity"], 3);
    assert_eq!(json["data"]["items"][0]["subtotal"], 36000);

    // Stock is decremented.
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/products/{product_id}")).await;
    let product = body_json(response).await;
    assert_eq!(product["data"]["stock_quantity"], 7);
    assert_eq!(product["data"]["status"], "selling");
}

/// Ordering the last units flips the product to `sold_out`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_exhausts_stock(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let buyer = member_token(&pool, "buyer@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Last", 500, 2).await;

    place_order(&pool, &buyer, product_id, 2).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/products/{product_id}")).await;
    let product = body_json(response).await;
    assert_eq!(product["data"]["stock_quantity"], 0);
    assert_eq!(product["data"]["status"], "sold_out");
}

/// Ordering more than the available stock returns 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insufficient_stock(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let buyer = member_token(&pool, "buyer@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Scarce", 500, 1).await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "product_id": product_id, "quantity": 2 });
    let response = post_json_auth(app, "/api/v1/orders", body, &buyer).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// A zero quantity is rejected with 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zero_quantity_rejected(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let buyer = member_token(&pool, "buyer@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Thing", 500, 5).await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "product_id": product_id, "quantity": 0 });
    let response = post_json_auth(app, "/api/v1/orders", body, &buyer).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Ordering an unknown product returns 404; ordering requires auth.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_edge_cases(pool: PgPool) {
    let buyer = member_token(&pool, "buyer@test.com", MemberRole::User).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "product_id": 9999, "quantity": 1 });
    let response = post_json_auth(app, "/api/v1/orders", body, &buyer).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "product_id": 1, "quantity": 1 });
    let response = post_json(app, "/api/v1/orders", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Listing and detail
// ---------------------------------------------------------------------------

/// Members see their own orders only; foreign orders read as 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_orders_are_scoped_to_buyer(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let alice = member_token(&pool, "alice@test.com", MemberRole::User).await;
    let bob = member_token(&pool, "bob@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Shared", 100, 10).await;

    let alice_order = place_order(&pool, &alice, product_id, 1).await;
    let order_id = alice_order["data"]["id"].as_i64().unwrap();

    // Bob's listing is empty.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/orders", &bob).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["paging"]["total_elements"], 0);

    // Bob cannot read Alice's order.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/orders/{order_id}"), &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Alice can, items included.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/orders/{order_id}"), &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["data"]["items"][0]["subtotal"],
        json["data"]["total_price"]
    );
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Cancelling a pending order restores stock and returns 204.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_restores_stock(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let buyer = member_token(&pool, "buyer@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Returnable", 700, 2).await;

    let order = place_order(&pool, &buyer, product_id, 2).await;
    let order_id = order["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({});
    let response =
        post_json_auth(app, &format!("/api/v1/orders/{order_id}/cancel"), body, &buyer).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Stock is restored and the product is selling again.
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/products/{product_id}")).await;
    let product = body_json(response).await;
    assert_eq!(product["data"]["stock_quantity"], 2);
    assert_eq!(product["data"]["status"], "selling");

    // The order reads back as cancelled.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/orders/{order_id}"), &buyer).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "cancelled");
}

/// Cancelling twice returns a specific 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_twice_rejected(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let buyer = member_token(&pool, "buyer@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Once", 700, 1).await;

    let order = place_order(&pool, &buyer, product_id, 1).await;
    let order_id = order["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({});
    let response =
        post_json_auth(app, &format!("/api/v1/orders/{order_id}/cancel"), body, &buyer).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({});
    let response =
        post_json_auth(app, &format!("/api/v1/orders/{order_id}/cancel"), body, &buyer).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Order is already cancelled");
}

/// Only cancellable statuses (pending, paid) may be cancelled.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_shipped_order_rejected(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let buyer = member_token(&pool, "buyer@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Shipped", 700, 1).await;

    let order = place_order(&pool, &buyer, product_id, 1).await;
    let order_id = order["data"]["id"].as_i64().unwrap();

    // Move the order to shipping directly in the database.
    let mut tx = pool.begin().await.unwrap();
    OrderRepo::set_status(&mut tx, order_id, OrderStatus::Shipping)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({});
    let response =
        post_json_auth(app, &format!("/api/v1/orders/{order_id}/cancel"), body, &buyer).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Someone else's order cannot be cancelled.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_foreign_order_forbidden(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let alice = member_token(&pool, "alice@test.com", MemberRole::User).await;
    let bob = member_token(&pool, "bob@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Hers", 700, 1).await;

    let order = place_order(&pool, &alice, product_id, 1).await;
    let order_id = order["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({});
    let response =
        post_json_auth(app, &format!("/api/v1/orders/{order_id}/cancel"), body, &bob).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// Two concurrent orders for the last unit: exactly one succeeds, the stock
/// never goes negative.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_orders_cannot_oversell(pool: PgPool) {
    let seller = member_token(&pool, "seller@test.com", MemberRole::Seller).await;
    let alice = member_token(&pool, "alice@test.com", MemberRole::User).await;
    let bob = member_token(&pool, "bob@test.com", MemberRole::User).await;
    let product_id = create_product(&pool, &seller, "Limited", 99000, 1).await;

    let app_a = common::build_test_app(pool.clone());
    let app_b = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "product_id": product_id, "quantity": 1 });

    let (res_a, res_b) = tokio::join!(
        post_json_auth(app_a, "/api/v1/orders", body.clone(), &alice),
        post_json_auth(app_b, "/api/v1/orders", body, &bob),
    );

    // Each request either wins the row lock (201) or sees empty stock (400).
    assert_matches!(
        res_a.status(),
        StatusCode::CREATED | StatusCode::BAD_REQUEST
    );
    assert_matches!(
        res_b.status(),
        StatusCode::CREATED | StatusCode::BAD_REQUEST
    );

    let successes = [res_a.status(), res_b.status()]
        .iter()
        .filter(|s| **s == StatusCode::CREATED)
        .count();
    assert_eq!(successes, 1, "exactly one concurrent order must succeed");

    // Stock ends at zero, never negative, and the product is sold out.
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/products/{product_id}")).await;
    let product = body_json(response).await;
    assert_eq!(product["data"]["stock_quantity"], 0);
    assert_eq!(product["data"]["status"], "sold_out");
}
