mod common;

use axum::http::{Method, Request, StatusCode};
use axum::body::Body;
use serde_json::json;
use tower::ServiceExt;

use common::{id_of, response_json, TestApp};

#[tokio::test]
async fn health_status_and_openapi_are_served() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["checks"]["database"], "healthy");

    let (status, body) = app.get("/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["environment"], "test");

    let (status, doc) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/movement/create"].is_object());
    assert!(doc["paths"]["/api/todo/complete/{id}"].is_object());
}

#[tokio::test]
async fn responses_carry_the_request_id() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/supplier/list")
        .header("x-request-id", "shift-a-7")
        .body(Body::empty())
        .unwrap();

    let response = factory_ops::app_router(app.state.clone())
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "shift-a-7");

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["meta"]["requestId"], "shift-a-7");
}

#[tokio::test]
async fn errors_use_the_error_envelope() {
    let app = TestApp::new().await;
    let (status, body) = app
        .delete(&format!("/api/supplier/delete/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 404);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn users_never_expose_password_hashes() {
    let app = TestApp::new().await;
    let user = app
        .create(
            "/api/user/create",
            json!({ "username": "op1", "name": "Operator", "password": "secret-pw" }),
        )
        .await;
    assert_eq!(user["role"], "User");
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());

    let listed = app.list("/api/user/list").await;
    assert!(listed[0].get("password_hash").is_none());

    let (status, _) = app
        .post(
            "/api/user/create",
            json!({ "username": "op1", "name": "Again", "password": "secret-pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(
            "/api/user/create",
            json!({ "username": "op2", "name": "Short", "password": "123" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn supplier_names_are_unique_and_emails_checked() {
    let app = TestApp::new().await;
    let supplier = app
        .create(
            "/api/supplier/create",
            json!({ "name": "Polymer Co", "email": "sales@polymer.example" }),
        )
        .await;
    assert_eq!(supplier["status"], "Active");

    let (status, _) = app
        .post("/api/supplier/create", json!({ "name": "Polymer Co" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(
            &format!("/api/supplier/update/{}", id_of(&supplier)),
            json!({ "email": "not-an-email" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn purchase_order_totals_follow_quantity_and_price() {
    let app = TestApp::new().await;
    let order = app
        .create(
            "/api/order/create",
            json!({
                "order_no": "PO-001",
                "date": "2024-02-10",
                "supplier": "Polymer Co",
                "item_type": "Material",
                "code": "PP-01",
                "quantity": 25.0,
                "unit_price": 1.2,
            }),
        )
        .await;
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["total"], 30.0);

    let (status, body) = app
        .put(
            &format!("/api/order/update/{}", id_of(&order)),
            json!({ "quantity": 40.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["total"], 48.0);
}

#[tokio::test]
async fn costs_filter_by_category_and_date() {
    let app = TestApp::new().await;
    for (date, category, amount) in [
        ("2024-01-15", "Power", 1200.0),
        ("2024-02-15", "Power", 1100.0),
        ("2024-02-20", "Freight", 300.0),
    ] {
        app.create(
            "/api/cost/create",
            json!({ "date": date, "category": category, "amount": amount }),
        )
        .await;
    }

    assert_eq!(app.list("/api/cost/list?category=Power").await.len(), 2);
    let february = app
        .list("/api/cost/list?from=2024-02-01&to=2024-02-29")
        .await;
    assert_eq!(february.len(), 2);

    app.create(
        "/api/cost/create",
        json!({ "date": "2024-02-29T23:59:59.500Z", "category": "Freight", "amount": 80.0 }),
    )
    .await;
    let last_day = app
        .list("/api/cost/list?from=2024-02-29&to=2024-02-29")
        .await;
    assert_eq!(last_day.len(), 1);
    assert_eq!(last_day[0]["amount"], 80.0);

    let (status, _) = app.get("/api/cost/list?from=someday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn maintenance_requires_a_known_extruder() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(
            "/api/maintenance/create",
            json!({ "date": "2024-02-01", "extruder": "EX-404" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.create("/api/extruder/create", json!({ "code": "EX-2", "name": "Line 2" }))
        .await;
    let record = app
        .create(
            "/api/maintenance/create",
            json!({ "date": "2024-02-01", "extruder": "EX-2", "downtime": 45.0 }),
        )
        .await;
    assert_eq!(record["maintenance_type"], "Preventive");
    assert_eq!(record["status"], "Incomplete");
    assert_eq!(record["cost"], 0.0);
}

#[tokio::test]
async fn writes_are_recorded_in_the_activity_log() {
    let app = TestApp::new().await;
    app.create("/api/supplier/create", json!({ "name": "Resins Ltd" }))
        .await;
    app.create(
        "/api/inventory/create",
        json!({ "code": "GLV", "name": "Gloves" }),
    )
    .await;
    let (status, _) = app
        .post("/api/inventory/create", json!({ "code": "GLV", "name": "Dup" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let log = app.list("/api/activity/list").await;
    assert_eq!(log.len(), 2);
    let actions: Vec<_> = log.iter().map(|a| a["activity"].as_str().unwrap()).collect();
    assert!(actions.contains(&"Create Supplier"));
    assert!(actions.contains(&"Create Inventory"));

    assert_eq!(app.list("/api/activity/list?limit=1").await.len(), 1);
}
