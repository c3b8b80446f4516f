mod common;

use axum::http::StatusCode;
use factory_ops::events::Event;
use serde_json::{json, Value};

use common::{id_of, TestApp};

async fn seed_material(app: &TestApp, code: &str, min_stock: f64) -> Value {
    app.create(
        "/api/material/create",
        json!({ "code": code, "name": format!("Resin {code}"), "min_stock": min_stock }),
    )
    .await
}

fn movement(code: &str, date: &str, direction: &str, quantity: f64) -> Value {
    json!({
        "date": date,
        "item_type": "Material",
        "code": code,
        "direction": direction,
        "quantity": quantity,
    })
}

async fn material_balance(app: &TestApp, code: &str) -> f64 {
    let (status, body) = app
        .get(&format!("/api/movement/balance/Material/{code}"))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["balance"].as_f64().expect("balance")
}

#[tokio::test]
async fn movements_keep_a_running_balance() {
    let app = TestApp::new().await;
    seed_material(&app, "PP-01", 0.0).await;

    let first = app
        .create("/api/movement/create", movement("PP-01", "2024-03-01", "In", 100.0))
        .await;
    assert_eq!(first["balance"], 100.0);

    let second = app
        .create("/api/movement/create", movement("PP-01", "2024-03-05", "Out", 30.0))
        .await;
    assert_eq!(second["balance"], 70.0);
    assert_eq!(material_balance(&app, "PP-01").await, 70.0);

    let materials = app.list("/api/material/list").await;
    assert_eq!(materials[0]["balance"], 70.0);
}

#[tokio::test]
async fn backdated_entry_rebalances_later_entries() {
    let app = TestApp::new().await;
    seed_material(&app, "PE-02", 0.0).await;

    app.create("/api/movement/create", movement("PE-02", "2024-03-01", "In", 50.0))
        .await;
    let late = app
        .create("/api/movement/create", movement("PE-02", "2024-03-10", "Out", 20.0))
        .await;
    assert_eq!(late["balance"], 30.0);

    app.create("/api/movement/create", movement("PE-02", "2024-03-05", "In", 10.0))
        .await;

    let entries = app.list("/api/movement/list?code=PE-02").await;
    let late_now = entries
        .iter()
        .find(|e| e["id"] == late["id"])
        .expect("late entry listed");
    assert_eq!(late_now["balance"], 40.0);
    assert_eq!(material_balance(&app, "PE-02").await, 40.0);
}

#[tokio::test]
async fn concurrent_withdrawals_cannot_overdraw() {
    let app = TestApp::new().await;
    seed_material(&app, "PS-03", 0.0).await;
    app.create("/api/movement/create", movement("PS-03", "2024-03-01", "In", 100.0))
        .await;

    let ((first, _), (second, _)) = tokio::join!(
        app.post("/api/movement/create", movement("PS-03", "2024-03-02", "Out", 60.0)),
        app.post("/api/movement/create", movement("PS-03", "2024-03-02", "Out", 60.0)),
    );
    let mut statuses = [first, second];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);

    assert_eq!(material_balance(&app, "PS-03").await, 40.0);
    let entries = app.list("/api/movement/list?code=PS-03").await;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["balance"].as_f64().unwrap() >= 0.0));
}

#[tokio::test]
async fn negative_balance_is_rejected_without_writing() {
    let app = TestApp::new().await;
    seed_material(&app, "ABS-03", 0.0).await;
    app.create("/api/movement/create", movement("ABS-03", "2024-03-01", "In", 10.0))
        .await;

    let (status, body) = app
        .post(
            "/api/movement/create",
            movement("ABS-03", "2024-03-02", "Out", 25.0),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["success"], false);

    let entries = app.list("/api/movement/list?code=ABS-03").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(material_balance(&app, "ABS-03").await, 10.0);
}

#[tokio::test]
async fn deleting_an_inbound_entry_cannot_strand_later_outflows() {
    let app = TestApp::new().await;
    seed_material(&app, "PA-04", 0.0).await;
    let inbound = app
        .create("/api/movement/create", movement("PA-04", "2024-03-01", "In", 10.0))
        .await;
    app.create("/api/movement/create", movement("PA-04", "2024-03-02", "Out", 8.0))
        .await;

    let (status, _) = app
        .delete(&format!("/api/movement/delete/{}", id_of(&inbound)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.list("/api/movement/list?code=PA-04").await.len(), 2);
}

#[tokio::test]
async fn updating_quantity_rebalances_the_item() {
    let app = TestApp::new().await;
    seed_material(&app, "PS-05", 0.0).await;
    let inbound = app
        .create("/api/movement/create", movement("PS-05", "2024-03-01", "In", 10.0))
        .await;

    let (status, body) = app
        .put(
            &format!("/api/movement/update/{}", id_of(&inbound)),
            json!({ "quantity": 40.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["balance"], 40.0);
    assert_eq!(material_balance(&app, "PS-05").await, 40.0);
}

#[tokio::test]
async fn ledgers_only_accept_their_item_types() {
    let app = TestApp::new().await;
    seed_material(&app, "PET-06", 0.0).await;

    let (status, _) = app
        .post(
            "/api/transaction/create",
            movement("PET-06", "2024-03-01", "In", 5.0),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/movement/balance/Widget/PET-06").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_item_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/movement/create",
            movement("MISSING", "2024-03-01", "In", 5.0),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
}

#[tokio::test]
async fn transactions_track_spareparts_issued_to_extruders() {
    let app = TestApp::new().await;
    app.create(
        "/api/extruder/create",
        json!({ "code": "EX-1", "name": "Line 1" }),
    )
    .await;
    app.create(
        "/api/sparepart/create",
        json!({ "code": "SP-1", "name": "Screw", "min_stock": 5.0 }),
    )
    .await;

    app.create(
        "/api/transaction/create",
        json!({
            "date": "2024-04-01",
            "item_type": "Sparepart",
            "code": "SP-1",
            "direction": "In",
            "quantity": 8.0,
        }),
    )
    .await;
    let issue = app
        .create(
            "/api/transaction/create",
            json!({
                "date": "2024-04-02",
                "item_type": "Sparepart",
                "code": "SP-1",
                "direction": "Out",
                "quantity": 4.0,
                "extruder": "EX-1",
            }),
        )
        .await;
    assert_eq!(issue["balance"], 4.0);

    let low = app.list("/api/sparepart/low-stock").await;
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["code"], "SP-1");

    let events = app.drain_events().await;
    assert!(events.iter().any(|e| matches!(
        e,
        Event::StockRebalanced { code, balance, min_stock: Some(min), .. }
            if code == "SP-1" && *balance == 4.0 && *min == 5.0
    )));

    let (status, _) = app
        .post(
            "/api/transaction/create",
            json!({
                "date": "2024-04-03",
                "item_type": "Sparepart",
                "code": "SP-1",
                "direction": "Out",
                "quantity": 1.0,
                "extruder": "EX-404",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
