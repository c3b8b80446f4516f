mod common;

use axum::http::StatusCode;
use factory_ops::events::Event;
use rstest::rstest;
use serde_json::json;

use common::{id_of, TestApp};

#[rstest]
#[case("/api/inventory")]
#[case("/api/extruder")]
#[case("/api/material")]
#[case("/api/product")]
#[case("/api/sparepart")]
#[case("/api/other")]
#[tokio::test]
async fn duplicate_codes_conflict(#[case] base: &str) {
    let app = TestApp::new().await;
    let body = json!({ "code": "DUP-1", "name": "First" });

    let created = app.create(&format!("{base}/create"), body.clone()).await;
    assert_eq!(created["code"], "DUP-1");
    assert_eq!(created["status"], "Active");

    let (status, error) = app.post(&format!("{base}/create"), body).await;
    assert_eq!(status, StatusCode::CONFLICT, "{error}");
    assert_eq!(error["success"], false);

    assert_eq!(app.list(&format!("{base}/list")).await.len(), 1);
}

#[rstest]
#[case("/api/inventory")]
#[case("/api/material")]
#[case("/api/sparepart")]
#[tokio::test]
async fn missing_records_are_not_found(#[case] base: &str) {
    let app = TestApp::new().await;
    let id = uuid::Uuid::new_v4();

    let (status, _) = app
        .put(&format!("{base}/update/{id}"), json!({ "name": "Ghost" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("{base}/delete/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_code_fails_validation() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post("/api/inventory/create", json!({ "code": "", "name": "Nameless" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn renaming_an_asset_carries_its_ledger() {
    let app = TestApp::new().await;
    let item = app
        .create(
            "/api/inventory/create",
            json!({ "code": "INV-OLD", "name": "Gloves" }),
        )
        .await;
    app.create(
        "/api/movement/create",
        json!({
            "date": "2024-05-01",
            "item_type": "Inventory",
            "code": "INV-OLD",
            "direction": "In",
            "quantity": 12.0,
        }),
    )
    .await;

    let (status, body) = app
        .put(
            &format!("/api/inventory/update/{}", id_of(&item)),
            json!({ "code": "INV-NEW" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["code"], "INV-NEW");
    assert_eq!(body["data"]["balance"], 12.0);

    assert!(app.list("/api/movement/list?code=INV-OLD").await.is_empty());
    let moved = app.list("/api/movement/list?code=INV-NEW").await;
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0]["balance"], 12.0);
}

#[tokio::test]
async fn renaming_onto_an_existing_code_conflicts() {
    let app = TestApp::new().await;
    app.create("/api/material/create", json!({ "code": "M-1", "name": "One" }))
        .await;
    let second = app
        .create("/api/material/create", json!({ "code": "M-2", "name": "Two" }))
        .await;

    let (status, _) = app
        .put(
            &format!("/api/material/update/{}", id_of(&second)),
            json!({ "code": "M-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleting_an_extruder_removes_its_transactions() {
    let app = TestApp::new().await;
    let extruder = app
        .create("/api/extruder/create", json!({ "code": "EX-9", "name": "Line 9" }))
        .await;
    app.create("/api/sparepart/create", json!({ "code": "SP-9", "name": "Heater" }))
        .await;
    app.create(
        "/api/transaction/create",
        json!({
            "date": "2024-06-01",
            "item_type": "Sparepart",
            "code": "SP-9",
            "direction": "In",
            "quantity": 3.0,
            "extruder": "EX-9",
        }),
    )
    .await;
    app.drain_events().await;

    let (status, body) = app
        .delete(&format!("/api/extruder/delete/{}", id_of(&extruder)))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["id"], extruder["id"]);

    assert!(app.list("/api/transaction/list").await.is_empty());
    let parts = app.list("/api/sparepart/list").await;
    assert_eq!(parts[0]["balance"], 0.0);

    let events = app.drain_events().await;
    assert!(events.iter().any(|e| matches!(
        e,
        Event::RecordDeleted { resource, cascaded: 1, .. } if resource == "extruder"
    )));
}

#[tokio::test]
async fn renaming_an_extruder_updates_every_reference() {
    let app = TestApp::new().await;
    let extruder = app
        .create("/api/extruder/create", json!({ "code": "EX-A", "name": "Line A" }))
        .await;
    app.create("/api/other/create", json!({ "code": "OT-A", "name": "Tape" }))
        .await;
    app.create(
        "/api/transaction/create",
        json!({
            "date": "2024-06-01",
            "item_type": "Other",
            "code": "OT-A",
            "direction": "In",
            "quantity": 2.0,
            "extruder": "EX-A",
        }),
    )
    .await;
    app.create(
        "/api/maintenance/create",
        json!({ "date": "2024-06-02", "extruder": "EX-A", "description": "Clean die" }),
    )
    .await;
    app.create(
        "/api/job/create",
        json!({ "lotno": "LOT-A1", "product": "Film", "extruder": "EX-A", "totalorder": 100.0 }),
    )
    .await;

    let (status, _) = app
        .put(
            &format!("/api/extruder/update/{}", id_of(&extruder)),
            json!({ "code": "EX-B" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let transactions = app.list("/api/transaction/list").await;
    assert_eq!(transactions[0]["extruder"], "EX-B");
    let maintenance = app.list("/api/maintenance/list?extruder=EX-B").await;
    assert_eq!(maintenance.len(), 1);
    for base in ["/api/job", "/api/productivity", "/api/planning"] {
        let lots = app.list(&format!("{base}/list?extruder=EX-B")).await;
        assert_eq!(lots.len(), 1, "{base}");
        assert!(app.list(&format!("{base}/list?extruder=EX-A")).await.is_empty());
    }
}

#[rstest]
#[case("/api/sparepart", "Sparepart")]
#[case("/api/other", "Other")]
#[tokio::test]
async fn deleting_a_transacted_asset_removes_its_entries(
    #[case] base: &str,
    #[case] item_type: &str,
) {
    let app = TestApp::new().await;
    let asset = app
        .create(&format!("{base}/create"), json!({ "code": "T-1", "name": "Thing" }))
        .await;
    for date in ["2024-07-01", "2024-07-02"] {
        app.create(
            "/api/transaction/create",
            json!({
                "date": date,
                "item_type": item_type,
                "code": "T-1",
                "direction": "In",
                "quantity": 1.0,
            }),
        )
        .await;
    }

    let (status, _) = app
        .delete(&format!("{base}/delete/{}", id_of(&asset)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.list("/api/transaction/list").await.is_empty());
}

#[tokio::test]
async fn low_stock_lists_items_at_or_below_minimum() {
    let app = TestApp::new().await;
    app.create(
        "/api/inventory/create",
        json!({ "code": "LOW", "name": "Low", "min_stock": 5.0 }),
    )
    .await;
    app.create(
        "/api/inventory/create",
        json!({ "code": "OK", "name": "Fine", "min_stock": 5.0 }),
    )
    .await;
    app.create(
        "/api/movement/create",
        json!({
            "date": "2024-05-01",
            "item_type": "Inventory",
            "code": "OK",
            "direction": "In",
            "quantity": 20.0,
        }),
    )
    .await;

    let low = app.list("/api/inventory/low-stock").await;
    let codes: Vec<_> = low.iter().map(|i| i["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["LOW"]);
}
