mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use factory_ops::events::Event;
use serde_json::{json, Value};

use common::{id_of, TestApp};

fn job(lotno: &str) -> Value {
    // 8h run with 30 min downtime, 1000 units at 2/min plus 10 min IPQC and 40 min setup
    json!({
        "lotno": lotno,
        "orderdate": "2024-03-01T00:00:00Z",
        "product": "Film 40mic",
        "extruder": "EX-1",
        "totalorder": 900.0,
        "irr": 2.0,
        "ipqc": 10.0,
        "setup": 40.0,
        "starttime": "2024-03-04T08:00:00Z",
        "endtime": "2024-03-04T16:00:00Z",
        "downtime": 30.0,
        "totaloutput": 720.0,
        "reject": 36.0,
    })
}

fn assert_close(actual: &Value, expected: f64) {
    let actual = actual.as_f64().expect("number");
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn creating_a_job_opens_all_three_records() {
    let app = TestApp::new().await;
    let created = app.create("/api/job/create", job("LOT-1")).await;

    assert_eq!(created["kind"], "Job");
    assert_eq!(created["status"], "Incomplete");
    assert_close(&created["operatingtime"], 450.0);
    assert_close(&created["planprodtime"], 500.0);
    assert_close(&created["availability"], 0.9);
    assert_close(&created["performance"], 0.8);
    assert_close(&created["quality"], 0.95);
    assert_close(&created["oee"], 0.9 * 0.8 * 0.95);
    assert_close(&created["prodleadtime"], 3.7);

    for base in ["/api/job", "/api/productivity", "/api/planning"] {
        let records = app.list(&format!("{base}/list")).await;
        assert_eq!(records.len(), 1, "{base}");
        assert_eq!(records[0]["lotno"], "LOT-1");
        assert_eq!(records[0]["oee"], created["oee"]);
    }
}

#[tokio::test]
async fn duplicate_lot_numbers_conflict() {
    let app = TestApp::new().await;
    app.create("/api/job/create", job("LOT-2")).await;

    let (status, _) = app.post("/api/job/create", job("LOT-2")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.list("/api/job/list").await.len(), 1);
}

#[tokio::test]
async fn updating_one_view_synchronizes_the_lot() {
    let app = TestApp::new().await;
    app.create("/api/job/create", job("LOT-3")).await;
    let productivity = app.list("/api/productivity/list").await.remove(0);
    app.drain_events().await;

    let (status, body) = app
        .put(
            &format!("/api/productivity/update/{}", id_of(&productivity)),
            json!({ "reject": 0.0, "status": "Complete" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["id"], productivity["id"]);
    assert_eq!(body["data"]["kind"], "Productivity");
    assert_close(&body["data"]["quality"], 1.0);

    for base in ["/api/job", "/api/planning"] {
        let record = app.list(&format!("{base}/list")).await.remove(0);
        assert_eq!(record["status"], "Complete", "{base}");
        assert_close(&record["quality"], 1.0);
        assert_close(&record["oee"], 0.9 * 0.8);
    }

    let events = app.drain_events().await;
    let synced = events
        .iter()
        .find(|e| matches!(e, Event::LotSynchronized { .. }))
        .cloned();
    assert_matches!(synced, Some(Event::LotSynchronized { lotno, records: 3, .. }) if lotno == "LOT-3");
}

#[tokio::test]
async fn renaming_a_lot_renames_every_view() {
    let app = TestApp::new().await;
    let created = app.create("/api/job/create", job("LOT-4")).await;

    let (status, _) = app
        .put(
            &format!("/api/job/update/{}", id_of(&created)),
            json!({ "lotno": "LOT-4B" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    for base in ["/api/job", "/api/productivity", "/api/planning"] {
        let records = app.list(&format!("{base}/list")).await;
        assert_eq!(records[0]["lotno"], "LOT-4B", "{base}");
    }
}

#[tokio::test]
async fn deleting_a_job_closes_the_lot_but_views_delete_alone() {
    let app = TestApp::new().await;
    let first = app.create("/api/job/create", job("LOT-5")).await;
    app.create("/api/job/create", job("LOT-6")).await;

    let planning = app
        .list("/api/planning/list")
        .await
        .into_iter()
        .find(|r| r["lotno"] == "LOT-6")
        .expect("planning of LOT-6");
    let (status, _) = app
        .delete(&format!("/api/planning/delete/{}", id_of(&planning)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.list("/api/planning/list").await.len(), 1);
    assert_eq!(app.list("/api/job/list").await.len(), 2);

    let (status, _) = app
        .delete(&format!("/api/job/delete/{}", id_of(&first)))
        .await;
    assert_eq!(status, StatusCode::OK);
    for base in ["/api/job", "/api/productivity", "/api/planning"] {
        let records = app.list(&format!("{base}/list")).await;
        assert!(records.iter().all(|r| r["lotno"] != "LOT-5"), "{base}");
    }
}

#[tokio::test]
async fn job_ids_are_not_productivity_ids() {
    let app = TestApp::new().await;
    let created = app.create("/api/job/create", job("LOT-7")).await;

    let (status, _) = app
        .delete(&format!("/api/productivity/delete/{}", id_of(&created)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn summary_averages_productivity_records() {
    let app = TestApp::new().await;
    app.create("/api/job/create", job("LOT-8")).await;
    let mut second = job("LOT-9");
    second["reject"] = json!(0.0);
    app.create("/api/job/create", second).await;

    let (status, body) = app.get("/api/productivity/summary").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let summary = &body["data"];
    assert_eq!(summary["records"], 2);
    assert_close(&summary["availability"], 0.9);
    assert_close(&summary["quality"], 0.975);
    assert_close(&summary["totaloutput"], 1440.0);
    assert_close(&summary["reject"], 36.0);

    let (_, empty) = app.get("/api/productivity/summary?extruder=EX-404").await;
    assert_eq!(empty["data"]["records"], 0);
    assert_close(&empty["data"]["oee"], 0.0);
}

#[tokio::test]
async fn unfinished_runs_score_zero() {
    let app = TestApp::new().await;
    let created = app
        .create(
            "/api/job/create",
            json!({ "lotno": "LOT-10", "totalorder": 100.0, "irr": 1.0 }),
        )
        .await;
    assert_close(&created["operatingtime"], 0.0);
    assert_close(&created["planprodtime"], 100.0);
    assert_close(&created["oee"], 0.0);
}
