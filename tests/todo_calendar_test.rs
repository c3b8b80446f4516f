mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{id_of, TestApp};

fn dates_of(todos: &[Value]) -> Vec<&str> {
    let mut dates: Vec<_> = todos.iter().map(|t| t["date"].as_str().unwrap()).collect();
    dates.sort_unstable();
    dates
}

#[tokio::test]
async fn plain_todo_has_defaults_and_no_children() {
    let app = TestApp::new().await;
    let todo = app
        .create(
            "/api/todo/create",
            json!({ "title": "Order pellets", "date": "2024-02-01" }),
        )
        .await;
    assert_eq!(todo["status"], "Incomplete");
    assert!(todo["parent_id"].is_null());
    assert!(todo["recurrence_unit"].is_null());
    assert_eq!(app.list("/api/todo/list").await.len(), 1);
}

#[tokio::test]
async fn recurring_todo_materializes_its_series() {
    let app = TestApp::new().await;
    let parent = app
        .create(
            "/api/todo/create",
            json!({
                "title": "Inspect dies",
                "date": "2024-01-01",
                "end_date": "2024-01-02",
                "priority": "High",
                "recurrence": { "unit": "weekly", "count": 1, "until": "2024-01-29" },
            }),
        )
        .await;
    assert_eq!(parent["recurrence_unit"], "weekly");
    assert_eq!(parent["recurrence_until"], "2024-01-29");

    let todos = app.list("/api/todo/list").await;
    assert_eq!(
        dates_of(&todos),
        vec!["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22", "2024-01-29"]
    );

    let children: Vec<_> = todos
        .iter()
        .filter(|t| t["parent_id"] == parent["id"])
        .collect();
    assert_eq!(children.len(), 4);
    for child in children {
        assert_eq!(child["priority"], "High");
        assert!(child["recurrence_unit"].is_null());
        let date = child["date"].as_str().unwrap();
        let end = child["end_date"].as_str().unwrap();
        let span = chrono::NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap()
            - chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        assert_eq!(span.num_days(), 1);
    }
}

#[tokio::test]
async fn moving_the_parent_regenerates_children() {
    let app = TestApp::new().await;
    let parent = app
        .create(
            "/api/todo/create",
            json!({
                "title": "Calibrate scales",
                "date": "2024-03-01",
                "recurrence": { "unit": "daily", "count": 2, "until": "2024-03-09" },
            }),
        )
        .await;
    assert_eq!(app.list("/api/todo/list").await.len(), 5);

    let (status, body) = app
        .put(
            &format!("/api/todo/update/{}", id_of(&parent)),
            json!({ "date": "2024-03-05" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let todos = app.list("/api/todo/list").await;
    assert_eq!(
        dates_of(&todos),
        vec!["2024-03-05", "2024-03-07", "2024-03-09"]
    );
}

#[tokio::test]
async fn open_ended_series_follow_the_moved_start() {
    let app = TestApp::new().await;
    let parent = app
        .create(
            "/api/todo/create",
            json!({
                "title": "Check chiller",
                "date": "2024-01-01",
                "recurrence": { "unit": "monthly" },
            }),
        )
        .await;
    assert!(parent["recurrence_until"].is_null());
    let todos = app.list("/api/todo/list").await;
    assert_eq!(todos.len(), 13);
    assert_eq!(dates_of(&todos).last().copied(), Some("2025-01-01"));

    let uri = format!("/api/todo/update/{}", id_of(&parent));
    let (status, body) = app.put(&uri, json!({ "date": "2024-06-01" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let todos = app.list("/api/todo/list").await;
    assert_eq!(todos.len(), 13);
    assert_eq!(dates_of(&todos).last().copied(), Some("2025-06-01"));

    let (status, body) = app.put(&uri, json!({ "date": "2025-03-01" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let todos = app.list("/api/todo/list").await;
    assert_eq!(todos.len(), 13);
    assert_eq!(dates_of(&todos).first().copied(), Some("2025-03-01"));
    assert_eq!(dates_of(&todos).last().copied(), Some("2026-03-01"));
}

#[tokio::test]
async fn editing_shared_fields_reaches_children() {
    let app = TestApp::new().await;
    let parent = app
        .create(
            "/api/todo/create",
            json!({
                "title": "Grease bearings",
                "date": "2024-04-01",
                "recurrence": { "unit": "monthly", "until": "2024-06-30" },
            }),
        )
        .await;

    let (status, _) = app
        .put(
            &format!("/api/todo/update/{}", id_of(&parent)),
            json!({ "title": "Grease main bearings", "assignee": "maintenance" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let todos = app.list("/api/todo/list").await;
    assert_eq!(todos.len(), 3);
    assert!(todos.iter().all(|t| t["title"] == "Grease main bearings"));
    assert!(todos.iter().all(|t| t["assignee"] == "maintenance"));
}

#[tokio::test]
async fn children_cannot_take_a_recurrence() {
    let app = TestApp::new().await;
    let parent = app
        .create(
            "/api/todo/create",
            json!({
                "title": "Weekly review",
                "date": "2024-01-01",
                "recurrence": { "unit": "weekly", "until": "2024-01-15" },
            }),
        )
        .await;
    let child = app
        .list("/api/todo/list")
        .await
        .into_iter()
        .find(|t| t["parent_id"] == parent["id"])
        .expect("child todo");

    let (status, _) = app
        .put(
            &format!("/api/todo/update/{}", id_of(&child)),
            json!({ "recurrence": { "unit": "daily" } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_ranges_are_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post(
            "/api/todo/create",
            json!({ "title": "Backwards", "date": "2024-05-10", "end_date": "2024-05-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/todo/create",
            json!({
                "title": "Never",
                "date": "2024-05-10",
                "recurrence": { "unit": "daily", "until": "2024-05-01" },
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/todo/create",
            json!({
                "title": "Zero step",
                "date": "2024-05-10",
                "recurrence": { "unit": "daily", "count": 0 },
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.list("/api/todo/list").await.is_empty());
}

#[tokio::test]
async fn deleting_the_parent_removes_the_series() {
    let app = TestApp::new().await;
    let parent = app
        .create(
            "/api/todo/create",
            json!({
                "title": "Safety walk",
                "date": "2024-01-02",
                "recurrence": { "unit": "custom-monthly", "until": "2024-04-30" },
            }),
        )
        .await;
    // First Tuesday of each month
    assert_eq!(
        dates_of(&app.list("/api/todo/list").await),
        vec!["2024-01-02", "2024-02-06", "2024-03-05", "2024-04-02"]
    );

    let (status, _) = app
        .delete(&format!("/api/todo/delete/{}", id_of(&parent)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.list("/api/todo/list").await.is_empty());
}

#[tokio::test]
async fn complete_toggles_status() {
    let app = TestApp::new().await;
    let todo = app
        .create(
            "/api/todo/create",
            json!({ "title": "Swap filters", "date": "2024-02-01" }),
        )
        .await;
    let uri = format!("/api/todo/complete/{}", id_of(&todo));

    let (status, body) = app.call(axum::http::Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Complete");

    let (_, body) = app.call(axum::http::Method::PUT, &uri, None).await;
    assert_eq!(body["data"]["status"], "Incomplete");

    let (status, _) = app
        .call(
            axum::http::Method::PUT,
            &format!("/api/todo/complete/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
