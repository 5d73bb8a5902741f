//! In-process router tests: no sockets, requests driven with `oneshot`.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ocap_web::http::build_router;
use ocap_web::lifecycle::Subsystems;
use ocap_web::observability::{LogSink, LOG_FILE_NAME};
use ocap_web::storage::{AmmoRepo, MarkerRepo, Operation, OperationRepo};
use tower::ServiceExt;

mod common;

use common::Fixture;

fn subsystems(fixture: &Fixture) -> Subsystems {
    Subsystems {
        operations: OperationRepo::in_memory().unwrap(),
        markers: MarkerRepo::open(&fixture.path("markers")).unwrap(),
        ammo: AmmoRepo::open(&fixture.path("ammo")).unwrap(),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn filters_operations_by_tag() {
    let fixture = Fixture::new();
    let subsystems = subsystems(&fixture);
    for (name, tag) in [("Sunrise", "TvT"), ("Sunset", "Coop")] {
        subsystems
            .operations
            .store(&Operation {
                id: 0,
                world_name: "stratis".into(),
                mission_name: name.into(),
                mission_duration: 60,
                filename: format!("{name}.json"),
                date: "2024-01-01".into(),
                tag: tag.into(),
            })
            .unwrap();
    }
    let router = build_router(subsystems, LogSink::console(), Duration::from_secs(5));

    let res = router.oneshot(get("/api/v1/operations?tag=Coop")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let ops: Vec<Operation> = serde_json::from_slice(&body).unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].mission_name, "Sunset");
}

#[tokio::test]
async fn unknown_operation_is_not_found() {
    let fixture = Fixture::new();
    let router = build_router(subsystems(&fixture), LogSink::console(), Duration::from_secs(5));

    let res = router.oneshot(get("/api/v1/operations/42")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ammo_image_served_by_stem() {
    let fixture = Fixture::new();
    let router = build_router(subsystems(&fixture), LogSink::console(), Duration::from_secs(5));

    let res = router.oneshot(get("/images/ammo/Shell.png")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
    assert_eq!(body.as_ref(), b"shell-bytes");
}

#[tokio::test]
async fn request_log_keeps_incoming_request_id() {
    let fixture = Fixture::new();
    let log_path = fixture.path(LOG_FILE_NAME);
    let sink = LogSink::open(&log_path).unwrap();
    let router = build_router(subsystems(&fixture), sink, Duration::from_secs(5));

    let request = Request::builder()
        .uri("/healthcheck")
        .header("x-request-id", "abc-123")
        .header("user-agent", "ocap-test")
        .body(Body::empty())
        .unwrap();
    let res = router.clone().oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    router.oneshot(get("/healthcheck")).await.unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], "abc-123");
    assert_eq!(lines[0]["user_agent"], "ocap-test");
    assert_eq!(lines[0]["method"], "GET");
    assert!(lines[0]["bytes_out"].as_u64().unwrap() > 0);
    assert_eq!(lines[1]["id"].as_str().unwrap().len(), 36);
}
