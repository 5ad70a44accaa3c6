//! End-to-end tests of the HTTP client and orchestrator against a local mock
//! of the remote job-run API.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use jobrun_client::{run_job_with, ClientError, CloudClient, JobService, RunOptions};
use jobrun_core::{AccountId, EnvironmentId, JobDefinition, JobId, ProjectId, RunId};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> CloudClient {
    CloudClient::with_root_url(format!("http://{}", addr), AccountId::new(42), "tok")
}

fn fast_wait() -> RunOptions {
    RunOptions::new()
        .wait_for_completion()
        .with_poll_interval(std::time::Duration::from_millis(10))
}

/// Route returning a scripted sequence of get-run payloads; the last entry
/// repeats once the script is exhausted.
fn scripted_runs(path: &str, payloads: Vec<Value>) -> Router {
    let queue = Arc::new(Mutex::new(VecDeque::from(payloads)));
    Router::new().route(
        path,
        get(move || {
            let queue = queue.clone();
            async move {
                let mut queue = queue.lock().unwrap();
                let payload = if queue.len() > 1 {
                    queue.pop_front().unwrap()
                } else {
                    queue.front().unwrap().clone()
                };
                Json(json!({ "data": payload }))
            }
        }),
    )
}

#[tokio::test]
async fn test_trigger_without_wait_returns_payload_unmodified() {
    let app = Router::new().route(
        "/accounts/42/jobs/7/run/",
        post(|| async { Json(json!({"data": {"id": 123}})) }),
    );
    let addr = serve(app).await;
    let client = client_for(addr);

    let result = run_job_with(&client, JobId::new(7), "nightly", &RunOptions::new())
        .await
        .unwrap();

    assert_eq!(serde_json::to_value(&result).unwrap(), json!({"id": 123}));
}

#[tokio::test]
async fn test_wait_success_attaches_artifact_urls() {
    let app = Router::new()
        .route(
            "/accounts/42/jobs/7/run/",
            post(|| async { Json(json!({"data": {"id": 123}})) }),
        )
        .merge(scripted_runs(
            "/accounts/42/runs/123/",
            vec![json!({"id": 123, "status": 10, "finished_at": "2019-08-24T14:15:22Z"})],
        ))
        .route(
            "/accounts/42/runs/123/artifacts/",
            get(|| async { Json(json!({"data": ["manifest.json", "run_results.json"]})) }),
        );
    let addr = serve(app).await;
    let client = client_for(addr);

    let result = run_job_with(&client, JobId::new(7), "nightly", &fast_wait())
        .await
        .unwrap();

    let base = format!("http://{}/accounts/42/runs/123/artifacts", addr);
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "id": 123,
            "status": 10,
            "finished_at": "2019-08-24T14:15:22Z",
            "artifact_urls": [
                format!("{}/manifest.json", base),
                format!("{}/run_results.json", base),
            ]
        })
    );
}

#[tokio::test]
async fn test_wait_polls_until_terminal() {
    let app = Router::new()
        .route(
            "/accounts/42/jobs/7/run/",
            post(|| async { Json(json!({"data": {"id": 123}})) }),
        )
        .merge(scripted_runs(
            "/accounts/42/runs/123/",
            vec![
                json!({"id": 123, "status": 1}),
                json!({"id": 123, "status": 3}),
                json!({"id": 123, "status": 10, "finished_at": "2019-08-24T14:15:22Z"}),
            ],
        ))
        .route(
            "/accounts/42/runs/123/artifacts/",
            get(|| async { Json(json!({"data": []})) }),
        );
    let addr = serve(app).await;
    let client = client_for(addr);

    let result = run_job_with(&client, JobId::new(7), "nightly", &fast_wait())
        .await
        .unwrap();
    assert_eq!(result.run.status, Some(10));
    assert_eq!(result.artifact_urls, Some(vec![]));
}

#[tokio::test]
async fn test_canceled_run_never_lists_artifacts() {
    let artifact_calls = Arc::new(AtomicUsize::new(0));
    let counter = artifact_calls.clone();
    let app = Router::new()
        .route(
            "/accounts/42/jobs/7/run/",
            post(|| async { Json(json!({"data": {"id": 123}})) }),
        )
        .merge(scripted_runs(
            "/accounts/42/runs/123/",
            vec![json!({"id": 123, "status": 30, "finished_at": "2019-08-24T14:15:22Z"})],
        ))
        .route(
            "/accounts/42/runs/123/artifacts/",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Json(json!({"data": []})) }
            }),
        );
    let addr = serve(app).await;
    let client = client_for(addr);

    let err = run_job_with(&client, JobId::new(7), "nightly", &fast_wait())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::RunCanceled { .. }));
    assert_eq!(artifact_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_artifact_listing_failure_yields_empty_list() {
    let app = Router::new()
        .route(
            "/accounts/42/jobs/7/run/",
            post(|| async { Json(json!({"data": {"id": 123}})) }),
        )
        .merge(scripted_runs(
            "/accounts/42/runs/123/",
            vec![json!({"id": 123, "status": 10, "finished_at": "2019-08-24T14:15:22Z"})],
        ))
        .route(
            "/accounts/42/runs/123/artifacts/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "broken") }),
        );
    let addr = serve(app).await;
    let client = client_for(addr);

    let result = run_job_with(&client, JobId::new(7), "nightly", &fast_wait())
        .await
        .unwrap();

    assert_eq!(result.run.status, Some(10));
    assert_eq!(result.artifact_urls, Some(vec![]));
}

#[tokio::test]
async fn test_trigger_non_success_is_typed() {
    let app = Router::new().route(
        "/accounts/42/jobs/7/run/",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "server on fire") }),
    );
    let addr = serve(app).await;
    let client = client_for(addr);

    let err = run_job_with(&client, JobId::new(7), "nightly", &RunOptions::new())
        .await
        .unwrap_err();

    match err {
        ClientError::TriggerRunFailed(failure) => {
            assert_eq!(failure.status, Some(500));
            assert_eq!(failure.message, "server on fire");
        }
        other => panic!("Expected TriggerRunFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_terminal_state_surfaces_distinctly() {
    let app = Router::new()
        .route(
            "/accounts/42/jobs/7/run/",
            post(|| async { Json(json!({"data": {"id": 123}})) }),
        )
        .merge(scripted_runs(
            "/accounts/42/runs/123/",
            vec![json!({"id": 123, "status": 99, "finished_at": "2019-08-24T14:15:22Z"})],
        ));
    let addr = serve(app).await;
    let client = client_for(addr);

    let err = run_job_with(&client, JobId::new(7), "nightly", &fast_wait())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RunUnknownState { code: 99, .. }));
}

#[tokio::test]
async fn test_requests_carry_auth_and_client_headers() {
    let seen = Arc::new(Mutex::new(None::<(String, String)>));
    let sink = seen.clone();
    let app = Router::new().route(
        "/accounts/42/jobs/7/run/",
        post(move |headers: HeaderMap| {
            let sink = sink.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let agent = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                *sink.lock().unwrap() = Some((auth, agent));
                Json(json!({"data": {"id": 123}}))
            }
        }),
    );
    let addr = serve(app).await;
    let client = client_for(addr);

    run_job_with(&client, JobId::new(7), "nightly", &RunOptions::new())
        .await
        .unwrap();

    let (auth, agent) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(auth, "Bearer tok");
    assert!(agent.starts_with("jobrun/"));
}

#[tokio::test]
async fn test_create_job_posts_definition_and_decodes_record() {
    let app = Router::new().route(
        "/accounts/42/jobs/",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["name"], "nightly");
            assert_eq!(body["execute_steps"], json!(["build", "test"]));
            Json(json!({"data": {"id": 7, "name": "nightly", "state": 1}}))
        }),
    );
    let addr = serve(app).await;
    let client = client_for(addr);

    let definition = JobDefinition::new(
        "nightly",
        ProjectId::new(1),
        EnvironmentId::new(2),
        vec!["build".to_string(), "test".to_string()],
    );
    let record = client.create_job(&definition).await.unwrap();
    assert_eq!(record.id, JobId::new(7));
    assert_eq!(record.extra["state"], 1);
}

#[tokio::test]
async fn test_get_run_is_repeatable() {
    let app = scripted_runs(
        "/accounts/42/runs/5/",
        vec![json!({"id": 5, "status": 3})],
    );
    let addr = serve(app).await;
    let client = client_for(addr);

    let first = client.get_run(RunId::new(5)).await.unwrap();
    let second = client.get_run(RunId::new(5)).await.unwrap();
    assert_eq!(first, second);
}
