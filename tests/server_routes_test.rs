//! Tests for the HTTP routes, driven through the router without a socket.

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{ScriptedJudge, accept, reject};
use word_battle::{
    AppState, InMemoryLeaderboard, Judge, JudgeError, LeaderboardStore, Language, router,
};

fn app(judge: Option<Arc<dyn Judge>>) -> Router {
    let store: Arc<dyn LeaderboardStore> = Arc::new(InMemoryLeaderboard::new());
    router(AppState::new(judge, store))
}

fn json_request(method: Method, uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("Failed to build request")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let app = app(None);
    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}

#[tokio::test]
async fn test_check_word_returns_verdict() {
    let judge = ScriptedJudge::new(vec![accept("L'insecticide tue les fourmis", "🧪")]);
    let app = app(Some(judge.clone()));
    let payload = json!({
        "word": "Insecticide",
        "previousWords": ["Fourmi"],
        "currentWord": "Fourmi",
        "language": "fr"
    });

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/check-word", payload.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succes"], true);
    assert_eq!(body["mot_soumis_par_utilisateur"], "Insecticide");
    assert_eq!(body["mot_precedent"], "Fourmi");
    assert_eq!(body["smiley_correspondant_au_mot"], "🧪");
    assert_eq!(body["mot_deja_utiliser_precedement"], false);
    assert_eq!(
        body["explication_pour_ou_contre"],
        "L'insecticide tue les fourmis"
    );

    let requests = judge.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].language, Language::Fr);
}

#[tokio::test]
async fn test_check_word_rejection_is_still_ok() {
    let judge = ScriptedJudge::new(vec![reject("A pebble does not beat a lion")]);
    let app = app(Some(judge));
    let payload = json!({
        "word": "Pebble",
        "previousWords": ["Ant", "Lion"],
        "currentWord": "Lion",
        "language": "en"
    });

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/check-word", payload.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succes"], false);
}

#[tokio::test]
async fn test_check_word_without_judge() {
    let app = app(None);
    let payload = json!({"word": "Lion", "previousWords": [], "currentWord": "Ant"});
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/check-word", payload.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Missing LLM API key");
}

#[tokio::test]
async fn test_check_word_judge_failure() {
    let judge = ScriptedJudge::new(vec![Err(JudgeError::invalid_response("not JSON"))]);
    let app = app(Some(judge));
    let payload = json!({"word": "Lion", "previousWords": [], "currentWord": "Ant"});
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/check-word", payload.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_check_word_bad_input() {
    let judge = ScriptedJudge::new(vec![]);
    let app = app(Some(judge.clone()));

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/check-word", "{not json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON in request body");

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/check-word", json!({"word": "Lion"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing or invalid required fields");

    let blank = json!({"word": "  ", "previousWords": [], "currentWord": "Ant"});
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/check-word", blank.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let portuguese = json!({
        "word": "Leão",
        "previousWords": [],
        "currentWord": "Formiga",
        "language": "pt"
    });
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/check-word", portuguese.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing or invalid required fields");
    assert_eq!(judge.calls(), 0);
}

#[tokio::test]
async fn test_preflight_and_cors() {
    let app = app(None);
    for uri in ["/check-word", "/leaderboard"] {
        let response = app
            .clone()
            .oneshot(empty_request(Method::OPTIONS, uri))
            .await
            .expect("Router failed");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }
}

#[tokio::test]
async fn test_unsupported_method() {
    let app = app(None);
    let (status, body) = send(&app, empty_request(Method::PUT, "/check-word")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let (status, _) = send(&app, empty_request(Method::DELETE, "/leaderboard")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_leaderboard_submit_and_list() {
    let app = app(None);
    let submissions = [
        json!({"playerName": "Alice", "score": 3, "difficulty": "easy", "date": "2026-10-18T10:00:00.000Z"}),
        json!({"playerName": "Bob", "score": 8, "difficulty": "hard", "date": "2026-10-18T11:00:00.000Z", "words": ["Fourmi", "Insecticide"]}),
        json!({"playerName": "Carol", "score": 5, "difficulty": "hard", "language": "en"}),
    ];
    for submission in &submissions {
        let (status, body) = send(
            &app,
            json_request(Method::POST, "/leaderboard", submission.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["id"].as_i64().is_some_and(|id| id > 0));
        assert_eq!(body["playerName"], submission["playerName"]);
    }

    let (status, body) = send(&app, empty_request(Method::GET, "/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry["playerName"].as_str())
        .collect();
    assert_eq!(names, vec!["Bob", "Carol", "Alice"]);
    assert_eq!(body[0]["words"], json!(["Fourmi", "Insecticide"]));
    assert_eq!(body[2]["words"], json!([]));
    assert_eq!(body[2]["language"], "fr");

    let (status, body) = send(
        &app,
        empty_request(Method::GET, "/leaderboard?difficulty=hard&limit=1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["playerName"], "Bob");
}

#[tokio::test]
async fn test_leaderboard_bad_query() {
    let app = app(None);
    let (status, body) = send(&app, empty_request(Method::GET, "/leaderboard?limit=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid limit: 0");

    let (status, _) = send(&app, empty_request(Method::GET, "/leaderboard?limit=ten")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        empty_request(Method::GET, "/leaderboard?difficulty=extreme"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid difficulty: extreme");
}

#[tokio::test]
async fn test_leaderboard_bad_submission() {
    let app = app(None);
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/leaderboard",
            json!({"playerName": "Ada", "score": 2}).to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/leaderboard",
            json!({"playerName": "x".repeat(21), "score": 2, "difficulty": "easy"}).to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/leaderboard", "[".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON in request body");

    let (_, body) = send(&app, empty_request(Method::GET, "/leaderboard")).await;
    assert_eq!(body, json!([]));
}
