//! Tests for the HTTP-backed judge and leaderboard clients against local
//! servers.

mod common;

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, routing::post};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use common::{ScriptedJudge, accept};
use word_battle::{
    AppState, Difficulty, DifficultyFilter, HttpJudge, HttpLeaderboard, InMemoryLeaderboard,
    Judge, JudgeErrorKind, JudgeRequest, Language, LeaderboardEntry, LeaderboardStore, LlmConfig,
    LlmJudge, LlmProvider, StoreErrorKind, router,
};

async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    addr
}

/// A server whose every route stalls far longer than any client timeout used
/// here.
async fn spawn_stalled_server() -> SocketAddr {
    let app = Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        "too late"
    });
    spawn_server(app).await
}

async fn spawn_word_battle(judge: Arc<ScriptedJudge>) -> SocketAddr {
    let store: Arc<dyn LeaderboardStore> = Arc::new(InMemoryLeaderboard::new());
    spawn_server(router(AppState::new(Some(judge), store))).await
}

fn request(word: &str) -> JudgeRequest {
    JudgeRequest::new(
        word.to_string(),
        vec!["Ant".to_string()],
        "Ant".to_string(),
        Language::En,
    )
}

fn entry(name: &str, score: u32, difficulty: Difficulty) -> LeaderboardEntry {
    LeaderboardEntry::new(
        name.to_string(),
        score,
        difficulty,
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
            .single()
            .expect("valid date"),
        vec!["Ant".to_string()],
        "en".to_string(),
    )
}

#[tokio::test]
async fn test_http_judge_round_trip() {
    let scripted = ScriptedJudge::new(vec![accept("Anteaters eat ants", "🐜")]);
    let addr = spawn_word_battle(scripted.clone()).await;
    let judge = HttpJudge::new(format!("http://{}/check-word", addr));

    let result = judge.evaluate(&request("Anteater")).await.expect("evaluate failed");
    assert!(result.accepted);
    assert_eq!(result.explanation, "Anteaters eat ants");
    assert_eq!(result.emoji, "🐜");

    let seen = scripted.requests().await;
    assert_eq!(seen, vec![request("Anteater")]);
}

#[tokio::test]
async fn test_http_judge_surfaces_server_error() {
    // An empty script makes the scripted judge fail, so the server answers 500.
    let addr = spawn_word_battle(ScriptedJudge::new(vec![])).await;
    let judge = HttpJudge::new(format!("http://{}/check-word", addr));

    let err = judge.evaluate(&request("Anteater")).await.unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::UpstreamRejected);
}

#[tokio::test]
async fn test_http_judge_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);

    let judge = HttpJudge::new(format!("http://{}/check-word", addr));
    let err = judge.evaluate(&request("Anteater")).await.unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::Network);
}

#[tokio::test]
async fn test_http_judge_times_out() {
    let addr = spawn_stalled_server().await;
    let judge = HttpJudge::new(format!("http://{}/check-word", addr))
        .with_timeout(Duration::from_millis(200));

    let err = judge.evaluate(&request("Anteater")).await.unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::Network);
}

#[tokio::test]
async fn test_http_leaderboard_round_trip() {
    let addr = spawn_word_battle(ScriptedJudge::new(vec![])).await;
    let store =
        HttpLeaderboard::new(&format!("http://{}/leaderboard", addr)).expect("Invalid URL");

    let stored = store
        .submit(entry("Ada", 4, Difficulty::Hard))
        .await
        .expect("submit failed");
    assert!(*stored.id() > 0);
    store
        .submit(entry("Grace", 6, Difficulty::Easy))
        .await
        .expect("submit failed");

    let all = store
        .list_top(DifficultyFilter::All, NonZeroUsize::new(10).expect("nonzero"))
        .await
        .expect("list failed");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].entry().player_name(), "Grace");

    let hard = store
        .list_top(
            DifficultyFilter::Only(Difficulty::Hard),
            NonZeroUsize::new(5).expect("nonzero"),
        )
        .await
        .expect("list failed");
    assert_eq!(hard, vec![stored]);
}

#[tokio::test]
async fn test_http_leaderboard_refused_entry() {
    let addr = spawn_word_battle(ScriptedJudge::new(vec![])).await;
    let store =
        HttpLeaderboard::new(&format!("http://{}/leaderboard", addr)).expect("Invalid URL");

    let err = store
        .submit(entry(&"x".repeat(25), 1, Difficulty::Easy))
        .await
        .unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::InvalidEntry);
}

#[tokio::test]
async fn test_http_leaderboard_wrong_path_is_unavailable() {
    let addr = spawn_word_battle(ScriptedJudge::new(vec![])).await;
    let store =
        HttpLeaderboard::new(&format!("http://{}/no-such-path", addr)).expect("Invalid URL");

    let err = store
        .list_top(DifficultyFilter::All, NonZeroUsize::new(5).expect("nonzero"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::Unavailable);

    let err = store
        .submit(entry("Ada", 4, Difficulty::Hard))
        .await
        .unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::Unavailable);
}

#[tokio::test]
async fn test_http_leaderboard_times_out() {
    let addr = spawn_stalled_server().await;
    let store = HttpLeaderboard::new(&format!("http://{}/leaderboard", addr))
        .expect("Invalid URL")
        .with_timeout(Duration::from_millis(200));

    let err = store
        .list_top(DifficultyFilter::All, NonZeroUsize::new(5).expect("nonzero"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::Unavailable);
}

#[test]
fn test_http_leaderboard_rejects_bad_url() {
    let err = HttpLeaderboard::new("not a url").unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::Unavailable);
}

/// A chat completions endpoint that records the request and answers with
/// `content`.
async fn spawn_fake_openai(content: &'static str) -> (SocketAddr, Arc<Mutex<Option<Value>>>) {
    let seen = Arc::new(Mutex::new(None));
    let recorder = Arc::clone(&seen);
    let app = Router::new().route(
        "/v1/chat/completions",
        post(move |Json(body): Json<Value>| {
            let recorder = Arc::clone(&recorder);
            async move {
                *recorder.lock().await = Some(body);
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": content } }]
                }))
            }
        }),
    );
    (spawn_server(app).await, seen)
}

#[tokio::test]
async fn test_llm_judge_parses_completion() {
    let reply = r#"{"explication_pour_ou_contre": "Anteaters eat ants", "mot_precedent": "Ant", "mot_soumis_par_utilisateur": "Anteater", "smiley_correspondant_au_mot": "🐜", "mot_deja_utiliser_precedement": false, "succes": true}"#;
    let (addr, seen) = spawn_fake_openai(reply).await;
    let config = LlmConfig::new(
        LlmProvider::OpenAI,
        "test-key".to_string(),
        "gpt-4o-mini".to_string(),
        100,
        0.65,
    )
    .with_endpoint(format!("http://{}/v1/chat/completions", addr));
    let judge = LlmJudge::new(config);

    let result = judge.evaluate(&request("Anteater")).await.expect("evaluate failed");
    assert!(result.accepted);
    assert_eq!(result.emoji, "🐜");

    let body = seen.lock().await.clone().expect("no request recorded");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["messages"][1]["content"], "Anteater");
    let system = body["messages"][0]["content"].as_str().expect("system prompt");
    assert!(system.contains("[\"Ant\"]"));
}

#[tokio::test]
async fn test_llm_judge_refuses_prose() {
    let (addr, _) = spawn_fake_openai("Sure! Anteaters definitely win.").await;
    let config = LlmConfig::new(
        LlmProvider::OpenAI,
        "test-key".to_string(),
        "gpt-4o-mini".to_string(),
        100,
        0.65,
    )
    .with_endpoint(format!("http://{}/v1/chat/completions", addr));
    let judge = LlmJudge::new(config);

    let err = judge.evaluate(&request("Anteater")).await.unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::InvalidResponse);
}

#[tokio::test]
async fn test_llm_judge_times_out() {
    let addr = spawn_stalled_server().await;
    let config = LlmConfig::new(
        LlmProvider::OpenAI,
        "test-key".to_string(),
        "gpt-4o-mini".to_string(),
        100,
        0.65,
    )
    .with_endpoint(format!("http://{}/v1/chat/completions", addr))
    .with_timeout(Duration::from_millis(200));
    let judge = LlmJudge::new(config);

    let err = judge.evaluate(&request("Anteater")).await.unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::Network);
}
