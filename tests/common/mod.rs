//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore, watch};
use word_battle::{
    DifficultyFilter, InMemoryLeaderboard, Judge, JudgeError, JudgeRequest, JudgeResult,
    LeaderboardEntry, LeaderboardStore, SessionView, StoreError, StoredEntry,
};

/// A ruling that accepts the word.
pub fn accept(explanation: &str, emoji: &str) -> Result<JudgeResult, JudgeError> {
    Ok(JudgeResult::new(
        true,
        explanation.to_string(),
        emoji.to_string(),
        false,
    ))
}

/// A ruling that rejects the word.
pub fn reject(explanation: &str) -> Result<JudgeResult, JudgeError> {
    Ok(JudgeResult::new(
        false,
        explanation.to_string(),
        "🤷".to_string(),
        false,
    ))
}

/// Judge that answers from a script, optionally waiting for a permit per call.
pub struct ScriptedJudge {
    answers: Mutex<VecDeque<Result<JudgeResult, JudgeError>>>,
    requests: Mutex<Vec<JudgeRequest>>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
}

impl ScriptedJudge {
    /// Answers immediately, in order.
    pub fn new(answers: Vec<Result<JudgeResult, JudgeError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    /// Holds every answer until [`ScriptedJudge::release`] is called.
    pub fn gated(answers: Vec<Result<JudgeResult, JudgeError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: Some(Semaphore::new(0)),
        })
    }

    /// Lets one held answer through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Number of evaluate calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<JudgeRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn evaluate(&self, request: &JudgeRequest) -> Result<JudgeResult, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .expect("gate closed")
                .forget();
        }
        self.answers
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(JudgeError::network("script exhausted")))
    }
}

/// Store that fails the first `failures` submissions, then stores in memory.
pub struct FlakyStore {
    failures: AtomicUsize,
    inner: InMemoryLeaderboard,
}

impl FlakyStore {
    pub fn new(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures: AtomicUsize::new(failures),
            inner: InMemoryLeaderboard::new(),
        })
    }
}

#[async_trait]
impl LeaderboardStore for FlakyStore {
    async fn list_top(
        &self,
        filter: DifficultyFilter,
        limit: NonZeroUsize,
    ) -> Result<Vec<StoredEntry>, StoreError> {
        self.inner.list_top(filter, limit).await
    }

    async fn submit(&self, entry: LeaderboardEntry) -> Result<StoredEntry, StoreError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::unavailable("database is down"));
        }
        self.inner.submit(entry).await
    }
}

/// Waits until a snapshot satisfies `predicate`, or panics after two minutes
/// (virtual time in paused tests).
pub async fn wait_for(
    views: &mut watch::Receiver<SessionView>,
    predicate: impl FnMut(&SessionView) -> bool,
) -> SessionView {
    tokio::time::timeout(Duration::from_secs(120), views.wait_for(predicate))
        .await
        .expect("timed out waiting for session view")
        .expect("session controller stopped")
        .clone()
}
