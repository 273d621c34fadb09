//! Shared test utilities for brandhub-web integration tests
//!
//! Provides an in-memory database, a temp-dir object store with failure
//! injection, a counting style analyzer and request builders.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use brandhub_common::config::{BrandHubConfig, Overrides, TomlConfig};
use brandhub_common::db::init_memory_database;
use brandhub_common::{Error, Result};
use brandhub_web::services::style_check::{
    StyleAnalyzer, StyleCheckRequest, StyleCheckResult, Suggestion,
};
use brandhub_web::storage::{Bucket, LocalObjectStore, ObjectStore};
use brandhub_web::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

pub const BOUNDARY: &str = "brandhub-test-boundary";

/// Filesystem store that can be told to fail uploads or removals
pub struct TestStore {
    inner: LocalObjectStore,
    fail_uploads: AtomicBool,
    fail_removes: AtomicBool,
    remove_requests: Mutex<Vec<(Bucket, Vec<String>)>>,
}

impl TestStore {
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    /// Every path passed to `remove` for a bucket, in call order
    pub fn removed_paths(&self, bucket: Bucket) -> Vec<String> {
        self.remove_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(b, _)| *b == bucket)
            .flat_map(|(_, paths)| paths.clone())
            .collect()
    }

    pub async fn exists(&self, bucket: Bucket, path: &str) -> bool {
        self.inner.download(bucket, path).await.is_ok()
    }
}

#[async_trait]
impl ObjectStore for TestStore {
    async fn upload(&self, bucket: Bucket, path: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(Error::Storage("injected upload failure".to_string()));
        }
        self.inner.upload(bucket, path, bytes, content_type).await
    }

    async fn download(&self, bucket: Bucket, path: &str) -> Result<Vec<u8>> {
        self.inner.download(bucket, path).await
    }

    async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<()> {
        self.remove_requests
            .lock()
            .unwrap()
            .push((bucket, paths.to_vec()));
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(Error::Storage("injected remove failure".to_string()));
        }
        self.inner.remove(bucket, paths).await
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        self.inner.public_url(bucket, path)
    }
}

/// Analyzer that counts invocations and returns a canned verdict
pub struct CountingAnalyzer {
    calls: AtomicUsize,
    fail: AtomicBool,
    last_prompt: Mutex<Option<String>>,
}

impl CountingAnalyzer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl StyleAnalyzer for CountingAnalyzer {
    async fn analyze(&self, request: &StyleCheckRequest) -> Result<StyleCheckResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::RemoteService("model unavailable".to_string()));
        }
        Ok(StyleCheckResult {
            alignment_score: 87.0,
            alignment_summary: "Strong match with the brand voice".to_string(),
            suggestions: vec![Suggestion {
                is_positive: true,
                text: "Consistent use of the primary color".to_string(),
            }],
        })
    }
}

/// Everything a test needs, kept alive together
pub struct TestContext {
    pub db: SqlitePool,
    pub store: Arc<TestStore>,
    pub analyzer: Arc<CountingAnalyzer>,
    pub state: AppState,
    _root: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let root = TempDir::new().expect("Should create temp dir");
        let config = BrandHubConfig::resolve(
            &Overrides {
                root_folder: Some(root.path().to_path_buf()),
                ..Default::default()
            },
            TomlConfig::default(),
        )
        .expect("Should resolve config");

        let db = init_memory_database().await.expect("Should open memory database");

        let local = LocalObjectStore::new(config.storage_root(), "http://localhost:5740");
        local.ensure_buckets().await.expect("Should create buckets");
        let store = Arc::new(TestStore {
            inner: local,
            fail_uploads: AtomicBool::new(false),
            fail_removes: AtomicBool::new(false),
            remove_requests: Mutex::new(Vec::new()),
        });
        let analyzer = Arc::new(CountingAnalyzer {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            last_prompt: Mutex::new(None),
        });

        let state = AppState::new(db.clone(), store.clone(), analyzer.clone(), &config)
            .expect("Should build state");

        Self {
            db,
            store,
            analyzer,
            state,
            _root: root,
        }
    }

    pub fn app(&self) -> Router {
        build_router(self.state.clone())
    }
}

/// Insert a subscription row as the billing webhook would
pub async fn grant_subscription(db: &SqlitePool, user_id: Uuid, status: &str) {
    sqlx::query(
        "INSERT INTO subscriptions (id, user_id, status, provider_subscription_id, plan_id)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id.to_string())
    .bind(status)
    .bind(format!("ls_{}", user_id.simple()))
    .bind("441000")
    .execute(db)
    .await
    .expect("Should insert subscription");
}

/// Request without a body
pub fn test_request(method: &str, uri: &str, user: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

/// Request with a JSON body
pub fn json_request(method: &str, uri: &str, user: Option<Uuid>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// One part of a multipart body
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Request with a multipart/form-data body
pub fn multipart_request(method: &str, uri: &str, user: Uuid, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        field, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user.to_string())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Extract raw body bytes from response
pub async fn extract_bytes(body: Body) -> Vec<u8> {
    body.collect()
        .await
        .expect("Should read body")
        .to_bytes()
        .to_vec()
}
