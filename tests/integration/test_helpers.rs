// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

#![allow(dead_code)]

use actionchain::config::{Config, LedgerConfig};
use actionchain::core::errors::LedgerError;
use actionchain::core::ledger::{
    Commitment, LatestBlockhash, Ledger, ParsedTransaction, SignatureStatus,
};
use actionchain::server::initialization::app_state;
use actionchain::server::router;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use solana_sdk::signature::Signature;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// A scripted `Ledger` that counts every call it receives.
pub struct MockLedger {
    blockhash: Mutex<Result<LatestBlockhash, LedgerError>>,
    status: Mutex<Result<Option<SignatureStatus>, LedgerError>>,
    transaction: Mutex<Result<Option<ParsedTransaction>, LedgerError>>,
    blockhash_calls: AtomicUsize,
    status_calls: AtomicUsize,
    transaction_calls: AtomicUsize,
    last_commitment: Mutex<Option<Commitment>>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    /// A ledger on which `test_signature()` is finalized.
    pub fn new() -> Self {
        Self {
            blockhash: Mutex::new(Ok(LatestBlockhash {
                blockhash: super::fixtures::test_blockhash(),
                last_valid_block_height: 290_000_150,
            })),
            status: Mutex::new(Ok(Some(super::fixtures::status(Some(
                Commitment::Finalized,
            ))))),
            transaction: Mutex::new(Ok(Some(super::fixtures::parsed_transaction()))),
            blockhash_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            transaction_calls: AtomicUsize::new(0),
            last_commitment: Mutex::new(None),
        }
    }

    pub fn set_blockhash(&self, result: Result<LatestBlockhash, LedgerError>) {
        *self.blockhash.lock().unwrap() = result;
    }

    pub fn set_status(&self, result: Result<Option<SignatureStatus>, LedgerError>) {
        *self.status.lock().unwrap() = result;
    }

    pub fn set_transaction(&self, result: Result<Option<ParsedTransaction>, LedgerError>) {
        *self.transaction.lock().unwrap() = result;
    }

    pub fn blockhash_calls(&self) -> usize {
        self.blockhash_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn transaction_calls(&self) -> usize {
        self.transaction_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.blockhash_calls() + self.status_calls() + self.transaction_calls()
    }

    pub fn last_commitment(&self) -> Option<Commitment> {
        *self.last_commitment.lock().unwrap()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, LedgerError> {
        self.blockhash_calls.fetch_add(1, Ordering::SeqCst);
        self.blockhash.lock().unwrap().clone()
    }

    async fn get_signature_status(
        &self,
        _signature: &Signature,
    ) -> Result<Option<SignatureStatus>, LedgerError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status.lock().unwrap().clone()
    }

    async fn get_parsed_transaction(
        &self,
        _signature: &Signature,
        commitment: Commitment,
    ) -> Result<Option<ParsedTransaction>, LedgerError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_commitment.lock().unwrap() = Some(commitment);
        self.transaction.lock().unwrap().clone()
    }
}

/// The action router wired to a `MockLedger`.
pub struct TestApp {
    pub ledger: Arc<MockLedger>,
    pub router: Router,
}

/// A decoded HTTP response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Creates a new test app with default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new test app with custom configuration
    pub fn with_config(config: Config) -> Self {
        let ledger = Arc::new(MockLedger::new());
        let state = app_state(&config, ledger.clone(), "http://127.0.0.1:3000")
            .expect("Failed to build app state");
        let router = router(state, &config.action).expect("Failed to build router");
        Self { ledger, router }
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<&str>) -> TestResponse {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "actions.test")
            .header("content-type", "application/json");
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn options(&self, path: &str) -> TestResponse {
        self.request(Method::OPTIONS, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, path, Some(&body.to_string())).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }
}

/// A JSON-RPC endpoint that answers each method with a canned `result`.
pub struct RpcStub {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<Value>>>,
}

impl RpcStub {
    /// Starts the stub on an ephemeral port. `responses` maps a method name to the
    /// full JSON-RPC response body; unknown methods get a -32601 error.
    pub async fn start(responses: HashMap<&'static str, Value>, delay: Duration) -> Self {
        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let responses = Arc::new(responses);

        let recorded = requests.clone();
        let app = Router::new().route(
            "/",
            axum::routing::post(move |axum::Json(request): axum::Json<Value>| {
                let responses = responses.clone();
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push(request.clone());
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let method = request["method"].as_str().unwrap_or_default();
                    let mut body = responses.get(method).cloned().unwrap_or_else(|| {
                        serde_json::json!({
                            "jsonrpc": "2.0",
                            "error": { "code": -32601, "message": "Method not found" },
                        })
                    });
                    body["id"] = request["id"].clone();
                    axum::Json(body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn ledger_config(&self, timeout: Duration) -> LedgerConfig {
        LedgerConfig {
            rpc_url: self.url(),
            timeout,
            search_transaction_history: true,
        }
    }

    pub fn recorded(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}
