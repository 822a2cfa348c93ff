// tests/integration/rpc_ledger_test.rs

//! `RpcLedger` against a local JSON-RPC stub.

use super::fixtures::*;
use super::test_helpers::RpcStub;
use actionchain::core::errors::LedgerError;
use actionchain::core::ledger::{Commitment, Ledger, RpcLedger};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

fn ok(result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "result": result })
}

fn with_context(value: Value) -> Value {
    ok(json!({ "context": { "slot": 312_000_200 }, "value": value }))
}

async fn stub(responses: Vec<(&'static str, Value)>) -> RpcStub {
    RpcStub::start(responses.into_iter().collect::<HashMap<_, _>>(), Duration::ZERO).await
}

#[tokio::test]
async fn test_get_latest_blockhash() {
    let stub = stub(vec![(
        "getLatestBlockhash",
        with_context(json!({
            "blockhash": test_blockhash().to_string(),
            "lastValidBlockHeight": 290_000_150u64,
        })),
    )])
    .await;
    let ledger = RpcLedger::new(&stub.ledger_config(Duration::from_secs(5))).unwrap();

    let latest = ledger.get_latest_blockhash().await.unwrap();
    assert_eq!(latest.blockhash, test_blockhash());
    assert_eq!(latest.last_valid_block_height, 290_000_150);

    let requests = stub.recorded();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["jsonrpc"], "2.0");
    assert_eq!(requests[0]["method"], "getLatestBlockhash");
}

#[tokio::test]
async fn test_malformed_blockhash() {
    let stub = stub(vec![(
        "getLatestBlockhash",
        with_context(json!({ "blockhash": "not a hash", "lastValidBlockHeight": 1 })),
    )])
    .await;
    let ledger = RpcLedger::new(&stub.ledger_config(Duration::from_secs(5))).unwrap();

    let err = ledger.get_latest_blockhash().await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_get_signature_status() {
    let stub = stub(vec![(
        "getSignatureStatuses",
        with_context(json!([{
            "slot": 312_000_123u64,
            "confirmations": null,
            "err": null,
            "status": { "Ok": null },
            "confirmationStatus": "finalized",
        }])),
    )])
    .await;
    let ledger = RpcLedger::new(&stub.ledger_config(Duration::from_secs(5))).unwrap();

    let status = ledger
        .get_signature_status(&test_signature())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status.confirmation_status, Some(Commitment::Finalized));
    assert_eq!(status.slot, 312_000_123);

    let params = &stub.recorded()[0]["params"];
    assert_eq!(params[0], json!([test_signature().to_string()]));
    assert_eq!(params[1]["searchTransactionHistory"], true);
}

#[tokio::test]
async fn test_unknown_signature_status() {
    let stub = stub(vec![("getSignatureStatuses", with_context(json!([null])))]).await;
    let ledger = RpcLedger::new(&stub.ledger_config(Duration::from_secs(5))).unwrap();

    let status = ledger.get_signature_status(&test_signature()).await.unwrap();
    assert!(status.is_none());
}

#[tokio::test]
async fn test_get_parsed_transaction() {
    let stub = stub(vec![(
        "getTransaction",
        ok(json!({
            "slot": 312_000_123u64,
            "blockTime": 1_730_000_000i64,
            "meta": { "err": null, "fee": 5000 },
            "transaction": { "signatures": [test_signature().to_string()] },
            "version": "legacy",
        })),
    )])
    .await;
    let ledger = RpcLedger::new(&stub.ledger_config(Duration::from_secs(5))).unwrap();

    let tx = ledger
        .get_parsed_transaction(&test_signature(), Commitment::Confirmed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tx, parsed_transaction());

    let params = &stub.recorded()[0]["params"];
    assert_eq!(params[0], test_signature().to_string());
    assert_eq!(
        params[1],
        json!({
            "encoding": "jsonParsed",
            "commitment": "confirmed",
            "maxSupportedTransactionVersion": 0,
        })
    );
}

#[tokio::test]
async fn test_missing_transaction_is_none() {
    let stub = stub(vec![("getTransaction", ok(Value::Null))]).await;
    let ledger = RpcLedger::new(&stub.ledger_config(Duration::from_secs(5))).unwrap();

    let tx = ledger
        .get_parsed_transaction(&test_signature(), Commitment::Confirmed)
        .await
        .unwrap();
    assert!(tx.is_none());
}

#[tokio::test]
async fn test_rpc_error_object() {
    let stub = stub(vec![]).await;
    let ledger = RpcLedger::new(&stub.ledger_config(Duration::from_secs(5))).unwrap();

    let err = ledger.get_latest_blockhash().await.unwrap_err();
    assert_eq!(
        err,
        LedgerError::Rpc {
            code: -32601,
            message: "Method not found".into(),
        }
    );
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let stub = RpcStub::start(
        HashMap::from([("getSignatureStatuses", with_context(json!([null])))]),
        Duration::from_millis(500),
    )
    .await;
    let ledger = RpcLedger::new(&stub.ledger_config(Duration::from_millis(50))).unwrap();

    let err = ledger
        .get_signature_status(&test_signature())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::Timeout {
            method: "getSignatureStatuses"
        }
    );
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = actionchain::config::LedgerConfig {
        rpc_url: format!("http://{addr}/"),
        timeout: Duration::from_secs(2),
        search_transaction_history: true,
    };
    let ledger = RpcLedger::new(&config).unwrap();

    let err = ledger.get_latest_blockhash().await.unwrap_err();
    assert!(matches!(err, LedgerError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn test_client_timeout_keeps_method_name() {
    let stub = RpcStub::start(HashMap::new(), Duration::from_millis(500)).await;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(20))
        .build()
        .unwrap();

    let err = client
        .post(stub.url())
        .json(&json!({ "jsonrpc": "2.0", "id": 1, "method": "getTransaction", "params": [] }))
        .send()
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(
        LedgerError::from_reqwest("getTransaction", err),
        LedgerError::Timeout {
            method: "getTransaction"
        }
    );
}
