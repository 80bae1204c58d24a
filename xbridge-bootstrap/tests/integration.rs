//! End-to-end resolver tests against an in-process JSON-RPC ledger.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use xbridge_bootstrap::env::{ASSET_MINT_KEY, TWO_WAY_PEG_KEY};
use xbridge_bootstrap::{
    AccountSelection, BootstrapConfig, BootstrapError, GuardianSetting, LedgerRpc,
    ProgramIdResolver, ProgramIdSet, Pubkey, PublicEnv, Resolution, ResolverSettings, RpcConfig,
    SolanaRpcClient, PLACEHOLDER_ID,
};

#[derive(Clone)]
enum Behaviour {
    /// Serve the bootstrap account and the guardian setting.
    Ledger {
        bootstrap: Vec<Vec<u8>>,
        guardian: Option<Vec<u8>>,
    },
    /// Answer every call with a JSON-RPC error object.
    RpcError,
    /// Sleep before answering.
    Slow(Duration),
}

#[derive(Clone)]
struct MockLedger {
    behaviour: Behaviour,
    calls: Arc<AtomicUsize>,
}

async fn handle_rpc(State(ledger): State<MockLedger>, Json(request): Json<Value>) -> Json<Value> {
    ledger.calls.fetch_add(1, Ordering::SeqCst);
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    assert_eq!(request["params"][1]["encoding"], "base64");

    let result = match &ledger.behaviour {
        Behaviour::RpcError => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32602, "message": "Invalid param" }
            }));
        }
        Behaviour::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            json!([])
        }
        Behaviour::Ledger { bootstrap, guardian } => match method.as_str() {
            "getProgramAccounts" => Value::Array(
                bootstrap
                    .iter()
                    .enumerate()
                    .map(|(i, data)| {
                        json!({
                            "pubkey": Pubkey::new([200 + i as u8; 32]).to_string(),
                            "account": {
                                "data": [STANDARD.encode(data), "base64"],
                                "executable": false,
                                "lamports": 1_461_600,
                                "owner": bootstrapper().to_string(),
                                "rentEpoch": 0
                            }
                        })
                    })
                    .collect(),
            ),
            "getAccountInfo" => match guardian {
                Some(data) => json!({
                    "context": { "slot": 1 },
                    "value": {
                        "data": [STANDARD.encode(data), "base64"],
                        "executable": false,
                        "lamports": 2_000_000,
                        "owner": Pubkey::new([9; 32]).to_string(),
                        "rentEpoch": 0
                    }
                }),
                None => json!({ "context": { "slot": 1 }, "value": null }),
            },
            other => panic!("unexpected method {}", other),
        },
    };

    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

async fn spawn_ledger(behaviour: Behaviour) -> (SocketAddr, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/", post(handle_rpc))
        .with_state(MockLedger {
            behaviour,
            calls: calls.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    (addr, calls)
}

fn bootstrapper() -> Pubkey {
    Pubkey::new([100; 32])
}

fn guardian_address() -> Pubkey {
    Pubkey::new([101; 32])
}

fn key(n: u8) -> Pubkey {
    Pubkey::new([n; 32])
}

fn sample_config() -> BootstrapConfig {
    BootstrapConfig {
        certificate: key(1),
        buffer_program_id: key(2),
        bitcoin_spv_program_id: key(3),
        two_way_peg_program_id: key(4),
        liquidity_management_program_id: key(5),
        delegator_program_id: key(6),
        layer_ca_program_id: key(7),
    }
}

fn guardian_account() -> Vec<u8> {
    GuardianSetting {
        seed: 0,
        guardian_certificate: key(20),
        asset_mint: key(21),
        token_program_id: key(22),
        mint_authority: key(23),
        burn_authority: key(24),
    }
    .encode_account([7u8; 8])
}

fn settings() -> ResolverSettings {
    ResolverSettings {
        bootstrapper: Some(bootstrapper().to_string()),
        guardian_setting: Some(guardian_address().to_string()),
        selection: AccountSelection::First,
    }
}

fn client(addr: SocketAddr, timeout: Duration) -> SolanaRpcClient {
    SolanaRpcClient::new(RpcConfig {
        url: format!("http://{}", addr),
        timeout,
        ..Default::default()
    })
    .expect("client should build")
}

#[tokio::test]
async fn resolves_against_live_ledger() {
    let (addr, calls) = spawn_ledger(Behaviour::Ledger {
        bootstrap: vec![sample_config().encode()],
        guardian: Some(guardian_account()),
    })
    .await;

    let resolver = ProgramIdResolver::new(client(addr, Duration::from_secs(5)), settings());
    let resolved = resolver.resolve().await;

    assert_eq!(resolved.resolution, Resolution::Live);
    assert_eq!(resolved.program_ids, ProgramIdSet::from_bootstrap(&sample_config()));
    assert_eq!(resolved.asset_mint, key(21));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let env = PublicEnv::from_resolved(&resolved, "test");
    assert_eq!(env.get(TWO_WAY_PEG_KEY), Some(key(4).to_string().as_str()));
    assert_eq!(env.get(ASSET_MINT_KEY), Some(key(21).to_string().as_str()));
}

#[tokio::test]
async fn first_account_wins_when_several_exist() {
    let mut second = sample_config();
    second.two_way_peg_program_id = key(99);
    let (addr, _) = spawn_ledger(Behaviour::Ledger {
        bootstrap: vec![sample_config().encode(), second.encode()],
        guardian: None,
    })
    .await;

    let resolved = ProgramIdResolver::new(client(addr, Duration::from_secs(5)), settings())
        .resolve()
        .await;
    assert_eq!(resolved.program_ids.two_way_peg, key(4));
}

#[tokio::test]
async fn missing_guardian_account_falls_back_wholesale() {
    let (addr, _) = spawn_ledger(Behaviour::Ledger {
        bootstrap: vec![sample_config().encode()],
        guardian: None,
    })
    .await;

    let resolver = ProgramIdResolver::new(client(addr, Duration::from_secs(5)), settings());
    let err = resolver.try_resolve().await.unwrap_err();
    assert!(matches!(err, BootstrapError::NotFound(_)));

    let resolved = resolver.resolve().await;
    assert!(resolved.is_fallback());
    assert_eq!(resolved.program_ids, ProgramIdSet::fallback());
    assert_eq!(resolved.asset_mint.to_string(), PLACEHOLDER_ID);
}

#[tokio::test]
async fn empty_program_account_list_falls_back() {
    let (addr, _) = spawn_ledger(Behaviour::Ledger {
        bootstrap: vec![],
        guardian: Some(guardian_account()),
    })
    .await;

    let resolved = ProgramIdResolver::new(client(addr, Duration::from_secs(5)), settings())
        .resolve()
        .await;
    assert!(resolved.is_fallback());
    assert_eq!(resolved.program_ids, ProgramIdSet::fallback());
}

#[tokio::test]
async fn rpc_error_object_is_reported() {
    let (addr, _) = spawn_ledger(Behaviour::RpcError).await;
    let rpc = client(addr, Duration::from_secs(5));

    let err = rpc.get_program_accounts(&bootstrapper()).await.unwrap_err();
    match err {
        BootstrapError::Rpc { code, message } => {
            assert_eq!(code, -32602);
            assert_eq!(message, "Invalid param");
        }
        other => panic!("expected rpc error, got {:?}", other),
    }

    let resolved = ProgramIdResolver::new(rpc, settings()).resolve().await;
    assert!(resolved.is_fallback());
}

#[tokio::test]
async fn request_timeout_falls_back() {
    let (addr, _) = spawn_ledger(Behaviour::Slow(Duration::from_secs(2))).await;
    let rpc = client(addr, Duration::from_millis(200));

    let err = rpc.get_program_accounts(&bootstrapper()).await.unwrap_err();
    assert!(matches!(err, BootstrapError::Network(_)));

    let resolved = ProgramIdResolver::new(rpc, settings()).resolve().await;
    assert!(resolved.is_fallback());
    assert_eq!(resolved.asset_mint, Pubkey::PLACEHOLDER);
}

#[tokio::test]
async fn unreachable_endpoint_falls_back() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let resolved = ProgramIdResolver::new(client(addr, Duration::from_secs(2)), settings())
        .resolve()
        .await;
    assert!(resolved.is_fallback());
    assert_eq!(resolved.program_ids, ProgramIdSet::fallback());
}
