//! Shared test fixtures: a counting mock gateway/pinner and canned sessions
#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::SeqCst;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use tempfile::TempDir;

use common::crypto::{LocalKey, LockedKey, PublicKey, SecretKey};
use common::keyring::{KeyEntry, Keyring};
use common::session::{LoginUser, Session, SessionResolver, Wallet};
use common::store::Store;

/// What the mock endpoints observed
#[derive(Default)]
pub struct Hits {
    pub add: AtomicUsize,
    pub pin: AtomicUsize,
    pub auth: Mutex<Option<String>>,
    pub pin_body: Mutex<Option<serde_json::Value>>,
}

#[derive(Clone)]
pub struct MockConfig {
    pub hits: Arc<Hits>,
    /// Delay applied after the add request body is consumed, so a test can
    /// cancel while the call is still in flight
    pub add_delay: Duration,
    /// Same, for the pin request
    pub pin_delay: Duration,
    pub add_status: StatusCode,
    pub pin_status: StatusCode,
}

impl MockConfig {
    pub fn ok(hits: Arc<Hits>) -> Self {
        Self {
            hits,
            add_delay: Duration::ZERO,
            pin_delay: Duration::ZERO,
            add_status: StatusCode::OK,
            pin_status: StatusCode::OK,
        }
    }
}

/// Route test logs through `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn add_handler(
    State(config): State<MockConfig>,
    headers: HeaderMap,
    _body: axum::body::Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    config.hits.add.fetch_add(1, SeqCst);
    *config.hits.auth.lock() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    tokio::time::sleep(config.add_delay).await;
    (
        config.add_status,
        Json(json!({ "Hash": "Qm123", "Name": "a.txt", "Size": "1024" })),
    )
}

async fn pin_handler(
    State(config): State<MockConfig>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    config.hits.pin.fetch_add(1, SeqCst);
    *config.hits.pin_body.lock() = Some(body);
    tokio::time::sleep(config.pin_delay).await;
    config.pin_status
}

/// Serve a mock gateway + pinner on an ephemeral port, returning its base URL
pub async fn spawn_mock(config: MockConfig) -> String {
    init_tracing();
    let app = Router::new()
        .route("/api/v0/add", post(add_handler))
        .route("/psa/pins", post(pin_handler))
        .with_state(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A session backed by an in-memory plain keypair, resolved the real way
pub fn plain_key_session() -> (Session, PublicKey, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("store.json")).unwrap();

    let secret = SecretKey::generate();
    let public = secret.public();
    let address = public.to_address();

    let mut keyring = Keyring::new();
    keyring.insert(KeyEntry::Local {
        address: address.clone(),
        key: LocalKey::Plain(secret),
    });

    let mut resolver = SessionResolver::new(keyring, store);
    let session = resolver
        .login(LoginUser {
            account: address,
            wallet: Wallet::Chain,
        })
        .unwrap();

    (session, public, dir)
}

/// A session backed by a passphrase-locked keypair
pub fn locked_key_session(passphrase: &str) -> (Session, PublicKey, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("store.json")).unwrap();

    let secret = SecretKey::generate();
    let public = secret.public();
    let address = public.to_address();

    let mut keyring = Keyring::new();
    keyring.insert(KeyEntry::Local {
        address: address.clone(),
        key: LocalKey::Locked(LockedKey::seal(&secret, passphrase)),
    });

    let mut resolver = SessionResolver::new(keyring, store);
    let session = resolver
        .login(LoginUser {
            account: address,
            wallet: Wallet::Chain,
        })
        .unwrap();

    (session, public, dir)
}

/// An external-provider session, which resolves without a signer
pub fn signerless_session() -> (Session, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("store.json")).unwrap();

    let mut resolver = SessionResolver::new(Keyring::new(), store);
    let session = resolver
        .login(LoginUser {
            account: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".into(),
            wallet: Wallet::Metamask,
        })
        .unwrap();

    (session, dir)
}
