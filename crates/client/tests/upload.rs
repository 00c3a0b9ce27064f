//! Integration tests for the upload workflow against a counting mock
//! gateway/pinner

mod fixtures;

use std::sync::atomic::Ordering::SeqCst;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use parking_lot::Mutex;

use client::error::UploadError;
use client::upload::{UploadFile, UploadJob, UploadState, Uploader, MAX_UPLOAD_SIZE};
use fixtures::{
    locked_key_session, plain_key_session, signerless_session, spawn_mock, Hits, MockConfig,
};

#[tokio::test]
async fn test_success_round_trip() {
    let hits = Arc::new(Hits::default());
    let base = spawn_mock(MockConfig::ok(hits.clone())).await;
    let (session, public, _dir) = plain_key_session();

    let job = UploadJob::new(UploadFile::new("a.txt", vec![7u8; 1024]), &base, &base);
    let result = Uploader::new().upload(&job, &session, None).await.unwrap();

    // exactly the gateway's fields plus the endpoints used, unmodified
    assert_eq!(result.hash, "Qm123");
    assert_eq!(result.name, "a.txt");
    assert_eq!(result.size, Some(1024));
    assert_eq!(result.up_endpoint, base);
    assert_eq!(result.pin_endpoint, base);

    assert_eq!(job.state(), UploadState::Done);
    assert_eq!(job.progress(), 100);
    assert_eq!(hits.add.load(SeqCst), 1);
    assert_eq!(hits.pin.load(SeqCst), 1);

    // the auth header is Basic base64("account:signature") with a valid
    // signature over the account identifier, reused by both requests
    let auth = hits.auth.lock().clone().unwrap();
    let encoded = auth.strip_prefix("Basic ").unwrap();
    let decoded = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
    let (account, signature) = decoded.split_once(':').unwrap();
    assert_eq!(account, session.account());
    assert!(public.verify(account.as_bytes(), signature).is_ok());

    // the pin order carried the returned content identifier and name
    let pin_body = hits.pin_body.lock().clone().unwrap();
    assert_eq!(pin_body["cid"], "Qm123");
    assert_eq!(pin_body["name"], "a.txt");
}

#[tokio::test]
async fn test_oversized_file_fails_before_any_network_call() {
    let hits = Arc::new(Hits::default());
    let base = spawn_mock(MockConfig::ok(hits.clone())).await;
    let (session, _public, _dir) = plain_key_session();

    let file = UploadFile::new("big.bin", vec![0u8; (MAX_UPLOAD_SIZE + 1) as usize]);
    let job = UploadJob::new(file, &base, &base);
    let err = Uploader::new().upload(&job, &session, None).await.unwrap_err();

    assert!(matches!(err, UploadError::FileTooLarge { .. }));
    assert_eq!(job.state(), UploadState::Failed);
    assert_eq!(job.progress(), 0);
    assert_eq!(hits.add.load(SeqCst), 0);
    assert_eq!(hits.pin.load(SeqCst), 0);
}

#[tokio::test]
async fn test_session_without_signer_fails_before_any_network_call() {
    let hits = Arc::new(Hits::default());
    let base = spawn_mock(MockConfig::ok(hits.clone())).await;
    let (session, _dir) = signerless_session();

    let job = UploadJob::new(UploadFile::new("a.txt", vec![7u8; 64]), &base, &base);
    let err = Uploader::new().upload(&job, &session, None).await.unwrap_err();

    assert!(matches!(err, UploadError::SigningUnavailable));
    assert_eq!(hits.add.load(SeqCst), 0);
    assert_eq!(hits.pin.load(SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_during_upload_prevents_pin() {
    let hits = Arc::new(Hits::default());
    let config = MockConfig {
        add_delay: Duration::from_secs(10),
        ..MockConfig::ok(hits.clone())
    };
    let base = spawn_mock(config).await;
    let (session, _public, _dir) = plain_key_session();

    let job = UploadJob::new(UploadFile::new("a.txt", vec![7u8; 1024]), &base, &base);
    let handle = job.handle();

    let task = tokio::spawn(async move {
        let result = Uploader::new().upload(&job, &session, None).await;
        (job.state(), job.progress(), result)
    });

    // wait until the add request has actually reached the mock gateway
    for _ in 0..500 {
        if hits.add.load(SeqCst) >= 1 && handle.state() == UploadState::Uploading {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(handle.cancel());

    let (state, progress, result) = task.await.unwrap();
    assert!(matches!(result, Err(UploadError::Cancelled)));
    assert_eq!(state, UploadState::Cancelled);
    assert_eq!(progress, 0);

    // no pin request is issued after a cancelled upload
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(hits.pin.load(SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_during_pin_aborts_before_completion() {
    let hits = Arc::new(Hits::default());
    let config = MockConfig {
        pin_delay: Duration::from_secs(10),
        ..MockConfig::ok(hits.clone())
    };
    let base = spawn_mock(config).await;
    let (session, _public, _dir) = plain_key_session();

    let job = UploadJob::new(UploadFile::new("a.txt", vec![7u8; 1024]), &base, &base);
    let handle = job.handle();

    let task = tokio::spawn(async move {
        let result = Uploader::new().upload(&job, &session, None).await;
        (job.state(), job.progress(), result)
    });

    // wait until the pin request has actually reached the mock pinner
    for _ in 0..500 {
        if hits.pin.load(SeqCst) >= 1 && handle.state() == UploadState::Pinning {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(handle.cancel());

    let (state, progress, result) = task.await.unwrap();
    assert!(matches!(result, Err(UploadError::Cancelled)));
    assert_eq!(state, UploadState::Cancelled);
    assert_eq!(progress, 0);
    assert_eq!(hits.add.load(SeqCst), 1);
    assert_eq!(hits.pin.load(SeqCst), 1);
}

#[tokio::test]
async fn test_progress_is_monotonic_and_capped_until_pin() {
    let hits = Arc::new(Hits::default());
    let base = spawn_mock(MockConfig::ok(hits.clone())).await;
    let (session, _public, _dir) = plain_key_session();

    let seen: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    // several chunks' worth of data so progress is committed more than once
    let job = UploadJob::new(
        UploadFile::new("big.bin", vec![1u8; 256 * 1024]),
        &base,
        &base,
    )
    .on_progress(move |value| sink.lock().push(value));

    Uploader::new().upload(&job, &session, None).await.unwrap();

    let values = seen.lock().clone();
    assert!(values.len() >= 2);
    assert!(values.windows(2).all(|w| w[0] <= w[1]));

    // bounded by 99 until the pin step completes, then exactly 100
    let (last, before) = values.split_last().unwrap();
    assert_eq!(*last, 100);
    assert!(before.iter().all(|v| *v <= 99));
}

#[tokio::test]
async fn test_gateway_failure_resets_progress_and_skips_pin() {
    let hits = Arc::new(Hits::default());
    let config = MockConfig {
        add_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..MockConfig::ok(hits.clone())
    };
    let base = spawn_mock(config).await;
    let (session, _public, _dir) = plain_key_session();

    let job = UploadJob::new(UploadFile::new("a.txt", vec![7u8; 1024]), &base, &base);
    let err = Uploader::new().upload(&job, &session, None).await.unwrap_err();

    assert!(matches!(
        err,
        UploadError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR, _)
    ));
    assert_eq!(job.state(), UploadState::Failed);
    assert_eq!(job.progress(), 0);
    assert_eq!(hits.pin.load(SeqCst), 0);
}

#[tokio::test]
async fn test_pin_failure_resets_progress() {
    let hits = Arc::new(Hits::default());
    let config = MockConfig {
        pin_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..MockConfig::ok(hits.clone())
    };
    let base = spawn_mock(config).await;
    let (session, _public, _dir) = plain_key_session();

    let job = UploadJob::new(UploadFile::new("a.txt", vec![7u8; 1024]), &base, &base);
    let err = Uploader::new().upload(&job, &session, None).await.unwrap_err();

    assert!(matches!(
        err,
        UploadError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR, _)
    ));
    assert_eq!(job.state(), UploadState::Failed);
    assert_eq!(job.progress(), 0);
    assert_eq!(hits.add.load(SeqCst), 1);
    assert_eq!(hits.pin.load(SeqCst), 1);
}

#[tokio::test]
async fn test_wrong_passphrase_is_a_signing_failure() {
    let hits = Arc::new(Hits::default());
    let base = spawn_mock(MockConfig::ok(hits.clone())).await;

    // a locked local key resolved through the real resolver
    let (session, _public, _dir) = locked_key_session("hunter2");

    let job = UploadJob::new(UploadFile::new("a.txt", vec![7u8; 64]), &base, &base);
    let err = Uploader::new()
        .upload(&job, &session, Some("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::SigningFailed(_)));
    assert_eq!(job.state(), UploadState::Failed);
    assert_eq!(hits.add.load(SeqCst), 0);
}
