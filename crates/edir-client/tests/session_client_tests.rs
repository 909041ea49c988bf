//! Session client tests against a mocked eDirectory REST API.

mod common;

use common::*;
use edir_client::{ClientError, Operation};
use edir_core::{parse_entries, EntryKind};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_open_session_reads_cookie() {
    let server = MockServer::start().await;
    mount_open_session(&server).await;

    let session_id = client(&server)
        .open_session(&credentials())
        .await
        .unwrap();

    assert_eq!(session_id.as_str(), SESSION_ID);
}

#[tokio::test]
async fn test_open_session_rejects_non_created_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(session_path()))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid credentials" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .open_session(&credentials())
        .await
        .unwrap_err();

    match &err {
        ClientError::UnexpectedStatus {
            operation,
            status,
            body,
        } => {
            assert_eq!(*operation, Operation::OpenSession);
            assert_eq!(*status, 401);
            assert_eq!(body, r#"{"error":"invalid credentials"}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_open_session_200_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(session_path()))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", session_cookie()),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .open_session(&credentials())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_open_session_without_cookie_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(session_path()))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let err = client(&server)
        .open_session(&credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::MissingSessionCookie { .. }));
}

#[tokio::test]
async fn test_open_session_transport_error() {
    // Nothing listens on the discard port.
    let mut config = api_config(&MockServer::start().await);
    config.url = Some("http://127.0.0.1:9/eDirAPI/v1".to_string());
    let client = edir_client::SessionClient::new(&config).unwrap();

    let err = client.open_session(&credentials()).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport {
            operation: Operation::OpenSession,
            ..
        }
    ));
}

#[tokio::test]
async fn test_acquire_token_strips_quotes() {
    let server = MockServer::start().await;
    mount_open_session(&server).await;
    mount_token(&server).await;

    let client = client(&server);
    let session_id = client.open_session(&credentials()).await.unwrap();
    let session = client.acquire_token(session_id).await.unwrap();

    assert_eq!(session.id().as_str(), SESSION_ID);
    assert_eq!(session.token().as_str(), TOKEN);
}

#[tokio::test]
async fn test_acquire_token_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_open_session(&server).await;
    Mock::given(method("GET"))
        .and(path(token_path()))
        .respond_with(ResponseTemplate::new(403).set_body_string("session expired"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let session_id = client.open_session(&credentials()).await.unwrap();
    let err = client.acquire_token(session_id).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.body(), Some("session expired"));
}

#[tokio::test]
async fn test_acquire_token_empty_body() {
    let server = MockServer::start().await;
    mount_open_session(&server).await;
    Mock::given(method("GET"))
        .and(path(token_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"\""))
        .mount(&server)
        .await;

    let client = client(&server);
    let session_id = client.open_session(&credentials()).await.unwrap();
    let err = client.acquire_token(session_id).await.unwrap_err();
    assert!(matches!(err, ClientError::EmptyToken));
}

#[tokio::test]
async fn test_create_entry_created() {
    let server = MockServer::start().await;
    mount_open_session(&server).await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path(entries_path()))
        .and(body_json(json!({
            "dn": "cn=alice,ou=users,o=Org",
            "attributes": {
                "cn": ["alice"],
                "objectClass": ["inetOrgPerson"]
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "dn": "cn=alice,ou=users,o=Org" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let session = client
        .acquire_token(client.open_session(&credentials()).await.unwrap())
        .await
        .unwrap();
    let entry = parse_entries(ALICE_AND_BOB, EntryKind::User).remove(0);

    let outcome = client.create_entry(&session, entry).await;

    assert!(outcome.succeeded);
    assert_eq!(outcome.status_code, Some(201));
    assert_eq!(
        outcome.response_body.as_deref(),
        Some(r#"{"dn":"cn=alice,ou=users,o=Org"}"#)
    );
    assert!(outcome.error_detail.is_none());
}

#[tokio::test]
async fn test_create_entry_rejected_keeps_status_and_body() {
    let server = MockServer::start().await;
    mount_open_session(&server).await;
    mount_token(&server).await;
    mount_create_entries(&server, 400, 1).await;

    let client = client(&server);
    let session = client
        .acquire_token(client.open_session(&credentials()).await.unwrap())
        .await
        .unwrap();
    let entry = parse_entries(ALICE_AND_BOB, EntryKind::User).remove(1);

    let outcome = client.create_entry(&session, entry).await;

    assert!(!outcome.succeeded);
    assert_eq!(outcome.status_code, Some(400));
    assert_eq!(outcome.error_detail.as_deref(), Some(r#"{"status":400}"#));
    assert_eq!(outcome.entry.dn(), "cn=bob,ou=users,o=Org");
}

#[tokio::test]
async fn test_close_session() {
    let server = MockServer::start().await;
    mount_open_session(&server).await;
    mount_token(&server).await;
    mount_close_session(&server, 204).await;

    let client = client(&server);
    let session = client
        .acquire_token(client.open_session(&credentials()).await.unwrap())
        .await
        .unwrap();

    client.close_session(session).await.unwrap();
}

#[tokio::test]
async fn test_close_session_requires_no_content() {
    let server = MockServer::start().await;
    mount_open_session(&server).await;
    mount_token(&server).await;
    mount_close_session(&server, 200).await;

    let client = client(&server);
    let session = client
        .acquire_token(client.open_session(&credentials()).await.unwrap())
        .await
        .unwrap();

    let err = client.close_session(session).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::UnexpectedStatus {
            operation: Operation::CloseSession,
            status: 200,
            ..
        }
    ));
}
