//! Shared fixtures for edir-client integration tests.
//!
//! Mounts the eDirectory REST API endpoints on a wiremock server.

#![allow(dead_code)]

use edir_client::SessionClient;
use edir_core::config::ApiConfig;
use edir_core::Credentials;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PREFIX: &str = "/eDirAPI/v1";
pub const TREE: &str = "CORP-TREE";
pub const ORG: &str = "o=Org";
pub const ORIGIN: &str = "https://edir.test";
pub const SESSION_ID: &str = "f3a1c9d2e4b54a0b";
pub const TOKEN: &str = "csrf-7d1e2f";

pub const ALICE_AND_BOB: &str = "dn: cn=alice,ou=users,o=Org
objectClass: inetOrgPerson
cn: alice

dn: cn=bob,ou=users,o=Org
objectClass: inetOrgPerson
cn: bob
";

pub fn session_path() -> String {
    format!("{}/session", API_PREFIX)
}

pub fn token_path() -> String {
    format!("{}/{}/getanticsrftoken", API_PREFIX, TREE)
}

pub fn entries_path() -> String {
    format!("{}/{}/{}", API_PREFIX, TREE, ORG)
}

pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        url: Some(format!("{}{}", server.uri(), API_PREFIX)),
        origin: Some(ORIGIN.to_string()),
        tree: Some(TREE.to_string()),
        organization: Some(ORG.to_string()),
        ldap_server: Some("10.0.0.5".to_string()),
        verify_tls: false,
        timeout_secs: None,
    }
}

pub fn client(server: &MockServer) -> SessionClient {
    SessionClient::new(&api_config(server)).expect("client builds")
}

pub fn credentials() -> Credentials {
    Credentials {
        dn: "cn=admin,o=Org".to_string(),
        password: "s3cret".to_string(),
        ldap_server: "10.0.0.5".to_string(),
    }
}

pub fn session_cookie() -> String {
    format!("RSESSIONID={}", SESSION_ID)
}

/// Session endpoint answering 201 with the session cookie
pub async fn mount_open_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(session_path()))
        .and(header("Origin", ORIGIN))
        .and(body_json(json!({
            "dn": "cn=admin,o=Org",
            "password": "s3cret",
            "ldapserver": "10.0.0.5"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Set-Cookie", format!("{}; Path=/; HttpOnly", session_cookie()))
                .set_body_json(json!({ "result": "session created" })),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Token endpoint answering 200 with a quoted token body
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(token_path()))
        .and(header("Cookie", session_cookie().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("\"{}\"\n", TOKEN)))
        .expect(1)
        .mount(server)
        .await;
}

/// Session deletion answering with the given status
pub async fn mount_close_session(server: &MockServer, status: u16) {
    Mock::given(method("DELETE"))
        .and(path(session_path()))
        .and(header("Cookie", session_cookie().as_str()))
        .and(header("X-CSRF-Token", TOKEN))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

/// Entry creation answering every request with the given status
pub async fn mount_create_entries(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(entries_path()))
        .and(header("Cookie", session_cookie().as_str()))
        .and(header("X-CSRF-Token", TOKEN))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "status": status })))
        .expect(times)
        .mount(server)
        .await;
}
