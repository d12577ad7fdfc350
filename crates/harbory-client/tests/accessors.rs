//! Wire-level tests for the resource accessors against a mock backend.

use harbory_client::{ApiConfig, CredentialStore, HarboryClient, MemoryCredentialStore};
use harbory_core::ids::{ContainerId, ImageId, NodeId, VolumeName};
use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, store: Arc<MemoryCredentialStore>) -> HarboryClient {
    let config = ApiConfig::new(format!("{}/api", server.uri())).unwrap();
    HarboryClient::builder(config)
        .with_credential_store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn containers_list_and_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/containers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Id": "abc", "Names": ["/web"], "State": "running" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/containers/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Id": "abc", "Name": "/web", "State": { "Running": true } })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::default());

    let list = client.containers().list().await;
    assert!(list.is_ok());
    assert_eq!(list.data().unwrap()[0].display_name(), Some("web"));

    let id = ContainerId::parse_str("abc").unwrap();
    let details = client.containers().get(&id).await;
    assert_eq!(details.data().unwrap().name.as_deref(), Some("/web"));
}

#[tokio::test]
async fn image_get_and_prune() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images/sha256%3Aabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Id": "sha256:abc" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/images/prune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "pruned_images": null,
            "deleted_layers_count": 0,
            "space_reclaimed_mb": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::default());

    let id = ImageId::parse_str("sha256:abc").unwrap();
    assert_eq!(client.images().get(&id).await.data().unwrap().id, "sha256:abc");

    let prune = client.images().prune().await;
    assert_eq!(prune.status, "ok");
    let report = prune.into_data().unwrap();
    assert_eq!(report.status, "success");
    assert!(report.pruned_images.is_none());
}

#[tokio::test]
async fn namespaced_image_reference_is_one_encoded_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images/bitnami%2Fredis%3A7.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "sha256:5d1c",
            "RepoTags": ["bitnami/redis:7.2"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::default());
    let id = ImageId::parse_str("bitnami/redis:7.2").unwrap();
    let image = client.images().get(&id).await;

    assert!(image.is_ok());
    assert_eq!(image.data().unwrap().id, "sha256:5d1c");
}

#[tokio::test]
async fn volume_get_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/volumes/pgdata"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "Name": "pgdata", "Driver": "local" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::default());
    let name = VolumeName::parse_str("pgdata").unwrap();
    let volume = client.volumes().get(&name).await;
    assert_eq!(volume.data().unwrap().driver.as_deref(), Some("local"));
}

#[tokio::test]
async fn node_lookup_failure_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nodes/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "node not found" })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::default());
    let id = NodeId::parse_str("gone").unwrap();
    let node = client.nodes().get(&id).await;

    assert!(node.is_error());
    assert_eq!(node.error_message(), Some("HTTP error! status: 404"));
}

#[tokio::test]
async fn health_report_lands_in_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "timestamp": "2024-10-17T10:15:30Z",
            "uptime": "5m",
            "checks": { "docker": { "status": "ok", "latency_ms": 2 } }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::default());
    let health = client.health().check().await;

    assert!(health.is_ok());
    let report = health.into_data().unwrap();
    assert!(report.is_healthy());
    assert_eq!(report.checks["docker"].latency_ms, Some(2));
}

#[tokio::test]
async fn login_posts_password_without_storing_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "password": "secret" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "tok-1", "message": "Login successful" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let client = client_for(&server, store.clone());

    let response = client.auth().login("secret").await;
    assert_eq!(response.data().unwrap().token, "tok-1");
    assert!(store.get().unwrap().is_none());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid password" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::default());
    let response = client.auth().login("nope").await;

    assert!(response.is_unauthorized());
    assert_eq!(response.error_message(), Some("Unauthorized"));
}

#[tokio::test]
async fn logout_sends_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Logout successful" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryCredentialStore::with_token("tok")));
    let response = client.auth().logout().await;
    assert_eq!(response.data().unwrap().message, "Logout successful");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer tok"
    );
}

#[tokio::test]
async fn change_password_uses_snake_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/change-password"))
        .and(body_json(json!({ "old_password": "old", "new_password": "new" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Password changed successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::default());
    let response = client.auth().change_password("old", "new").await;
    assert!(response.is_ok());
}

#[tokio::test]
async fn verify_reports_valid_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Token is valid" })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryCredentialStore::with_token("tok")));
    let response = client.auth().verify().await;
    assert_eq!(response.data().unwrap().message, "Token is valid");
}

#[tokio::test]
async fn session_lifecycle_updates_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "fresh", "message": "Login successful" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let client = client_for(&server, store.clone());

    let established = client.auth().establish_session("secret").await;
    assert!(established.is_ok());
    assert_eq!(established.data().unwrap().message, "Login successful");
    assert_eq!(store.get().unwrap().unwrap().expose_secret(), "fresh");

    let ended = client.auth().end_session().await;
    assert!(ended.is_error());
    assert!(store.get().unwrap().is_none());
}

#[tokio::test]
async fn failed_login_leaves_store_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_token("previous"));
    let client = client_for(&server, store.clone());

    let response = client.auth().establish_session("secret").await;
    assert!(response.is_error());
    assert_eq!(store.get().unwrap().unwrap().expose_secret(), "previous");
}
