//! Workspace integration tests against a mock Onevo API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use onevo_core::{
    CreateClientRequest, MemorySelectionStore, SelectionStore, SubscriptionStatus, Workspace,
    WorkspaceConfig,
};

fn workspace_for(server: &MockServer) -> Workspace {
    let config = WorkspaceConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "tenant-1",
        SecretString::from("test-token"),
    );
    Workspace::oneshot(config).unwrap()
}

fn workspace_with_selection(server: &MockServer, store: Arc<MemorySelectionStore>) -> Workspace {
    let config = WorkspaceConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "tenant-1",
        SecretString::from("test-token"),
    );
    Workspace::new(config, store).unwrap()
}

fn client_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "tenantId": "tenant-1",
        "name": name,
        "status": "Active",
        "createdAt": "2026-01-10T08:00:00Z",
    })
}

// ── Entity store semantics ──────────────────────────────────────────

#[tokio::test]
async fn failed_load_preserves_snapshot_and_sets_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([client_json("1", "Acme"), client_json("2", "Globex")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    ws.load_clients().await.unwrap();
    assert_eq!(ws.store().clients.len(), 2);

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "database unavailable",
        })))
        .mount(&server)
        .await;

    let err = ws.load_clients().await.unwrap_err();
    assert!(err.to_string().contains("database unavailable"));

    // Previous snapshot intact, error flag raised.
    assert_eq!(ws.store().clients.len(), 2);
    assert!(ws.store().clients.error().is_some());
    assert!(!ws.store().clients.is_loading());
}

#[tokio::test]
async fn create_client_inserts_once_sorted_and_selects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": client_json("c-acme", "Acme"),
        })))
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    ws.load_clients().await.unwrap();
    assert!(ws.store().clients.is_empty());

    let created = ws
        .create_client(CreateClientRequest::new("Acme"))
        .await
        .unwrap();
    assert_eq!(created.name, "Acme");

    let snapshot = ws.store().clients.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, "c-acme");
    assert_eq!(ws.selection().active_client_id().as_deref(), Some("c-acme"));
    assert!(ws.selection().show_client_sidebar());
}

#[tokio::test]
async fn clients_sort_by_name_case_insensitive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            client_json("3", "zenith"),
            client_json("1", "acme"),
            client_json("2", "Borealis"),
        ])))
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    ws.load_clients().await.unwrap();

    let names: Vec<String> = ws
        .store()
        .clients
        .snapshot()
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(names, vec!["acme", "Borealis", "zenith"]);
}

#[tokio::test]
async fn delete_active_client_falls_back_to_first_remaining() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            client_json("1", "Acme"),
            client_json("2", "Borealis"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/clients/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    ws.load_clients().await.unwrap();
    ws.selection().set_active("1");

    ws.delete_client("1").await.unwrap();
    assert_eq!(ws.selection().active_client_id().as_deref(), Some("2"));

    server.reset().await;
    Mock::given(method("DELETE"))
        .and(path("/clients/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    ws.delete_client("2").await.unwrap();
    assert!(ws.selection().active_client_id().is_none());
    assert!(!ws.selection().show_client_sidebar());
}

// ── Selection reconciliation ────────────────────────────────────────

#[tokio::test]
async fn load_self_heals_stale_persisted_selection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            client_json("a", "Alpha"),
            client_json("b", "Beta"),
            client_json("c", "Gamma"),
        ])))
        .mount(&server)
        .await;

    let persisted = Arc::new(MemorySelectionStore::new());
    persisted.set("Z");

    let ws = workspace_with_selection(&server, Arc::clone(&persisted));
    ws.load_clients().await.unwrap();

    assert_eq!(ws.selection().active_client_id().as_deref(), Some("a"));
    assert_eq!(persisted.get().as_deref(), Some("a"));
}

#[tokio::test]
async fn route_resolution_loads_once_and_selects_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            client_json("42", "Acme"),
            client_json("7", "Borealis"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    ws.resolve_route(None, "/agency/client/42/dashboard")
        .await
        .unwrap();

    assert_eq!(ws.selection().active_client_id().as_deref(), Some("42"));
    server.verify().await;
}

#[tokio::test]
async fn route_resolution_leaves_selection_for_unknown_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            client_json("1", "Acme"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let persisted = Arc::new(MemorySelectionStore::new());
    persisted.set("1");
    let ws = workspace_with_selection(&server, persisted);

    ws.resolve_route(None, "/agency/client/404/dashboard")
        .await
        .unwrap();

    // Target never appeared; selection keeps its previous value
    // (reconciled against the freshly loaded collection).
    assert_eq!(ws.selection().active_client_id().as_deref(), Some("1"));
    server.verify().await;
}

#[tokio::test]
async fn route_without_client_segment_clears_selection() {
    let server = MockServer::start().await;
    let ws = workspace_for(&server);
    ws.selection().set_active("1");

    ws.resolve_route(None, "/agency/billing").await.unwrap();
    assert!(ws.selection().active_client_id().is_none());
}

// ── Billing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_subscription_is_empty_state_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscriptions/tenant/tenant-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    ws.load_subscription().await.unwrap();

    assert!(ws.store().subscription.get().is_none());
    assert!(ws.store().subscription.error().is_none());
    assert!((ws.monthly_total()).abs() < f64::EPSILON);
}

#[tokio::test]
async fn checkout_refetches_server_confirmed_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscriptions/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "checkoutUrl": "https://pay.example.com/session/abc",
                "sessionId": "abc",
            },
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subscriptions/tenant/tenant-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub-1",
            "tenantId": "tenant-1",
            "planId": "pro",
            "subscriptionType": "Agency",
            "status": "Active",
            "currentAccountCount": 4,
            "monthlyPrice": 25.0,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    let session = ws.checkout("pro", None, None).await.unwrap();
    assert_eq!(session.session_id.as_deref(), Some("abc"));

    let sub = ws.store().subscription.get().unwrap();
    assert_eq!(sub.plan_id, "pro");
    assert_eq!(sub.status, SubscriptionStatus::Active);
    server.verify().await;
}

#[tokio::test]
async fn monthly_total_derives_from_loaded_snapshots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/billingplans"))
        .and(query_param("subscriptionType", "Agency"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "bp-1",
            "planId": "agency",
            "name": "Agency",
            "subscriptionType": "Agency",
            "monthlyPrice": 10.0,
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subscriptions/tenant/tenant-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub-1",
            "tenantId": "tenant-1",
            "planId": "agency",
            "subscriptionType": "Agency",
            "status": "Active",
            "currentAccountCount": 5,
            "monthlyPrice": 10.0,
        })))
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    ws.load_billing_plans().await.unwrap();
    ws.load_subscription().await.unwrap();

    assert!((ws.monthly_total() - 50.0).abs() < f64::EPSILON);
    let current = ws.current_plan().unwrap();
    assert_eq!(current.plan_id, "agency");
    assert!(ws.is_current_plan(&current));
}

#[tokio::test]
async fn payment_methods_404_loads_as_empty_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/paymentmethods"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    ws.load_payment_methods().await.unwrap();

    assert!(ws.store().payment_methods.is_empty());
    assert!(ws.store().payment_methods.error().is_none());
}

// ── Webhooks ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_webhook_rejects_malformed_url_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooksubscriptions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    let err = ws
        .create_webhook(onevo_core::CreateWebhookRequest {
            platform: "instagram".into(),
            callback_url: "not a url".into(),
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not a valid callback URL"));
    server.verify().await;
}

#[tokio::test]
async fn create_webhook_returns_one_time_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooksubscriptions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "id": "wh-1",
                "tenantId": "tenant-1",
                "platform": "instagram",
                "callbackUrl": "https://hooks.example.com/ig",
                "webhookToken": "secret-token",
            },
        })))
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    let created = ws
        .create_webhook(onevo_core::CreateWebhookRequest {
            platform: "instagram".into(),
            callback_url: "https://hooks.example.com/ig".into(),
        })
        .await
        .unwrap();

    assert_eq!(created.webhook_token.as_deref(), Some("secret-token"));
    assert_eq!(ws.store().webhooks.len(), 1);
}

// ── Shutdown ────────────────────────────────────────────────────────

#[tokio::test]
async fn shutdown_cancels_pending_operations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let ws = workspace_for(&server);
    let pending = ws.clone();
    let handle = tokio::spawn(async move { pending.load_clients().await });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    ws.shutdown();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(onevo_core::CoreError::Cancelled)));
    // Cancellation clears the loading flag without raising the error flag.
    assert!(!ws.store().clients.is_loading());
    assert!(ws.store().clients.error().is_none());
}
