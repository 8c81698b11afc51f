// Hand-crafted async HTTP client for the Onevo REST backend.
//
// Auth: `Authorization: Bearer <token>` header.
// Response shapes: raw payloads or `{success, data, message, errors}`
// envelopes — both are normalized in `decode_payload`.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types;

// ── Envelope shape ───────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct Envelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Onevo REST API.
///
/// Bearer-token authentication, JSON endpoints under the tenant's API
/// base URL.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a bearer token and transport config.
    ///
    /// Injects `Authorization: Bearer …` as a sensitive default header
    /// on every request.
    pub fn from_token(
        base_url: &str,
        token: &secrecy::SecretString,
        transport: &crate::TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidToken)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and guarantee a trailing slash so relative
    /// joins keep the full path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"clients"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    /// GET for an optional resource: a 404 (or explicit `data: null`)
    /// yields `Ok(None)` instead of an error.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (optional)");

        let resp = self.http.get(url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response::<Option<T>>(resp).await
    }

    async fn get_optional_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?} (optional)");

        let resp = self.http.get(url).query(params).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response::<Option<T>>(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// POST with no request body and no meaningful response payload
    /// (e.g. `subscriptions/{id}/cancel`).
    async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        self.handle_empty(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            decode_payload(status.as_u16(), &body)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            // Some deployments still wrap empty responses in an envelope;
            // a `success: false` there is an error even on HTTP 2xx.
            let body = resp.text().await?;
            if body.trim().is_empty() {
                return Ok(());
            }
            if let Ok(value) = serde_json::from_str::<Value>(&body) {
                unwrap_envelope(status.as_u16(), value)?;
            }
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(env) = serde_json::from_str::<Envelope>(&raw) {
            if env.message.is_some() || env.errors.is_some() {
                return Error::Api {
                    status: status.as_u16(),
                    message: env.message.unwrap_or_else(|| status.to_string()),
                    errors: env.errors.unwrap_or_default(),
                };
            }
        }

        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
            errors: Vec::new(),
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Clients ──────────────────────────────────────────────────────

    pub async fn list_clients(&self) -> Result<Vec<types::ClientResponse>, Error> {
        self.get("clients").await
    }

    pub async fn create_client(
        &self,
        body: &types::ClientCreateUpdate,
    ) -> Result<types::ClientResponse, Error> {
        self.post("clients", body).await
    }

    pub async fn update_client(
        &self,
        client_id: &str,
        body: &types::ClientCreateUpdate,
    ) -> Result<types::ClientResponse, Error> {
        self.put(&format!("clients/{client_id}"), body).await
    }

    pub async fn delete_client(&self, client_id: &str) -> Result<(), Error> {
        self.delete(&format!("clients/{client_id}")).await
    }

    // ── Billing ──────────────────────────────────────────────────────

    pub async fn list_billing_plans(
        &self,
        subscription_type: &str,
    ) -> Result<Vec<types::BillingPlanResponse>, Error> {
        self.get_with_params(
            "billingplans",
            &[("subscriptionType", subscription_type.to_owned())],
        )
        .await
    }

    /// The tenant's current subscription, or `None` if no subscription
    /// exists yet (404 is an expected empty state here).
    pub async fn get_tenant_subscription(
        &self,
        tenant_id: &str,
    ) -> Result<Option<types::SubscriptionResponse>, Error> {
        self.get_optional(&format!("subscriptions/tenant/{tenant_id}"))
            .await
    }

    pub async fn create_subscription(
        &self,
        body: &types::SubscriptionCreateRequest,
    ) -> Result<types::SubscriptionResponse, Error> {
        self.post("subscriptions", body).await
    }

    pub async fn checkout(
        &self,
        body: &types::CheckoutRequest,
    ) -> Result<types::CheckoutSessionResponse, Error> {
        self.post("subscriptions/checkout", body).await
    }

    /// Request cancellation. The server defers the actual status change
    /// to period end; callers must re-fetch to observe the result.
    pub async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), Error> {
        self.post_empty(&format!("subscriptions/{subscription_id}/cancel"))
            .await
    }

    pub async fn set_subscription_account_count(
        &self,
        subscription_id: &str,
        body: &types::AccountCountRequest,
    ) -> Result<types::SubscriptionResponse, Error> {
        self.put(&format!("subscriptions/{subscription_id}/account-count"), body)
            .await
    }

    pub async fn list_invoices(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<types::InvoiceResponse>, Error> {
        self.get_with_params("invoices", &[("tenantId", tenant_id.to_owned())])
            .await
    }

    /// Payment methods are optional per tenant — a 404 means none are
    /// on file, not an error.
    pub async fn list_payment_methods(
        &self,
        tenant_id: &str,
    ) -> Result<Option<Vec<types::PaymentMethodResponse>>, Error> {
        self.get_optional_with_params("paymentmethods", &[("tenantId", tenant_id.to_owned())])
            .await
    }

    // ── Webhooks ─────────────────────────────────────────────────────

    pub async fn list_webhook_subscriptions(
        &self,
    ) -> Result<Vec<types::WebhookSubscriptionResponse>, Error> {
        self.get("webhooksubscriptions").await
    }

    pub async fn create_webhook_subscription(
        &self,
        body: &types::WebhookCreateRequest,
    ) -> Result<types::WebhookSubscriptionResponse, Error> {
        self.post("webhooksubscriptions", body).await
    }

    pub async fn delete_webhook_subscription(&self, subscription_id: &str) -> Result<(), Error> {
        self.delete(&format!("webhooksubscriptions/{subscription_id}"))
            .await
    }

    pub async fn list_webhook_events(&self) -> Result<Vec<types::WebhookEventResponse>, Error> {
        self.get("webhooks/events").await
    }

    // ── Published posts ──────────────────────────────────────────────

    pub async fn list_published_posts(&self) -> Result<Vec<types::PublishedPostResponse>, Error> {
        self.get("posts/published").await
    }

    pub async fn get_published_post(
        &self,
        post_id: &str,
    ) -> Result<types::PublishedPostResponse, Error> {
        self.get(&format!("posts/published/{post_id}")).await
    }

    pub async fn list_publish_logs(
        &self,
        post_id: &str,
    ) -> Result<Vec<types::PublishLogResponse>, Error> {
        self.get(&format!("posts/{post_id}/publish-logs")).await
    }
}

// ── Payload normalization ────────────────────────────────────────────

/// Decode a success body that may be either a raw payload or a
/// `{success, data, message, errors}` envelope.
fn decode_payload<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        let preview = truncate_preview(body, 200);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })?;

    let payload = unwrap_envelope(status, value)?;

    serde_json::from_value(payload).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

/// Cut a diagnostic preview at most `max` bytes long, stepping back to
/// a char boundary so multi-byte bodies never split mid-character.
fn truncate_preview(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// If `value` is an envelope object, validate `success` and extract
/// `data`; otherwise the value itself is the payload.
fn unwrap_envelope(status: u16, value: Value) -> Result<Value, Error> {
    if let Value::Object(ref map) = value {
        if let Some(success) = map.get("success").and_then(Value::as_bool) {
            if !success {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request failed")
                    .to_owned();
                let errors = map
                    .get("errors")
                    .and_then(Value::as_array)
                    .map(|arr| {
                        arr.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_owned)
                            .collect()
                    })
                    .unwrap_or_default();
                return Err(Error::Api {
                    status,
                    message,
                    errors,
                });
            }
            return Ok(map.get("data").cloned().unwrap_or(Value::Null));
        }
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raw_array_passes_through() {
        let decoded: Vec<u32> = decode_payload(200, "[1,2,3]").unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn envelope_data_is_extracted() {
        let body = r#"{"success":true,"data":[1,2],"message":null,"errors":null}"#;
        let decoded: Vec<u32> = decode_payload(200, body).unwrap();
        assert_eq!(decoded, vec![1, 2]);
    }

    #[test]
    fn failed_envelope_is_api_error_even_on_2xx() {
        let body = r#"{"success":false,"message":"plan not found","errors":["bad planId"]}"#;
        let result: Result<Vec<u32>, _> = decode_payload(200, body);
        match result {
            Err(Error::Api {
                status,
                message,
                errors,
            }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "plan not found");
                assert_eq!(errors, vec!["bad planId"]);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn envelope_null_data_decodes_to_none() {
        let body = r#"{"success":true,"data":null}"#;
        let decoded: Option<u32> = decode_payload(200, body).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn object_without_success_field_is_raw_payload() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct P {
            id: String,
        }
        let decoded: P = decode_payload(200, r#"{"id":"abc"}"#).unwrap();
        assert_eq!(decoded.id, "abc");
    }

    #[test]
    fn malformed_body_reports_preview() {
        let result: Result<Vec<u32>, _> = decode_payload(200, "<html>oops</html>");
        match result {
            Err(Error::Deserialization { message, .. }) => {
                assert!(message.contains("body preview"));
            }
            other => panic!("expected Deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn long_multibyte_body_previews_without_panicking() {
        // Proxy error pages often mix ASCII with multi-byte punctuation
        // right at the truncation point.
        let body = format!("{}{}", "x".repeat(199), "é".repeat(5));
        let result: Result<Vec<u32>, _> = decode_payload(502, &body);
        match result {
            Err(Error::Deserialization { message, body: b }) => {
                assert!(message.contains("body preview"));
                assert_eq!(b, body);
            }
            other => panic!("expected Deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let body = "é".repeat(120);
        let preview = truncate_preview(&body, 199);
        assert_eq!(preview.len(), 198);
        assert!(preview.chars().all(|c| c == 'é'));
        assert_eq!(truncate_preview("short", 200), "short");
    }
}
