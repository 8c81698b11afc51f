// ── Workspace configuration ──

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Everything needed to open a workspace session against the Onevo API.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// API base URL (e.g. `https://api.onevo.app/v1`).
    pub api_url: Url,

    /// The tenant (agency or user account) this session belongs to.
    pub tenant_id: String,

    /// Bearer token for the API.
    pub token: SecretString,

    /// Which plan catalog applies to this tenant.
    pub subscription_type: crate::model::SubscriptionType,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl WorkspaceConfig {
    pub fn new(api_url: Url, tenant_id: impl Into<String>, token: SecretString) -> Self {
        Self {
            api_url,
            tenant_id: tenant_id.into(),
            token,
            subscription_type: crate::model::SubscriptionType::Agency,
            timeout: Duration::from_secs(30),
        }
    }
}
