//! Wire-to-domain conversions.
//!
//! Enum-like string fields are parsed leniently: an unrecognized value
//! falls back to a serviceable default instead of failing the whole
//! fetch, since the backend may grow variants this build predates.

use onevo_api::types::{
    BillingPlanResponse, CheckoutSessionResponse, ClientResponse, InvoiceResponse,
    PaymentMethodResponse, PublishLogResponse, PublishedPostResponse, SubscriptionResponse,
    WebhookEventResponse, WebhookSubscriptionResponse,
};

use crate::model::{
    BillingPlan, CheckoutSession, Client, ClientStatus, Invoice, PaymentMethod, PublishLog,
    PublishedPost, Subscription, SubscriptionStatus, SubscriptionType, WebhookEvent,
    WebhookSubscription,
};

impl From<ClientResponse> for Client {
    fn from(wire: ClientResponse) -> Self {
        Self {
            id: wire.id,
            tenant_id: wire.tenant_id,
            name: wire.name,
            description: wire.description,
            industry: wire.industry,
            website: wire.website,
            primary_contact_name: wire.primary_contact_name,
            primary_contact_email: wire.primary_contact_email,
            status: wire.status.parse().unwrap_or(ClientStatus::Active),
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

impl From<BillingPlanResponse> for BillingPlan {
    fn from(wire: BillingPlanResponse) -> Self {
        Self {
            id: wire.id,
            plan_id: wire.plan_id,
            name: wire.name,
            subscription_type: wire
                .subscription_type
                .parse()
                .unwrap_or(SubscriptionType::User),
            monthly_price: wire.monthly_price,
            account_limit: wire.account_limit,
            max_posts_per_month: wire.max_posts_per_month,
            analytics_enabled: wire.analytics_enabled,
            team_features_enabled: wire.team_features_enabled,
            is_active: wire.is_active,
        }
    }
}

impl From<SubscriptionResponse> for Subscription {
    fn from(wire: SubscriptionResponse) -> Self {
        Self {
            id: wire.id,
            tenant_id: wire.tenant_id,
            plan_id: wire.plan_id,
            subscription_type: wire
                .subscription_type
                .parse()
                .unwrap_or(SubscriptionType::User),
            status: wire.status.parse().unwrap_or(SubscriptionStatus::Active),
            current_account_count: wire.current_account_count,
            account_limit: wire.account_limit,
            monthly_price: wire.monthly_price,
            current_period_start: wire.current_period_start,
            current_period_end: wire.current_period_end,
            cancel_at_period_end: wire.cancel_at_period_end,
            trial_ends_at: wire.trial_ends_at,
        }
    }
}

impl From<CheckoutSessionResponse> for CheckoutSession {
    fn from(wire: CheckoutSessionResponse) -> Self {
        Self {
            checkout_url: wire.checkout_url,
            session_id: wire.session_id,
        }
    }
}

impl From<InvoiceResponse> for Invoice {
    fn from(wire: InvoiceResponse) -> Self {
        Self {
            id: wire.id,
            tenant_id: wire.tenant_id,
            invoice_number: wire.invoice_number,
            amount: wire.amount,
            currency: wire.currency,
            status: wire.status,
            due_date: wire.due_date,
            paid_at: wire.paid_at,
            created_at: wire.created_at,
        }
    }
}

impl From<PaymentMethodResponse> for PaymentMethod {
    fn from(wire: PaymentMethodResponse) -> Self {
        Self {
            id: wire.id,
            tenant_id: wire.tenant_id,
            provider: wire.provider,
            card_brand: wire.card_brand,
            card_last4: wire.card_last4,
            exp_month: wire.exp_month,
            exp_year: wire.exp_year,
            is_default: wire.is_default,
        }
    }
}

impl From<WebhookSubscriptionResponse> for WebhookSubscription {
    fn from(wire: WebhookSubscriptionResponse) -> Self {
        Self {
            id: wire.id,
            tenant_id: wire.tenant_id,
            platform: wire.platform,
            callback_url: wire.callback_url,
            webhook_token: wire.webhook_token,
            is_active: wire.is_active,
            is_verified: wire.is_verified,
            total_events_received: wire.total_events_received,
            successful_events: wire.successful_events,
            failed_events: wire.failed_events,
            created_at: wire.created_at,
        }
    }
}

impl From<WebhookEventResponse> for WebhookEvent {
    fn from(wire: WebhookEventResponse) -> Self {
        Self {
            id: wire.id,
            subscription_id: wire.subscription_id,
            platform: wire.platform,
            event_type: wire.event_type,
            status: wire.status,
            received_at: wire.received_at,
        }
    }
}

impl From<PublishedPostResponse> for PublishedPost {
    fn from(wire: PublishedPostResponse) -> Self {
        Self {
            id: wire.id,
            client_id: wire.client_id,
            platform: wire.platform,
            content: wire.content,
            media_urls: wire.media_urls,
            status: wire.status,
            external_url: wire.external_url,
            published_at: wire.published_at,
        }
    }
}

impl From<PublishLogResponse> for PublishLog {
    fn from(wire: PublishLogResponse) -> Self {
        Self {
            id: wire.id,
            post_id: wire.post_id,
            platform: wire.platform,
            status: wire.status,
            message: wire.message,
            attempted_at: wire.attempted_at,
        }
    }
}
