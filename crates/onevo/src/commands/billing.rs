//! `onevo billing` — plans, subscription, invoices, payment methods.

use serde::Serialize;
use tabled::Tabled;

use onevo_core::Workspace;
use onevo_core::model::{BillingPlan, Subscription};

use crate::cli::{BillingCommand, GlobalOpts};
use crate::error::{CliError, CliResult};
use crate::output::{self, opt, opt_date, price};

use super::util::{confirm, finish_spinner, open_workspace, spinner};

#[derive(Tabled, Serialize)]
struct PlanRow {
    #[tabled(rename = "PLAN")]
    plan_id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PRICE/MO")]
    monthly_price: String,
    #[tabled(rename = "ACCOUNTS")]
    account_limit: String,
    #[tabled(rename = "POSTS/MO")]
    max_posts: String,
    #[tabled(rename = "")]
    marker: String,
}

impl PlanRow {
    fn new(plan: &BillingPlan, workspace: &Workspace) -> Self {
        let marker = if workspace.is_current_plan(plan) {
            "current".to_owned()
        } else if workspace.can_upgrade(plan) {
            "upgrade".to_owned()
        } else {
            String::new()
        };
        Self {
            plan_id: plan.plan_id.clone(),
            name: plan.name.clone(),
            monthly_price: price(plan.monthly_price),
            account_limit: plan
                .account_limit
                .map_or_else(|| "unlimited".to_owned(), |n| n.to_string()),
            max_posts: plan
                .max_posts_per_month
                .map_or_else(|| "unlimited".to_owned(), |n| n.to_string()),
            marker,
        }
    }
}

#[derive(Tabled, Serialize)]
struct InvoiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "DUE")]
    due: String,
    #[tabled(rename = "PAID")]
    paid: String,
}

#[derive(Tabled, Serialize)]
struct PaymentMethodRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CARD")]
    card: String,
    #[tabled(rename = "EXPIRES")]
    expires: String,
    #[tabled(rename = "DEFAULT")]
    default: String,
}

pub async fn handle(opts: &GlobalOpts, command: BillingCommand) -> CliResult {
    let workspace = open_workspace(opts)?;

    match command {
        BillingCommand::Plans => plans(opts, &workspace).await,
        BillingCommand::Status => status(opts, &workspace).await,
        BillingCommand::Subscribe { plan } => subscribe(opts, &workspace, &plan).await,
        BillingCommand::Checkout {
            plan,
            success_url,
            cancel_url,
        } => checkout(opts, &workspace, &plan, success_url, cancel_url).await,
        BillingCommand::Cancel => cancel(opts, &workspace).await,
        BillingCommand::SetAccounts { count } => set_accounts(opts, &workspace, count).await,
        BillingCommand::Invoices => invoices(opts, &workspace).await,
        BillingCommand::PaymentMethods => payment_methods(opts, &workspace).await,
    }
}

async fn plans(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    let pb = spinner(opts, "Loading plans...");
    let plans = workspace.load_billing_plans().await;
    // Subscription is needed to mark current/upgrade; its absence is a
    // valid state, so a 404-free failure here is still reported.
    let sub = workspace.load_subscription().await;
    finish_spinner(pb);
    plans?;
    sub?;

    let rows: Vec<PlanRow> = workspace
        .store()
        .billing_plans
        .snapshot()
        .iter()
        .map(|p| PlanRow::new(p, workspace))
        .collect();

    output::render_list(opts, &rows, |row| row.plan_id.clone())
}

async fn status(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    let pb = spinner(opts, "Loading subscription...");
    let plans = workspace.load_billing_plans().await;
    let sub = workspace.load_subscription().await;
    finish_spinner(pb);
    plans?;
    sub?;

    let Some(sub) = workspace.store().subscription.get() else {
        if !opts.quiet {
            println!("No subscription. Run `onevo billing plans` to pick one.");
        }
        return Ok(());
    };

    let fields = subscription_fields(&sub, workspace);
    output::render_single(opts, sub.as_ref(), &fields)
}

fn subscription_fields(sub: &Subscription, workspace: &Workspace) -> Vec<(&'static str, String)> {
    let plan_name = workspace
        .current_plan()
        .map_or_else(|| sub.plan_id.clone(), |p| p.name.clone());

    vec![
        ("plan", plan_name),
        ("status", sub.status.to_string()),
        ("type", sub.subscription_type.to_string()),
        (
            "accounts",
            sub.current_account_count
                .map_or_else(|| "1".to_owned(), |n| n.to_string()),
        ),
        ("monthly total", price(workspace.monthly_total())),
        ("period start", opt_date(sub.current_period_start.as_ref())),
        ("period end", opt_date(sub.current_period_end.as_ref())),
        (
            "cancels at period end",
            if sub.cancel_at_period_end { "yes" } else { "no" }.to_owned(),
        ),
        ("trial ends", opt_date(sub.trial_ends_at.as_ref())),
    ]
}

async fn subscribe(opts: &GlobalOpts, workspace: &Workspace, plan_id: &str) -> CliResult {
    let pb = spinner(opts, "Creating subscription...");
    let result = workspace.create_subscription(plan_id).await;
    finish_spinner(pb);
    result?;

    if !opts.quiet {
        eprintln!("subscribed to '{plan_id}'");
    }
    status(opts, workspace).await
}

async fn checkout(
    opts: &GlobalOpts,
    workspace: &Workspace,
    plan_id: &str,
    success_url: Option<String>,
    cancel_url: Option<String>,
) -> CliResult {
    let pb = spinner(opts, "Starting checkout...");
    let result = workspace.checkout(plan_id, success_url, cancel_url).await;
    finish_spinner(pb);
    let session = result?;

    match session.checkout_url {
        Some(url) => {
            println!("{url}");
            if !opts.quiet {
                eprintln!("open this URL to complete payment");
            }
            Ok(())
        }
        None => Err(CliError::Internal {
            message: "checkout session did not include a URL".into(),
        }),
    }
}

async fn cancel(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    workspace.load_subscription().await?;

    if workspace.store().subscription.get().is_none() {
        return Err(CliError::NotFound {
            entity_type: "subscription".into(),
            identifier: workspace.config().tenant_id.clone(),
        });
    }

    confirm(
        opts,
        "Cancel the subscription at the end of the current period?",
    )?;

    workspace.cancel_subscription().await?;

    if !opts.quiet {
        eprintln!("cancellation requested");
    }
    status(opts, workspace).await
}

async fn set_accounts(opts: &GlobalOpts, workspace: &Workspace, count: u32) -> CliResult {
    if count == 0 {
        return Err(CliError::Validation {
            message: "account count must be at least 1".into(),
        });
    }

    workspace.load_subscription().await?;
    workspace.set_account_count(count).await?;

    if !opts.quiet {
        eprintln!("account count set to {count}");
    }
    status(opts, workspace).await
}

async fn invoices(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    let pb = spinner(opts, "Loading invoices...");
    let result = workspace.load_invoices().await;
    finish_spinner(pb);
    result?;

    let rows: Vec<InvoiceRow> = workspace
        .store()
        .invoices
        .snapshot()
        .iter()
        .map(|inv| InvoiceRow {
            id: inv.id.clone(),
            number: opt(inv.invoice_number.as_deref()),
            amount: format!("{} {}", price(inv.amount), inv.currency),
            status: inv.status.clone(),
            due: opt_date(inv.due_date.as_ref()),
            paid: opt_date(inv.paid_at.as_ref()),
        })
        .collect();

    output::render_list(opts, &rows, |row| row.id.clone())
}

async fn payment_methods(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    let pb = spinner(opts, "Loading payment methods...");
    let result = workspace.load_payment_methods().await;
    finish_spinner(pb);
    result?;

    let rows: Vec<PaymentMethodRow> = workspace
        .store()
        .payment_methods
        .snapshot()
        .iter()
        .map(|pm| PaymentMethodRow {
            id: pm.id.clone(),
            card: match (&pm.card_brand, &pm.card_last4) {
                (Some(brand), Some(last4)) => format!("{brand} •••• {last4}"),
                (Some(brand), None) => brand.clone(),
                _ => opt(pm.provider.as_deref()),
            },
            expires: match (pm.exp_month, pm.exp_year) {
                (Some(m), Some(y)) => format!("{m:02}/{y}"),
                _ => "-".into(),
            },
            default: if pm.is_default { "*".into() } else { String::new() },
        })
        .collect();

    output::render_list(opts, &rows, |row| row.id.clone())
}
