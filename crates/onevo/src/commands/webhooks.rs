//! `onevo webhooks` — platform webhook subscriptions and events.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use onevo_core::{CreateWebhookRequest, Workspace};

use crate::cli::{GlobalOpts, WebhooksCommand};
use crate::error::{CliError, CliResult};
use crate::output::{self, opt, opt_date};

use super::util::{confirm, finish_spinner, open_workspace, spinner};

#[derive(Tabled, Serialize)]
struct WebhookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "PLATFORM")]
    platform: String,
    #[tabled(rename = "CALLBACK")]
    callback_url: String,
    #[tabled(rename = "ACTIVE")]
    active: String,
    #[tabled(rename = "VERIFIED")]
    verified: String,
    #[tabled(rename = "EVENTS")]
    events: String,
    #[tabled(rename = "SUCCESS")]
    success_rate: String,
}

#[derive(Tabled, Serialize)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "PLATFORM")]
    platform: String,
    #[tabled(rename = "TYPE")]
    event_type: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "RECEIVED")]
    received: String,
}

pub async fn handle(opts: &GlobalOpts, command: WebhooksCommand) -> CliResult {
    let workspace = open_workspace(opts)?;

    match command {
        WebhooksCommand::List => list(opts, &workspace).await,
        WebhooksCommand::Create { platform, url } => {
            let req = CreateWebhookRequest {
                platform,
                callback_url: url,
            };
            create(opts, &workspace, req).await
        }
        WebhooksCommand::Delete { id } => delete(opts, &workspace, &id).await,
        WebhooksCommand::Events => events(opts, &workspace).await,
    }
}

async fn list(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    let pb = spinner(opts, "Loading webhooks...");
    let result = workspace.load_webhooks().await;
    finish_spinner(pb);
    result?;

    let rows: Vec<WebhookRow> = workspace
        .store()
        .webhooks
        .snapshot()
        .iter()
        .map(|wh| WebhookRow {
            id: wh.id.clone(),
            platform: wh.platform.clone(),
            callback_url: wh.callback_url.clone(),
            active: yes_no(wh.is_active),
            verified: yes_no(wh.is_verified),
            events: wh.total_events_received.to_string(),
            success_rate: wh
                .success_rate()
                .map_or_else(|| "-".to_owned(), |r| format!("{r:.1}%")),
        })
        .collect();

    output::render_list(opts, &rows, |row| row.id.clone())
}

async fn create(opts: &GlobalOpts, workspace: &Workspace, req: CreateWebhookRequest) -> CliResult {
    let pb = spinner(opts, "Registering webhook...");
    let result = workspace.create_webhook(req).await;
    finish_spinner(pb);
    let webhook = result?;

    let fields = [
        ("id", webhook.id.clone()),
        ("platform", webhook.platform.clone()),
        ("callback", webhook.callback_url.clone()),
        ("verified", yes_no(webhook.is_verified)),
    ];
    output::render_single(opts, webhook.as_ref(), &fields)?;

    // The token is only ever returned on create; make it hard to miss.
    if let Some(ref token) = webhook.webhook_token {
        if output::should_color(opts) {
            eprintln!();
            eprintln!("{}", "Webhook token (shown only once — store it now):".yellow().bold());
        } else {
            eprintln!();
            eprintln!("Webhook token (shown only once — store it now):");
        }
        println!("{token}");
    }
    Ok(())
}

async fn delete(opts: &GlobalOpts, workspace: &Workspace, id: &str) -> CliResult {
    workspace.load_webhooks().await?;

    let webhook = workspace
        .store()
        .webhooks
        .get(id)
        .ok_or_else(|| CliError::NotFound {
            entity_type: "webhook".into(),
            identifier: id.to_owned(),
        })?;

    confirm(
        opts,
        &format!(
            "Delete the {} webhook for {}?",
            webhook.platform, webhook.callback_url
        ),
    )?;

    workspace.delete_webhook(id).await?;

    if !opts.quiet {
        eprintln!("webhook deleted");
    }
    Ok(())
}

async fn events(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    let pb = spinner(opts, "Loading webhook events...");
    let result = workspace.load_webhook_events().await;
    finish_spinner(pb);
    result?;

    let rows: Vec<EventRow> = workspace
        .store()
        .webhook_events
        .snapshot()
        .iter()
        .map(|ev| EventRow {
            id: ev.id.clone(),
            platform: opt(ev.platform.as_deref()),
            event_type: opt(ev.event_type.as_deref()),
            status: opt(ev.status.as_deref()),
            received: opt_date(ev.received_at.as_ref()),
        })
        .collect();

    output::render_list(opts, &rows, |row| row.id.clone())
}

fn yes_no(b: bool) -> String {
    if b { "yes" } else { "no" }.to_owned()
}
