//! `onevo clients` — manage agency clients and the active selection.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use onevo_core::model::{Client, ClientStatus};
use onevo_core::{CreateClientRequest, UpdateClientRequest, Workspace};

use crate::cli::{ClientsCommand, GlobalOpts};
use crate::error::{CliError, CliResult};
use crate::output::{self, opt, opt_date};

use super::util::{confirm, finish_spinner, open_workspace, spinner};

#[derive(Tabled, Serialize)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "INDUSTRY")]
    industry: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "CONTACT")]
    contact: String,
    #[tabled(rename = "ACTIVE")]
    active: String,
}

impl ClientRow {
    fn new(client: &Client, active_id: Option<&str>) -> Self {
        Self {
            id: client.id.clone(),
            name: client.name.clone(),
            industry: opt(client.industry.as_deref()),
            status: client.status.to_string(),
            contact: opt(client.primary_contact_email.as_deref()),
            active: if active_id == Some(client.id.as_str()) {
                "*".into()
            } else {
                String::new()
            },
        }
    }
}

pub async fn handle(opts: &GlobalOpts, command: ClientsCommand) -> CliResult {
    let workspace = open_workspace(opts)?;

    match command {
        ClientsCommand::List => list(opts, &workspace).await,
        ClientsCommand::Get { id } => get(opts, &workspace, &id).await,
        ClientsCommand::Create {
            name,
            description,
            industry,
            website,
            contact_name,
            contact_email,
        } => {
            let mut req = CreateClientRequest::new(name);
            req.description = description;
            req.industry = industry;
            req.website = website;
            req.primary_contact_name = contact_name;
            req.primary_contact_email = contact_email;
            create(opts, &workspace, req).await
        }
        ClientsCommand::Update {
            id,
            name,
            description,
            industry,
            website,
            status,
        } => {
            let status = status
                .map(|s| {
                    s.parse::<ClientStatus>().map_err(|_| CliError::Validation {
                        message: format!("'{s}' is not a client status (active, inactive, archived)"),
                    })
                })
                .transpose()?;
            let req = UpdateClientRequest {
                name,
                description,
                industry,
                website,
                status,
                ..UpdateClientRequest::default()
            };
            update(opts, &workspace, &id, req).await
        }
        ClientsCommand::Delete { id } => delete(opts, &workspace, &id).await,
        ClientsCommand::Select { id, clear } => select(opts, &workspace, id.as_deref(), clear).await,
    }
}

async fn list(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    let pb = spinner(opts, "Loading clients...");
    let result = workspace.load_clients().await;
    finish_spinner(pb);
    result?;

    let active = workspace.selection().active_client_id();
    let rows: Vec<ClientRow> = workspace
        .store()
        .clients
        .snapshot()
        .iter()
        .map(|c| ClientRow::new(c, active.as_deref()))
        .collect();

    output::render_list(opts, &rows, |row| row.id.clone())
}

async fn get(opts: &GlobalOpts, workspace: &Workspace, id: &str) -> CliResult {
    workspace.load_clients().await?;

    let client = workspace
        .store()
        .clients
        .get(id)
        .ok_or_else(|| CliError::NotFound {
            entity_type: "client".into(),
            identifier: id.to_owned(),
        })?;

    print_client(opts, &client)
}

async fn create(opts: &GlobalOpts, workspace: &Workspace, req: CreateClientRequest) -> CliResult {
    let pb = spinner(opts, "Creating client...");
    let result = workspace.create_client(req).await;
    finish_spinner(pb);
    let client = result?;

    if !opts.quiet {
        if output::should_color(opts) {
            eprintln!(
                "{} created client '{}' and made it the active selection",
                "✓".green(),
                client.name
            );
        } else {
            eprintln!(
                "created client '{}' and made it the active selection",
                client.name
            );
        }
    }
    print_client(opts, &client)
}

async fn update(
    opts: &GlobalOpts,
    workspace: &Workspace,
    id: &str,
    req: UpdateClientRequest,
) -> CliResult {
    // The merge needs the current record, so load first.
    workspace.load_clients().await?;

    let client = workspace.update_client(id, req).await?;
    print_client(opts, &client)
}

async fn delete(opts: &GlobalOpts, workspace: &Workspace, id: &str) -> CliResult {
    workspace.load_clients().await?;

    let client = workspace
        .store()
        .clients
        .get(id)
        .ok_or_else(|| CliError::NotFound {
            entity_type: "client".into(),
            identifier: id.to_owned(),
        })?;

    confirm(
        opts,
        &format!("Delete client '{}' ({})? This cannot be undone", client.name, id),
    )?;

    workspace.delete_client(id).await?;

    if !opts.quiet {
        eprintln!("deleted client '{}'", client.name);
        if let Some(next) = workspace.selection().active_client_id() {
            eprintln!("active selection is now '{next}'");
        }
    }
    Ok(())
}

async fn select(
    opts: &GlobalOpts,
    workspace: &Workspace,
    id: Option<&str>,
    clear: bool,
) -> CliResult {
    if clear {
        workspace.selection().clear();
        if !opts.quiet {
            eprintln!("selection cleared");
        }
        return Ok(());
    }

    match id {
        Some(id) => {
            workspace.load_clients().await?;
            if !workspace.store().clients.contains(id) {
                return Err(CliError::NotFound {
                    entity_type: "client".into(),
                    identifier: id.to_owned(),
                });
            }
            workspace.selection().set_active(id);
            if !opts.quiet {
                eprintln!("active client set to '{id}'");
            }
            Ok(())
        }
        None => {
            // Show current selection, reconciled against fresh data.
            workspace.load_clients().await?;
            match workspace.selection().active_client_id() {
                Some(active) => {
                    let name = workspace
                        .store()
                        .clients
                        .get(&active)
                        .map_or_else(|| "(unknown)".to_owned(), |c| c.name.clone());
                    println!("{active}\t{name}");
                }
                None => println!("(no selection)"),
            }
            Ok(())
        }
    }
}

fn print_client(opts: &GlobalOpts, client: &Client) -> CliResult {
    let fields = [
        ("id", client.id.clone()),
        ("name", client.name.clone()),
        ("status", client.status.to_string()),
        ("description", opt(client.description.as_deref())),
        ("industry", opt(client.industry.as_deref())),
        ("website", opt(client.website.as_deref())),
        ("contact name", opt(client.primary_contact_name.as_deref())),
        ("contact email", opt(client.primary_contact_email.as_deref())),
        ("created", client.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ("updated", opt_date(client.updated_at.as_ref())),
    ];
    output::render_single(opts, client, &fields)
}
