//! `onevo posts` — published post history and delivery logs.

use serde::Serialize;
use tabled::Tabled;

use onevo_core::Workspace;
use onevo_core::model::PublishedPost;

use crate::cli::{GlobalOpts, PostsCommand};
use crate::error::CliResult;
use crate::output::{self, opt, opt_date};

use super::util::{finish_spinner, open_workspace, spinner};

#[derive(Tabled, Serialize)]
struct PostRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "PLATFORM")]
    platform: String,
    #[tabled(rename = "CLIENT")]
    client_id: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "PUBLISHED")]
    published: String,
    #[tabled(rename = "CONTENT")]
    content: String,
}

#[derive(Tabled, Serialize)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "PLATFORM")]
    platform: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "MESSAGE")]
    message: String,
    #[tabled(rename = "ATTEMPTED")]
    attempted: String,
}

pub async fn handle(opts: &GlobalOpts, command: PostsCommand) -> CliResult {
    let workspace = open_workspace(opts)?;

    match command {
        PostsCommand::List => list(opts, &workspace).await,
        PostsCommand::Get { id } => get(opts, &workspace, &id).await,
        PostsCommand::Logs { id } => logs(opts, &workspace, &id).await,
    }
}

async fn list(opts: &GlobalOpts, workspace: &Workspace) -> CliResult {
    let pb = spinner(opts, "Loading posts...");
    let result = workspace.load_posts().await;
    finish_spinner(pb);
    result?;

    let rows: Vec<PostRow> = workspace
        .store()
        .posts
        .snapshot()
        .iter()
        .map(|post| PostRow {
            id: post.id.clone(),
            platform: opt(post.platform.as_deref()),
            client_id: opt(post.client_id.as_deref()),
            status: opt(post.status.as_deref()),
            published: opt_date(post.published_at.as_ref()),
            content: truncate(post.content.as_deref().unwrap_or("-"), 48),
        })
        .collect();

    output::render_list(opts, &rows, |row| row.id.clone())
}

async fn get(opts: &GlobalOpts, workspace: &Workspace, id: &str) -> CliResult {
    let pb = spinner(opts, "Loading post...");
    let result = workspace.get_post(id).await;
    finish_spinner(pb);
    let post = result?;

    print_post(opts, &post)
}

async fn logs(opts: &GlobalOpts, workspace: &Workspace, id: &str) -> CliResult {
    let pb = spinner(opts, "Loading delivery logs...");
    let result = workspace.publish_logs(id).await;
    finish_spinner(pb);
    let logs = result?;

    let rows: Vec<LogRow> = logs
        .iter()
        .map(|log| LogRow {
            id: log.id.clone(),
            platform: opt(log.platform.as_deref()),
            status: opt(log.status.as_deref()),
            message: opt(log.message.as_deref()),
            attempted: opt_date(log.attempted_at.as_ref()),
        })
        .collect();

    output::render_list(opts, &rows, |row| row.id.clone())
}

fn print_post(opts: &GlobalOpts, post: &PublishedPost) -> CliResult {
    let fields = [
        ("id", post.id.clone()),
        ("client", opt(post.client_id.as_deref())),
        ("platform", opt(post.platform.as_deref())),
        ("status", opt(post.status.as_deref())),
        ("published", opt_date(post.published_at.as_ref())),
        ("external url", opt(post.external_url.as_deref())),
        ("media", post.media_urls.join(", ")),
        ("content", opt(post.content.as_deref())),
    ];
    output::render_single(opts, post, &fields)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 48), "short");
        let long = "é".repeat(60);
        let cut = truncate(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }
}
