//! Clap derive structures for the `onevo` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// onevo -- CLI for the Onevo social-media management platform
#[derive(Debug, Parser)]
#[command(
    name = "onevo",
    version,
    about = "Manage Onevo clients, billing, webhooks, and posts from the command line",
    long_about = "A CLI for agencies and teams on the Onevo platform.\n\n\
        Works against the Onevo REST API with bearer-token authentication;\n\
        profiles and tokens are configured with `onevo config init`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Tenant profile to use
    #[arg(long, short = 'p', env = "ONEVO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "ONEVO_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Tenant id (overrides profile)
    #[arg(long, env = "ONEVO_TENANT", global = true)]
    pub tenant: Option<String>,

    /// API token
    #[arg(long, env = "ONEVO_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ONEVO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ONEVO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage agency clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Plans, subscription, invoices, and payment methods
    #[command(alias = "bill")]
    Billing(BillingArgs),

    /// Manage platform webhook subscriptions
    #[command(alias = "wh")]
    Webhooks(WebhooksArgs),

    /// View published posts and delivery logs
    Posts(PostsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients (sorted by name)
    #[command(alias = "ls")]
    List,

    /// Get client details
    Get {
        /// Client id
        id: String,
    },

    /// Create a client (becomes the active selection)
    Create {
        /// Client name
        #[arg(long, required = true)]
        name: String,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,

        /// Industry label
        #[arg(long)]
        industry: Option<String>,

        /// Website URL
        #[arg(long)]
        website: Option<String>,

        /// Primary contact name
        #[arg(long)]
        contact_name: Option<String>,

        /// Primary contact email
        #[arg(long)]
        contact_email: Option<String>,
    },

    /// Update a client
    Update {
        /// Client id
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New industry label
        #[arg(long)]
        industry: Option<String>,

        /// New website URL
        #[arg(long)]
        website: Option<String>,

        /// New status: active, inactive, or archived
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a client
    Delete {
        /// Client id
        id: String,
    },

    /// Show or change the active client selection
    #[command(alias = "use")]
    Select {
        /// Client id to select (omit to show the current selection)
        id: Option<String>,

        /// Clear the selection instead
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BILLING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BillingArgs {
    #[command(subcommand)]
    pub command: BillingCommand,
}

#[derive(Debug, Subcommand)]
pub enum BillingCommand {
    /// List available plans with upgrade eligibility
    Plans,

    /// Show the current subscription and monthly total
    Status,

    /// Start a subscription on a plan
    Subscribe {
        /// Catalog plan id (e.g. "basic", "pro")
        plan: String,
    },

    /// Open a hosted checkout session for a plan
    Checkout {
        /// Catalog plan id
        plan: String,

        /// Redirect URL after successful payment
        #[arg(long)]
        success_url: Option<String>,

        /// Redirect URL after abandoned payment
        #[arg(long)]
        cancel_url: Option<String>,
    },

    /// Request cancellation (takes effect at period end)
    Cancel,

    /// Change the billed account count (agency plans)
    SetAccounts {
        /// New account count
        count: u32,
    },

    /// List invoices
    Invoices,

    /// List payment methods on file
    PaymentMethods,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WEBHOOKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WebhooksArgs {
    #[command(subcommand)]
    pub command: WebhooksCommand,
}

#[derive(Debug, Subcommand)]
pub enum WebhooksCommand {
    /// List webhook subscriptions
    #[command(alias = "ls")]
    List,

    /// Register a webhook (prints the one-time token)
    Create {
        /// Platform name (e.g. "instagram")
        #[arg(long, required = true)]
        platform: String,

        /// Callback URL to deliver events to
        #[arg(long, required = true)]
        url: String,
    },

    /// Delete a webhook subscription
    Delete {
        /// Webhook subscription id
        id: String,
    },

    /// List recently received webhook events
    Events,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  POSTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    /// List published posts
    #[command(alias = "ls")]
    List,

    /// Get published post details
    Get {
        /// Post id
        id: String,
    },

    /// Show delivery logs for a post
    Logs {
        /// Post id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
