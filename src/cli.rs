use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::config::AppConfig;
use crate::output::OutputFormat;
use commands::{auth, contracts, dashboard, interactive, vendors, Context};

#[derive(Parser)]
#[command(name = "vendorconnect")]
#[command(about = "Vendor and contract dashboard backed by a hosted Supabase project")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (TOML). Defaults to ./vendorconnect.toml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project URL, e.g. https://xyzcompany.supabase.co
    #[arg(long, global = true)]
    pub supabase_url: Option<String>,

    /// Public (anon) API key
    #[arg(long, global = true)]
    pub supabase_key: Option<String>,

    /// Where the signed-in session is kept between runs
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl GlobalArgs {
    /// Command-line flags take precedence over every configuration layer.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.supabase_url {
            config.supabase_url = Some(url.clone());
        }
        if let Some(key) = &self.supabase_key {
            config.supabase_key = Some(key.clone());
        }
        if let Some(path) = &self.session_file {
            config.session_file = Some(path.clone());
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    /// Account email
    #[arg(short, long, env = "VENDORCONNECT_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "VENDORCONNECT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup(CredentialArgs),
    /// Sign in and keep the session for later commands
    Signin(CredentialArgs),
    /// End the current session
    Signout,
    /// Show the signed-in user
    Whoami,
    /// KPIs and contract expiry alerts
    Dashboard,
    /// Manage vendors
    #[command(subcommand)]
    Vendors(VendorCommands),
    /// Manage contracts
    #[command(subcommand)]
    Contracts(ContractCommands),
    /// Interactive dashboard session
    Interactive,
}

#[derive(Subcommand)]
pub enum VendorCommands {
    /// List vendors, newest first
    List {
        /// Case-insensitive filter on name or category
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a vendor
    Add {
        #[arg(short, long)]
        name: String,

        /// One of: IT Services, Logistics, Hardware, Consulting
        #[arg(short, long, default_value = "IT Services")]
        category: String,

        /// Annual spend in dollars
        #[arg(short, long)]
        spend: String,

        /// Contact person or email
        #[arg(long)]
        contact: Option<String>,
    },
    /// Report a compliance issue; marks the vendor non-compliant
    Report {
        /// Vendor id
        id: String,

        /// What went wrong. Without a reason nothing is changed.
        #[arg(short, long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ContractCommands {
    /// List contracts, soonest end date first
    List,
    /// Add a contract for a loaded vendor
    Add {
        #[arg(short, long)]
        name: String,

        /// Vendor id
        #[arg(short, long)]
        vendor: String,

        /// End date, YYYY-MM-DD
        #[arg(short, long)]
        end_date: String,

        /// Contract value in dollars
        #[arg(long)]
        value: String,
    },
}

impl Cli {
    pub async fn run(self, config: AppConfig) -> Result<()> {
        let ctx = Context::from_config(&config, self.global.output)?;
        let text = match self.command {
            Commands::Signup(creds) => auth::signup(&ctx, &creds.email, &creds.password).await?,
            Commands::Signin(creds) => auth::signin(&ctx, &creds.email, &creds.password).await?,
            Commands::Signout => auth::signout(&ctx).await?,
            Commands::Whoami => auth::whoami(&ctx).await?,
            Commands::Dashboard => dashboard::show(&ctx).await?,
            Commands::Vendors(VendorCommands::List { search }) => {
                vendors::list(&ctx, search.as_deref()).await?
            }
            Commands::Vendors(VendorCommands::Add {
                name,
                category,
                spend,
                contact,
            }) => vendors::add(&ctx, &name, &category, &spend, contact.as_deref()).await?,
            Commands::Vendors(VendorCommands::Report { id, reason }) => {
                vendors::report(&ctx, &id, reason.as_deref()).await?
            }
            Commands::Contracts(ContractCommands::List) => contracts::list(&ctx).await?,
            Commands::Contracts(ContractCommands::Add {
                name,
                vendor,
                end_date,
                value,
            }) => contracts::add(&ctx, &name, &vendor, &end_date, &value).await?,
            Commands::Interactive => {
                let stdin = std::io::stdin();
                let mut input = stdin.lock();
                let mut output = std::io::stdout();
                interactive::run(&ctx, &mut input, &mut output).await?;
                String::new()
            }
        };

        if !text.is_empty() {
            crate::output::print_result(&text);
        }
        Ok(())
    }
}
