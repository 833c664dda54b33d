//! # affihub
//!
//! Terminal front end for the membership core. Each invocation restores the
//! saved session, performs one action through the gate, and prints the result.

#![deny(unsafe_code)]

mod render;

use std::path::PathBuf;

use affihub_auth::SessionManager;
use affihub_core::{BillingPeriod, PaidTier, featured_reviews};
use affihub_gate::{Gate, Intent, Outcome};
use affihub_settings::AffihubSettings;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// AffiHub membership client.
#[derive(Parser, Debug)]
#[command(name = "affihub", about = "AffiHub membership client", version)]
struct Cli {
    /// Settings file (defaults to `~/.affihub/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show who is signed in and their membership.
    Status,
    /// Sign in.
    Login {
        /// Email address.
        #[arg(long)]
        email: String,
        /// Password.
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        /// Email address.
        #[arg(long)]
        email: String,
        /// Password.
        #[arg(long)]
        password: String,
        /// Display name (defaults to the part of the email before `@`).
        #[arg(long)]
        name: Option<String>,
    },
    /// Sign out and forget the saved session.
    Logout,
    /// Upgrade the signed-in user's membership.
    Upgrade {
        /// Target tier: `premium` or `vip`.
        tier: PaidTier,
    },
    /// Show the pricing page.
    Pricing {
        /// Show yearly prices.
        #[arg(long)]
        yearly: bool,
    },
    /// List featured reviews, locked or unlocked for the current user.
    Content,
}

fn load_settings(path: Option<&PathBuf>) -> Result<AffihubSettings> {
    match path {
        Some(path) => affihub_settings::load_settings_from_path(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(affihub_settings::get_settings().clone()),
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn submit(gate: &Gate, intent: Intent, json: bool) -> Result<Outcome> {
    if let Intent::Upgrade(tier) = &intent {
        eprintln!("Upgrading to {}...", tier.display_name());
    }
    let outcome = gate.submit(intent).await;
    if json {
        print_json(&gate.viewer())?;
    } else {
        println!("{}", render::outcome(&outcome));
    }
    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.settings.as_ref())?;
    affihub_core::logging::init_subscriber(&settings.logging.level);
    tracing::debug!(record = %settings.storage.record_path().display(), "starting");

    let session = SessionManager::from_settings(&settings);
    let _ = session.restore();
    let gate = Gate::new(session);

    let outcome = match cli.command {
        Command::Status => {
            let viewer = gate.viewer();
            if cli.json {
                print_json(&viewer)?;
            } else {
                print!("{}", render::status(&viewer, gate.plan().as_ref()));
            }
            None
        }
        Command::Login { email, password } => {
            Some(submit(&gate, Intent::Login { email, password }, cli.json).await?)
        }
        Command::Register {
            email,
            password,
            name,
        } => Some(
            submit(
                &gate,
                Intent::Register {
                    email,
                    password,
                    name,
                },
                cli.json,
            )
            .await?,
        ),
        Command::Logout => Some(submit(&gate, Intent::Logout, cli.json).await?),
        Command::Upgrade { tier } => Some(submit(&gate, Intent::Upgrade(tier), cli.json).await?),
        Command::Pricing { yearly } => {
            let billing = if yearly {
                BillingPeriod::Yearly
            } else {
                BillingPeriod::Monthly
            };
            let cards = gate.pricing(billing);
            if cli.json {
                print_json(&cards)?;
            } else {
                print!("{}", render::pricing(&cards, billing));
            }
            None
        }
        Command::Content => {
            let reviews = featured_reviews();
            let views = gate.content(&reviews);
            if cli.json {
                let rendered: Vec<_> = views
                    .iter()
                    .map(|(item, view)| serde_json::json!({ "item": item, "view": view }))
                    .collect();
                print_json(&rendered)?;
            } else {
                print!("{}", render::content(&views));
            }
            None
        }
    };

    if !gate.session().is_persistent() {
        tracing::warn!("session could not be saved and will not survive this run");
    }

    if outcome.is_some_and(|o| !o.succeeded()) {
        std::process::exit(1);
    }
    Ok(())
}
