//! unibite CLI entry point.
//!
//! Thin wrapper over `ub-reconcile`: each subcommand runs one
//! reconciliation pass (or one action followed by a reload) against the
//! backend named by `UNIBITE_API_URL` and prints the result.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use ub_api::HttpApiClient;
use ub_reconcile::{RedeemOutcome, Reconciler};

#[derive(Parser)]
#[command(name = "unibite")]
#[command(about = "UniBite surplus-food browsing/claiming client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse all listings (deduplicated, with derived statuses)
    Browse,

    /// Restaurant dashboard: own listings, claim counts, summary
    Dashboard {
        /// Restaurant user id
        #[arg(long)]
        restaurant: i64,
    },

    /// A student's claims, active and history
    Claims {
        /// Student user id
        #[arg(long)]
        student: i64,
    },

    /// Claim a listing (quantity is clamped to the allowed range)
    Claim {
        #[arg(long)]
        listing: i64,

        #[arg(long)]
        student: i64,

        #[arg(long, default_value_t = 1)]
        quantity: i64,
    },

    /// Cancel an active claim
    Cancel {
        #[arg(long)]
        claim: i64,
    },

    /// Redeem a scanned or typed token for a restaurant
    Redeem {
        #[arg(long)]
        restaurant: i64,

        /// Raw scanner output: token, URL, or legacy pickup string
        raw: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience); silent otherwise.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    let reconciler = Reconciler::new(HttpApiClient::from_env());
    let now = Utc::now();

    match cli.cmd {
        Commands::Browse => {
            let view = reconciler.load_browse(now).await?;
            for listing in &view.listings {
                println!(
                    "#{:<5} {:<30} {:<12} {:>7}  {}  ({})",
                    listing.id,
                    listing.title,
                    listing.status.as_str(),
                    listing.remaining_label,
                    listing.available_until_label,
                    listing.restaurant_name,
                );
            }
            println!("{} listings from {} restaurants", view.listings.len(), view.restaurants.len());
        }

        Commands::Dashboard { restaurant } => {
            let view = reconciler.load_dashboard(restaurant, now).await?;
            for listing in &view.listings {
                println!(
                    "#{:<5} {:<30} {:<12} {:>7}  claims={}",
                    listing.id,
                    listing.title,
                    listing.status.as_str(),
                    listing.remaining_label,
                    listing.claim_count,
                );
            }
            println!(
                "items={} remaining={} claims={}",
                view.summary.total_items, view.summary.remaining_total, view.summary.total_claims,
            );
        }

        Commands::Claims { student } => {
            for claim in reconciler.load_student_claims(student).await? {
                println!(
                    "#{:<5} {:<30} x{:<3} {:<10} {:<16} {}",
                    claim.id,
                    claim.title,
                    claim.quantity,
                    claim.status.as_str(),
                    claim.claimed_at_label,
                    claim.restaurant_name,
                );
            }
        }

        Commands::Claim {
            listing,
            student,
            quantity,
        } => {
            let view = reconciler.load_browse(now).await?;
            let target = view
                .listings
                .iter()
                .find(|l| l.id == listing)
                .ok_or_else(|| anyhow::anyhow!("listing {listing} not found"))?;

            let claim = reconciler.claim(target, student, quantity).await?;
            println!(
                "claim #{} created: {} x{} (token {})",
                claim.id, target.title, claim.quantity, claim.qr_token,
            );
        }

        Commands::Cancel { claim } => {
            reconciler.cancel(claim).await?;
            println!("claim #{claim} canceled");
        }

        Commands::Redeem { restaurant, raw } => {
            let dashboard = reconciler.load_dashboard(restaurant, now).await?;
            match reconciler.redeem(&raw, &dashboard.claims, restaurant, now).await? {
                RedeemOutcome::NoToken => println!("no token found in input"),
                RedeemOutcome::Redeemed { claim, .. } => {
                    println!("claim #{} redeemed (token {})", claim.id, claim.qr_token);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
