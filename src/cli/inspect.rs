use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use super::OutputConfig;
use crate::config::Config;
use crate::leads::detail;
use crate::storage::{LeadStore, MySqlStore};
use crate::types::{status, CustomerProfile, LeadDetail, LeadKind, RecentView, WishlistItem};

#[derive(Args)]
pub struct InspectArgs {
    #[command(subcommand)]
    target: InspectTarget,
}

#[derive(Subcommand)]
enum InspectTarget {
    /// Detail bundle of a project enquiry
    Enquiry { id: i64 },
    /// Detail bundle of a customer
    Customer { id: i64 },
    /// Customer that an enquiry with this mobile would link to
    Mobile { number: String },
}

#[derive(Serialize)]
struct MobileOutput {
    customer: CustomerProfile,
    wishlist: Vec<WishlistItem>,
    #[serde(rename = "recentlyViewed")]
    recently_viewed: Vec<RecentView>,
}

pub async fn run(args: InspectArgs, config_path: &Path, output: OutputConfig) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let store = MySqlStore::connect(&config.database);
    let result = inspect(&store, args.target, output).await;
    store.close().await?;
    result
}

async fn inspect(store: &dyn LeadStore, target: InspectTarget, output: OutputConfig) -> Result<()> {
    let (id, kind) = match target {
        InspectTarget::Enquiry { id } => (id, LeadKind::Enquiry),
        InspectTarget::Customer { id } => (id, LeadKind::Customer),
        InspectTarget::Mobile { number } => {
            let Some(customer) = store.customer_by_mobile(number.trim()).await? else {
                bail!("No customer with mobile {}", number);
            };
            let wishlist = store.wishlist(customer.cust_id).await?;
            let recently_viewed = store.recently_viewed(customer.cust_id).await?;

            if output.json {
                let json_output = MobileOutput {
                    customer,
                    wishlist,
                    recently_viewed,
                };
                println!("{}", serde_json::to_string_pretty(&json_output)?);
            } else if !output.quiet {
                println!(
                    "{} customer {} {}",
                    "✓".green(),
                    customer.cust_id.to_string().cyan(),
                    customer.cust_name.as_deref().unwrap_or_default()
                );
                for item in &wishlist {
                    println!(
                        "  wishlist  {} {}",
                        item.project_id,
                        item.poj_name.as_deref().unwrap_or("?")
                    );
                }
                for view in &recently_viewed {
                    println!(
                        "  viewed    {} {} ({}x)",
                        view.project_id,
                        view.poj_name.as_deref().unwrap_or("?"),
                        view.count
                    );
                }
            }
            return Ok(());
        }
    };

    let Some(bundle) = detail::lead_detail(store, id, kind).await? else {
        bail!("No {} with id {}", kind, id);
    };

    if output.json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else if !output.quiet {
        print_detail(&bundle, kind, id, output.verbose);
    }
    Ok(())
}

fn print_detail(bundle: &LeadDetail, kind: LeadKind, id: i64, verbose: bool) {
    let lead = &bundle.lead;
    println!(
        "{} {} {}",
        kind.to_string().bold(),
        id.to_string().cyan(),
        lead.cust_name.as_deref().unwrap_or_default()
    );
    println!("  Mobile:    {}", lead.cust_mobile.as_deref().unwrap_or("-"));
    println!("  Project:   {}", lead.project_name.as_deref().unwrap_or("-"));
    println!("  Status:    {}", status::display(lead.status.as_deref()));
    if let Some(date) = &lead.followup_date {
        println!(
            "  Follow-up: {} {}",
            date,
            lead.followup_time.as_deref().unwrap_or_default()
        );
    }
    if bundle.customer.is_stored() {
        println!("  Customer:  {}", bundle.customer.cust_id);
    }
    println!("  Wishlist:  {}", bundle.wishlist.len());
    println!("  Notes:     {}", bundle.notes.len());

    if verbose {
        for note in &bundle.notes {
            println!(
                "    [{}] {} ({}): {}",
                note.added_at.as_deref().unwrap_or("?"),
                note.added_by.as_deref().unwrap_or("?"),
                note.kind,
                note.note
            );
        }
    }
}
