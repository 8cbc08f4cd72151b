//! Billing command handlers

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use colored::*;
use glimmer_core::domain::billing::SubscriptionState;

use crate::config::Config;

/// Billing subcommands
#[derive(Subcommand)]
pub enum BillingCommands {
    /// List subscription plans
    Plans,
    /// Show the current subscription
    Subscription,
    /// Print a checkout link for a plan
    Subscribe {
        plan_id: String,
    },
    /// Cancel the subscription at the end of the period
    Cancel,
}

/// Handle billing commands
pub async fn handle_billing_command(command: BillingCommands, config: &Config) -> Result<()> {
    let dashboard = config.dashboard()?;
    let client = dashboard.client();

    match command {
        BillingCommands::Plans => {
            let plans = client.subscription_plans().await?;
            if plans.is_empty() {
                println!("{}", "No plans available.".yellow());
                return Ok(());
            }

            for plan in plans {
                let interval = plan.interval.as_deref().unwrap_or("month");
                println!(
                    "  {} {} {}/{} {}",
                    "▸".cyan(),
                    plan.name.bold(),
                    plan.display_price(),
                    interval,
                    plan.plan_id.dimmed()
                );
                if let Some(description) = &plan.description {
                    println!("    {}", description);
                }
                for feature in &plan.features {
                    println!("    • {}", feature);
                }
            }
        }
        BillingCommands::Subscription => match client.my_subscription().await? {
            None => println!("{}", "No subscription.".yellow()),
            Some(subscription) => {
                let now = Utc::now();
                let state = subscription.state(now);
                let label = match state {
                    SubscriptionState::Active => state.to_string().green(),
                    SubscriptionState::Cancelling => state.to_string().yellow(),
                    SubscriptionState::Expired => state.to_string().red(),
                };

                println!("{}", "Subscription:".bold());
                if let Some(plan) = &subscription.plan_id {
                    println!("  Plan:    {}", plan);
                }
                println!("  State:   {}", label);
                println!(
                    "  Renews:  {} ({} days left)",
                    subscription.current_period_end.format("%Y-%m-%d"),
                    subscription.days_remaining(now)
                );
            }
        },
        BillingCommands::Subscribe { plan_id } => {
            let link = client.create_payment_link(&plan_id).await?;
            println!("Complete checkout at:");
            println!("  {}", link.payment_url.cyan());
        }
        BillingCommands::Cancel => {
            client.cancel_subscription().await?;
            println!(
                "{} Subscription will end with the current period",
                "✓".green()
            );
        }
    }

    Ok(())
}
