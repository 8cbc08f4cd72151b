//! Auth command handlers
//!
//! Handles logging in and out, registration and account details.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use glimmer_core::dto::auth::RegisterUser;

use crate::config::Config;

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in and store the session token
    Login {
        username: String,
        /// Password
        #[arg(long, env = "GLIMMER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "GLIMMER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show the logged-in account
    Whoami,
}

/// Handle auth commands
pub async fn handle_auth_command(command: AuthCommands, config: &Config) -> Result<()> {
    let dashboard = config.dashboard()?;

    match command {
        AuthCommands::Login { username, password } => {
            dashboard
                .login(&username, &password)
                .await
                .context("Login failed")?;
            println!("{} Logged in as {}", "✓".green(), username.bold());
        }
        AuthCommands::Register {
            username,
            email,
            password,
            phone,
            company,
        } => {
            let req = RegisterUser {
                username,
                email,
                password,
                phone,
                company_name: company,
            };
            let (profile, _) = dashboard
                .register(&req)
                .await
                .context("Registration failed")?;
            println!(
                "{} Registered and logged in as {}",
                "✓".green(),
                profile.username.bold()
            );
        }
        AuthCommands::Logout => {
            dashboard.logout()?;
            println!("{} Logged out", "✓".green());
        }
        AuthCommands::Whoami => {
            let client = dashboard.client();
            let Some(username) = client.username() else {
                println!("{}", "Not logged in.".yellow());
                return Ok(());
            };
            println!("Logged in as {}", username.bold());

            let profile = client.current_user().await?;
            println!("{}", "Account:".bold());
            println!("  Username: {}", profile.username.cyan());
            if let Some(email) = &profile.email {
                println!("  Email:    {}", email);
            }
            if let Some(phone) = &profile.phone {
                println!("  Phone:    {}", phone);
            }
            if let Some(company) = &profile.company_name {
                println!("  Company:  {}", company);
            }
        }
    }

    Ok(())
}

/// Show the free-tier allowance
pub async fn show_usage(config: &Config) -> Result<()> {
    let dashboard = config.dashboard()?;
    let usage = dashboard.client().free_usage().await?;

    if usage.has_subscription {
        println!("{}", "Subscribed: image generation is not limited.".green());
        return Ok(());
    }

    let remaining = usage.free_images_remaining.to_string();
    println!(
        "Free images: {} remaining, {} of {} used ({}%)",
        if usage.free_images_remaining == 0 {
            remaining.red()
        } else {
            remaining.green()
        },
        usage.free_images_used,
        usage.total_free_images_granted,
        usage.used_percent()
    );
    Ok(())
}
