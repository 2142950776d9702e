//! CLI administration tool for linkvault.
//!
//! Provides commands for inspecting accounts, ending sessions, viewing
//! statistics and performing database operations without the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List accounts and whether they hold a session
//! cargo run --bin admin -- user list
//!
//! # End a user's session (their refresh token stops working)
//! cargo run --bin admin -- user logout alice@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use linkvault::domain::repositories::{ShortUrlRepository, TodoRepository, UserRepository};
use linkvault::infrastructure::persistence::{
    PgShortUrlRepository, PgTodoRepository, PgUserRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkvault.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Revoke a user's refresh token
    Logout {
        /// Email address of the account
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::List => list_users(repo).await?,
        UserAction::Logout { email, yes } => logout_user(repo, email, yes).await?,
    }

    Ok(())
}

/// Lists all accounts with their session state.
///
/// # Output Format
///
/// ```text
/// Users
///
///   ID  Name                 Email                          Created           Session
///   1   alice                alice@example.com              2025-01-15 10:30  ACTIVE
///   2   bob                  bob@example.com                2025-01-16 14:20  NONE
/// ```
async fn list_users(repo: Arc<PgUserRepository>) -> Result<()> {
    println!("{}", "Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<30} {:<17} {:<8}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold(),
        "Session".bright_white().bold()
    );
    println!("  {}", "-".repeat(82).bright_black());

    for user in &users {
        let session = if user.has_active_session() {
            "ACTIVE".green()
        } else {
            "NONE".bright_black()
        };

        println!(
            "  {:<4} {:<20} {:<30} {:<17} {}",
            user.id.to_string().bright_black(),
            user.name.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            session
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Clears the stored refresh token fingerprint for one account.
///
/// Access tokens already issued stay valid until they expire.
async fn logout_user(repo: Arc<PgUserRepository>, email: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "End Session".bright_blue().bold());
    println!();

    let email = email.trim().to_lowercase();

    let user = repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    if !user.has_active_session() {
        println!("{}", "  This user has no active session".yellow());
        return Ok(());
    }

    println!("  User:  {}", user.name.cyan());
    println!("  Email: {}", user.email);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Revoke this user's refresh token?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    repo.replace_refresh_token(user.id, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke session: {}", e))?;

    println!();
    println!("{}", "Session revoked".green().bold());
    println!();

    Ok(())
}

/// Displays row counts and the total number of short URL accesses.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let sessions_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE refresh_token_hash IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let shared = Arc::new(pool.clone());

    let todos_count = PgTodoRepository::new(shared.clone())
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count todos: {}", e))?;

    let urls_count = PgShortUrlRepository::new(shared)
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count short URLs: {}", e))?;

    let accesses: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(access_count), 0)::BIGINT FROM short_urls")
            .fetch_one(pool)
            .await?;

    println!(
        "  Users:           {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Active sessions: {}",
        sessions_count.to_string().bright_green().bold()
    );
    println!(
        "  Todos:           {}",
        todos_count.to_string().bright_green().bold()
    );
    println!(
        "  Short URLs:      {}",
        urls_count.to_string().bright_green().bold()
    );
    println!(
        "  URL accesses:    {}",
        accesses.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", applied.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
