//! Operator CLI for dosewatch.
//!
//! Covers the account-facing chores the reminder core needs exercised
//! without a web surface: seeding users, logging actions, inspecting
//! status and history, and firing a one-off reminder.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::warn;

use dosewatch::core::Config;
use dosewatch::features::hydration::HydrationTracker;
use dosewatch::features::schedule;
use dosewatch::notify::{self, Notifier};
use dosewatch::storage::{self, LogEntry, LogStore, User, UserStore, TIMESTAMP_FORMAT};

#[derive(Parser)]
#[command(name = "medctl", about = "Manage dosewatch users and adherence logs", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a user and send the welcome email
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        med_name: String,
        #[arg(long)]
        dosage: String,
        /// Daily dose time, 24-hour HH:MM
        #[arg(long)]
        med_time: String,
        /// Daily hydration goal in glasses
        #[arg(long)]
        water_goal: Option<i64>,
    },
    /// Append an adherence log entry for a user
    Log {
        #[arg(long)]
        email: String,
        /// Action tag, e.g. "medication" or "water"
        #[arg(long)]
        action: String,
    },
    /// Show next dose, adherence, and hydration for a user
    Status {
        #[arg(long)]
        email: String,
    },
    /// List a user's full adherence history
    History {
        #[arg(long)]
        email: String,
        /// Emit entries as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Send a one-off reminder immediately
    Remind {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let (users, logs) = storage::open_stores(&config)?;
    let notifier = notify::from_config(&config)?;

    match cli.command {
        Command::AddUser {
            name,
            email,
            phone,
            med_name,
            dosage,
            med_time,
            water_goal,
        } => {
            add_user(
                users, notifier, name, email, phone, med_name, dosage, med_time, water_goal,
            )
            .await
        }
        Command::Log { email, action } => log_action(users, logs, &email, &action).await,
        Command::Status { email } => status(users, logs, &email).await,
        Command::History { email, json } => history(users, logs, &email, json).await,
        Command::Remind { email } => remind(users, notifier, &email).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn add_user(
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    name: String,
    email: String,
    phone: Option<String>,
    med_name: String,
    dosage: String,
    med_time: String,
    water_goal: Option<i64>,
) -> Result<()> {
    // Reject bad dose times at the door; the sweep would only skip them
    schedule::parse_medication_time(&med_time)?;

    if users.get_user_by_email(&email).await?.is_some() {
        anyhow::bail!("email {email} is already registered");
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        email,
        phone,
        med_name,
        dosage,
        med_time,
        water_goal,
    };
    users.add_user(&user).await?;
    println!("Registered {} ({})", user.name, user.id);

    let body = format!(
        "Hi {}, welcome! Your medication time is {}.",
        user.name, user.med_time
    );
    if let Err(e) = notifier
        .notify(&user.email, "Welcome to Medication Reminder!", &body)
        .await
    {
        warn!("Failed to send welcome email to {}: {e:#}", user.email);
    }

    Ok(())
}

async fn find_user(users: &Arc<dyn UserStore>, email: &str) -> Result<User> {
    users
        .get_user_by_email(email)
        .await?
        .with_context(|| format!("no user registered with email {email}"))
}

async fn log_action(
    users: Arc<dyn UserStore>,
    logs: Arc<dyn LogStore>,
    email: &str,
    action: &str,
) -> Result<()> {
    let user = find_user(&users, email).await?;
    logs.record(&LogEntry {
        user_id: user.id.clone(),
        action: action.to_string(),
        timestamp: Local::now().naive_local(),
    })
    .await?;
    println!("Logged {} for {}", action, user.name);
    Ok(())
}

async fn status(users: Arc<dyn UserStore>, logs: Arc<dyn LogStore>, email: &str) -> Result<()> {
    let user = find_user(&users, email).await?;
    let med_time = schedule::parse_medication_time(&user.med_time)?;
    let dose = schedule::upcoming_dose(med_time, Local::now().naive_local());
    let taken = logs.has_taken_today(&user.id).await?;
    let hydration = HydrationTracker::new(logs.clone()).status(&user).await?;

    println!("{} <{}>", user.name, user.email);
    println!("  Medication: {} ({}) at {}", user.med_name, user.dosage, user.med_time);
    println!("  Next dose: {}", dose.describe());
    println!("  Taken today: {}", if taken { "yes" } else { "not yet" });
    match hydration.goal {
        Some(goal) => println!(
            "  Water: {}/{} glass(es){}",
            hydration.logged,
            goal,
            if hydration.goal_met() { " (goal met!)" } else { "" }
        ),
        None => println!("  Water: {} glass(es) logged, no goal set", hydration.logged),
    }
    Ok(())
}

async fn history(
    users: Arc<dyn UserStore>,
    logs: Arc<dyn LogStore>,
    email: &str,
    json: bool,
) -> Result<()> {
    let user = find_user(&users, email).await?;
    let entries = logs.entries_for(&user.id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No log entries for {}", user.name);
        return Ok(());
    }
    for entry in entries {
        println!("{}  {}", entry.timestamp.format(TIMESTAMP_FORMAT), entry.action);
    }
    Ok(())
}

async fn remind(users: Arc<dyn UserStore>, notifier: Arc<dyn Notifier>, email: &str) -> Result<()> {
    let user = find_user(&users, email).await?;
    let body = format!("Hi {}, time for your {}!", user.name, user.med_name);
    notifier
        .notify(&user.email, "Medication Reminder", &body)
        .await?;
    println!("Reminder sent to {}", user.email);
    Ok(())
}
