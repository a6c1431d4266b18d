//! CLI tool to create a staff superuser.
//!
//! Usage:
//!   SUPERUSER_PASSWORD=... cargo run --bin create-superuser -- --email <email>
//!       [--username <name>] [--first-name <name>] [--last-name <name>]
//!
//! Without SUPERUSER_PASSWORD the account is created with an unusable password.

use std::env;

use marketplace_accounts::config::Config;
use marketplace_accounts::db::DbPool;
use marketplace_accounts::error::AppError;
use marketplace_accounts::models::UserProfileFields;
use marketplace_accounts::services::UserProfileManager;

const PASSWORD_ENV: &str = "SUPERUSER_PASSWORD";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let Some(email) = parse_arg(&args, "--email", "-e") else {
        eprintln!("Error: --email is required");
        print_usage();
        std::process::exit(1);
    };
    let username = parse_arg(&args, "--username", "-u");
    let extra = UserProfileFields {
        first_name: parse_arg(&args, "--first-name", "-f"),
        last_name: parse_arg(&args, "--last-name", "-l"),
        ..Default::default()
    };
    let password = env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty());
    if password.is_none() {
        eprintln!(
            "Warning: {} is not set; the account will have an unusable password.",
            PASSWORD_ENV
        );
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    let result = UserProfileManager::new(&pool)
        .create_superuser(
            Some(email.as_str()),
            password.as_deref(),
            username.as_deref(),
            extra,
        )
        .await;

    match result {
        Ok(profile) => {
            println!("Superuser created successfully.");
            println!("  ID:    {}", profile.id);
            println!("  Email: {}", profile.email);
        }
        Err(AppError::Validation(errors)) => {
            eprintln!("Error: {}", errors);
            std::process::exit(1);
        }
        Err(AppError::Conflict(_)) => {
            eprintln!("Error: a user with that email, username or phone already exists.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error creating superuser: {}", e);
            std::process::exit(1);
        }
    }
}

fn parse_arg(args: &[String], long: &str, short: &str) -> Option<String> {
    let mut i = 1;
    while i < args.len() {
        if (args[i] == long || args[i] == short) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: create-superuser --email <email> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --email, -e <email>        Login email (required)");
    eprintln!("  --username, -u <name>      Optional username");
    eprintln!("  --first-name, -f <name>    First name");
    eprintln!("  --last-name, -l <name>     Last name");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {}         Password for the new account", PASSWORD_ENV);
    eprintln!();
    eprintln!("Example:");
    eprintln!("  SUPERUSER_PASSWORD=change-me create-superuser --email ops@example.com");
    eprintln!();
}
