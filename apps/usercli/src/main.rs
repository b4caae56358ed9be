// apps/usercli/src/main.rs

mod checks;
mod client;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process;
use tracing_subscriber::EnvFilter;

use checks::{run_all, SeedCredentials};
use client::ApiClient;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

fn build_cli() -> Command {
    Command::new("usercli")
        .about("User Management API command line client")
        .subcommand_required(true)
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .env("USER_API_URL")
                .default_value(DEFAULT_BASE_URL)
                .help("Base URL of a running user-api"),
        )
        .subcommand(
            Command::new("check")
                .about("Run the conformance scenarios against a running server")
                .arg(
                    Arg::new("seed-username")
                        .long("seed-username")
                        .env("SEED_USER_USERNAME")
                        .default_value("john_doe")
                        .help("Username of the seeded account"),
                )
                .arg(
                    Arg::new("seed-password")
                        .long("seed-password")
                        .env("SEED_USER_PASSWORD")
                        .default_value("password123")
                        .help("Password of the seeded account"),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and print the issued session token")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("stats")
                .about("Print service statistics")
                .arg(
                    Arg::new("details")
                        .long("details")
                        .action(ArgAction::SetTrue)
                        .help("Include user emails and session tokens"),
                ),
        )
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();

    let client = match ApiClient::new(arg(&matches, "base-url")) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let result = match matches.subcommand() {
        Some(("check", sub)) => run_checks(&client, sub).await,
        Some(("login", sub)) => run_login(&client, sub).await,
        Some(("stats", sub)) => run_stats(&client, sub).await,
        _ => Err("unknown command".to_string()),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}

async fn run_checks(client: &ApiClient, matches: &ArgMatches) -> Result<(), String> {
    let seed = SeedCredentials {
        username: arg(matches, "seed-username").to_string(),
        password: arg(matches, "seed-password").to_string(),
    };

    println!("Running checks against {}", client.base_url());
    let outcomes = run_all(client, &seed).await;

    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("PASS  {}", outcome.name),
            Err(reason) => println!("FAIL  {}: {}", outcome.name, reason),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    println!("{} passed, {} failed", outcomes.len() - failed, failed);

    if failed > 0 {
        return Err(format!("{failed} check(s) failed"));
    }
    Ok(())
}

async fn run_login(client: &ApiClient, matches: &ArgMatches) -> Result<(), String> {
    let reply = client
        .login(arg(matches, "username"), arg(matches, "password"))
        .await?;

    if !reply.is_success() {
        return Err(format!("Login failed ({}): {}", reply.status, reply.body));
    }

    let token = reply
        .body
        .get("token")
        .and_then(|t| t.as_str())
        .ok_or("Login response has no token")?;
    println!("{token}");
    Ok(())
}

async fn run_stats(client: &ApiClient, matches: &ArgMatches) -> Result<(), String> {
    let reply = client.stats(matches.get_flag("details")).await?;

    if !reply.is_success() {
        return Err(format!("Stats request failed ({}): {}", reply.status, reply.body));
    }

    let pretty = serde_json::to_string_pretty(&reply.body)
        .map_err(|e| format!("Failed to format stats: {e}"))?;
    println!("{pretty}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_global_base_url() {
        let matches = build_cli()
            .try_get_matches_from(["usercli", "stats", "--details", "--base-url", "http://api:9000"])
            .unwrap();
        assert_eq!(arg(&matches, "base-url"), "http://api:9000");

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "stats");
        assert!(sub.get_flag("details"));
    }

    #[test]
    fn test_login_requires_credentials() {
        let result = build_cli().try_get_matches_from(["usercli", "login", "--username", "john_doe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(build_cli().try_get_matches_from(["usercli"]).is_err());
    }
}
