use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::time::Duration;

use product_client::api_client::ApiClient;
use product_client::commands::{Outcome, ProductCommand};
use product_client::output::{
    print_event, print_mirror, print_outcome, print_test_summary, TestResult,
};
use product_client::scenarios;
use product_client::session::{ClientSession, EventKind, SessionState};

#[derive(Parser)]
#[command(name = "product-client")]
#[command(about = "Real-time product catalog client")]
struct Cli {
    /// Base URL of the backend
    #[arg(long, default_value = "http://localhost:5170")]
    base_url: String,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the catalog, then print every pushed event and the resulting mirror
    Watch {
        /// Event kinds to subscribe to (defaults to all of them)
        #[arg(long, value_enum, value_delimiter = ',')]
        subscribe: Vec<EventKind>,
    },
    /// Run end-to-end checks against a running server
    Scenario {
        #[arg(value_enum, default_value = "all")]
        scenario: ScenarioChoice,
    },
    #[command(flatten)]
    Product(ProductCommand),
}

#[derive(clap::ValueEnum, Clone, PartialEq)]
enum ScenarioChoice {
    /// Connect to the product hub and wait for the greeting
    Connection,
    /// Create a product and check both sessions receive product_added
    Create,
    /// Update a product and check product_updated reaches the mirror
    Update,
    /// Delete a product and check product_deleted reaches the mirror
    Delete,
    /// Update and delete an unknown id
    NotFound,
    /// Check identifiers are never reused after a delete
    IdUniqueness,
    /// Run every scenario
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    let api_client = ApiClient::new(reqwest::Client::new(), cli.base_url.clone());

    match cli.command {
        Command::Watch { subscribe } => watch(&api_client, subscribe).await,
        Command::Scenario { scenario } => run_scenarios(&api_client, scenario).await,
        Command::Product(command) => {
            let outcome = command.run(&api_client).await?;
            print_outcome(&outcome);
            if let Outcome::NotFound(_) = outcome {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn watch(api_client: &ApiClient, subscribe: Vec<EventKind>) -> Result<()> {
    let kinds = if subscribe.is_empty() {
        EventKind::ALL.to_vec()
    } else {
        subscribe
    };

    let mut session = ClientSession::with_subscriptions(api_client.base_url(), "Watcher", kinds);

    println!("{} Loading products...", "→".blue());
    session.load(api_client).await?;
    print_mirror(&session.label, session.mirror());

    session.connect().await?;
    println!(
        "{} Connecting to {}/product_hub (Ctrl+C to stop)...",
        "→".blue(),
        api_client.base_url()
    );

    let mut last_state = session.state();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            applied = session.poll() => {
                if let Some(event) = applied? {
                    print_event(&session.label, &event);
                    print_mirror(&session.label, session.mirror());
                }
            }
        }

        if session.state() != last_state {
            last_state = session.state();
            println!("{} Session is now {:?}", "→".blue(), last_state);
        }
        if last_state == SessionState::Disconnected {
            break;
        }
    }

    session.disconnect();
    Ok(())
}

async fn run_scenarios(api_client: &ApiClient, scenario: ScenarioChoice) -> Result<()> {
    println!("{}", "=== SETUP PHASE ===".bright_white().bold());

    let health = api_client.health().await?;
    println!(
        "{} Server is {} at {}",
        "✓".green(),
        health["status"].as_str().unwrap_or("unknown"),
        api_client.base_url()
    );

    let mut results = Vec::new();

    if scenario == ScenarioChoice::Connection {
        println!("\n{}", "=== TEST PHASE ===".bright_white().bold());
        results.push(scenarios::test_connection(api_client.base_url()).await?);
        return finish(&results);
    }

    // Two sessions: the one issuing requests and a bystander
    println!("\n{} Establishing SSE connections...", "→".blue());
    let mut origin = ClientSession::new(api_client.base_url(), "Origin");
    let mut observer = ClientSession::new(api_client.base_url(), "Observer");

    for session in [&mut origin, &mut observer] {
        session.load(api_client).await?;
        session.connect().await?;
        session.wait_until_connected(Duration::from_secs(5)).await?;
        println!("{} {} SSE connection established", "✓".green(), session.label);
    }

    println!("\n{}", "=== TEST PHASE ===".bright_white().bold());

    match scenario {
        ScenarioChoice::Create => results.push(
            scenarios::test_product_create(api_client, &mut origin, &mut observer).await?,
        ),
        ScenarioChoice::Update => {
            results.push(scenarios::test_product_update(api_client, &mut observer).await?)
        }
        ScenarioChoice::Delete => {
            results.push(scenarios::test_product_delete(api_client, &mut observer).await?)
        }
        ScenarioChoice::NotFound => {
            results.push(scenarios::test_not_found(api_client, &mut observer).await?)
        }
        ScenarioChoice::IdUniqueness => {
            results.push(scenarios::test_id_uniqueness(api_client, &mut observer).await?)
        }
        ScenarioChoice::Connection | ScenarioChoice::All => {
            results.push(scenarios::test_connection(api_client.base_url()).await?);
            results.push(
                scenarios::test_product_create(api_client, &mut origin, &mut observer).await?,
            );
            results.push(scenarios::test_product_update(api_client, &mut observer).await?);
            results.push(scenarios::test_product_delete(api_client, &mut observer).await?);
            results.push(scenarios::test_not_found(api_client, &mut observer).await?);
            results.push(scenarios::test_id_uniqueness(api_client, &mut observer).await?);
        }
    }

    origin.disconnect();
    observer.disconnect();

    finish(&results)
}

fn finish(results: &[TestResult]) -> Result<()> {
    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All tests passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some tests failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
