use colored::*;
use std::time::Duration;

use crate::commands::Outcome;
use crate::mirror::ProductMirror;
use crate::product::Product;
use crate::session::ProductEvent;

#[derive(Debug)]
pub struct TestResult {
    pub scenario: String,
    pub passed: bool,
    pub message: Option<String>,
    pub duration: Duration,
}

impl TestResult {
    pub fn pass(scenario: &str, duration: Duration) -> Self {
        Self {
            scenario: scenario.to_string(),
            passed: true,
            message: None,
            duration,
        }
    }

    pub fn fail(scenario: &str, message: String, duration: Duration) -> Self {
        Self {
            scenario: scenario.to_string(),
            passed: false,
            message: Some(message),
            duration,
        }
    }
}

pub fn print_event(label: &str, event: &ProductEvent) {
    let label_colored = if label.contains("Observer") {
        label.bright_magenta()
    } else {
        label.bright_blue()
    };

    println!(
        "\n[{}] {} event received",
        label_colored.bold(),
        event.kind().to_string().yellow()
    );

    let detail = match event {
        ProductEvent::Added(product) | ProductEvent::Updated(product) => {
            serde_json::to_string_pretty(product).ok()
        }
        ProductEvent::Deleted(id) => Some(format!("productId: {id}")),
    };
    if let Some(detail) = detail {
        println!("   {}", detail.dimmed());
    }
}

pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Found(product) => print_product(product),
        Outcome::Created(product) => {
            println!("{} Created product {}", "✓".green(), product.id);
            print_product(product);
        }
        Outcome::Updated(id) => println!("{} Updated product {id}", "✓".green()),
        Outcome::Deleted(id) => println!("{} Deleted product {id}", "✓".green()),
        Outcome::NotFound(id) => println!("{} Product {id} not found", "✗".red()),
    }
}

fn print_product(product: &Product) {
    match serde_json::to_string_pretty(product) {
        Ok(json) => println!("{json}"),
        Err(_) => println!("{product:?}"),
    }
}

pub fn print_mirror(label: &str, mirror: &ProductMirror) {
    println!(
        "{} {} product(s) mirrored by {}",
        "≡".cyan(),
        mirror.len(),
        label.bold()
    );

    for product in mirror.products() {
        println!(
            "   {:>4}  {:<24} {:>10.2}  {}",
            product.id.to_string().bright_white(),
            product.name,
            product.price,
            product.description.dimmed()
        );
    }
}

pub fn print_test_summary(results: &[TestResult]) {
    println!("\n{}", "=== TEST SUMMARY ===".bright_white().bold());

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;

    for result in results {
        let status = if result.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("[{}] {} ({:?})", status, result.scenario, result.duration);

        if let Some(msg) = &result.message {
            println!("      {}", msg.dimmed());
        }
    }

    println!(
        "\n{}: {} passed, {} failed",
        "Results".bold(),
        passed.to_string().green(),
        failed.to_string().red()
    );
}
