use anyhow::Result;
use colored::*;
use std::time::{Duration, Instant};

use crate::api_client::{ApiClient, Mutation};
use crate::output::{print_event, TestResult};
use crate::product::Product;
use crate::session::{ClientSession, EventKind, ProductEvent};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Long enough for a wrongly broadcast event to show up.
const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Opens a fresh session and waits for the server's greeting.
pub async fn test_connection(base_url: &str) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Connection ===".bright_cyan().bold());

    let mut session = ClientSession::new(base_url, "Probe");
    session.connect().await?;
    println!("{} Probe connecting to the product hub...", "→".blue());

    let result = session.wait_until_connected(EVENT_TIMEOUT).await;
    session.disconnect();

    match result {
        Ok(()) => {
            println!("{} Probe connected", "✓".green());
            Ok(TestResult::pass("connection", start.elapsed()))
        }
        Err(e) => {
            println!("{} Probe failed to connect: {}", "✗".red(), e);
            Ok(TestResult::fail("connection", e.to_string(), start.elapsed()))
        }
    }
}

/// The origin and the observer both receive `product_added`, and the observer's
/// mirror picks the product up.
pub async fn test_product_create(
    api_client: &ApiClient,
    origin: &mut ClientSession,
    observer: &mut ClientSession,
) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Product Create ===".bright_cyan().bold());

    println!("{} {} creating product...", "→".blue(), origin.label);
    let product = api_client
        .create_product(&Product::draft("Scenario Widget", 9.99, "Created by product-client"))
        .await?;
    println!("{} Product created (ID: {})", "✓".green(), product.id);

    println!(
        "{} Waiting for both sessions to receive product_added...",
        "→".blue()
    );

    for session in [origin, observer] {
        match session
            .wait_for(EventKind::ProductAdded, product.id, EVENT_TIMEOUT)
            .await
        {
            Ok(event) => {
                print_event(&session.label, &event);
                if session.mirror().find(product.id) != Some(&product) {
                    return Ok(TestResult::fail(
                        "product_create",
                        format!("{} mirror does not hold product {}", session.label, product.id),
                        start.elapsed(),
                    ));
                }
            }
            Err(e) => {
                println!("{} {}: {}", "✗".red(), session.label, e);
                return Ok(TestResult::fail(
                    "product_create",
                    format!("{}: {}", session.label, e),
                    start.elapsed(),
                ));
            }
        }
    }

    println!("{} Event data verified correctly", "✓".green());
    Ok(TestResult::pass("product_create", start.elapsed()))
}

pub async fn test_product_update(
    api_client: &ApiClient,
    observer: &mut ClientSession,
) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Product Update ===".bright_cyan().bold());

    let product = api_client
        .create_product(&Product::draft("Scenario Update", 1.0, ""))
        .await?;

    // Wait for and apply the create event first
    observer
        .wait_for(EventKind::ProductAdded, product.id, EVENT_TIMEOUT)
        .await?;

    println!("{} Updating product {}...", "→".blue(), product.id);
    let outcome = api_client
        .update_product(product.id, &Product::draft("Updated Name", 2.5, "updated"))
        .await?;
    if outcome != Mutation::Applied {
        return Ok(TestResult::fail(
            "product_update",
            format!("Expected 204, got {outcome:?}"),
            start.elapsed(),
        ));
    }

    println!(
        "{} Waiting for {} to receive product_updated...",
        "→".blue(),
        observer.label
    );

    match observer
        .wait_for(EventKind::ProductUpdated, product.id, EVENT_TIMEOUT)
        .await
    {
        Ok(event) => {
            print_event(&observer.label, &event);

            let mirrored = observer.mirror().find(product.id).map(|p| p.name.as_str());
            if mirrored == Some("Updated Name") {
                println!("{} Event data verified correctly", "✓".green());
                Ok(TestResult::pass("product_update", start.elapsed()))
            } else {
                Ok(TestResult::fail(
                    "product_update",
                    format!("Mirrored name mismatch: {mirrored:?}"),
                    start.elapsed(),
                ))
            }
        }
        Err(e) => Ok(TestResult::fail(
            "product_update",
            format!("Timeout: {e}"),
            start.elapsed(),
        )),
    }
}

pub async fn test_product_delete(
    api_client: &ApiClient,
    observer: &mut ClientSession,
) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Product Delete ===".bright_cyan().bold());

    let product = api_client
        .create_product(&Product::draft("Scenario Delete", 1.0, ""))
        .await?;

    observer
        .wait_for(EventKind::ProductAdded, product.id, EVENT_TIMEOUT)
        .await?;

    println!("{} Deleting product {}...", "→".blue(), product.id);
    api_client.delete_product(product.id).await?;

    match observer
        .wait_for(EventKind::ProductDeleted, product.id, EVENT_TIMEOUT)
        .await
    {
        Ok(event) => {
            print_event(&observer.label, &event);

            if observer.mirror().find(product.id).is_none() {
                println!("{} Product removed from mirror", "✓".green());
                Ok(TestResult::pass("product_delete", start.elapsed()))
            } else {
                Ok(TestResult::fail(
                    "product_delete",
                    format!("Product {} still mirrored", product.id),
                    start.elapsed(),
                ))
            }
        }
        Err(e) => Ok(TestResult::fail(
            "product_delete",
            format!("Timeout: {e}"),
            start.elapsed(),
        )),
    }
}

/// Unknown ids answer 404 and nothing is broadcast.
pub async fn test_not_found(
    api_client: &ApiClient,
    observer: &mut ClientSession,
) -> Result<TestResult> {
    let start = Instant::now();
    let missing_id = i32::MAX;

    println!("\n{}", "=== TEST: Not Found ===".bright_cyan().bold());

    let update = api_client
        .update_product(missing_id, &Product::draft("Ghost", 0.0, ""))
        .await?;
    let delete = api_client.delete_product(missing_id).await?;

    if update != Mutation::NotFound || delete != Mutation::NotFound {
        return Ok(TestResult::fail(
            "not_found",
            format!("Expected 404 for both, got update={update:?} delete={delete:?}"),
            start.elapsed(),
        ));
    }
    println!("{} Update and delete both returned 404", "✓".green());

    for kind in [EventKind::ProductUpdated, EventKind::ProductDeleted] {
        if let Ok(event) = observer.wait_for(kind, missing_id, QUIET_PERIOD).await {
            return Ok(TestResult::fail(
                "not_found",
                format!("Unexpected broadcast: {event:?}"),
                start.elapsed(),
            ));
        }
    }

    println!("{} No event broadcast", "✓".green());
    Ok(TestResult::pass("not_found", start.elapsed()))
}

/// POST, POST, DELETE first, POST: the last id must be new.
pub async fn test_id_uniqueness(
    api_client: &ApiClient,
    observer: &mut ClientSession,
) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Id Uniqueness ===".bright_cyan().bold());

    let first = api_client
        .create_product(&Product::draft("Widget", 9.99, ""))
        .await?;
    let second = api_client
        .create_product(&Product::draft("Widget", 9.99, ""))
        .await?;
    api_client.delete_product(first.id).await?;
    let third = api_client
        .create_product(&Product::draft("Gadget", 5.0, ""))
        .await?;

    println!(
        "{} Created ids {}, {} then {} after deleting {}",
        "→".blue(),
        first.id,
        second.id,
        third.id,
        first.id
    );

    let event = observer
        .wait_for(EventKind::ProductAdded, third.id, EVENT_TIMEOUT)
        .await;

    let ids_in_mirror = observer
        .mirror()
        .products()
        .iter()
        .filter(|p| p.id == third.id)
        .count();

    if third.id <= second.id || third.id == first.id {
        Ok(TestResult::fail(
            "id_uniqueness",
            format!("Id {} was reused or went backwards", third.id),
            start.elapsed(),
        ))
    } else if !matches!(event, Ok(ProductEvent::Added(_))) || ids_in_mirror != 1 {
        Ok(TestResult::fail(
            "id_uniqueness",
            format!("Expected one mirrored product with id {}", third.id),
            start.elapsed(),
        ))
    } else {
        println!("{} Identifiers are unique", "✓".green());
        Ok(TestResult::pass("id_uniqueness", start.elapsed()))
    }
}

