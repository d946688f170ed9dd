//! Strata walkthrough: registers the Orders aggregates, drives one order
//! through its lifecycle against an in-memory event repository and rebuilds
//! it from the stored history.

use std::error::Error;

use strata_core::aggregate::{Aggregate, AggregateType};
use strata_core::command::Command;
use strata_core::context::Context;
use strata_core::registry::AggregateRegistry;
use strata_core::repository::EventRepository;
use strata_orders::application::command_handlers::handle_order_command;
use strata_orders::domain::aggregates::ORDER_AGGREGATE_TYPE;
use strata_orders::domain::commands::{AddItem, CancelOrder, PlaceOrder};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod config;
mod store;

use config::{Config, LogFormat};
use store::InMemoryEventRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    // Initialize tracing subscriber.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).pretty().init(),
    }

    tracing::info!("Starting Strata order walkthrough");

    // Registration problems are fatal: `register_aggregates` panics on them.
    let registry = AggregateRegistry::new();
    strata_orders::register_aggregates(&registry);

    let repo = InMemoryEventRepository::default();
    let order_id = Uuid::new_v4();
    let correlation_id = Uuid::new_v4();

    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(PlaceOrder {
            correlation_id,
            order_id,
            customer: "ada".into(),
        }),
        Box::new(AddItem {
            correlation_id,
            order_id,
            sku: "ABC-1".into(),
            quantity: 2,
        }),
        Box::new(AddItem {
            correlation_id,
            order_id,
            sku: "XYZ-9".into(),
            quantity: 1,
        }),
        // Rejected: zero quantity. Reported, not fatal.
        Box::new(AddItem {
            correlation_id,
            order_id,
            sku: "ABC-1".into(),
            quantity: 0,
        }),
        Box::new(CancelOrder {
            correlation_id,
            order_id,
            reason: "customer request".into(),
        }),
    ];

    for command in &commands {
        let ctx = Context::new(command.correlation_id());
        match handle_order_command(command.as_ref(), &ctx, &registry, &repo).await {
            Ok(result) => tracing::info!(
                command_type = command.command_type(),
                version = result.version,
                "command accepted"
            ),
            Err(err) => tracing::warn!(
                command_type = command.command_type(),
                error = %err,
                "command rejected"
            ),
        }
    }

    // Rebuild the order from its persisted history.
    let history = repo.load_events(order_id).await?;
    let ctx = Context::new(correlation_id);
    let mut order = registry.create(&AggregateType::new(ORDER_AGGREGATE_TYPE), order_id)?;
    order.load_from_history(&ctx, &history)?;
    tracing::info!(
        aggregate_type = %order.aggregate_type(),
        aggregate_id = %order.aggregate_id(),
        version = order.version(),
        "order rehydrated"
    );

    // Unknown aggregate types are a recoverable lookup failure.
    if let Err(err) = registry.create(&AggregateType::new("Invoice"), Uuid::new_v4()) {
        tracing::info!(error = %err, "lookup of unregistered type reported");
    }

    Ok(())
}
