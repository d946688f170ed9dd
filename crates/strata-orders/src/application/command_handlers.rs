//! Command handlers for the Orders context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load history, rehydrate the aggregate through the
//! registry, execute the command, persist events.

use strata_core::aggregate::Aggregate;
use strata_core::command::Command;
use strata_core::context::Context;
use strata_core::error::DomainError;
use strata_core::event::Event;
use strata_core::registry::AggregateRegistry;
use strata_core::repository::EventRepository;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::commands::PlaceOrder;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct OrderCommandResult {
    /// The aggregate ID affected or created by the command.
    pub aggregate_id: Uuid,
    /// The aggregate version after the command.
    pub version: u64,
    /// The events produced and persisted.
    pub events: Vec<Event>,
}

/// Handles an Orders command: loads the aggregate's history, creates the
/// aggregate through the registry, replays the history, runs the command and
/// appends the resulting events with the pre-command version as the expected
/// version.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if a command other than
/// `PlaceOrder` targets an order with no history, and otherwise any error
/// from the repository, the registry, replay or the command itself.
#[instrument(
    skip(command, ctx, registry, repo),
    fields(aggregate_id = %command.aggregate_id(), command_type = command.command_type())
)]
pub async fn handle_order_command(
    command: &dyn Command,
    ctx: &Context,
    registry: &AggregateRegistry,
    repo: &dyn EventRepository,
) -> Result<OrderCommandResult, DomainError> {
    let aggregate_id = command.aggregate_id();
    let history = repo.load_events(aggregate_id).await?;
    if history.is_empty() && command.downcast_ref::<PlaceOrder>().is_none() {
        return Err(DomainError::AggregateNotFound(aggregate_id));
    }

    let mut aggregate = registry.create(&command.aggregate_type(), aggregate_id)?;
    aggregate.load_from_history(ctx, &history)?;
    let expected_version = aggregate.version();

    aggregate.handle_command(ctx, command)?;

    let events = aggregate.uncommitted_events().to_vec();
    if !events.is_empty() {
        repo.append_events(aggregate_id, expected_version, &events)
            .await?;
    }
    aggregate.clear_uncommitted_events();

    info!(
        events = events.len(),
        version = aggregate.version(),
        "command handled"
    );

    Ok(OrderCommandResult {
        aggregate_id,
        version: aggregate.version(),
        events,
    })
}
