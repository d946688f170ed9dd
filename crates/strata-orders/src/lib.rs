//! Strata — Orders bounded context.
//!
//! Responsible for customer orders: placing an order, adding line items and
//! cancelling it. Also serves as the reference for wiring an aggregate kind
//! into the registry.

pub mod application;
pub mod domain;

use strata_core::registry::AggregateRegistry;

use crate::domain::aggregates::Order;

/// Registers every aggregate kind of the Orders context.
///
/// # Panics
///
/// Panics if an Orders aggregate type is already registered in `registry`.
pub fn register_aggregates(registry: &AggregateRegistry) {
    registry.register_type(Order::new);
}
