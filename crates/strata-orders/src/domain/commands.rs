//! Commands for the Orders context.

use strata_core::aggregate::AggregateType;
use strata_core::command::Command;
use uuid::Uuid;

use super::aggregates::ORDER_AGGREGATE_TYPE;

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The order identifier.
    pub order_id: Uuid,
    /// The customer placing the order.
    pub customer: String,
}

impl Command for PlaceOrder {
    fn command_type(&self) -> &'static str {
        "orders.place_order"
    }

    fn aggregate_type(&self) -> AggregateType {
        AggregateType::new(ORDER_AGGREGATE_TYPE)
    }

    fn aggregate_id(&self) -> Uuid {
        self.order_id
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add an item to a placed order.
#[derive(Debug, Clone)]
pub struct AddItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The order identifier.
    pub order_id: Uuid,
    /// Stock keeping unit of the item.
    pub sku: String,
    /// Number of units to add.
    pub quantity: u32,
}

impl Command for AddItem {
    fn command_type(&self) -> &'static str {
        "orders.add_item"
    }

    fn aggregate_type(&self) -> AggregateType {
        AggregateType::new(ORDER_AGGREGATE_TYPE)
    }

    fn aggregate_id(&self) -> Uuid {
        self.order_id
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to cancel a placed order.
#[derive(Debug, Clone)]
pub struct CancelOrder {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The order identifier.
    pub order_id: Uuid,
    /// Why the order is being cancelled.
    pub reason: String,
}

impl Command for CancelOrder {
    fn command_type(&self) -> &'static str {
        "orders.cancel_order"
    }

    fn aggregate_type(&self) -> AggregateType {
        AggregateType::new(ORDER_AGGREGATE_TYPE)
    }

    fn aggregate_id(&self) -> Uuid {
        self.order_id
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
