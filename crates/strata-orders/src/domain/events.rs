//! Domain events for the Orders context.

use serde::{Deserialize, Serialize};
use strata_core::event::EventPayload;

/// Event type emitted when an order is placed.
pub const ORDER_PLACED_EVENT_TYPE: &str = "OrderPlaced";
/// Event type emitted when an item is added to an order.
pub const ITEM_ADDED_EVENT_TYPE: &str = "ItemAdded";
/// Event type emitted when an order is cancelled.
pub const ORDER_CANCELLED_EVENT_TYPE: &str = "OrderCancelled";

/// Emitted when an order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    /// The customer who placed the order.
    pub customer: String,
}

impl EventPayload for OrderPlaced {
    const EVENT_TYPE: &'static str = ORDER_PLACED_EVENT_TYPE;
}

/// Emitted when an item is added to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    /// Stock keeping unit of the item.
    pub sku: String,
    /// Number of units added.
    pub quantity: u32,
}

impl EventPayload for ItemAdded {
    const EVENT_TYPE: &'static str = ITEM_ADDED_EVENT_TYPE;
}

/// Emitted when an order is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    /// Why the order was cancelled.
    pub reason: String,
}

impl EventPayload for OrderCancelled {
    const EVENT_TYPE: &'static str = ORDER_CANCELLED_EVENT_TYPE;
}
