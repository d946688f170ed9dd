//! Aggregate roots for the Orders context.

use strata_core::aggregate::{Aggregate, AggregateBase};
use strata_core::command::Command;
use strata_core::context::Context;
use strata_core::error::DomainError;
use strata_core::event::Event;
use uuid::Uuid;

use super::commands::{AddItem, CancelOrder, PlaceOrder};
use super::events::{
    ITEM_ADDED_EVENT_TYPE, ItemAdded, ORDER_CANCELLED_EVENT_TYPE, ORDER_PLACED_EVENT_TYPE,
    OrderCancelled, OrderPlaced,
};

/// Registered type name of the `Order` aggregate.
pub const ORDER_AGGREGATE_TYPE: &str = "Order";

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    /// Created but not yet placed.
    #[default]
    Draft,
    /// Placed by a customer; accepts items.
    Placed,
    /// Cancelled; accepts nothing further.
    Cancelled,
}

/// A quantity of one SKU on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Stock keeping unit.
    pub sku: String,
    /// Number of units.
    pub quantity: u32,
}

/// The aggregate root for a customer order.
#[derive(Debug)]
pub struct Order {
    base: AggregateBase,
    status: OrderStatus,
    customer: Option<String>,
    items: Vec<LineItem>,
}

impl Order {
    /// Creates a new, empty draft order.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            base: AggregateBase::new(ORDER_AGGREGATE_TYPE, id),
            status: OrderStatus::default(),
            customer: None,
            items: Vec::new(),
        }
    }

    /// Returns the order's lifecycle state.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the customer, once the order is placed.
    #[must_use]
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    /// Returns the line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Places the order, producing an `OrderPlaced` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the customer is blank or the
    /// order is no longer a draft.
    pub fn place(&mut self, ctx: &Context, customer: &str) -> Result<(), DomainError> {
        if customer.trim().is_empty() {
            return Err(DomainError::Validation("customer must not be empty".into()));
        }
        if self.status != OrderStatus::Draft {
            return Err(DomainError::Validation(format!(
                "order {} has already been placed",
                self.aggregate_id()
            )));
        }
        self.record_event(
            ctx,
            &OrderPlaced {
                customer: customer.to_owned(),
            },
        )?;
        Ok(())
    }

    /// Adds units of an item, producing an `ItemAdded` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the SKU is blank, the quantity is
    /// zero or the order is not placed.
    pub fn add_item(&mut self, ctx: &Context, sku: &str, quantity: u32) -> Result<(), DomainError> {
        if sku.trim().is_empty() {
            return Err(DomainError::Validation("sku must not be empty".into()));
        }
        if quantity == 0 {
            return Err(DomainError::Validation("quantity must be positive".into()));
        }
        self.ensure_placed()?;
        self.record_event(
            ctx,
            &ItemAdded {
                sku: sku.to_owned(),
                quantity,
            },
        )?;
        Ok(())
    }

    /// Cancels the order, producing an `OrderCancelled` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the order is not placed.
    pub fn cancel(&mut self, ctx: &Context, reason: &str) -> Result<(), DomainError> {
        self.ensure_placed()?;
        self.record_event(
            ctx,
            &OrderCancelled {
                reason: reason.to_owned(),
            },
        )?;
        Ok(())
    }

    fn ensure_placed(&self) -> Result<(), DomainError> {
        match self.status {
            OrderStatus::Placed => Ok(()),
            OrderStatus::Draft => Err(DomainError::Validation(format!(
                "order {} has not been placed",
                self.aggregate_id()
            ))),
            OrderStatus::Cancelled => Err(DomainError::Validation(format!(
                "order {} is cancelled",
                self.aggregate_id()
            ))),
        }
    }
}

impl Aggregate for Order {
    fn base(&self) -> &AggregateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AggregateBase {
        &mut self.base
    }

    fn handle_command(&mut self, ctx: &Context, command: &dyn Command) -> Result<(), DomainError> {
        if let Some(command) = command.downcast_ref::<PlaceOrder>() {
            self.place(ctx, &command.customer)
        } else if let Some(command) = command.downcast_ref::<AddItem>() {
            self.add_item(ctx, &command.sku, command.quantity)
        } else if let Some(command) = command.downcast_ref::<CancelOrder>() {
            self.cancel(ctx, &command.reason)
        } else {
            Err(DomainError::UnknownCommand {
                aggregate_type: self.aggregate_type().clone(),
                command_type: command.command_type().to_owned(),
            })
        }
    }

    fn apply_event(&mut self, _ctx: &Context, event: &Event) -> Result<(), DomainError> {
        // Decode first: a rejected payload must leave the order untouched.
        match event.event_type().as_str() {
            ORDER_PLACED_EVENT_TYPE => {
                let payload: OrderPlaced = event.decode()?;
                self.status = OrderStatus::Placed;
                self.customer = Some(payload.customer);
            }
            ITEM_ADDED_EVENT_TYPE => {
                let payload: ItemAdded = event.decode()?;
                match self.items.iter_mut().find(|item| item.sku == payload.sku) {
                    Some(item) => item.quantity = item.quantity.saturating_add(payload.quantity),
                    None => self.items.push(LineItem {
                        sku: payload.sku,
                        quantity: payload.quantity,
                    }),
                }
            }
            ORDER_CANCELLED_EVENT_TYPE => {
                let _: OrderCancelled = event.decode()?;
                self.status = OrderStatus::Cancelled;
            }
            _ => {
                return Err(DomainError::UnknownEventType {
                    aggregate_type: self.aggregate_type().clone(),
                    event_type: event.event_type().clone(),
                });
            }
        }
        self.increment_version();
        Ok(())
    }
}
