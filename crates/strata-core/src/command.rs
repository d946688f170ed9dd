//! Command abstractions.

use std::any::Any;

use uuid::Uuid;

use crate::aggregate::AggregateType;

/// Access to a value as `&dyn Any`, implemented for every `'static` type.
///
/// Lets an aggregate recover its concrete command type from `&dyn Command`.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Trait that all commands implement.
///
/// The `'static` bound makes `&dyn Command` mean `&(dyn Command + 'static)`,
/// which `downcast_ref` requires.
pub trait Command: AsAny + Send + Sync + std::fmt::Debug + 'static {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// The kind of aggregate this command targets.
    fn aggregate_type(&self) -> AggregateType;

    /// The aggregate instance this command targets.
    fn aggregate_id(&self) -> Uuid;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;
}

impl dyn Command {
    /// Returns the command as `C` if that is its concrete type.
    #[must_use]
    pub fn downcast_ref<C: Command>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }
}
