//! Aggregate registry.
//!
//! Maps an aggregate type name to the factory that builds instances of it.
//! The registry is populated once during initialization and read for the rest
//! of the process's life, typically when rehydrating an aggregate from
//! persisted history where only its type name and id are known.
//!
//! Registration mistakes are configuration bugs and abort startup through
//! [`AggregateRegistry::register`]; looking up an unknown type at runtime is a
//! data problem and comes back as [`DomainError::AggregateNotRegistered`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::aggregate::{Aggregate, AggregateType};
use crate::error::{DomainError, RegistrationError};
use crate::id::{IdGenerator, RandomIdGenerator};

/// Builds an aggregate instance for an id. `None` means the factory could
/// not produce one.
pub type AggregateFactory = Arc<dyn Fn(Uuid) -> Option<Box<dyn Aggregate>> + Send + Sync>;

/// Process-wide map from aggregate type to factory.
///
/// Share one registry (by reference or `Arc`) with every component that
/// creates aggregates. Lookups take a read lock and never block each other;
/// registration takes the write lock.
pub struct AggregateRegistry {
    factories: RwLock<HashMap<AggregateType, AggregateFactory>>,
    ids: Box<dyn IdGenerator>,
}

impl AggregateRegistry {
    /// Creates an empty registry that probes factories with random ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(RandomIdGenerator)
    }

    /// Creates an empty registry that probes factories with ids from `ids`.
    #[must_use]
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
            ids: Box::new(ids),
        }
    }

    /// Registers a factory under the type name its instances report.
    ///
    /// The factory is invoked once with a generated id to discover the type
    /// name; that probe instance is dropped. The probe is built before the
    /// write lock is taken.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::NoAggregate` if the factory returns
    /// `None`, `RegistrationError::EmptyAggregateType` if the probe reports
    /// an empty type name, and `RegistrationError::DuplicateAggregateType`
    /// if the type name is already registered.
    pub fn try_register<F>(&self, factory: F) -> Result<AggregateType, RegistrationError>
    where
        F: Fn(Uuid) -> Option<Box<dyn Aggregate>> + Send + Sync + 'static,
    {
        let probe = factory(self.ids.next_id()).ok_or(RegistrationError::NoAggregate)?;
        let aggregate_type = probe.aggregate_type().clone();
        drop(probe);

        if aggregate_type.is_empty() {
            return Err(RegistrationError::EmptyAggregateType);
        }

        let mut factories = self.factories.write();
        if factories.contains_key(&aggregate_type) {
            return Err(RegistrationError::DuplicateAggregateType(aggregate_type));
        }
        factories.insert(aggregate_type.clone(), Arc::new(factory));
        drop(factories);

        info!(%aggregate_type, "registered aggregate");
        Ok(aggregate_type)
    }

    /// Registers a factory, aborting on any registration error.
    ///
    /// Meant for process initialization: a registry with a missing,
    /// nameless or duplicated aggregate kind must not be used.
    ///
    /// # Panics
    ///
    /// Panics if [`try_register`](Self::try_register) fails.
    #[track_caller]
    pub fn register<F>(&self, factory: F) -> AggregateType
    where
        F: Fn(Uuid) -> Option<Box<dyn Aggregate>> + Send + Sync + 'static,
    {
        match self.try_register(factory) {
            Ok(aggregate_type) => aggregate_type,
            Err(err) => {
                error!(error = %err, "aggregate registration failed");
                panic!("strata: {err}");
            }
        }
    }

    /// Registers an infallible constructor, aborting on any registration
    /// error.
    ///
    /// # Panics
    ///
    /// Panics if the constructed type's name is empty or already registered.
    #[track_caller]
    pub fn register_type<A, F>(&self, constructor: F) -> AggregateType
    where
        A: Aggregate + 'static,
        F: Fn(Uuid) -> A + Send + Sync + 'static,
    {
        self.register(move |id| Some(Box::new(constructor(id)) as Box<dyn Aggregate>))
    }

    /// Creates a fresh instance of a registered aggregate type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotRegistered` if no factory is
    /// registered for `aggregate_type`, or `DomainError::AggregateNotCreated`
    /// if the factory returns `None`.
    pub fn create(
        &self,
        aggregate_type: &AggregateType,
        id: Uuid,
    ) -> Result<Box<dyn Aggregate>, DomainError> {
        let factory = self.factories.read().get(aggregate_type).cloned();
        let Some(factory) = factory else {
            warn!(%aggregate_type, %id, "aggregate not registered");
            return Err(DomainError::AggregateNotRegistered(aggregate_type.clone()));
        };

        debug!(%aggregate_type, %id, "creating aggregate");
        factory(id).ok_or_else(|| DomainError::AggregateNotCreated(aggregate_type.clone()))
    }

    /// Returns `true` if a factory is registered for `aggregate_type`.
    #[must_use]
    pub fn is_registered(&self, aggregate_type: &AggregateType) -> bool {
        self.factories.read().contains_key(aggregate_type)
    }

    /// Returns every registered aggregate type, sorted by name.
    #[must_use]
    pub fn registered_types(&self) -> Vec<AggregateType> {
        let mut types: Vec<AggregateType> = self.factories.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Returns the number of registered aggregate types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }
}

impl Default for AggregateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AggregateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateRegistry")
            .field("registered_types", &self.registered_types())
            .finish_non_exhaustive()
    }
}
