//! Strata Core — event-sourced aggregate abstractions.
//!
//! This crate defines the aggregate contract every domain entity implements,
//! the event and command shapes that cross it, and the registry that turns an
//! aggregate type name into a fresh instance. It contains no infrastructure
//! code.

pub mod aggregate;
pub mod command;
pub mod context;
pub mod error;
pub mod event;
pub mod id;
pub mod registry;
pub mod repository;
