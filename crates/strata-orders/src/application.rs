//! Application services for the Orders context.

pub mod command_handlers;
