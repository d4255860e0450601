//! Engine commands: the customer service API and command dispatch

pub mod customer_service;
pub mod engine_command;
