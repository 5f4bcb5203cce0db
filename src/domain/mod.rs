//! Marketplace entities, money types and the storage port.

pub mod auth;
pub mod contract;
pub mod job;
pub mod money;
pub mod ports;
pub mod profile;
pub mod query;
