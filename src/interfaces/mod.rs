//! Outer adapters: the HTTP API and CSV seed loading.

pub mod csv;
pub mod http;
