//! Application layer: the services every interface calls into.
//!
//! Each service receives its `LedgerStore` at construction and keeps no state
//! of its own, so they are cheap to clone into request handlers. Settlement is
//! the only writer; reporting and queries are pure reads.

pub mod identity;
pub mod queries;
pub mod reporting;
pub mod retry;
pub mod settlement;
