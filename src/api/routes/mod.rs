//! API Routes
//!
//! Route handlers organized by functionality.

pub mod credits;
pub mod delegations;
pub mod health;
pub mod process_ids;
pub mod query;
