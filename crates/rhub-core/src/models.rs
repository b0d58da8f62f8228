//! Domain models shared across all crates.

pub mod audit;
pub mod lookup;
pub mod requisition;
pub mod role;
pub mod user;
