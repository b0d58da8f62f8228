//! RHub Directory — master-data and user-provisioning services.
//!
//! This crate provides:
//! - [`LookupService`](lookup::LookupService) for the name-unique
//!   master lookup tables with "in active use" guards
//! - [`UserService`](users::UserService) for account provisioning with
//!   generated user codes and temporary passwords
//! - Password policy and generation helpers ([`password`])

pub mod lookup;
pub mod password;
pub mod users;

pub use lookup::LookupService;
pub use users::UserService;
