//! RHub Core — domain models, repository traits, and shared error
//! taxonomy for the recruitment workflow backend.
//!
//! This crate performs no I/O. Repository implementations live in
//! `rhub-db`; the lifecycle engine and the master-data services are
//! generic over the traits defined here.

pub mod error;
pub mod identity;
pub mod models;
pub mod notify;
pub mod repository;
pub mod storage;

pub use error::{RhubError, RhubResult};
