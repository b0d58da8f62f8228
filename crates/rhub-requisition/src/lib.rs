//! RHub Requisition — the People Requisition lifecycle engine.
//!
//! This crate provides:
//! - Job-code derivation from position names ([`code`])
//! - Role-gated editable field sets ([`fields`])
//! - The explicit status transition table ([`transitions`])
//! - The retrieval visibility policy ([`visibility`])
//! - On-disk JD file storage ([`storage`])
//! - The orchestrating [`RequisitionService`](service::RequisitionService)
//!
//! The service is generic over the `rhub-core` repository traits so the
//! engine carries no database dependency.

pub mod code;
pub mod fields;
pub mod service;
pub mod storage;
pub mod transitions;
pub mod visibility;

pub use service::RequisitionService;
