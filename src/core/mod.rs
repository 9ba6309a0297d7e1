//! Core module - the item synchronization engine

pub mod audit;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod form;
pub mod inventory;
pub mod logging;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use audit::{AuditEntry, AuditTicket, AuditTrail, AuditView};
pub use client::{HttpItemsApi, ItemsApi};
pub use config::{Config, ConfigError, ConfigOverrides};
pub use error::{ApiError, ApiResult, FieldErrors};
pub use fetch::{FetchState, RequestSequence, Ticket};
pub use form::{FieldStatus, FormDraft, FormMode, ItemForm, LoadFailure, SubmitBlocked, SubmitOutcome};
pub use inventory::{filter_items, DeleteRejected, Inventory, Notification, Severity};
pub use validate::{validate, Field};
