//! Entity type definitions

pub mod event;
pub mod item;

pub use event::{Event, EventType, Payload, PayloadValue};
pub use item::{Item, ItemFields, ItemId, QuantityLevel, Timestamp};
