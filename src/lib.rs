//! Stockpile: inventory item sync and presentation engine
//!
//! Keeps a local view of a remote item collection in sync with the server,
//! validates edits before they leave the client, shows per-item audit
//! history and renders printable stock reports.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
