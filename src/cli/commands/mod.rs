//! CLI command implementations

pub mod completions;
pub mod delete;
pub mod history;
pub mod item_form;
pub mod list;
pub mod report;
pub mod show;
