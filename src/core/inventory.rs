//! Inventory cache and search filter
//!
//! [`Inventory`] owns the client-side copy of every item. It is replaced
//! wholesale on each load (never merged), narrowed by a search query without
//! touching the network, and shrunk by exactly one entry when a delete is
//! confirmed by the server.

use thiserror::Error;

use crate::core::client::ItemsApi;
use crate::core::error::ApiResult;
use crate::core::fetch::{FetchState, RequestSequence, Ticket};
use crate::entities::{Item, ItemId};

pub const LOAD_FAILED: &str = "Failed to load inventory items";
pub const DELETE_FAILED: &str = "Failed to delete item";
pub const DELETE_SUCCEEDED: &str = "Item deleted successfully";

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A one-shot message for the operator (toast/snackbar)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }
}

/// Why a delete could not be started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeleteRejected {
    #[error("item #{0} is still being deleted")]
    InFlight(ItemId),
}

#[derive(Debug, Default)]
pub struct Inventory {
    state: FetchState<Vec<Item>>,
    query: String,
    loads: RequestSequence,
    deleting: Option<ItemId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<Vec<Item>> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Load failure message, paired with a retry affordance by the caller
    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// The full cached list; `None` unless the last load succeeded
    pub fn items(&self) -> Option<&[Item]> {
        self.state.loaded().map(Vec::as_slice)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Enter the loading state; the previous list is discarded immediately so
    /// nobody can read it while the refresh is in flight
    pub fn begin_load(&mut self) -> Ticket {
        self.state = FetchState::Loading;
        self.loads.issue()
    }

    /// Apply a list response. Returns `false` if a newer load superseded it.
    pub fn finish_load(&mut self, ticket: Ticket, result: ApiResult<Vec<Item>>) -> bool {
        if !self.loads.is_current(ticket) {
            tracing::debug!("discarding stale inventory response");
            return false;
        }

        self.state = match result {
            Ok(items) => {
                tracing::info!(count = items.len(), "inventory loaded");
                FetchState::Loaded(dedupe_by_id(items))
            }
            Err(e) => {
                tracing::warn!("inventory load failed: {}", e);
                FetchState::Failed(e.user_message(LOAD_FAILED))
            }
        };
        true
    }

    /// Fetch the full item set and replace the cache with it
    pub async fn load(&mut self, api: &dyn ItemsApi) {
        let ticket = self.begin_load();
        let result = api.list_items().await;
        self.finish_load(ticket, result);
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn is_filtered(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Items matching the current query, in cache order
    pub fn filtered(&self) -> Option<Vec<&Item>> {
        self.items().map(|items| filter_items(items, &self.query))
    }

    /// Count line shown above the table
    pub fn summary(&self) -> Option<String> {
        let items = self.items()?;
        let noun = if items.len() == 1 { "item" } else { "items" };
        if self.is_filtered() {
            let shown = filter_items(items, &self.query).len();
            Some(format!(
                "{} of {} {} matching \"{}\"",
                shown,
                items.len(),
                noun,
                self.query.trim()
            ))
        } else {
            Some(format!("{} {} in inventory", items.len(), noun))
        }
    }

    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items()?.iter().find(|item| item.id == id)
    }

    // =========================================================================
    // Deleting
    // =========================================================================

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_some()
    }

    /// Claim the single delete slot
    pub fn begin_delete(&mut self, id: ItemId) -> Result<(), DeleteRejected> {
        if let Some(in_flight) = self.deleting {
            return Err(DeleteRejected::InFlight(in_flight));
        }
        self.deleting = Some(id);
        Ok(())
    }

    /// Apply the server's verdict on a delete. The cache changes only on
    /// success; a failure leaves every item where it was.
    pub fn finish_delete(&mut self, id: ItemId, result: ApiResult<()>) -> Notification {
        if self.deleting == Some(id) {
            self.deleting = None;
        }

        match result {
            Ok(()) => {
                if let Some(items) = self.state.loaded_mut() {
                    if let Some(pos) = items.iter().position(|item| item.id == id) {
                        items.remove(pos);
                    }
                }
                tracing::info!(id, "item deleted");
                Notification::success(DELETE_SUCCEEDED)
            }
            Err(e) => {
                tracing::warn!(id, "delete failed: {}", e);
                Notification::error(e.user_message(DELETE_FAILED))
            }
        }
    }

    /// Issue the delete and apply the result
    pub async fn delete(
        &mut self,
        api: &dyn ItemsApi,
        id: ItemId,
    ) -> Result<Notification, DeleteRejected> {
        self.begin_delete(id)?;
        let result = api.delete_item(id).await;
        Ok(self.finish_delete(id, result))
    }
}

/// Whether `item` matches an already lowercased, trimmed query
fn matches_query(item: &Item, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle) || item.id.to_string().contains(needle)
}

/// Case-insensitive substring match on name, or partial match on the id's
/// decimal form. A blank query keeps everything.
pub fn filter_items<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| matches_query(item, &needle))
        .collect()
}

/// Keep the first occurrence of each id
fn dedupe_by_id(items: Vec<Item>) -> Vec<Item> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    let before = items.len();
    let items: Vec<Item> = items.into_iter().filter(|item| seen.insert(item.id)).collect();
    if items.len() != before {
        tracing::warn!(
            dropped = before - items.len(),
            "server returned duplicate item ids"
        );
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ApiError;
    use crate::core::testing::FakeApi;
    use proptest::prelude::*;

    fn item(id: ItemId, name: &str, quantity: u64) -> Item {
        Item {
            id,
            name: name.to_string(),
            quantity,
            created_at: None,
        }
    }

    fn loaded(items: Vec<Item>) -> Inventory {
        let mut inventory = Inventory::new();
        let ticket = inventory.begin_load();
        inventory.finish_load(ticket, Ok(items));
        inventory
    }

    #[test]
    fn test_search_by_name_and_id() {
        let inventory = {
            let mut inv = loaded(vec![item(1, "Bolt", 0)]);
            inv.set_query("bolt");
            inv
        };
        assert_eq!(inventory.filtered().unwrap().len(), 1);

        let mut inventory = inventory;
        inventory.set_query("99");
        assert!(inventory.filtered().unwrap().is_empty());

        inventory.set_query("1");
        assert_eq!(inventory.filtered().unwrap().len(), 1);
    }

    #[test]
    fn test_partial_id_match() {
        let items = vec![item(12, "Nut", 3), item(120, "Washer", 3), item(7, "Gear", 3)];
        let hits: Vec<ItemId> = filter_items(&items, "12").iter().map(|i| i.id).collect();
        assert_eq!(hits, vec![12, 120]);
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let items = vec![item(1, "Bolt", 0), item(2, "Nut", 4)];
        assert_eq!(filter_items(&items, "   ").len(), 2);
        assert_eq!(filter_items(&items, "").len(), 2);
    }

    #[test]
    fn test_nothing_readable_while_loading() {
        let mut inventory = loaded(vec![item(1, "Bolt", 0)]);
        inventory.begin_load();
        assert!(inventory.is_loading());
        assert!(inventory.items().is_none());
        assert!(inventory.filtered().is_none());
        assert!(inventory.summary().is_none());
    }

    #[test]
    fn test_load_failure_shows_no_list() {
        let mut inventory = loaded(vec![item(1, "Bolt", 0)]);
        let ticket = inventory.begin_load();
        inventory.finish_load(ticket, Err(ApiError::server(Some(500), None)));
        assert_eq!(inventory.error(), Some(LOAD_FAILED));
        assert!(inventory.items().is_none());
    }

    #[test]
    fn test_load_replaces_rather_than_merges() {
        let mut inventory = loaded(vec![item(1, "Bolt", 0), item(2, "Nut", 4)]);
        let ticket = inventory.begin_load();
        inventory.finish_load(ticket, Ok(vec![item(3, "Gear", 11)]));
        let ids: Vec<ItemId> = inventory.items().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut inventory = Inventory::new();
        let first = inventory.begin_load();
        let second = inventory.begin_load();
        assert!(inventory.finish_load(second, Ok(vec![item(2, "New", 1)])));
        assert!(!inventory.finish_load(first, Ok(vec![item(1, "Old", 1)])));
        assert_eq!(inventory.items().unwrap()[0].name, "New");
    }

    #[test]
    fn test_duplicate_ids_are_collapsed() {
        let inventory = loaded(vec![item(1, "Bolt", 0), item(1, "Bolt again", 2)]);
        assert_eq!(inventory.items().unwrap().len(), 1);
        assert_eq!(inventory.items().unwrap()[0].name, "Bolt");
    }

    #[test]
    fn test_summary_lines() {
        let mut inventory = loaded(vec![item(1, "Bolt", 0)]);
        assert_eq!(inventory.summary().unwrap(), "1 item in inventory");

        let mut inventory2 = loaded(vec![item(1, "Bolt", 0), item(2, "Nut", 3)]);
        inventory2.set_query(" bo ");
        assert_eq!(
            inventory2.summary().unwrap(),
            "1 of 2 items matching \"bo\""
        );

        inventory.clear_query();
        assert!(!inventory.is_filtered());
    }

    #[test]
    fn test_delete_success_removes_from_cache_and_view() {
        let mut inventory = loaded(vec![item(1, "Bolt", 0), item(2, "Bolster", 4)]);
        inventory.set_query("bol");
        assert_eq!(inventory.filtered().unwrap().len(), 2);

        inventory.begin_delete(1).unwrap();
        let note = inventory.finish_delete(1, Ok(()));

        assert!(note.is_success());
        assert_eq!(note.message, DELETE_SUCCEEDED);
        assert!(inventory.find(1).is_none());
        assert_eq!(inventory.filtered().unwrap().len(), 1);
        assert!(!inventory.is_deleting());
    }

    #[test]
    fn test_delete_failure_leaves_cache_identical() {
        let mut inventory = loaded(vec![item(1, "Bolt", 0), item(2, "Nut", 4)]);
        let before = inventory.items().unwrap().to_vec();

        inventory.begin_delete(2).unwrap();
        let note = inventory.finish_delete(
            2,
            Err(ApiError::server(Some(500), Some("Database locked".into()))),
        );

        assert_eq!(note, Notification::error("Database locked"));
        assert_eq!(inventory.items().unwrap(), before.as_slice());
        assert!(!inventory.is_deleting());
    }

    #[test]
    fn test_second_delete_is_blocked_while_in_flight() {
        let mut inventory = loaded(vec![item(1, "Bolt", 0), item(2, "Nut", 4)]);
        inventory.begin_delete(1).unwrap();
        assert_eq!(inventory.begin_delete(2), Err(DeleteRejected::InFlight(1)));
        inventory.finish_delete(1, Ok(()));
        assert!(inventory.begin_delete(2).is_ok());
    }

    #[tokio::test]
    async fn test_load_and_delete_through_api() {
        let api = FakeApi::with_items(vec![item(1, "Bolt", 0), item(2, "Nut", 4)]);
        let mut inventory = Inventory::new();
        inventory.load(&api).await;
        assert_eq!(inventory.items().unwrap().len(), 2);

        let note = inventory.delete(&api, 2).await.unwrap();
        assert!(note.is_success());
        assert_eq!(inventory.items().unwrap().len(), 1);

        let note = inventory.delete(&api, 42).await.unwrap();
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(inventory.items().unwrap().len(), 1);
    }

    fn arb_items() -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec(("[a-zA-Z ]{1,12}", 0u64..50), 0..20).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, qty))| item(i as ItemId + 1, &name, qty))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_filtered_is_subsequence(items in arb_items(), query in "[a-zA-Z0-9 ]{0,4}") {
            let filtered = filter_items(&items, &query);
            let mut cursor = items.iter();
            for hit in filtered {
                prop_assert!(cursor.any(|candidate| std::ptr::eq(candidate, hit)));
            }
        }

        #[test]
        fn prop_exact_id_always_matches(items in arb_items()) {
            for it in &items {
                let hits = filter_items(&items, &it.id.to_string());
                prop_assert!(hits.iter().any(|hit| hit.id == it.id));
            }
        }

        #[test]
        fn prop_blank_query_is_identity(items in arb_items(), blank in "[ \t]{0,5}") {
            let filtered: Vec<Item> = filter_items(&items, &blank).into_iter().cloned().collect();
            prop_assert_eq!(filtered, items);
        }
    }
}
