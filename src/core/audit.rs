//! Audit trail viewer
//!
//! Fetches one item's event history on demand. Switching to another item
//! throws away whatever was shown before and ignores late responses for the
//! previous item, so a slow fetch can never paint the wrong history.

use serde::Serialize;

use crate::core::client::ItemsApi;
use crate::core::error::ApiResult;
use crate::core::fetch::{FetchState, RequestSequence, Ticket};
use crate::entities::{Event, EventType, ItemId, Timestamp};

pub const HISTORY_FAILED: &str = "Failed to load event history";
pub const NO_EVENTS: &str = "No events found";
pub const NO_ADDITIONAL_DATA: &str = "No additional data";

/// Handle for an in-flight history fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditTicket {
    pub item_id: ItemId,
    ticket: Ticket,
}

/// One rendered history entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub event_id: i64,
    pub kind: EventType,
    pub label: String,
    pub occurred_at: String,
    /// `key: value` lines, or the no-data placeholder
    pub details: Vec<String>,
}

impl AuditEntry {
    fn from_event(event: &Event) -> Self {
        let details = if event.payload.is_empty() {
            vec![NO_ADDITIONAL_DATA.to_string()]
        } else {
            event.payload.lines()
        };
        Self {
            event_id: event.id,
            kind: event.event_type.clone(),
            label: event.event_type.label().to_string(),
            occurred_at: event
                .created_at
                .as_ref()
                .map(Timestamp::format_datetime)
                .unwrap_or_else(|| "-".to_string()),
            details,
        }
    }
}

/// What the viewer currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum AuditView<'a> {
    Closed,
    Loading,
    Failed(&'a str),
    Empty,
    Events(Vec<AuditEntry>),
}

#[derive(Debug, Default)]
pub struct AuditTrail {
    item_id: Option<ItemId>,
    item_name: Option<String>,
    state: FetchState<Vec<Event>>,
    requests: RequestSequence,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_id(&self) -> Option<ItemId> {
        self.item_id
    }

    pub fn item_name(&self) -> Option<&str> {
        self.item_name.as_deref()
    }

    pub fn state(&self) -> &FetchState<Vec<Event>> {
        &self.state
    }

    /// Activate for `item_id`, dropping prior results before anything else
    pub fn open(&mut self, item_id: ItemId, item_name: Option<String>) -> AuditTicket {
        self.item_id = Some(item_id);
        self.item_name = item_name;
        self.state = FetchState::Loading;
        AuditTicket {
            item_id,
            ticket: self.requests.issue(),
        }
    }

    /// Apply a history response. Returns `false` when the response belongs to
    /// a superseded request and was ignored.
    pub fn finish(&mut self, ticket: AuditTicket, result: ApiResult<Vec<Event>>) -> bool {
        if !self.requests.is_current(ticket.ticket) || self.item_id != Some(ticket.item_id) {
            tracing::debug!(item_id = ticket.item_id, "discarding stale history response");
            return false;
        }

        self.state = match result {
            Ok(mut events) => {
                // Most recent first; stable so equal timestamps keep server order
                events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                FetchState::Loaded(events)
            }
            Err(e) => {
                tracing::warn!(item_id = ticket.item_id, "history load failed: {}", e);
                FetchState::Failed(e.user_message(HISTORY_FAILED))
            }
        };
        true
    }

    /// Open for `item_id` and fetch its events
    pub async fn show(&mut self, api: &dyn ItemsApi, item_id: ItemId, item_name: Option<String>) {
        let ticket = self.open(item_id, item_name);
        let result = api.item_events(item_id).await;
        self.finish(ticket, result);
    }

    /// Deactivate; any in-flight response will be ignored
    pub fn close(&mut self) {
        self.requests.invalidate();
        self.item_id = None;
        self.item_name = None;
        self.state = FetchState::Idle;
    }

    pub fn view(&self) -> AuditView<'_> {
        match &self.state {
            FetchState::Idle => AuditView::Closed,
            FetchState::Loading => AuditView::Loading,
            FetchState::Failed(message) => AuditView::Failed(message),
            FetchState::Loaded(events) if events.is_empty() => AuditView::Empty,
            FetchState::Loaded(events) => {
                AuditView::Events(events.iter().map(AuditEntry::from_event).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ApiError;
    use crate::core::testing::FakeApi;
    use crate::entities::{Payload, Timestamp};
    use serde_json::json;

    fn event(id: i64, item_id: ItemId, event_type: &str, at: &str, payload: serde_json::Value) -> Event {
        Event {
            id,
            item_id,
            event_type: EventType::from(event_type.to_string()),
            payload: Payload::from(payload),
            created_at: Some(Timestamp::parse(at)),
        }
    }

    #[test]
    fn test_events_sorted_most_recent_first() {
        let mut trail = AuditTrail::new();
        let ticket = trail.open(1, Some("Bolt".into()));
        trail.finish(
            ticket,
            Ok(vec![
                event(1, 1, "item_created", "2024-01-01 09:00:00", json!({})),
                event(3, 1, "item_deleted", "2024-01-03 09:00:00", json!({})),
                event(2, 1, "item_updated", "2024-01-02 09:00:00", json!({})),
            ]),
        );

        match trail.view() {
            AuditView::Events(entries) => {
                let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
                assert_eq!(labels, vec!["Deleted", "Updated", "Created"]);
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_and_payload_rendering() {
        let mut trail = AuditTrail::new();
        let ticket = trail.open(1, None);
        trail.finish(
            ticket,
            Ok(vec![
                event(1, 1, "stock_counted", "2024-01-01", json!({"counted": 4, "bins": ["A", "B"]})),
                event(2, 1, "item_created", "2023-12-31", json!(null)),
            ]),
        );

        let AuditView::Events(entries) = trail.view() else {
            panic!("expected events");
        };
        assert_eq!(entries[0].label, "stock_counted");
        assert_eq!(entries[0].details, vec!["counted: 4", r#"bins: ["A","B"]"#]);
        assert_eq!(entries[1].details, vec![NO_ADDITIONAL_DATA]);
    }

    #[test]
    fn test_missing_timestamp_shows_dash_and_sorts_last() {
        let mut undated = event(2, 1, "item_updated", "", json!({}));
        undated.created_at = None;

        let mut trail = AuditTrail::new();
        let ticket = trail.open(1, None);
        trail.finish(
            ticket,
            Ok(vec![undated, event(1, 1, "item_created", "2024-01-01 09:00:00", json!({}))]),
        );

        let AuditView::Events(entries) = trail.view() else {
            panic!("expected events");
        };
        assert_eq!(entries[0].event_id, 1);
        assert_eq!(entries[1].event_id, 2);
        assert_eq!(entries[1].occurred_at, "-");
    }

    #[test]
    fn test_empty_loading_and_failed_views() {
        let mut trail = AuditTrail::new();
        assert_eq!(trail.view(), AuditView::Closed);

        let ticket = trail.open(5, None);
        assert_eq!(trail.view(), AuditView::Loading);

        trail.finish(ticket, Ok(vec![]));
        assert_eq!(trail.view(), AuditView::Empty);

        let ticket = trail.open(5, None);
        trail.finish(ticket, Err(ApiError::server(Some(500), None)));
        assert_eq!(trail.view(), AuditView::Failed(HISTORY_FAILED));
    }

    #[test]
    fn test_switching_items_never_shows_previous_events() {
        let mut trail = AuditTrail::new();
        let first = trail.open(1, Some("Bolt".into()));
        let second = trail.open(2, Some("Nut".into()));

        // Item 1's response arrives late
        let applied = trail.finish(
            first,
            Ok(vec![event(10, 1, "item_created", "2024-01-01", json!({"name": "Bolt"}))]),
        );
        assert!(!applied);
        assert_eq!(trail.view(), AuditView::Loading);
        assert_eq!(trail.item_id(), Some(2));

        assert!(trail.finish(second, Ok(vec![])));
        assert_eq!(trail.view(), AuditView::Empty);
    }

    #[test]
    fn test_reopening_discards_prior_results_immediately() {
        let mut trail = AuditTrail::new();
        let ticket = trail.open(1, None);
        trail.finish(ticket, Ok(vec![event(1, 1, "item_created", "2024-01-01", json!({}))]));
        assert!(matches!(trail.view(), AuditView::Events(_)));

        trail.open(2, None);
        assert_eq!(trail.view(), AuditView::Loading);
    }

    #[test]
    fn test_close_ignores_late_response() {
        let mut trail = AuditTrail::new();
        let ticket = trail.open(1, None);
        trail.close();
        assert!(!trail.finish(ticket, Ok(vec![])));
        assert_eq!(trail.view(), AuditView::Closed);
    }

    #[tokio::test]
    async fn test_show_fetches_for_item() {
        let api = FakeApi::default();
        api.set_events(
            7,
            vec![event(1, 7, "item_updated", "2024-05-01T12:30:00Z", json!({"quantity": 3}))],
        );

        let mut trail = AuditTrail::new();
        trail.show(&api, 7, Some("Gear".into())).await;

        let AuditView::Events(entries) = trail.view() else {
            panic!("expected events");
        };
        insta::assert_snapshot!(
            format!("{} {} {}", entries[0].occurred_at, entries[0].label, entries[0].details.join("; ")),
            @"May 1, 2024 12:30 Updated quantity: 3"
        );
        assert_eq!(trail.item_name(), Some("Gear"));
    }
}
