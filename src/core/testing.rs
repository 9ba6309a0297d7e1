//! In-memory [`ItemsApi`] used by unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::client::ItemsApi;
use crate::core::error::{ApiError, ApiResult};
use crate::entities::{Event, Item, ItemFields, ItemId};

#[derive(Default)]
pub struct FakeApi {
    items: Mutex<Vec<Item>>,
    events: Mutex<HashMap<ItemId, Vec<Event>>>,
    next_failure: Mutex<Option<ApiError>>,
    calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn set_events(&self, id: ItemId, events: Vec<Event>) {
        self.events.lock().unwrap().insert(id, events);
    }

    /// The next call fails with `err` regardless of operation
    pub fn fail_next(&self, err: ApiError) {
        *self.next_failure.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn items(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }

    fn enter(&self) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.next_failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn missing() -> ApiError {
        ApiError::NotFound {
            message: Some("Item not found".into()),
        }
    }
}

#[async_trait]
impl ItemsApi for FakeApi {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        self.enter()?;
        Ok(self.items())
    }

    async fn get_item(&self, id: ItemId) -> ApiResult<Item> {
        self.enter()?;
        self.items()
            .into_iter()
            .find(|item| item.id == id)
            .ok_or_else(Self::missing)
    }

    async fn create_item(&self, fields: &ItemFields) -> ApiResult<Item> {
        self.enter()?;
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        let item = Item {
            id,
            name: fields.name.clone(),
            quantity: fields.quantity,
            created_at: None,
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: ItemId, fields: &ItemFields) -> ApiResult<Item> {
        self.enter()?;
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(Self::missing)?;
        item.name = fields.name.clone();
        item.quantity = fields.quantity;
        Ok(item.clone())
    }

    async fn delete_item(&self, id: ItemId) -> ApiResult<()> {
        self.enter()?;
        let mut items = self.items.lock().unwrap();
        let pos = items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(Self::missing)?;
        items.remove(pos);
        Ok(())
    }

    async fn item_events(&self, id: ItemId) -> ApiResult<Vec<Event>> {
        self.enter()?;
        Ok(self
            .events
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}
