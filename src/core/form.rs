//! Item form controller
//!
//! Holds the transient draft for one create or edit session. Fields start
//! clean, become touched on blur or on a submit attempt, and from then on are
//! revalidated on every change. A submit either goes out whole or not at all.

use crate::core::client::ItemsApi;
use crate::core::error::{ApiError, ApiResult};
use crate::core::validate::{self, Field};
use crate::entities::{Item, ItemFields, ItemId};

pub const CREATE_FAILED: &str = "Failed to create item";
pub const UPDATE_FAILED: &str = "Failed to update item";
pub const LOAD_FAILED: &str = "Failed to load item";
pub const ITEM_NOT_FOUND: &str = "Item not found";
pub const ITEM_GONE: &str = "Item not found. It may have been deleted.";
pub const CREATED: &str = "Item created successfully";
pub const UPDATED: &str = "Item updated successfully";

/// Raw, unvalidated form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    /// Kept as typed; parsed only on submit
    pub quantity: String,
}

impl FormDraft {
    fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Quantity => &self.quantity,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Quantity => &mut self.quantity,
        }
    }
}

/// Create a new item, or edit the one passed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Item),
}

/// Per-field validation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// Not yet blurred or submitted; no error is shown
    Clean,
    Valid,
    Invalid(&'static str),
}

/// Why a submit did not produce a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A previous submit has not resolved yet
    InFlight,
    /// At least one field failed local validation
    Invalid,
}

/// Result of a completed submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved; the caller navigates away and shows `message`
    Saved { item: Item, message: &'static str },
    /// Blocked before any request was sent
    Blocked(SubmitBlocked),
    /// The server rejected the fields
    Rejected { message: String },
    /// The item vanished while being edited
    Gone { message: String },
    /// Anything else; the draft is kept so the operator can retry
    Failed { message: String },
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}

/// Failure to open an edit session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadFailure {
    /// Terminal; there is nothing to edit
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ItemForm {
    mode: FormMode,
    draft: FormDraft,
    touched: [bool; 2],
    submitting: bool,
    api_error: Option<String>,
}

fn slot(field: Field) -> usize {
    match field {
        Field::Name => 0,
        Field::Quantity => 1,
    }
}

impl ItemForm {
    pub fn create() -> Self {
        Self::with_mode(FormMode::Create, FormDraft::default())
    }

    pub fn edit(item: Item) -> Self {
        let draft = FormDraft::from_item(&item);
        Self::with_mode(FormMode::Edit(item), draft)
    }

    fn with_mode(mode: FormMode, draft: FormDraft) -> Self {
        Self {
            mode,
            draft,
            touched: [false; 2],
            submitting: false,
            api_error: None,
        }
    }

    /// Fetch `id` and open an edit session for it
    pub async fn load_for_edit(api: &dyn ItemsApi, id: ItemId) -> Result<Self, LoadFailure> {
        match api.get_item(id).await {
            Ok(item) => Ok(Self::edit(item)),
            Err(ApiError::NotFound { .. }) => Err(LoadFailure::NotFound(ITEM_NOT_FOUND.into())),
            Err(e) => Err(LoadFailure::Failed(e.user_message(LOAD_FAILED))),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Last server-side failure message, shown above the form
    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    /// Change a field; touched fields are revalidated immediately
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.draft.get_mut(field) = value.into();
    }

    pub fn blur(&mut self, field: Field) {
        self.touched[slot(field)] = true;
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched[slot(field)]
    }

    pub fn status(&self, field: Field) -> FieldStatus {
        if !self.is_touched(field) {
            return FieldStatus::Clean;
        }
        match validate::validate(field, self.draft.get(field)) {
            Some(message) => FieldStatus::Invalid(message),
            None => FieldStatus::Valid,
        }
    }

    /// Error to display under `field`, if any
    pub fn error(&self, field: Field) -> Option<&'static str> {
        match self.status(field) {
            FieldStatus::Invalid(message) => Some(message),
            _ => None,
        }
    }

    /// All displayed field errors, in field order
    pub fn errors(&self) -> Vec<(Field, &'static str)> {
        Field::ALL
            .iter()
            .filter_map(|&field| self.error(field).map(|message| (field, message)))
            .collect()
    }

    /// Touch every field, validate, and if clean enter the submitting state
    /// and hand back the request body
    pub fn begin_submit(&mut self) -> Result<ItemFields, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::InFlight);
        }

        self.touched = [true; 2];
        if !self.errors().is_empty() {
            return Err(SubmitBlocked::Invalid);
        }

        let quantity =
            validate::parse_quantity(&self.draft.quantity).map_err(|_| SubmitBlocked::Invalid)?;
        self.submitting = true;
        self.api_error = None;
        Ok(ItemFields {
            name: self.draft.name.trim().to_string(),
            quantity,
        })
    }

    /// Resolve the submitting state with the server's answer
    pub fn finish_submit(&mut self, result: ApiResult<Item>) -> SubmitOutcome {
        self.submitting = false;

        let default_failure = if self.is_edit() { UPDATE_FAILED } else { CREATE_FAILED };
        let outcome = match result {
            Ok(item) => {
                let message = if self.is_edit() { UPDATED } else { CREATED };
                tracing::info!(id = item.id, "{}", message);
                return self.saved(item, message);
            }
            Err(ApiError::ValidationFailed { message, errors }) => {
                let joined = errors.joined();
                SubmitOutcome::Rejected {
                    message: if joined.is_empty() {
                        message.unwrap_or_else(|| default_failure.to_string())
                    } else {
                        joined
                    },
                }
            }
            Err(ApiError::NotFound { .. }) if self.is_edit() => SubmitOutcome::Gone {
                message: ITEM_GONE.to_string(),
            },
            Err(e) => SubmitOutcome::Failed {
                message: e.user_message(default_failure),
            },
        };

        if let SubmitOutcome::Rejected { message }
        | SubmitOutcome::Gone { message }
        | SubmitOutcome::Failed { message } = &outcome
        {
            tracing::warn!("submit failed: {}", message);
            self.api_error = Some(message.clone());
        }
        outcome
    }

    /// The draft is destroyed on success
    fn saved(&mut self, item: Item, message: &'static str) -> SubmitOutcome {
        self.draft = FormDraft::default();
        self.touched = [false; 2];
        SubmitOutcome::Saved { item, message }
    }

    /// Validate and, if clean, send the create or update
    pub async fn submit(&mut self, api: &dyn ItemsApi) -> SubmitOutcome {
        let fields = match self.begin_submit() {
            Ok(fields) => fields,
            Err(blocked) => return SubmitOutcome::Blocked(blocked),
        };

        let result = match &self.mode {
            FormMode::Create => api.create_item(&fields).await,
            FormMode::Edit(item) => api.update_item(item.id, &fields).await,
        };
        self.finish_submit(result)
    }
}
