//! Printable inventory report
//!
//! Renders a snapshot of items into a standalone HTML page that prints
//! itself when opened. Rendering is a pure function of its inputs; the
//! caller decides which items (usually the filtered view) go in.

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::entities::{Item, ItemId};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const REPORT_TEMPLATE: &str = "report.html.tera";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// One table row in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub id: ItemId,
    pub name: String,
    pub quantity: u64,
    /// `qty-out`, `qty-low` or `qty-ok`
    pub badge: &'static str,
    /// "Jan 1, 2024" or "-"
    pub created: String,
}

impl From<&Item> for ReportRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            quantity: item.quantity,
            badge: item.level().css_class(),
            created: item.created_display(),
        }
    }
}

/// Input snapshot for a single render
#[derive(Debug, Clone)]
pub struct InventoryReport {
    pub rows: Vec<ReportRow>,
    /// The active filter, if any, echoed in the count line
    pub query: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl InventoryReport {
    pub fn new<'a>(
        items: impl IntoIterator<Item = &'a Item>,
        query: &str,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let query = query.trim();
        Self {
            rows: items.into_iter().map(ReportRow::from).collect(),
            query: (!query.is_empty()).then(|| query.to_string()),
            generated_at,
        }
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// "Total items: N" with the filter suffix when a query is active
    pub fn count_line(&self) -> String {
        match &self.query {
            Some(q) => format!("Total items: {} (filtered by \"{}\")", self.count(), q),
            None => format!("Total items: {}", self.count()),
        }
    }
}

/// Report renderer backed by the embedded Tera template
pub struct ReportRenderer {
    tera: Tera,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();
        // Tera only autoescapes `.html` names out of the box
        tera.autoescape_on(vec![".html", ".html.tera"]);

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                let template = std::str::from_utf8(&content.data)
                    .map_err(|e| ReportError::RenderError(e.to_string()))?;
                tera.add_raw_template(filename, template)
                    .map_err(|e| ReportError::RenderError(e.to_string()))?;
            }
        }

        if !tera.get_template_names().any(|n| n == REPORT_TEMPLATE) {
            return Err(ReportError::NotFound(REPORT_TEMPLATE.to_string()));
        }

        Ok(Self { tera })
    }

    pub fn render(&self, report: &InventoryReport) -> Result<String, ReportError> {
        let mut context = tera::Context::new();
        context.insert(
            "generated_at",
            &report.generated_at.format("%B %-d, %Y %H:%M UTC").to_string(),
        );
        context.insert("count", &report.count());
        context.insert("query", &report.query.clone().unwrap_or_default());
        context.insert("rows", &report.rows);

        self.tera
            .render(REPORT_TEMPLATE, &context)
            .map_err(|e| ReportError::RenderError(e.to_string()))
    }
}
