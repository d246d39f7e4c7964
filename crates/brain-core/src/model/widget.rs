use serde::{Deserialize, Serialize};

use super::Record;
use crate::error::Result;
use crate::schema::{self, TableDef};
use crate::storage::row::{RowBuilder, RowValues};

/// A widget placed on the desktop, with its free-form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetPlacement {
    pub id: String,
    /// Widget type tag, e.g. `CLOCK` or `FINANCE_OVERVIEW`
    pub widget_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Widget-specific settings, stored as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl Record for WidgetPlacement {
    fn table() -> &'static TableDef {
        &schema::WIDGETS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("id", &self.id)
            .text("widget_type", &self.widget_type)
            .real("x", self.x)
            .real("y", self.y)
            .real("width", self.width)
            .real("height", self.height)
            .opt_json("config", self.config.as_ref())
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            id: row.text("id")?,
            widget_type: row.text("widget_type")?,
            x: row.real("x")?,
            y: row.real("y")?,
            width: row.real("width")?,
            height: row.real("height")?,
            config: row.opt_json("config")?,
        })
    }
}
