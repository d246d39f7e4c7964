//! Output formatting helpers for the CLI.

use std::io::IsTerminal;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde_json::Value as Json;

use brain_core::{EntityKind, TableCount};

use crate::cli::Cli;

const CELL_MAX: usize = 40;

/// Terminal facts that decide how output looks.
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    pub color: bool,
    pub pretty: bool,
    pub quiet: bool,
}

impl Ui {
    pub fn from_cli(cli: &Cli) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        Self {
            color: is_tty && !cli.no_color && !no_color_env && !term_is_dumb,
            pretty: is_tty && !term_is_dumb,
            quiet: cli.quiet,
        }
    }

    pub fn ok(&self, message: &str) -> String {
        if self.color {
            format!("{} {}", "[OK]".green(), message)
        } else {
            format!("[OK] {}", message)
        }
    }

    pub fn warn(&self, message: &str) -> String {
        if self.color {
            format!("{} {}", "[WARN]".yellow(), message)
        } else {
            format!("[WARN] {}", message)
        }
    }

    pub fn dim(&self, message: &str) -> String {
        if self.color {
            message.dimmed().to_string()
        } else {
            message.to_string()
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        if self.pretty {
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS);
        } else {
            table.load_preset(comfy_table::presets::ASCII_MARKDOWN);
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table
    }
}

pub fn print_json(value: &Json) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render records of `kind` with one column per registered field.
pub fn records_table(ui: &Ui, kind: EntityKind, records: &[Json]) -> String {
    let columns: Vec<&str> = kind.table().columns.iter().map(|c| c.name).collect();
    let mut table = ui.table();
    table.set_header(columns.clone());
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| cell_text(record.get(*column)))
            .collect();
        table.add_row(row);
    }
    table.to_string()
}

pub fn counts_table(ui: &Ui, counts: &[TableCount]) -> String {
    let mut table = ui.table();
    table.set_header(vec!["table", "rows"]);
    for count in counts {
        table.add_row(vec![count.table.to_string(), count.rows.to_string()]);
    }
    table.to_string()
}

/// Display text for one JSON field: strings unquoted, absent values as `-`.
pub fn cell_text(value: Option<&Json>) -> String {
    let text = match value {
        None | Some(Json::Null) => return "-".to_string(),
        Some(Json::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    truncate(&text, CELL_MAX)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(None), "-");
        assert_eq!(cell_text(Some(&Json::Null)), "-");
        assert_eq!(cell_text(Some(&json!("Buy milk"))), "Buy milk");
        assert_eq!(cell_text(Some(&json!(true))), "true");
        assert_eq!(cell_text(Some(&json!(12.5))), "12.5");
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let long = "x".repeat(100);
        let text = cell_text(Some(&json!(long)));
        assert_eq!(text.chars().count(), CELL_MAX);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_plain_badges_have_no_escapes() {
        let ui = Ui {
            color: false,
            pretty: false,
            quiet: false,
        };
        assert_eq!(ui.ok("done"), "[OK] done");
        assert_eq!(ui.warn("careful"), "[WARN] careful");
    }

    #[test]
    fn test_records_table_uses_registered_columns() {
        let ui = Ui {
            color: false,
            pretty: false,
            quiet: false,
        };
        let rendered = records_table(
            &ui,
            EntityKind::Project,
            &[json!({"id": "p1", "name": "Garden"})],
        );
        assert!(rendered.contains("color"));
        assert!(rendered.contains("Garden"));
    }
}
