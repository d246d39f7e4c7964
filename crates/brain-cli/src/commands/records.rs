use std::io::Read;

use serde_json::Value as Json;

use brain_core::Store;

use crate::app::parse_kind;
use crate::output::{print_json, records_table, Ui};

pub fn handle_list(store: &Store, ui: &Ui, kind: &str, json: bool) -> anyhow::Result<()> {
    let kind = parse_kind(kind)?;
    let records = store.get_all_json(kind)?;

    if json {
        return print_json(&Json::Array(records));
    }
    if records.is_empty() {
        if !ui.quiet {
            println!("{}", ui.dim(&format!("No {} yet.", kind)));
        }
        return Ok(());
    }
    println!("{}", records_table(ui, kind, &records));
    Ok(())
}

pub async fn handle_put(
    store: &Store,
    ui: &Ui,
    kind: &str,
    record: Option<&str>,
) -> anyhow::Result<()> {
    let kind = parse_kind(kind)?;
    let raw = read_payload(record)?;
    let value: Json = serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;
    let id = value
        .get("id")
        .and_then(Json::as_str)
        .map(str::to_string)
        .unwrap_or_default();

    if !store.upsert_json(kind, value).await? {
        return Err(anyhow::anyhow!("Could not save {} record {:?}", kind, id));
    }
    if !ui.quiet {
        println!("{}", ui.ok(&format!("Saved {} {}", kind, id)));
    }
    Ok(())
}

pub async fn handle_delete(store: &Store, ui: &Ui, kind: &str, id: &str) -> anyhow::Result<()> {
    let kind = parse_kind(kind)?;
    if store.get_json(kind, id)?.is_none() {
        if !ui.quiet {
            println!("{}", ui.warn(&format!("No {} record with id {}", kind, id)));
        }
        return Ok(());
    }
    if !store.delete_kind(kind, id).await {
        return Err(anyhow::anyhow!("Could not delete {} {}", kind, id));
    }
    if !ui.quiet {
        println!("{}", ui.ok(&format!("Deleted {} {}", kind, id)));
    }
    Ok(())
}

/// The payload argument, or stdin when it is absent or `-`.
fn read_payload(arg: Option<&str>) -> anyhow::Result<String> {
    match arg {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            Ok(buffer)
        }
    }
}
