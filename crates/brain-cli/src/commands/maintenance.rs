use std::path::Path;

use serde_json::json;

use brain_core::Store;

use crate::output::{counts_table, print_json, Ui};

pub fn handle_init(ui: &Ui, data_dir: &Path) -> anyhow::Result<()> {
    if !ui.quiet {
        println!("{}", ui.ok(&format!("Store ready at {}", data_dir.display())));
    }
    Ok(())
}

pub fn handle_check(store: &Store, ui: &Ui, json: bool) -> anyhow::Result<()> {
    let counts = match store.check() {
        Ok(counts) => counts,
        Err(err) => {
            eprintln!("Integrity check: FAILED");
            eprintln!("- error: {}", err);
            eprintln!("Hint: Export your data or run `brain reset --yes` to start over.");
            return Err(anyhow::anyhow!("Integrity check failed"));
        }
    };

    if json {
        let tables = counts
            .iter()
            .map(|c| (c.table.to_string(), json!(c.rows)))
            .collect::<serde_json::Map<_, _>>();
        return print_json(&json!({ "integrity": "ok", "tables": tables }));
    }
    if !ui.quiet {
        println!("{}", ui.ok("Integrity check"));
        println!("{}", counts_table(ui, &counts));
    }
    Ok(())
}

pub async fn handle_reset(store: &Store, ui: &Ui, yes: bool) -> anyhow::Result<()> {
    if !yes {
        return Err(anyhow::anyhow!(
            "Reset replaces every record with the default data. Re-run with --yes to confirm."
        ));
    }
    store.reset().await?;
    if !ui.quiet {
        println!("{}", ui.ok("Store reset to default data"));
    }
    Ok(())
}

pub fn handle_export(store: &Store) -> anyhow::Result<()> {
    print_json(&store.export_json()?)
}
