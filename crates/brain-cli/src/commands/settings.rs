use serde_json::{Map, Value as Json};

use brain_core::Store;

use crate::output::{print_json, Ui};

pub fn handle_get(store: &Store, key: &str) -> anyhow::Result<()> {
    let value = store
        .settings()
        .get_raw(key)
        .ok_or_else(|| anyhow::anyhow!("Setting \"{}\" is not set", key))?;
    println!("{}", value);
    Ok(())
}

pub async fn handle_set(store: &Store, ui: &Ui, key: &str, raw: &str) -> anyhow::Result<()> {
    let value: Json = serde_json::from_str(raw)
        .map_err(|e| anyhow::anyhow!("Setting values must be JSON (e.g. '\"dark\"' or '[0,6]'): {}", e))?;
    if !store.settings().set(key, &value).await {
        return Err(anyhow::anyhow!("Could not save setting \"{}\"", key));
    }
    if !ui.quiet {
        println!("{}", ui.ok(&format!("Set {}", key)));
    }
    Ok(())
}

pub fn handle_list(store: &Store, json: bool) -> anyhow::Result<()> {
    let settings = store.settings().all();
    if json {
        let map = settings
            .into_iter()
            .map(|setting| {
                let value = setting.value_or(Json::Null);
                (setting.key, value)
            })
            .collect::<Map<_, _>>();
        return print_json(&Json::Object(map));
    }
    for setting in settings {
        println!("{} = {}", setting.key, setting.value.as_deref().unwrap_or("null"));
    }
    Ok(())
}
