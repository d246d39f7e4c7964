//! Brain CLI - operator surface for the Brain local store
//!
//! Opens the file-backed store (creating and seeding it on first run) and
//! exposes record, settings and maintenance operations as subcommands.

mod app;
mod cli;
mod commands;
mod config;
mod output;

use clap::Parser;

use crate::app::{init_logging, open_store, resolve_config_path, resolve_data_dir};
use crate::cli::{Cli, Commands, SettingCommand};
use crate::commands::{maintenance, records, settings};
use crate::config::load_config;
use crate::output::Ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&resolve_config_path()?)?;
    init_logging(&config);

    let ui = Ui::from_cli(&cli);
    let store = open_store(&cli, &config).await?;

    match &cli.command {
        Commands::Init => maintenance::handle_init(&ui, &resolve_data_dir(&cli, &config)?),
        Commands::List { kind, json } => records::handle_list(&store, &ui, kind, *json),
        Commands::Put { kind, record } => {
            records::handle_put(&store, &ui, kind, record.as_deref()).await
        }
        Commands::Delete { kind, id } => records::handle_delete(&store, &ui, kind, id).await,
        Commands::Setting(SettingCommand::Get { key }) => settings::handle_get(&store, key),
        Commands::Setting(SettingCommand::Set { key, value }) => {
            settings::handle_set(&store, &ui, key, value).await
        }
        Commands::Setting(SettingCommand::List { json }) => settings::handle_list(&store, *json),
        Commands::Reset { yes } => maintenance::handle_reset(&store, &ui, *yes).await,
        Commands::Check { json } => maintenance::handle_check(&store, &ui, *json),
        Commands::Export => maintenance::handle_export(&store),
    }
}
