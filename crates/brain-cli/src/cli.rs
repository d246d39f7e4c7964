use clap::{Parser, Subcommand};

use brain_core::VERSION;

/// Brain - local planner and finance workspace storage
#[derive(Parser)]
#[command(name = "brain")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the snapshot files
    #[arg(short, long, global = true, env = "BRAIN_DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the store, creating and seeding it on first run
    Init,

    /// List records of one kind
    List {
        /// Record kind, e.g. `tasks` or `task`
        #[arg(value_name = "KIND")]
        kind: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Insert or replace a record given as a JSON object
    Put {
        #[arg(value_name = "KIND")]
        kind: String,

        /// Record JSON; reads stdin when omitted or `-`
        #[arg(value_name = "JSON")]
        record: Option<String>,
    },

    /// Delete a record by id
    Delete {
        #[arg(value_name = "KIND")]
        kind: String,

        #[arg(value_name = "ID")]
        id: String,
    },

    /// Read or write settings
    #[command(subcommand)]
    Setting(SettingCommand),

    /// Replace all data with the default seed records
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Verify storage integrity and show row counts
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every record and setting as one JSON document
    Export,
}

#[derive(Subcommand)]
pub enum SettingCommand {
    /// Print a setting's JSON value
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Store a JSON value under a key
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "JSON")]
        value: String,
    },

    /// List all settings
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_setting_set() {
        let cli = Cli::try_parse_from(["brain", "setting", "set", "theme", "\"dark\""]).unwrap();
        match cli.command {
            Commands::Setting(SettingCommand::Set { key, value }) => {
                assert_eq!(key, "theme");
                assert_eq!(value, "\"dark\"");
            }
            _ => panic!("expected setting set"),
        }
    }
}
