//! CLI module graph and command dispatch.

pub mod check;
pub mod command;
pub mod config;
pub mod edit;
pub mod event;
pub mod images;
pub mod output;
pub mod paths;
pub mod play;
pub mod transfer;

use tracing::debug;

use crate::error::Result;
use crate::infrastructure::bootstrap::build_store;
use crate::infrastructure::config::Config;

use command::{CheckCommand, Cli, Commands, ConfigCommand, ImagesCommand};

/// Run one parsed command line.
///
/// `config init`, `config validate` and `images` work without a store; every
/// other command loads the configuration (defaults when the file is absent)
/// and builds the configured store first.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config(ConfigCommand::Init(args)) => {
            let path = args.path.unwrap_or(cli.config);
            return config::execute_init(&path, args.force);
        }
        Commands::Config(ConfigCommand::Validate) => {
            return config::execute_validate(&cli.config);
        }
        Commands::Images(ImagesCommand::Scan(args)) => return images::execute_scan(&args),
        _ => {}
    }

    let config = Config::load_or_default(&cli.config)?;
    let home = paths::home_dir();
    debug!(path = %cli.config.display(), backend = config.store.backend.as_str(), "Loaded config");

    match cli.command {
        Commands::Config(ConfigCommand::Show) => config::execute_show(&config, &cli.config),
        Commands::Check(CheckCommand::Store) => check::execute_store(&config, &home).await,
        command => {
            let store = build_store(&config, &home)?;
            let store = store.as_ref();
            match command {
                Commands::List => event::execute_list(store).await,
                Commands::Show(args) => event::execute_show(store, &args.id).await,
                Commands::Create(args) => event::execute_create(store, args.name).await,
                Commands::Rename(args) => {
                    event::execute_rename(store, &args.id, &args.name).await
                }
                Commands::Delete(args) => event::execute_delete(store, &args.id, args.yes).await,
                Commands::Edit(args) => edit::execute(store, &args.id).await,
                Commands::Play(args) => {
                    play::execute(store, &args.id, &config.player, args.no_animate).await
                }
                Commands::Export(args) => {
                    transfer::execute_export(store, args.output.as_deref()).await
                }
                Commands::Import(args) => transfer::execute_import(store, &args.file).await,
                Commands::Config(_) | Commands::Images(_) | Commands::Check(_) => Ok(()),
            }
        }
    }
}
