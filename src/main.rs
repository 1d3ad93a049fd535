//! VoiceNotes CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voice_notes::cli::{
    app::{load_merged_config, App, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_notes::domain::config::AppConfig;
use voice_notes::infrastructure::XdgConfigStore;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("VOICE_NOTES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    init_tracing();

    match cli.command {
        // Config is handled before touching storage
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        command => {
            // Build CLI config from args
            let cli_config = AppConfig {
                storage_dir: cli.storage_dir.clone(),
                notify: if cli.notify { Some(true) } else { None },
                probe_duration: if cli.no_probe { Some(false) } else { None },
            };

            // Merge: defaults < file < env < cli
            let config = load_merged_config(cli_config).await;
            let mut app = App::new(config);

            match command {
                Some(Commands::Record) => app.run_record().await,
                Some(Commands::Search { query }) => app.run_search(&query).await,
                Some(Commands::Play { name }) => app.run_play(&name).await,
                Some(Commands::Rename { name, new_name }) => {
                    app.run_rename(&name, &new_name).await
                }
                Some(Commands::Delete { name, yes }) => app.run_delete(&name, yes).await,
                Some(Commands::List) | None => app.run_list().await,
                Some(Commands::Config { .. }) => unreachable!(), // Matched above
            }
        }
    }
}
