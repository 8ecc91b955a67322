/// Clap argument definitions
mod args;

/// `list`, `show`, `create`, `delete` commands
mod board;

/// `diff` and `save` commands
mod conflict;

/// Shared CLI utilities
mod util;

use clap::Parser;

use taskboard_core::store::{BoardStore, LocalFileStore};

/// Board store used by the CLI: board files in a local directory.
pub type CliBoardStore = BoardStore<LocalFileStore>;

/// Helper to run async operations in sync context
fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures_lite::future::block_on(f)
}

pub use args::Cli;
use args::Commands;

/// Main entry point for the CLI
pub fn run_cli() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = match util::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            util::report_error(&e, cli.json);
            std::process::exit(1);
        }
    };

    let root = util::board_root(&config, cli.root);
    log::debug!("Using boards under {}", root.display());
    let store = CliBoardStore::new(LocalFileStore::new(root), config);

    let success = match cli.command {
        Commands::List => board::handle_list(&store, cli.json),

        Commands::Show {
            customer,
            password_hash,
        } => board::handle_show(&store, &customer, password_hash.as_deref(), cli.json),

        Commands::Create {
            customer,
            password_hash,
            display_name,
        } => board::handle_create(&store, &customer, &password_hash, display_name, cli.json),

        Commands::Delete { customer, yes } => {
            board::handle_delete(&store, &customer, yes, cli.json)
        }

        Commands::Diff {
            original,
            local,
            remote,
            original_version,
            force,
        } => conflict::handle_diff(
            &original,
            &local,
            &remote,
            original_version,
            force,
            cli.json,
        ),

        Commands::Save {
            customer,
            local,
            baseline,
            revision,
            message,
            resolve,
        } => conflict::handle_save(
            &store,
            conflict::SaveArgs {
                customer,
                local,
                baseline,
                revision,
                message,
                resolve,
            },
            cli.json,
        ),
    };

    if !success {
        std::process::exit(1);
    }
}
