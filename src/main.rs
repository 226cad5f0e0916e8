use clap::Parser;
use todoey::cli::commands::Cli;
use todoey::cli::handlers;
use todoey::io::config_io;

fn main() {
    let cli = Cli::parse();

    if cli.command.is_none() {
        // No subcommand → launch TUI
        let result = handlers::load_settings(cli.config.as_deref(), cli.server.as_deref())
            .and_then(|config| todoey::tui::run(&config, config_io::config_dir()));
        if let Err(e) = result {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
