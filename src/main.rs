//! SentinelSync CLI entry point.

use clap::Parser;

use sentinelsync::cli::{commands, handle_error, log_level_for, Cli, Commands};
use sentinelsync::infrastructure::logging::{init_logging, LogFormat};

fn main() {
    let cli = Cli::parse();

    let provider = cli.provider();
    let settings = provider.get(None, false).ok();
    let level = log_level_for(cli.verbose, settings.as_deref());
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    if let Err(err) = init_logging(level, format) {
        handle_error(err, cli.json);
    }

    let result = match &cli.command {
        Commands::Show => commands::show::execute(&provider, cli.json),
        Commands::Validate => commands::validate::execute(&provider, cli.json),
        Commands::Dump(args) => commands::dump::execute(args, &provider, cli.json),
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
