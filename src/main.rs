use clap::Parser;
use foldersort::cli::{Cli, run_cli};
use foldersort::output::OutputFormatter;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run_cli(&cli.folder) {
        Ok(_) => OutputFormatter::success(
            "Sorting, empty folder removal, renaming and archive extraction complete.",
        ),
        Err(e) => OutputFormatter::error(&format!("An error occurred: {}", e)),
    }
}
