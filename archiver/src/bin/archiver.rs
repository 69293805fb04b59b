use std::process;

use clap::Parser;
use log::error;
use subreddit_archiver::error::EXIT_CONFIGURATION;
use subreddit_archiver::{init_logging, now, run, ArchiveResult, Cli, RedditClient, RunConfig};

fn main() {
    // The run directory is named after the moment the process started.
    let started_at = now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_CONFIGURATION } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    };
    init_logging(config.log_level);

    let code = match archive(&cli, config, started_at) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            e.exit_code()
        }
    };
    process::exit(code);
}

fn archive(cli: &Cli, config: RunConfig, started_at: i64) -> ArchiveResult<i32> {
    let credentials = cli.credentials()?;
    println!("Archiving r/{}", config.subreddit);

    let client = RedditClient::connect(&credentials)?;
    let subreddit = client.subreddit(&config.subreddit);

    let summary = run(config, started_at, &subreddit)?;
    Ok(summary.exit_code())
}
