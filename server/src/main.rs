use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;
use wordle_server::config::{Args, ServerConfig};
use wordle_server::error::ServerError;
use wordle_server::network::Server;
use wordle_server::signals::ShutdownSignal;
use wordle_server::vocabulary::Vocabulary;

/// Parses and validates arguments, loads the dictionary, then serves until
/// SIGUSR1. Nothing touches the filesystem or network until the arguments
/// have been validated.
#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("ERROR: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  reason: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let config = ServerConfig::try_from(args)?;

    // Handlers go in before anything else so an early SIGINT is ignored too.
    let signal = ShutdownSignal::install()?;

    let vocabulary = Vocabulary::load(&config.dictionary, config.num_words)?;

    let server = Server::bind(config, vocabulary).await?;
    let report = server.run_until(signal.wait()).await?;

    info!(
        "shutdown complete: {} session(s) drained, {} hidden word(s) revealed",
        report.sessions_drained,
        report.hidden_words.len()
    );

    Ok(())
}
