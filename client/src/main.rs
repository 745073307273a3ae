use clap::Parser;
use log::info;
use std::process::ExitCode;
use tokio::io::BufReader;
use wordle_client::network::Client;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    server_address: String,

    /// Server port
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    println!("CLIENT: connecting to server...");
    let mut client = match Client::connect(&args.server_address, args.port).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            if let Some(source) = std::error::Error::source(&e) {
                eprintln!("  reason: {}", source);
            }
            return ExitCode::FAILURE;
        }
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    let status = match client.play(stdin, &mut stdout).await {
        Ok(outcome) => {
            info!("Session ended: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    };

    println!("CLIENT: disconnecting...");
    status
}
