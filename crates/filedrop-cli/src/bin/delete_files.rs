use anyhow::Result;
use clap::Parser;

use filedrop_core::{Config, StaticSession};
use filedrop_upload::delete_files;

#[derive(Parser, Debug)]
#[command(name = "delete_files")]
#[command(about = "Delete stored files by key or public URL")]
struct Args {
    /// Storage keys (s3 provider) or public file URLs (catbox provider)
    #[arg(required = true, value_name = "IDENTIFIER")]
    identifiers: Vec<String>,

    /// User identity recorded for the delete
    #[arg(long, default_value = "cli")]
    user: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let session = StaticSession::new(args.user);
    let result = delete_files(&config, &session, &args.identifiers).await;

    match (result.message, result.error) {
        (Some(message), _) => {
            println!("{}", message);
            Ok(())
        }
        (None, Some(error)) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
        (None, None) => Ok(()),
    }
}
