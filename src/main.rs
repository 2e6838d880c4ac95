use clap::Parser;
use kwesta::cli::{self, Cli};
use kwesta::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.logging.init();

    if let Err(e) = cli::run(cli, config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
