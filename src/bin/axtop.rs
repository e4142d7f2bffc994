use axtop::query::{HttpQueryClient, QueryClient};
use axtop::AxtopConfig;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AxtopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false);

    // The terminal belongs to the UI, so logs go to a file or nowhere.
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AxtopConfig::from_env();
    init_logging(&config)?;

    let client = match HttpQueryClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("axtop: {}", e);
            std::process::exit(1);
        }
    };
    info!("Querying {}", client.endpoint());

    let client: Arc<dyn QueryClient> = Arc::new(client);
    axtop::tui::run(&config, client).await?;

    Ok(())
}
