use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use threadline_api::{HttpMessageApi, NoAuth, StaticToken, TokenSource};
use threadline_messaging::{ClientConfig, MessagingClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API root URL (overrides config file and THREADLINE_API_URL)
    #[arg(short = 'u', long)]
    api_url: Option<String>,

    /// Bearer token for the API
    #[arg(short, long)]
    token: Option<String>,

    /// Id of the signed-in user
    #[arg(long)]
    user_id: Option<u64>,

    /// Polling period, e.g. "5s" or "1m"
    #[arg(short, long, value_parser = humantime::parse_duration)]
    poll_interval: Option<Duration>,

    /// Path to the JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.api_url {
            config.base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.access_token = Some(token.clone());
        }
        if let Some(id) = self.user_id {
            config.local_user_id = id;
        }
        if let Some(interval) = self.poll_interval {
            config.poll_interval = interval;
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let args = Args::parse();

    let mut config =
        ClientConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate()?;

    let token_source: Arc<dyn TokenSource> = match &config.access_token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => Arc::new(NoAuth),
    };
    let api = HttpMessageApi::new(&config.base_url, token_source, config.request_timeout)?;
    info!("Using API at {}", api.base_url());

    let (client, mut events) = MessagingClient::new(Arc::new(api), config);

    if let Err(e) = client.load_all().await {
        eprintln!("Could not load conversations: {}", e);
    }
    display::print_conversations(&client);
    let poller = client.start_polling();

    println!("Type /help for available commands.");
    prompt();

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut line = String::new();

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if display::print_event(&client, &event) {
                    prompt();
                }
            }

            read = stdin.read_line(&mut line) => {
                if read? == 0 {
                    break;
                }
                let input = line.trim().to_string();
                line.clear();
                if input.is_empty() {
                    prompt();
                    continue;
                }
                let keep_going = match input.strip_prefix('/') {
                    Some(command) => commands::handle(&client, command).await,
                    None => {
                        commands::send_text(&client, &input).await;
                        true
                    }
                };
                if !keep_going {
                    break;
                }
                prompt();
            }
        }
    }

    poller.stop().await;
    Ok(())
}
