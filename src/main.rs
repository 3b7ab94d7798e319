use anyhow::Result;
use clap::{Parser, Subcommand};
use gemini_gateway::ai::{GeminiClient, GenerationService, Part, ResponseExtractor};
use gemini_gateway::models::Config;
use gemini_gateway::router::create_router;
use gemini_gateway::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-gateway")]
#[command(about = "HTTP gateway for Gemini text, image, and audio prompts")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Listen port; overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send a single text prompt and print the answer.
    Ask {
        #[arg(value_name = "PROMPT")]
        prompt: String,
    },
}

async fn serve(config: Config, port: Option<u16>) -> Result<()> {
    let generator = GeminiClient::from_config(&config);
    info!("Provider: Gemini (model: {})", generator.model());

    let app = create_router(AppState::new(Arc::new(generator)));
    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.port)));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn ask(config: Config, prompt: String) -> Result<()> {
    let generator = GeminiClient::from_config(&config);
    let response = generator.generate_content(vec![Part::text(prompt)]).await?;

    println!("{}", ResponseExtractor::default().extract_text(&response));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(config, port).await,
        Command::Ask { prompt } => ask(config, prompt).await,
    };

    if let Err(e) = outcome {
        error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let args = CliArgs::try_parse_from(["gemini-gateway"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_parses_serve_port() {
        let args = CliArgs::try_parse_from(["gemini-gateway", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(args.command, Some(Command::Serve { port: Some(8080) })));
    }

    #[test]
    fn test_parses_ask_prompt() {
        let args = CliArgs::try_parse_from(["gemini-gateway", "ask", "Hello there"]).unwrap();
        match args.command {
            Some(Command::Ask { prompt }) => assert_eq!(prompt, "Hello there"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
