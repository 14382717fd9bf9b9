use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use loinho::app_state::{on_generate, AppState, GenerationStatus};
use loinho::chat::{render_response, run_terminal_chat};
use loinho::config::{load_env_file, Config};
use loinho::constants::{API_KEY_VAR, DEFAULT_PORT};
use loinho::features::{self, FeatureKind, MessageType};
use loinho::request::GeneratorRequest;
use loinho::web_server;

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Extra env file to load before reading configuration.
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Gemini API key.
    #[arg(long, global = true, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model identifier.
    #[arg(long, global = true, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Base URL of the Gemini API.
    #[arg(long, global = true, env = "GEMINI_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the web server hosting the app.
    Serve {
        #[arg(long, env = "LOINHO_PORT", default_value_t = DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
    },
    /// Generate content once from the terminal.
    Generate {
        /// Continue into a chat with the same persona afterwards.
        #[arg(long, global = true)]
        chat: bool,
        #[command(subcommand)]
        target: GenerateCommands,
    },
    /// List the available features and message types.
    Catalog,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum GenerateCommands {
    /// A short personalised message for an occasion.
    Message {
        #[arg(long, help = "Her name.")]
        name: String,
        #[arg(long, default_value = "", help = "Traits or shared memories.")]
        characteristics: String,
        #[arg(long = "type", default_value = "good-morning", value_parser = parse_message_type)]
        message_type: MessageType,
    },
    /// A short love poem on a topic.
    Poem {
        #[arg(long, help = "Her name.")]
        name: String,
        #[arg(long, default_value = "", help = "Traits or shared memories.")]
        characteristics: String,
        #[arg(long)]
        topic: String,
    },
    /// A small game for two.
    Game {
        #[arg(long, help = "Her name.")]
        name: String,
        #[arg(long, default_value = "", help = "Traits or shared memories.")]
        characteristics: String,
        #[arg(long)]
        idea: String,
    },
    /// Practical advice on one of the advisor topics.
    Advice {
        #[arg(value_parser = parse_practical_feature, help = "health, finance, life, study, feng-shui or spirituality")]
        topic: FeatureKind,
        query: String,
    },
}

impl GenerateCommands {
    fn into_request(self) -> Result<GeneratorRequest> {
        let request = match self {
            GenerateCommands::Message {
                name,
                characteristics,
                message_type,
            } => GeneratorRequest::Message {
                name,
                characteristics,
                message_type,
            },
            GenerateCommands::Poem {
                name,
                characteristics,
                topic,
            } => GeneratorRequest::Poem {
                name,
                characteristics,
                poem_topic: topic,
            },
            GenerateCommands::Game {
                name,
                characteristics,
                idea,
            } => GeneratorRequest::Game {
                name,
                characteristics,
                game_idea: idea,
            },
            GenerateCommands::Advice { topic, query } => GeneratorRequest::advice(topic, query)
                .ok_or_else(|| anyhow!("'{}' is not an advice topic", topic.slug()))?,
        };
        Ok(request)
    }
}

fn parse_message_type(value: &str) -> Result<MessageType, String> {
    MessageType::from_slug(value).ok_or_else(|| {
        let known: Vec<&str> = MessageType::ALL.iter().map(|m| m.slug()).collect();
        format!("unknown message type '{value}' (expected one of: {})", known.join(", "))
    })
}

fn parse_practical_feature(value: &str) -> Result<FeatureKind, String> {
    match FeatureKind::from_slug(value) {
        Some(kind) if !kind.is_creative() => Ok(kind),
        _ => Err(format!("'{value}' is not an advice topic")),
    }
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    // --env-file is applied after parsing, so fall back to the environment here.
    let from_env = |flag: &Option<String>, var: &str| flag.clone().or_else(|| std::env::var(var).ok());
    let config = Config::new(
        from_env(&cli.api_key, API_KEY_VAR),
        from_env(&cli.model, "GEMINI_MODEL"),
        from_env(&cli.api_base, "GEMINI_API_BASE"),
    )?;
    Ok(config)
}

fn print_catalog() {
    let catalog = features::catalog();
    for category in &catalog.assistant_types {
        println!("{}", category.label);
        for feature in &category.features {
            println!("  {:<14} {}", feature.id.slug(), feature.label);
        }
    }
    println!("Message types:");
    for message_type in &catalog.message_types {
        println!("  {:<18} {}", message_type.id.slug(), message_type.label);
    }
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for API_KEY and friends)
    load_env_file(None)?;

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,loinho=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(path) = &cli.env_file {
        load_env_file(Some(path))?;
    }

    info!("loinho starting with command: {:?}", cli.command);

    match &cli.command {
        Commands::Catalog => print_catalog(),
        Commands::Serve { port } => {
            let config = resolve_config(&cli)?;
            let generator = config.generator()?;
            let port = *port;
            info!("Starting web server on port {}...", port);

            let web_server_handle =
                tokio::spawn(async move { web_server::start_web_server(port, generator).await });

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received, shutting down...");
                }
                res = web_server_handle => {
                    match res {
                        Ok(Ok(())) => info!("Web server task completed unexpectedly."),
                        Ok(Err(e)) => {
                            error!("Web server failed: {:?}", e);
                            return Err(e.context(format!("Web server on port {port} failed")));
                        }
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }
            info!("Shutdown complete.");
        }
        Commands::Generate { chat, target } => {
            let config = resolve_config(&cli)?;
            let generator = config.generator()?;
            let request = target.clone().into_request()?;

            let state = AppState::new(request.feature().category());
            let state = on_generate(&state, &generator, &request).await?;

            match state.status() {
                GenerationStatus::Success => {
                    if let Some(response) = state.response() {
                        print!("{}", render_response(response));
                    }
                }
                _ => bail!(
                    "{}",
                    state.error().unwrap_or(loinho::error::GENERATION_FAILED)
                ),
            }

            if *chat {
                run_terminal_chat(state, &generator)
                    .await
                    .context("Chat session failed")?;
            }
        }
    }

    Ok(())
}
