use clap::{Parser, Subcommand};
use isoscape::logger::{self, LogLevel, LoggerConfig};
use isoscape::{ClientConfig, ImageClient, Router};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "isoscape", version, about = "Isometric city illustrations from a city name")]
struct Cli {
    /// Base URL of the image API (overrides ISOSCAPE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Landing page
    Home {
        /// Jump straight to the plans
        #[arg(long)]
        pricing: bool,
        /// Generate from the landing-page form
        #[arg(long)]
        city: Option<String>,
    },
    /// Generator page
    Generate {
        city: String,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Run the HTTP relay in front of Gemini
    #[cfg(feature = "server")]
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        /// Keep a copy of every generated PNG next to the relay
        #[arg(long)]
        save_images: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let mut log_config = match &cli.command {
        #[cfg(feature = "server")]
        Some(Command::Serve { .. }) if cli.json_logs => LoggerConfig::production(),
        #[cfg(feature = "server")]
        Some(Command::Serve { .. }) => LoggerConfig::development().with_level(LogLevel::Info),
        _ => LoggerConfig::cli(),
    };
    if cli.verbose {
        log_config = log_config.with_level(LogLevel::Debug);
    }
    if cli.json_logs {
        log_config = log_config.with_json_output(true).with_colors(false);
    }
    if let Some(path) = &cli.log_file {
        log_config = log_config.with_file_output(&path.to_string_lossy());
    }
    logger::init_with_config(log_config)?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }

    match cli.command.unwrap_or(Command::Home {
        pricing: false,
        city: None,
    }) {
        Command::Home { pricing, city } => {
            logger::log_config_info(&config);
            let router = router(config)?;
            let home = router.home();

            if pricing {
                println!("{}", home.scroll_to_pricing());
            } else {
                println!("{}", home.render());
            }

            if let Some(city) = city {
                println!();
                home.form().submit(&city, &mut io::stdout()).await?;
            }
        }
        Command::Generate { city, output_dir } => {
            if let Some(dir) = output_dir {
                config = config.with_output_dir(dir);
            }
            logger::log_config_info(&config);
            let router = router(config)?;
            let generator = router.generator();

            let outcome = generator.run(&city, &mut io::stdout()).await?;
            if outcome.state.error.is_some() {
                std::process::exit(1);
            }
        }
        #[cfg(feature = "server")]
        Command::Serve {
            host,
            port,
            save_images,
        } => {
            let mut server_config = isoscape::ServerConfig::from_env();
            if let Some(host) = host {
                server_config = server_config.with_host(host);
            }
            if let Some(port) = port {
                server_config = server_config.with_port(port);
            }
            if save_images {
                let gemini = server_config.gemini.clone().with_save_images(true);
                server_config = server_config.with_gemini(gemini);
            }
            isoscape::server::run(server_config).await?;
        }
    }

    Ok(())
}

fn router(config: ClientConfig) -> isoscape::Result<Router> {
    let api = ImageClient::new(&config)?;
    log::debug!("Image endpoint: {}", api.endpoint());
    Ok(Router::new(Arc::new(api), config))
}
