/// QResume Server - profile links and QR codes
use clap::{Parser, Subcommand};
use qresume_server::{api, config::ServerConfig, state::AppState};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qresume-server")]
#[command(about = "QResume profile and QR code server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "QRESUME_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Register a user, or check the password of an existing one
    AddUser {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qresume_server=info,qresume_storage=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser { email, password } => {
            add_user(config, &email, &password).await?;
        }
        Commands::ListUsers => {
            list_users(config).await?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting QResume server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let app_state = AppState::from_config(&config).await?;
    let app = api::create_router(app_state, &config.qr);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(config: ServerConfig, email: &str, password: &str) -> anyhow::Result<()> {
    let app_state = AppState::from_config(&config).await?;
    let outcome = app_state.user_service.sign_on(email, password).await?;

    tracing::info!("{}: {} ({})", outcome.status(), email, outcome.user().id);

    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let app_state = AppState::from_config(&config).await?;
    let users = app_state.user_service.list_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {}", user.email, user.name);
    }

    Ok(())
}
